use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use synopsis_core::PipelineError;
use synopsis_ingest::ExtractError;

/// Failure categories a request can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    UnsupportedFormat,
    EmptyExtraction,
    UnreadableDocument,
    ModelUnavailable,
    Inference,
    Internal,
}

/// Status code for each failure kind.
pub const STATUS_TABLE: [(ErrorKind, StatusCode); 7] = [
    (ErrorKind::Validation, StatusCode::BAD_REQUEST),
    (ErrorKind::UnsupportedFormat, StatusCode::BAD_REQUEST),
    (ErrorKind::EmptyExtraction, StatusCode::BAD_REQUEST),
    (ErrorKind::UnreadableDocument, StatusCode::BAD_REQUEST),
    (ErrorKind::ModelUnavailable, StatusCode::INTERNAL_SERVER_ERROR),
    (ErrorKind::Inference, StatusCode::INTERNAL_SERVER_ERROR),
    (ErrorKind::Internal, StatusCode::INTERNAL_SERVER_ERROR),
];

pub fn status_for(kind: ErrorKind) -> StatusCode {
    STATUS_TABLE
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, status)| *status)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// An error rendered as `{"error": message}` with the status from [`STATUS_TABLE`].
#[derive(Debug)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        let kind = match e {
            PipelineError::Validation(_) => ErrorKind::Validation,
            PipelineError::ModelUnavailable(_) => ErrorKind::ModelUnavailable,
            PipelineError::Inference(_) => ErrorKind::Inference,
        };
        Self::new(kind, e.to_string())
    }
}

impl From<ExtractError> for ApiError {
    fn from(e: ExtractError) -> Self {
        let kind = match e {
            ExtractError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            ExtractError::EmptyExtraction => ErrorKind::EmptyExtraction,
            ExtractError::Unreadable(_) => ErrorKind::UnreadableDocument,
            ExtractError::Io(_) => ErrorKind::Internal,
        };
        Self::new(kind, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.kind);
        if status.is_server_error() {
            tracing::error!(kind = ?self.kind, message = %self.message, "request failed");
        } else {
            tracing::debug!(kind = ?self.kind, message = %self.message, "request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_table_entry() {
        for kind in [
            ErrorKind::Validation,
            ErrorKind::UnsupportedFormat,
            ErrorKind::EmptyExtraction,
            ErrorKind::UnreadableDocument,
            ErrorKind::ModelUnavailable,
            ErrorKind::Inference,
            ErrorKind::Internal,
        ] {
            assert!(STATUS_TABLE.iter().any(|(k, _)| *k == kind), "{kind:?}");
        }
    }

    #[test]
    fn client_and_server_faults_split() {
        assert_eq!(status_for(ErrorKind::EmptyExtraction), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(ErrorKind::ModelUnavailable),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn extract_errors_map_to_kinds() {
        let err: ApiError = ExtractError::EmptyExtraction.into();
        assert_eq!(err.kind, ErrorKind::EmptyExtraction);
        assert_eq!(err.message, "Could not extract text from the file.");
    }
}
