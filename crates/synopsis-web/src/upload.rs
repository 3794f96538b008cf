use std::path::{Path, PathBuf};

use axum::extract::Multipart;

use crate::error::ApiError;

/// An uploaded file with its data and declared name.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Read the multipart form and return the `file` field, if present.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<Option<UploadedFile>, ApiError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Failed to read form field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read file data: {}", e)))?
                    .to_vec();
                file = Some(UploadedFile { filename, data });
            }
            _ => {
                // Unknown fields are drained, not kept.
                field.bytes().await.map_err(|e| {
                    ApiError::validation(format!("Failed to read form field: {}", e))
                })?;
            }
        }
    }

    Ok(file)
}

/// An uploaded file written under its own temporary directory.
///
/// The directory and everything in it are removed when this value drops,
/// whichever way the request ends.
pub struct TransientUpload {
    // Held for its Drop.
    _dir: tempfile::TempDir,
    path: PathBuf,
}

impl TransientUpload {
    /// Write `data` to `<root>/upload-XXXX/<filename>`.
    pub fn write(root: &Path, filename: &str, data: &[u8]) -> Result<Self, ApiError> {
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| ApiError::validation("Invalid filename"))?;

        let dir = tempfile::Builder::new()
            .prefix("upload-")
            .tempdir_in(root)
            .map_err(|e| ApiError::internal(format!("Failed to create upload directory: {}", e)))?;
        let path = dir.path().join(name);
        std::fs::write(&path, data)
            .map_err(|e| ApiError::internal(format!("Failed to write upload: {}", e)))?;

        Ok(Self { _dir: dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_removes_artifact() {
        let root = tempfile::tempdir().unwrap();
        let upload = TransientUpload::write(root.path(), "doc.txt", b"hello").unwrap();
        let path = upload.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(path.file_name().unwrap(), "doc.txt");

        drop(upload);
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn directory_components_are_stripped() {
        let root = tempfile::tempdir().unwrap();
        let upload = TransientUpload::write(root.path(), "../../etc/passwd.txt", b"x").unwrap();
        assert!(upload.path().starts_with(root.path()));
        assert_eq!(upload.path().file_name().unwrap(), "passwd.txt");
    }

    #[test]
    fn dot_dot_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        assert!(TransientUpload::write(root.path(), "..", b"x").is_err());
    }
}
