use std::io::Write;

use owo_colors::OwoColorize;
use synopsis_core::Analysis;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print a summary followed by its keywords.
pub fn print_analysis(
    w: &mut dyn Write,
    source: &str,
    analysis: &Analysis,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", format!("Summary of {}", source).bold())?;
    } else {
        writeln!(w, "Summary of {}", source)?;
    }
    writeln!(w, "{}", analysis.summary)?;
    writeln!(w)?;
    print_keywords(w, &analysis.keywords, color)
}

/// Print a keyword list on one line.
pub fn print_keywords(w: &mut dyn Write, keywords: &[String], color: ColorMode) -> std::io::Result<()> {
    if keywords.is_empty() {
        if color.enabled() {
            writeln!(w, "{}", "No keywords found".dimmed())?;
        } else {
            writeln!(w, "No keywords found")?;
        }
        return Ok(());
    }

    write!(w, "Keywords: ")?;
    let rendered: Vec<String> = if color.enabled() {
        keywords.iter().map(|k| k.cyan().to_string()).collect()
    } else {
        keywords.to_vec()
    };
    writeln!(w, "{}", rendered.join(", "))
}

/// Machine-readable output matching the web API's success body.
pub fn analysis_json(analysis: &Analysis) -> serde_json::Value {
    serde_json::json!({
        "summary": analysis.summary,
        "keywords": analysis.keywords,
    })
}
