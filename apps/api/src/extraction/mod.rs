//! Document text extraction for uploaded resumes.
//!
//! The format is resolved once from the filename into a [`DocumentFormat`];
//! each variant maps to one extraction strategy. Unsupported or unreadable
//! documents produce an empty string, which callers treat as "no text".

use tracing::warn;

mod docx;
mod pdf;

/// The closed set of upload formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Text,
    Pdf,
    Docx,
    Unsupported,
}

impl DocumentFormat {
    /// Resolves the format from the filename's final extension, ignoring case.
    /// A bare name such as `.txt` still counts as that extension.
    pub fn from_filename(filename: &str) -> Self {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("txt") => Self::Text,
            Some("pdf") => Self::Pdf,
            Some("docx") => Self::Docx,
            _ => Self::Unsupported,
        }
    }
}

/// Converts an uploaded file into plain text. Pure; never fails.
///
/// - `.txt`: UTF-8 with invalid byte sequences dropped
/// - `.pdf`: text per page in order, newline-joined, empty pages skipped
/// - `.docx`: paragraph text in order, newline-joined
/// - anything else: empty string
pub fn extract(filename: &str, bytes: &[u8]) -> String {
    match DocumentFormat::from_filename(filename) {
        DocumentFormat::Text => decode_utf8_dropping_invalid(bytes),
        DocumentFormat::Pdf => pdf::extract_pages(bytes)
            .map(|pages| join_nonempty(pages.iter().map(String::as_str)))
            .unwrap_or_else(|e| {
                warn!("PDF extraction failed for '{filename}': {e}");
                String::new()
            }),
        DocumentFormat::Docx => docx::extract_paragraphs(bytes)
            .map(|paragraphs| paragraphs.join("\n").trim().to_string())
            .unwrap_or_else(|e| {
                warn!("DOCX extraction failed for '{filename}': {e}");
                String::new()
            }),
        DocumentFormat::Unsupported => String::new(),
    }
}

/// `String::from_utf8_lossy` substitutes U+FFFD; invalid sequences are dropped instead.
fn decode_utf8_dropping_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

fn join_nonempty<'a>(pages: impl Iterator<Item = &'a str>) -> String {
    let mut text = String::new();
    for page in pages.map(str::trim).filter(|p| !p.is_empty()) {
        text.push_str(page);
        text.push('\n');
    }
    text.trim().to_string()
}
