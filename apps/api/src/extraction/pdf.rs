use std::panic;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("unreadable PDF: {0}")]
    Output(#[from] pdf_extract::OutputError),

    #[error("PDF parser panicked")]
    Panicked,
}

/// Returns the visible text of each page in document order.
///
/// `pdf-extract` panics on some malformed inputs; a panic is reported as an
/// error rather than unwinding into the caller.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, PdfError> {
    panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| PdfError::Panicked)?
        .map_err(PdfError::from)
}
