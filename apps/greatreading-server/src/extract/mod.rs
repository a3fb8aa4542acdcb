//! Page text extraction for uploaded documents
//!
//! A book is stored as an ordered list of page texts. The [`PageExtractor`]
//! trait is the seam between the upload route and whatever produces those
//! pages; [`PdfPageExtractor`] is the default backed by `pdf-extract`.

mod sample;

pub use sample::{sample_book_pages, SAMPLE_BOOK_NAME};

use thiserror::Error;

/// Leading bytes of every PDF file
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Extraction errors
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Invalid PDF file")]
    InvalidPdf,

    #[error("PDF file has no pages")]
    NoPages,

    #[error("PDF file contains no extractable text. This may be a scanned document that requires OCR processing.")]
    NoText,
}

/// Turns uploaded bytes into ordered page texts
pub trait PageExtractor: Send + Sync {
    fn extract(&self, data: &[u8]) -> Result<Vec<String>, ExtractError>;
}

/// PDF extractor backed by `pdf-extract`
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfPageExtractor;

impl PdfPageExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Cheap structural check run before extraction
    pub fn looks_like_pdf(data: &[u8]) -> bool {
        data.starts_with(PDF_MAGIC)
    }
}

impl PageExtractor for PdfPageExtractor {
    fn extract(&self, data: &[u8]) -> Result<Vec<String>, ExtractError> {
        if !Self::looks_like_pdf(data) {
            return Err(ExtractError::InvalidPdf);
        }

        let raw = pdf_extract::extract_text_from_mem_by_pages(data).map_err(|e| {
            tracing::warn!("Failed to parse PDF: {}", e);
            ExtractError::InvalidPdf
        })?;

        tracing::debug!("Extracted {} raw pages", raw.len());
        normalize_pages(raw)
    }
}

/// Trim extracted pages and substitute a placeholder for pages without text.
///
/// Page numbering is preserved so the reader's position stays meaningful;
/// a document where every page is blank is rejected.
pub fn normalize_pages<I, S>(raw: I) -> Result<Vec<String>, ExtractError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut pages = Vec::new();
    let mut empty_pages = 0usize;

    for (index, text) in raw.into_iter().enumerate() {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            empty_pages += 1;
            pages.push(format!(
                "[Page {}: No extractable text. This page may contain images or scanned content.]",
                index + 1
            ));
        } else {
            pages.push(trimmed.to_string());
        }
    }

    if pages.is_empty() {
        return Err(ExtractError::NoPages);
    }
    if empty_pages == pages.len() {
        return Err(ExtractError::NoText);
    }

    Ok(pages)
}
