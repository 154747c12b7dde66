//! PDF text extraction.
//!
//! Pages are read in order with `lopdf` so each page's text ends up on its own
//! line. If that yields nothing (odd encodings, broken xref tables) we give
//! `pdf-extract` one try over the whole document.

use lopdf::Document;
use tracing::{debug, warn};

use super::ExtractError;

pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    match extract_by_pages(bytes) {
        Ok(text) if !text.trim().is_empty() => return Ok(text),
        Ok(_) => debug!("Per-page extraction found no text, trying pdf-extract"),
        Err(e) => warn!("Per-page extraction failed ({e}), trying pdf-extract"),
    }

    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

/// Concatenates the text of every page, one trailing newline per non-empty page.
fn extract_by_pages(bytes: &[u8]) -> Result<String, lopdf::Error> {
    let doc = Document::load_mem(bytes)?;
    let pages = doc.get_pages();
    debug!("PDF has {} pages", pages.len());

    let mut text = String::new();
    for page_number in pages.into_keys() {
        let page_text = doc.extract_text(&[page_number])?;
        if !page_text.is_empty() {
            text.push_str(&page_text);
            text.push('\n');
        }
    }
    Ok(text)
}
