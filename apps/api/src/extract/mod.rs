//! Resume text extraction.
//!
//! A resume arrives as raw bytes plus whatever media type the browser declared.
//! PDFs are read page by page; plain text is decoded as UTF-8. Either way the
//! result must contain something other than whitespace.

pub mod pdf;

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

pub use pdf::extract_pdf_text;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type '{0}'. Please upload a PDF or TXT file.")]
    UnsupportedFormat(String),

    #[error("Could not read PDF: {0}")]
    Pdf(String),

    #[error("The uploaded text file is not valid UTF-8.")]
    InvalidUtf8,

    #[error("The uploaded file appears to be empty or unreadable.")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    PlainText,
}

impl ResumeFormat {
    /// Picks the format from the declared media type, falling back to the
    /// file extension when the browser sent nothing useful.
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> Result<Self, ExtractError> {
        let essence = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty());

        match essence.as_deref() {
            Some("application/pdf") => return Ok(ResumeFormat::Pdf),
            Some("text/plain") => return Ok(ResumeFormat::PlainText),
            Some("application/octet-stream") | None => {}
            Some(other) => return Err(ExtractError::UnsupportedFormat(other.to_string())),
        }

        let extension = file_name
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Ok(ResumeFormat::Pdf),
            Some("txt") => Ok(ResumeFormat::PlainText),
            _ => Err(ExtractError::UnsupportedFormat(
                file_name.unwrap_or("unknown").to_string(),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResumeFormat::Pdf => "pdf",
            ResumeFormat::PlainText => "text",
        }
    }
}

/// An uploaded resume, alive for a single request.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl ResumeUpload {
    pub fn format(&self) -> Result<ResumeFormat, ExtractError> {
        ResumeFormat::detect(self.content_type.as_deref(), self.file_name.as_deref())
    }
}

/// Extracts the resume text, rejecting content that is empty after trimming.
///
/// PDF parsing is CPU-bound; async callers should run this on a blocking thread.
pub fn extract_text(upload: &ResumeUpload) -> Result<String, ExtractError> {
    let format = upload.format()?;
    let text = match format {
        ResumeFormat::Pdf => extract_pdf_text(&upload.data)?,
        ResumeFormat::PlainText => decode_plain_text(&upload.data)?,
    };

    if text.trim().is_empty() {
        return Err(ExtractError::Empty);
    }

    debug!(
        "Extracted {} chars from {} upload",
        text.chars().count(),
        format.as_str()
    );
    Ok(text)
}

/// Strict UTF-8 decode; a leading byte-order mark is dropped.
pub fn decode_plain_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8(bytes.to_vec()).map_err(|_| ExtractError::InvalidUtf8)
}
