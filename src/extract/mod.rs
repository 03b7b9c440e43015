//! Text extraction from fetched documents
//!
//! This module decides how a response body is turned into plain text:
//! - PDF documents are read page by page
//! - Everything else is parsed as HTML and reduced to its readable text

mod html;
mod pdf;

pub use html::{
    charset_from_content_type, decode_html, extract_html_text, normalize_whitespace, CONTENT_TAGS,
    STRIPPED_TAGS,
};
pub use pdf::extract_pdf_text;

use thiserror::Error;

/// Extension of every output file, whatever the source format
pub const OUTPUT_EXTENSION: &str = "txt";

/// Errors that can occur while extracting text
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Extraction strategy chosen from the response headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// `application/pdf` documents
    Pdf,
    /// HTML and any other content
    Html,
}

impl ContentKind {
    /// Classifies a response by its `Content-Type` header
    ///
    /// Anything whose Content-Type mentions `application/pdf` is a PDF;
    /// everything else, including a missing header, is treated as HTML.
    pub fn classify(content_type: Option<&str>) -> Self {
        match content_type {
            Some(value) if value.to_ascii_lowercase().contains("application/pdf") => Self::Pdf,
            _ => Self::Html,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Html => "html",
        }
    }
}

/// Plain text extracted from one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub kind: ContentKind,
}

/// Extracts text from `body` using the strategy for `kind`
///
/// `charset` comes from the response's `Content-Type` and only affects HTML.
pub fn extract_text(
    kind: ContentKind,
    body: &[u8],
    charset: Option<&str>,
) -> Result<ExtractedText, ExtractError> {
    let text = match kind {
        ContentKind::Pdf => extract_pdf_text(body)?,
        ContentKind::Html => extract_html_text(body, charset)?,
    };
    Ok(ExtractedText { text, kind })
}
