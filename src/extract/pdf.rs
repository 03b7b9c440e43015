//! PDF text extraction

use crate::extract::ExtractError;
use lopdf::Document;

/// Extracts the text of every page of a PDF, in page order
///
/// Page texts are concatenated with no separator. lopdf ends each page's text
/// with the newline it emits for the last text object; that one newline is
/// dropped so the result is exactly the page texts back to back.
///
/// Any load or per-page extraction error fails the whole document.
pub fn extract_pdf_text(body: &[u8]) -> Result<String, ExtractError> {
    let document = Document::load_mem(body)?;

    let mut text = String::new();
    for page_number in document.get_pages().keys() {
        let page_text = document.extract_text(&[*page_number])?;
        text.push_str(page_text.strip_suffix('\n').unwrap_or(&page_text));
    }

    Ok(text)
}
