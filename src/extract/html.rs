//! HTML text extraction
//!
//! Reduces an HTML page to the text of its content-bearing tags:
//! - Page chrome and code (header, footer, nav, script, style) is removed first
//! - Text is collected from paragraphs, headings, links and list items
//! - Whitespace is collapsed and blank lines dropped
//!
//! Bytes are decoded with the charset from the `Content-Type` header, then a
//! `<meta charset>` declaration near the top of the page, then UTF-8.

use crate::extract::ExtractError;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use regex::bytes::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

/// Elements removed, with their subtrees, before any text is collected
pub const STRIPPED_TAGS: &[&str] = &["header", "footer", "nav", "script", "style"];

/// Elements whose text makes up the extracted content
pub const CONTENT_TAGS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6", "a", "li"];

/// Leading bytes searched for a `<meta charset>` declaration
const META_PRESCAN_LEN: usize = 1024;

/// Extracts readable text from raw HTML bytes
///
/// `charset` is the `charset` parameter of the response's `Content-Type`,
/// if it had one. Each content element contributes its descendant text
/// joined by single spaces; the blocks are joined by a space and passed
/// through [`normalize_whitespace`]. Nested content elements (a link inside
/// a list item, say) contribute their text once per matching element.
///
/// # Example
///
/// ```
/// use sitetext::extract::extract_html_text;
///
/// let html = b"<nav><a href='/'>Home</a></nav><h1>Title</h1><p>Body  text</p>";
/// assert_eq!(extract_html_text(html, None).unwrap(), "Title Body text");
/// ```
pub fn extract_html_text(body: &[u8], charset: Option<&str>) -> Result<String, ExtractError> {
    let mut document = Html::parse_document(&decode_html(body, charset));

    strip_elements(&mut document)?;

    let content_selector = parse_selector(&CONTENT_TAGS.join(", "))?;
    let blocks: Vec<String> = document
        .root_element()
        .select(&content_selector)
        .map(|element| {
            element
                .text()
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string()
        })
        .collect();

    Ok(normalize_whitespace(&blocks.join(" ")))
}

/// Decodes an HTML body to a string
///
/// An unknown `charset` label is ignored. A byte order mark overrides both
/// the header and the page. Undecodable bytes become U+FFFD.
pub fn decode_html(body: &[u8], charset: Option<&str>) -> String {
    let encoding = charset
        .and_then(|label| Encoding::for_label(label.trim().as_bytes()))
        .or_else(|| meta_charset(body))
        .unwrap_or(UTF_8);

    let (text, _, _) = encoding.decode(body);
    text.into_owned()
}

/// Reads the `charset` parameter of a `Content-Type` header value
///
/// ```
/// use sitetext::extract::charset_from_content_type;
///
/// assert_eq!(charset_from_content_type("text/html; charset=\"ISO-8859-1\""), Some("ISO-8859-1"));
/// assert_eq!(charset_from_content_type("text/html"), None);
/// ```
pub fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches(|c: char| c == '"' || c == '\'');
        (!value.is_empty()).then_some(value)
    })
}

/// Finds the encoding named by a `<meta charset>` or `http-equiv` declaration
fn meta_charset(body: &[u8]) -> Option<&'static Encoding> {
    static META_RE: OnceLock<Regex> = OnceLock::new();
    let re = META_RE.get_or_init(|| {
        Regex::new(r#"(?i-u)<meta[^>]*?charset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#)
            .expect("meta charset pattern is valid")
    });

    let head = &body[..body.len().min(META_PRESCAN_LEN)];
    let label = re.captures(head)?.get(1)?.as_bytes();
    match Encoding::for_label(label)? {
        // A page that declares UTF-16 in ASCII markup is not UTF-16
        enc if enc == UTF_16LE || enc == UTF_16BE => Some(UTF_8),
        enc => Some(enc),
    }
}

/// Collapses whitespace runs to single spaces and drops blank lines
///
/// Applying it twice gives the same result as applying it once.
pub fn normalize_whitespace(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    collapsed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Detaches every stripped element from the document tree
fn strip_elements(document: &mut Html) -> Result<(), ExtractError> {
    let selector = parse_selector(&STRIPPED_TAGS.join(", "))?;
    let ids: Vec<_> = document
        .root_element()
        .select(&selector)
        .map(|element| element.id())
        .collect();

    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    Ok(())
}

fn parse_selector(selectors: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selectors).map_err(|e| ExtractError::Selector(format!("{:?}", e)))
}
