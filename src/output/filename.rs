//! Output filename resolution
//!
//! Every output file is named `<base>_<suffix>.txt`, where the base comes
//! from the `Content-Disposition` header or, failing that, from the last
//! segment of the URL path. The random suffix keeps names from colliding
//! when several workers write into the same directory.

use crate::extract::OUTPUT_EXTENSION;
use percent_encoding::percent_decode_str;
use rand::distributions::Alphanumeric;
use rand::Rng;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use url::Url;

/// Length of the random collision-avoidance suffix
pub const RANDOM_SUFFIX_LEN: usize = 10;

/// Base name used when the URL path has no last segment
pub const FALLBACK_BASE_NAME: &str = "page";

/// Returns a fresh suffix of [`RANDOM_SUFFIX_LEN`] characters from `[A-Za-z0-9]`
pub fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(char::from)
        .collect()
}

/// Reads the `filename=` directive of a `Content-Disposition` header value
///
/// Quoted values run to the closing quote, bare values to the next `;`.
/// Path separators are replaced with `_` so the name cannot leave the
/// output directory. Any extension in the suggested name is kept.
pub fn suggested_filename(content_disposition: &str) -> Option<String> {
    static FILENAME_RE: OnceLock<Regex> = OnceLock::new();
    let re = FILENAME_RE.get_or_init(|| {
        Regex::new(r#"filename=(?:"([^"]*)"|([^;]+))"#).expect("filename pattern is valid")
    });

    let captures = re.captures(content_disposition)?;
    let raw = captures.get(1).or_else(|| captures.get(2))?.as_str().trim();
    if raw.is_empty() {
        return None;
    }

    Some(raw.replace(['/', '\\'], "_"))
}

/// Derives a base name (without suffix) from the last segment of the URL path
///
/// The path is percent-decoded first. URLs whose path ends in `/`, or that
/// cannot be parsed, fall back to [`FALLBACK_BASE_NAME`].
pub fn base_name_from_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return FALLBACK_BASE_NAME.to_string();
    };

    let decoded = percent_decode_str(parsed.path()).decode_utf8_lossy();
    match decoded.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => FALLBACK_BASE_NAME.to_string(),
    }
}

/// Resolves the base name, including its random suffix, for one response
pub fn resolve_base_name(content_disposition: Option<&str>, url: &str) -> String {
    let base = content_disposition
        .and_then(suggested_filename)
        .unwrap_or_else(|| base_name_from_url(url));
    format!("{}_{}", base, random_suffix())
}

/// Resolves the full output path `<output_dir>/<base>_<suffix>.txt`
///
/// # Example
///
/// ```
/// use sitetext::output::resolve_output_path;
/// use std::path::Path;
///
/// let path = resolve_output_path(Path::new("scraped/output"), None, "https://example.com/about");
/// let name = path.file_name().unwrap().to_str().unwrap();
/// assert!(name.starts_with("about_"));
/// assert!(name.ends_with(".txt"));
/// ```
pub fn resolve_output_path(
    output_dir: &Path,
    content_disposition: Option<&str>,
    url: &str,
) -> PathBuf {
    let base = resolve_base_name(content_disposition, url);
    output_dir.join(format!("{}.{}", base, OUTPUT_EXTENSION))
}
