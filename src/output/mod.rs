//! Output module for writing scrape results
//!
//! This module handles:
//! - Naming the text file written for each work item
//! - Snapshotting and clearing the output directory before a run
//! - Writing the JSON result listing to stdout
//! - Recording run statistics

mod archive;
mod filename;
pub mod stats;

pub use archive::{
    archive_output_dir, archive_output_dir_at, archive_path_for, ArchiveError, ArchiveResult,
    ARCHIVE_TIMESTAMP_FORMAT,
};
pub use filename::{
    base_name_from_url, random_suffix, resolve_base_name, resolve_output_path,
    suggested_filename, FALLBACK_BASE_NAME, RANDOM_SUFFIX_LEN,
};
pub use stats::{log_statistics, RunStatistics};

use crate::worklist::WorkItem;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::Write;

/// Serializes the processed items as a JSON array indented with four spaces
pub fn to_result_json(items: &[WorkItem]) -> Result<String, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    items.serialize(&mut serializer)?;

    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Writes the JSON result listing, followed by a newline, to `writer`
pub fn write_results<W: Write>(writer: &mut W, items: &[WorkItem]) -> std::io::Result<()> {
    let json = to_result_json(items).map_err(std::io::Error::from)?;
    writeln!(writer, "{}", json)
}
