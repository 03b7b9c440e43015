//! Snapshot and rotation of a reused output directory
//!
//! Before a run writes anything, the previous contents of its output
//! directory are zipped into a timestamped sibling archive and the directory
//! is emptied. This runs on the calling thread and must finish before any
//! worker starts.

use chrono::Local;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Timestamp format used in archive names
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Errors that can occur while archiving the output directory
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("IO error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Output path {0} exists but is not a directory")]
    NotADirectory(PathBuf),

    #[error("Output path {0} has no directory name")]
    InvalidOutputDir(PathBuf),
}

/// Result type for archive operations
pub type ArchiveResult<T> = Result<T, ArchiveError>;

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ArchiveError + '_ {
    move |source| ArchiveError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Archives and clears `output_dir` if it already exists
///
/// # Returns
///
/// * `Ok(None)` - The directory did not exist; nothing to do
/// * `Ok(Some(path))` - Path of the archive written before clearing
/// * `Err(ArchiveError)` - Archiving or clearing failed; the run must stop
pub fn archive_output_dir(output_dir: &Path) -> ArchiveResult<Option<PathBuf>> {
    let timestamp = Local::now().format(ARCHIVE_TIMESTAMP_FORMAT).to_string();
    archive_output_dir_at(output_dir, &timestamp)
}

/// Same as [`archive_output_dir`] with an explicit timestamp
pub fn archive_output_dir_at(
    output_dir: &Path,
    timestamp: &str,
) -> ArchiveResult<Option<PathBuf>> {
    let metadata = match std::fs::metadata(output_dir) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(
                "Output directory {} does not exist, nothing to archive",
                output_dir.display()
            );
            return Ok(None);
        }
        Err(e) => return Err(io_error(output_dir)(e)),
    };

    if !metadata.is_dir() {
        return Err(ArchiveError::NotADirectory(output_dir.to_path_buf()));
    }

    let archive_path = archive_path_for(output_dir, timestamp)?;
    let entries = write_zip(output_dir, &archive_path)?;
    tracing::info!(
        "Archived {} entries from {} to {}",
        entries,
        output_dir.display(),
        archive_path.display()
    );

    clear_directory(output_dir)?;
    tracing::info!("Cleared output directory {}", output_dir.display());

    Ok(Some(archive_path))
}

/// Returns `<output_dir>_<timestamp>.zip`, next to `output_dir`
pub fn archive_path_for(output_dir: &Path, timestamp: &str) -> ArchiveResult<PathBuf> {
    let name = output_dir
        .file_name()
        .ok_or_else(|| ArchiveError::InvalidOutputDir(output_dir.to_path_buf()))?;

    let archive_name = format!("{}_{}.zip", name.to_string_lossy(), timestamp);
    Ok(output_dir.with_file_name(archive_name))
}

/// Zips the tree under `source_dir` into `archive_path`
///
/// Entry names are relative to `source_dir` and use `/` separators.
/// A symlink to a file is stored with the contents of its target. Links to
/// directories are not descended into, and dangling links are left out.
fn write_zip(source_dir: &Path, archive_path: &Path) -> ArchiveResult<usize> {
    let file = File::create(archive_path).map_err(io_error(archive_path))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = 0;
    for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| ArchiveError::Walk {
            path: source_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let name = entry_name(source_dir, path);

        if entry.file_type().is_dir() {
            zip.add_directory(name, options)?;
        } else if entry.file_type().is_file() || (entry.path_is_symlink() && path.is_file()) {
            zip.start_file(name, options)?;
            let mut source = File::open(path).map_err(io_error(path))?;
            io::copy(&mut source, &mut zip).map_err(io_error(path))?;
        } else {
            tracing::debug!("Skipping non-regular entry {}", path.display());
            continue;
        }
        entries += 1;
    }

    zip.finish()?;
    Ok(entries)
}

fn entry_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Removes everything directly inside `dir`, keeping `dir` itself
fn clear_directory(dir: &Path) -> ArchiveResult<()> {
    for entry in std::fs::read_dir(dir).map_err(io_error(dir))? {
        let entry = entry.map_err(io_error(dir))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(io_error(&path))?;

        if file_type.is_dir() {
            std::fs::remove_dir_all(&path).map_err(io_error(&path))?;
        } else {
            std::fs::remove_file(&path).map_err(io_error(&path))?;
        }
    }
    Ok(())
}
