//! Per-item scrape pipeline
//!
//! One work item goes through fetch, classify, extract, name and write.
//! Every failure along the way is caught here, logged with the item's URL
//! and turned into an [`ItemOutcome`] without a result, so nothing a single
//! item does can abort the batch.

use crate::extract::{
    charset_from_content_type, extract_text, ContentKind, ExtractError, ExtractedText,
};
use crate::output::resolve_output_path;
use crate::scrape::fetcher::{fetch_url, FetchResult, ResponseMeta};
use crate::state::{ItemState, ItemTracker};
use crate::worklist::WorkItem;
use reqwest::Client;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that drop a single work item
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Error downloading {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Error extracting text from {url}: {source}")]
    Extract { url: String, source: ExtractError },

    #[error("Extraction task for {url} failed: {message}")]
    ExtractTask { url: String, message: String },

    #[error("Error writing {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Final result of processing one work item
#[derive(Debug)]
pub struct ItemOutcome {
    /// Position of the item in the work list
    pub index: usize,

    /// State the item finished in
    pub state: ItemState,

    /// Extraction strategy used, if the item got that far
    pub kind: Option<ContentKind>,

    /// The annotated item, present only when the state is `Done`
    pub item: Option<WorkItem>,
}

/// Runs the whole pipeline for one item
///
/// # Arguments
///
/// * `client` - The worker's own HTTP client
/// * `output_dir` - Directory the text file is written to
/// * `index` - Position of the item in the work list
/// * `item` - The work item to process
pub async fn process_item(
    client: &Client,
    output_dir: &Path,
    index: usize,
    item: WorkItem,
) -> ItemOutcome {
    let mut tracker = ItemTracker::new(item.url());
    let mut kind = None;

    let result = run_pipeline(client, output_dir, &item, &mut tracker, &mut kind).await;

    let item = match result {
        Ok(path) => {
            tracing::info!("Processed: {}", item.url());
            Some(item.annotate(path.display().to_string()))
        }
        Err(e) => {
            tracing::error!("{}", e);
            None
        }
    };

    ItemOutcome {
        index,
        state: tracker.state(),
        kind,
        item,
    }
}

async fn run_pipeline(
    client: &Client,
    output_dir: &Path,
    item: &WorkItem,
    tracker: &mut ItemTracker,
    kind_out: &mut Option<ContentKind>,
) -> Result<PathBuf, ItemError> {
    let url = item.url();

    tracker.advance(ItemState::Fetching);
    let (meta, body) = match fetch_url(client, url).await {
        FetchResult::Success { meta, body, .. } => (meta, body),
        failure => {
            tracker.advance(ItemState::FetchFailed);
            return Err(ItemError::Fetch {
                url: url.to_string(),
                reason: failure.to_string(),
            });
        }
    };
    tracker.advance(ItemState::Fetched);

    tracker.advance(ItemState::Classifying);
    let kind = ContentKind::classify(meta.content_type.as_deref());
    *kind_out = Some(kind);
    tracker.advance(match kind {
        ContentKind::Pdf => ItemState::ExtractingPdf,
        ContentKind::Html => ItemState::ExtractingHtml,
    });

    let charset = meta
        .content_type
        .as_deref()
        .and_then(charset_from_content_type)
        .map(str::to_string);
    let extracted = match extract_blocking(url, kind, body, charset).await {
        Ok(extracted) => extracted,
        Err(e) => {
            tracker.advance(ItemState::ExtractFailed);
            return Err(e);
        }
    };
    tracker.advance(ItemState::Extracted);

    tracker.advance(ItemState::NamingFile);
    let path = output_path(output_dir, &meta, url);

    tracker.advance(ItemState::WritingFile);
    if let Err(e) = write_text(&path, &extracted.text).await {
        tracker.advance(ItemState::WriteFailed);
        return Err(e);
    }
    tracker.advance(ItemState::Done);

    Ok(path)
}

/// Runs extraction on the blocking pool
///
/// A panic inside the parser surfaces as a join error and is reported as an
/// item failure like any other extraction error.
async fn extract_blocking(
    url: &str,
    kind: ContentKind,
    body: Vec<u8>,
    charset: Option<String>,
) -> Result<ExtractedText, ItemError> {
    let task = move || extract_text(kind, &body, charset.as_deref());
    match tokio::task::spawn_blocking(task).await {
        Ok(Ok(extracted)) => Ok(extracted),
        Ok(Err(source)) => Err(ItemError::Extract {
            url: url.to_string(),
            source,
        }),
        Err(join_error) => Err(ItemError::ExtractTask {
            url: url.to_string(),
            message: join_error.to_string(),
        }),
    }
}

fn output_path(output_dir: &Path, meta: &ResponseMeta, url: &str) -> PathBuf {
    resolve_output_path(output_dir, meta.content_disposition.as_deref(), url)
}

async fn write_text(path: &Path, text: &str) -> Result<(), ItemError> {
    let write_error = |source| ItemError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(write_error)?;
    }
    tokio::fs::write(path, text).await.map_err(write_error)
}
