//! Scrape module for batch page fetching and processing
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with an explicit timeout
//! - The per-item fetch, extract, name and write pipeline
//! - Overall batch coordination across a fixed worker pool

mod coordinator;
mod fetcher;
mod worker;

pub use coordinator::{run_scrape, Coordinator, RunReport};
pub use fetcher::{build_http_client, fetch_url, FetchResult, ResponseMeta};
pub use worker::{process_item, ItemError, ItemOutcome};
