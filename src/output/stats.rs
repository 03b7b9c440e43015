//! Statistics for a completed scrape run
//!
//! Counts final item states and content kinds so a run can be summarised in
//! the log once the worker pool has drained.

use crate::extract::ContentKind;
use crate::state::ItemState;
use std::collections::HashMap;
use std::time::Duration;

/// Scrape run statistics summary
#[derive(Debug, Clone, Default)]
pub struct RunStatistics {
    /// Number of work items submitted
    pub total_items: u64,

    /// Count of items by final state
    pub items_by_state: HashMap<ItemState, u64>,

    /// Count of successfully processed items by content kind
    pub succeeded_by_kind: HashMap<ContentKind, u64>,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunStatistics {
    /// Records the outcome of one item
    pub fn record(&mut self, state: ItemState, kind: Option<ContentKind>) {
        self.total_items += 1;
        *self.items_by_state.entry(state).or_insert(0) += 1;

        if state.is_success() {
            if let Some(kind) = kind {
                *self.succeeded_by_kind.entry(kind).or_insert(0) += 1;
            }
        }
    }

    /// Number of items that finished in `state`
    pub fn count(&self, state: ItemState) -> u64 {
        self.items_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Number of items written to disk
    pub fn succeeded(&self) -> u64 {
        self.count(ItemState::Done)
    }

    /// Number of items dropped from the result
    pub fn failed(&self) -> u64 {
        self.items_by_state
            .iter()
            .filter(|(state, _)| state.is_failure())
            .map(|(_, count)| count)
            .sum()
    }

    /// Percentage of items written to disk
    pub fn success_rate(&self) -> f64 {
        if self.total_items == 0 {
            0.0
        } else {
            (self.succeeded() as f64 / self.total_items as f64) * 100.0
        }
    }
}

/// Logs statistics in a formatted manner
///
/// Goes through `tracing` rather than stdout, which is reserved for the JSON
/// result.
pub fn log_statistics(stats: &RunStatistics) {
    tracing::info!("=== Scrape Statistics ===");
    tracing::info!(
        "Items: {} total, {} written, {} dropped",
        stats.total_items,
        stats.succeeded(),
        stats.failed()
    );

    for state in ItemState::all_states() {
        let count = stats.count(state);
        if count > 0 {
            tracing::info!("  {}: {}", state, count);
        }
    }

    for kind in [ContentKind::Html, ContentKind::Pdf] {
        let count = stats.succeeded_by_kind.get(&kind).copied().unwrap_or(0);
        if count > 0 {
            tracing::info!("  {} documents: {}", kind.as_str(), count);
        }
    }

    tracing::info!(
        "Success Rate: {:.1}% in {:.2?}",
        stats.success_rate(),
        stats.elapsed
    );
}
