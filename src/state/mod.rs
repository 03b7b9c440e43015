//! State module for tracking scrape progress
//!
//! # Components
//!
//! - `ItemState`: the per-item pipeline state (pending, fetching, extracting, done, ...)
//! - `ItemTracker`: walks one item through its states, logging each transition

mod item_state;

pub use item_state::ItemState;

/// Tracks the state of a single work item as it moves through the pipeline
#[derive(Debug, Clone)]
pub struct ItemTracker {
    url: String,
    state: ItemState,
}

impl ItemTracker {
    /// Starts tracking an item in the `Pending` state
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: ItemState::Pending,
        }
    }

    /// Current state
    pub fn state(&self) -> ItemState {
        self.state
    }

    /// Moves to `next`
    ///
    /// Transitions outside the pipeline graph are logged and still applied,
    /// so the final state always reflects what the worker last did.
    pub fn advance(&mut self, next: ItemState) {
        if !self.state.can_transition_to(next) {
            tracing::warn!(
                "Unexpected state transition for {}: {} -> {}",
                self.url,
                self.state,
                next
            );
        }
        tracing::trace!("{}: {} -> {}", self.url, self.state, next);
        self.state = next;
    }
}
