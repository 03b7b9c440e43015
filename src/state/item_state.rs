/// Work item state definitions for tracking scrape progress
///
/// Each work item moves through these states exactly once per run.
use std::fmt;

/// Represents the current state of a work item in the scrape pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemState {
    // ===== Active States =====
    /// Item is queued and waiting for a worker
    Pending,

    /// Item's URL is being downloaded
    Fetching,

    /// Download succeeded
    Fetched,

    /// Content-Type is being inspected
    Classifying,

    /// PDF text extraction is running
    ExtractingPdf,

    /// HTML text extraction is running
    ExtractingHtml,

    /// Text extraction succeeded
    Extracted,

    /// Output filename is being resolved
    NamingFile,

    /// Text file is being written
    WritingFile,

    // ===== Terminal Success State =====
    /// Text file written and item annotated
    Done,

    // ===== Terminal Error States =====
    /// Network error, timeout, or non-2xx response
    FetchFailed,

    /// PDF or HTML extraction failed
    ExtractFailed,

    /// Text file could not be written
    WriteFailed,
}

impl ItemState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Done | Self::FetchFailed | Self::ExtractFailed | Self::WriteFailed
        )
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if this represents a failure that drops the item
    pub fn is_failure(&self) -> bool {
        self.is_terminal() && !self.is_success()
    }

    /// Returns true if the pipeline may move from `self` to `next`
    pub fn can_transition_to(&self, next: ItemState) -> bool {
        use ItemState::*;

        matches!(
            (self, next),
            (Pending, Fetching)
                | (Fetching, Fetched)
                | (Fetching, FetchFailed)
                | (Fetched, Classifying)
                | (Classifying, ExtractingPdf)
                | (Classifying, ExtractingHtml)
                | (ExtractingPdf, Extracted)
                | (ExtractingPdf, ExtractFailed)
                | (ExtractingHtml, Extracted)
                | (ExtractingHtml, ExtractFailed)
                | (Extracted, NamingFile)
                | (NamingFile, WritingFile)
                | (WritingFile, Done)
                | (WritingFile, WriteFailed)
        )
    }

    /// Stable snake_case name used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fetching => "fetching",
            Self::Fetched => "fetched",
            Self::Classifying => "classifying",
            Self::ExtractingPdf => "extracting_pdf",
            Self::ExtractingHtml => "extracting_html",
            Self::Extracted => "extracted",
            Self::NamingFile => "naming_file",
            Self::WritingFile => "writing_file",
            Self::Done => "done",
            Self::FetchFailed => "fetch_failed",
            Self::ExtractFailed => "extract_failed",
            Self::WriteFailed => "write_failed",
        }
    }

    /// Returns all possible item states, in pipeline order
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Fetching,
            Self::Fetched,
            Self::Classifying,
            Self::ExtractingPdf,
            Self::ExtractingHtml,
            Self::Extracted,
            Self::NamingFile,
            Self::WritingFile,
            Self::Done,
            Self::FetchFailed,
            Self::ExtractFailed,
            Self::WriteFailed,
        ]
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
