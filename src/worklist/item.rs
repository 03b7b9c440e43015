use serde::Serialize;
use serde_json::{Map, Value};

/// Key added to each successfully processed work item
pub const FILE_ON_DISK_KEY: &str = "file_on_disk";

/// Key holding the URL of a work item
pub const URL_KEY: &str = "url";

/// One entry of the work list
///
/// The original JSON object is kept as-is so that any extra fields pass
/// through to the output untouched and in their original order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WorkItem {
    fields: Map<String, Value>,
}

impl WorkItem {
    /// Wraps a JSON object, returning `None` if it has no string `url` field
    pub fn from_object(fields: Map<String, Value>) -> Option<Self> {
        match fields.get(URL_KEY) {
            Some(Value::String(_)) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Builds an item holding only a URL
    pub fn new(url: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(URL_KEY.to_string(), Value::String(url.into()));
        Self { fields }
    }

    /// The URL to fetch
    pub fn url(&self) -> &str {
        self.fields
            .get(URL_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Path of the text file written for this item, once processed
    pub fn file_on_disk(&self) -> Option<&str> {
        self.fields.get(FILE_ON_DISK_KEY).and_then(Value::as_str)
    }

    /// Any field of the original entry
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Records the path of the written text file
    pub fn annotate(mut self, file_on_disk: impl Into<String>) -> Self {
        self.fields.insert(
            FILE_ON_DISK_KEY.to_string(),
            Value::String(file_on_disk.into()),
        );
        self
    }
}
