use crate::worklist::item::WorkItem;
use crate::WorkListError;
use serde_json::Value;
use std::path::Path;

/// Loads the work list from a JSON file
///
/// The file must hold a JSON array of objects, each with a string `url`
/// field. Any problem with the file is fatal for the run, so every entry is
/// checked before anything is fetched.
///
/// # Arguments
///
/// * `path` - Path to the JSON work list
///
/// # Returns
///
/// * `Ok(Vec<WorkItem>)` - Entries in file order
/// * `Err(WorkListError)` - The file is missing, malformed, or has a bad entry
pub fn load_work_list(path: &Path) -> Result<Vec<WorkItem>, WorkListError> {
    let content = std::fs::read_to_string(path).map_err(|source| WorkListError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let entries: Vec<Value> =
        serde_json::from_str(&content).map_err(|source| WorkListError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Object(fields) => {
                WorkItem::from_object(fields).ok_or(WorkListError::MissingUrl { index })
            }
            _ => Err(WorkListError::NotAnObject { index }),
        })
        .collect()
}
