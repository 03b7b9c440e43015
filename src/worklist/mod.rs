//! Work list loading
//!
//! The work list is a JSON array of objects, each naming a `url` to scrape.
//! Extra fields are carried through to the result untouched.

mod item;
mod loader;

pub use item::{WorkItem, FILE_ON_DISK_KEY, URL_KEY};
pub use loader::load_work_list;
