//! Configuration module for Site-Text
//!
//! Scraper settings come from an optional TOML file; the output directory and
//! work list come from the command line. Both resolve into one immutable
//! [`Config`] that is built once at startup.
//!
//! # Example
//!
//! ```no_run
//! use sitetext::config::{load_scraper_config, Config, RunTarget};
//! use std::path::Path;
//!
//! let scraper = load_scraper_config(Path::new("sitetext.toml")).unwrap();
//! let config = Config::new(scraper, RunTarget::Test);
//! println!("Writing to {}", config.output_dir.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FileConfig, RunTarget, ScraperConfig, DEFAULT_OUTPUT_NAME, DEFAULT_SCRAPED_DIR,
    DEFAULT_USER_AGENT, DEFAULT_WORK_LIST, TEST_OUTPUT_NAME, TEST_WORK_LIST,
};

// Re-export parser and validation functions
pub use parser::{load_scraper_config, parse_scraper_config};
pub use validation::{validate_output_name, validate_scraper_config, MAX_WORKERS};
