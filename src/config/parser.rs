use crate::config::types::{FileConfig, ScraperConfig};
use crate::config::validation::validate_scraper_config;
use crate::ConfigError;
use std::path::Path;

/// Loads and validates the `[scraper]` settings from a TOML file
///
/// Every key is optional; missing keys keep their defaults.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(ScraperConfig)` - Successfully loaded and validated settings
/// * `Err(ConfigError)` - Failed to read, parse, or validate the file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sitetext::config::load_scraper_config;
///
/// let scraper = load_scraper_config(Path::new("sitetext.toml")).unwrap();
/// println!("Workers: {}", scraper.workers);
/// ```
pub fn load_scraper_config(path: &Path) -> Result<ScraperConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_scraper_config(&content)
}

/// Parses and validates `[scraper]` settings from TOML text
pub fn parse_scraper_config(content: &str) -> Result<ScraperConfig, ConfigError> {
    let file: FileConfig = toml::from_str(content)?;
    validate_scraper_config(&file.scraper)?;
    Ok(file.scraper)
}
