use crate::config::types::ScraperConfig;
use crate::ConfigError;
use std::path::{Component, Path};

/// Largest worker pool accepted from a config file
pub const MAX_WORKERS: usize = 64;

/// Validates scraper settings
pub fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be between 1 and timeout-secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.scraped_dir.is_empty() {
        return Err(ConfigError::Validation(
            "scraped-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates an output subdirectory name given on the command line
///
/// The name must be a single normal path component so the output directory
/// always lands directly under the scraped directory.
pub fn validate_output_name(name: &str) -> Result<(), ConfigError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "output must be a single directory name, got '{}'",
            name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_scraper_config(&ScraperConfig::default()).is_ok());
    }

    #[test]
    fn test_worker_bounds() {
        let mut config = ScraperConfig::default();
        config.workers = 0;
        assert!(validate_scraper_config(&config).is_err());

        config.workers = MAX_WORKERS + 1;
        assert!(validate_scraper_config(&config).is_err());

        config.workers = MAX_WORKERS;
        assert!(validate_scraper_config(&config).is_ok());
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = ScraperConfig::default();
        config.timeout_secs = 0;
        assert!(validate_scraper_config(&config).is_err());
    }

    #[test]
    fn test_connect_timeout_exceeds_timeout() {
        let mut config = ScraperConfig::default();
        config.timeout_secs = 5;
        config.connect_timeout_secs = 10;
        assert!(validate_scraper_config(&config).is_err());
    }

    #[test]
    fn test_empty_user_agent() {
        let mut config = ScraperConfig::default();
        config.user_agent = "   ".to_string();
        assert!(validate_scraper_config(&config).is_err());
    }

    #[test]
    fn test_empty_scraped_dir() {
        let mut config = ScraperConfig::default();
        config.scraped_dir = String::new();
        assert!(validate_scraper_config(&config).is_err());
    }

    #[test]
    fn test_output_name() {
        assert!(validate_output_name("output").is_ok());
        assert!(validate_output_name("acme-2023").is_ok());

        assert!(validate_output_name("").is_err());
        assert!(validate_output_name("a/b").is_err());
        assert!(validate_output_name("..").is_err());
        assert!(validate_output_name("/abs").is_err());
    }
}
