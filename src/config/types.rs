use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Browser user agent sent with every request unless overridden
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:89.0) Gecko/20100101 Firefox/89.0";

/// Directory that holds every output subdirectory and its archives
pub const DEFAULT_SCRAPED_DIR: &str = "scraped";

/// Output subdirectory used when `--output` is not given
pub const DEFAULT_OUTPUT_NAME: &str = "output";

/// Work list used when `--spider` is not given
pub const DEFAULT_WORK_LIST: &str = "spider.json";

/// Output subdirectory and work list used by `--test_run`
pub const TEST_OUTPUT_NAME: &str = "test";
pub const TEST_WORK_LIST: &str = "test.json";

/// Top-level layout of the optional TOML configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub scraper: ScraperConfig,
}

/// Scraper behaviour configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Parent directory of all output directories
    #[serde(rename = "scraped-dir")]
    pub scraped_dir: String,

    /// Number of concurrent workers in the pool
    pub workers: usize,

    /// Total request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// TCP connect timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            scraped_dir: DEFAULT_SCRAPED_DIR.to_string(),
            workers: 4,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Which output directory and work list a run targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunTarget {
    /// `--test_run`: fixed test directory and work list
    Test,

    /// Named output subdirectory and an explicit work list
    Named { output: String, work_list: PathBuf },
}

impl Default for RunTarget {
    fn default() -> Self {
        Self::Named {
            output: DEFAULT_OUTPUT_NAME.to_string(),
            work_list: PathBuf::from(DEFAULT_WORK_LIST),
        }
    }
}

/// Resolved, immutable configuration for one run
#[derive(Debug, Clone)]
pub struct Config {
    pub scraper: ScraperConfig,

    /// Directory the text files are written to
    pub output_dir: PathBuf,

    /// JSON work list to read
    pub work_list: PathBuf,
}

impl Config {
    /// Resolves the output directory and work list for `target`
    pub fn new(scraper: ScraperConfig, target: RunTarget) -> Self {
        let scraped_dir = Path::new(&scraper.scraped_dir);
        let (output_dir, work_list) = match target {
            RunTarget::Test => (
                scraped_dir.join(TEST_OUTPUT_NAME),
                PathBuf::from(TEST_WORK_LIST),
            ),
            RunTarget::Named { output, work_list } => (scraped_dir.join(output), work_list),
        };

        Self {
            scraper,
            output_dir,
            work_list,
        }
    }
}
