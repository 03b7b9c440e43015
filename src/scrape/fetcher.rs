//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building HTTP clients with the browser user agent and timeouts
//! - GET requests to download page and document bodies
//! - Error classification into HTTP and network failures

use crate::config::ScraperConfig;
use reqwest::header::{HeaderMap, HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::Client;
use std::fmt;
use std::time::Duration;

/// Response headers the pipeline cares about
///
/// Absent or non-UTF-8 headers are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMeta {
    /// `Content-Type` header value
    pub content_type: Option<String>,

    /// `Content-Disposition` header value
    pub content_disposition: Option<String>,
}

impl ResponseMeta {
    /// Reads the relevant headers from a response header map
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let value = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        Self {
            content_type: value(CONTENT_TYPE),
            content_disposition: value(CONTENT_DISPOSITION),
        }
    }
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the body
    Success {
        /// Headers used for classification and naming
        meta: ResponseMeta,
        /// Raw response body
        body: Vec<u8>,
    },

    /// Server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, DNS, TLS, timeout, body read)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the request hit the configured timeout
        timed_out: bool,
    },
}

impl fmt::Display for FetchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { body, .. } => write!(f, "fetched {} bytes", body.len()),
            Self::HttpError { status_code } => write!(f, "HTTP {}", status_code),
            Self::NetworkError { error, timed_out } if *timed_out => {
                write!(f, "request timed out: {}", error)
            }
            Self::NetworkError { error, .. } => write!(f, "{}", error),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Each worker builds its own client, so connection pools are never shared
/// between workers. No cookie store is configured.
///
/// # Example
///
/// ```no_run
/// use sitetext::config::ScraperConfig;
/// use sitetext::scrape::build_http_client;
///
/// let client = build_http_client(&ScraperConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &ScraperConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET request
///
/// Redirects are followed by the client. There are no retries: any network
/// error or non-2xx status is returned as a failure variant for the caller
/// to log and drop.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let meta = ResponseMeta::from_headers(response.headers());

    match response.bytes().await {
        Ok(body) => FetchResult::Success {
            meta,
            body: body.to_vec(),
        },
        Err(e) => classify_error(e),
    }
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    FetchResult::NetworkError {
        timed_out: e.is_timeout(),
        error: e.to_string(),
    }
}
