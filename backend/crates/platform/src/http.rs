//! HTTP client plumbing for the managed backend REST APIs.

use std::time::Duration;

use thiserror::Error;

const DEFAULT_USER_AGENT: &str = concat!("chirpr/", env!("CARGO_PKG_VERSION"));
const PREVIEW_CHAR_LIMIT: usize = 160;

#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Options for [`build_client`]
#[derive(Debug, Clone)]
pub struct HttpClientOptions {
    /// Whole-request timeout; `None` leaves requests unbounded
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for HttpClientOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Build the shared client for the managed service adapters
///
/// ## Arguments
/// * `options` - Timeout and user agent
///
/// ## Errors
/// `HttpClientError::Build` when the TLS backend cannot be initialized
pub fn build_client(options: &HttpClientOptions) -> Result<reqwest::Client, HttpClientError> {
    let mut builder = reqwest::Client::builder().user_agent(options.user_agent.as_str());
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Whitespace-collapsed, length-capped preview of a response body for logs
/// and error messages.
pub fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
