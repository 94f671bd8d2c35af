// Errors raised by the backend HTTP adapter
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("backend returned {status} for {url}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl BackendError {
    pub fn request(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            BackendError::Timeout {
                url: url.to_string(),
            }
        } else {
            BackendError::Request {
                url: url.to_string(),
                source,
            }
        }
    }
}
