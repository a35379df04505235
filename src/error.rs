//! Error types for the fetch and decode stages.
//!
//! Both are fatal in the binary: they are printed with their context and the
//! process exits with [`crate::SENTINEL_EXIT_CODE`].

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("get {url} with error: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("get {url} timed out: {source}")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("get {url} returned status {status}")]
    Status { url: String, status: StatusCode },
    #[error("read response from {url} with error: {source}")]
    Io {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("read {path} with error: {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Classifies a failure from sending the request (before any body bytes).
    pub(crate) fn from_send(url: &str, source: reqwest::Error) -> Self {
        let url = url.to_string();
        if source.is_timeout() {
            FetchError::Timeout { url, source }
        } else {
            FetchError::Network { url, source }
        }
    }

    /// Classifies a failure while reading the body of an accepted response.
    pub(crate) fn from_body(url: &str, source: reqwest::Error) -> Self {
        let url = url.to_string();
        if source.is_timeout() {
            FetchError::Timeout { url, source }
        } else {
            FetchError::Io { url, source }
        }
    }
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("decode response body with error: {0}")]
    Body(#[from] serde_json::Error),
    #[error("record {index} is malformed: {source}")]
    Record {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_names_url_and_code() {
        let err = FetchError::Status {
            url: "http://localhost/data.json".to_string(),
            status: StatusCode::NOT_FOUND,
        };
        let msg = err.to_string();
        assert!(msg.contains("http://localhost/data.json"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn test_record_error_names_index() {
        let source = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err = ParseError::Record { index: 7, source };
        assert!(err.to_string().starts_with("record 7 is malformed"));
    }
}
