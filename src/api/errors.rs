use thiserror::Error;

use crate::api::types::Endpoint;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
    #[error("response from {url} is missing `{field}`")]
    MissingField { url: String, field: &'static str },
    #[error("invalid API address: {message}")]
    InvalidUrl { message: String },
    #[error("{endpoint} lookup for `{id}` was rejected by the API")]
    Rejected { endpoint: Endpoint, id: String },
}

impl ApiError {
    /// True when the service answered and said no, as opposed to not answering
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }

    pub(crate) fn transport(url: &str, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "timed out".to_string()
        } else {
            err.to_string()
        };
        ApiError::Transport {
            url: url.to_string(),
            message,
        }
    }
}
