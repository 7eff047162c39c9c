use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum GerritError {
    #[error("authentication failed against {url} with both basic and digest auth")]
    Authentication { url: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode response from {url} (status {status}): {message}")]
    Decode {
        url: String,
        status: u16,
        message: String,
    },

    #[error("digest challenge error: {0}")]
    Digest(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, GerritError>;

impl From<reqwest::Error> for GerritError {
    fn from(err: reqwest::Error) -> Self {
        GerritError::Transport(err.to_string())
    }
}

impl From<digest_auth::Error> for GerritError {
    fn from(err: digest_auth::Error) -> Self {
        GerritError::Digest(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for GerritError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        GerritError::Digest(err.to_string())
    }
}

impl From<reqwest::header::ToStrError> for GerritError {
    fn from(err: reqwest::header::ToStrError) -> Self {
        GerritError::Digest(err.to_string())
    }
}

impl From<url::ParseError> for GerritError {
    fn from(err: url::ParseError) -> Self {
        GerritError::InvalidUrl(err.to_string())
    }
}
