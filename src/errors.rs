use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinePayError {
    /// Rejected locally before any request was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The provider answered with a `returnCode` other than `"0000"`.
    #[error("LINE Pay API error {return_code}: {return_message}")]
    Api {
        return_code: String,
        return_message: String,
        status: u16,
        response: Value,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LinePayError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        LinePayError::InvalidArgument(message.into())
    }

    /// The provider return code, if this is an API error.
    pub fn return_code(&self) -> Option<&str> {
        match self {
            LinePayError::Api { return_code, .. } => Some(return_code),
            _ => None,
        }
    }
}

/// Result type for LINE Pay operations.
pub type LinePayResult<T> = Result<T, LinePayError>;
