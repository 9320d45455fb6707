//! Gateway error taxonomy.
//!
//! Every gateway call returns one of these instead of swallowing the
//! failure, so the session can record it and offer a retry.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Could not reach the gateway at all.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    /// The gateway answered with a non-2xx status.
    #[error("gateway returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The body was not the JSON we expected.
    #[error("could not decode gateway response: {0}")]
    Decode(String),

    /// A balance row carried an amount that is not a non-negative decimal.
    #[error("malformed balance for {asset}: {reason}")]
    MalformedBalance { asset: String, reason: String },
}

impl GatewayError {
    /// The gateway answered 401: the account is not linked on its side.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GatewayError::Status { status: 401, .. })
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout
        } else if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}
