//! Exchange API credentials.
//!
//! Held in memory for the lifetime of a session only. The `Debug`
//! impl redacts both fields so credentials never reach a log line.

use std::fmt;

use crate::error::ValidationError;

#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }

    /// Both fields hold something other than whitespace.
    ///
    /// Front-ends use this to disable the connect action.
    pub fn is_complete(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.api_secret.trim().is_empty()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(ValidationError::EmptyCredentials)
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}
