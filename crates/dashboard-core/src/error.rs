//! Error types for the connection/order workflow.
//!
//! Gateway failures are not modelled here: the session is generic over
//! the outcome's error type and only keeps its rendered message.

use std::fmt;

use thiserror::Error;

use crate::order::OrderField;

/// The three gateway operations the workflow issues.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    Connect,
    Balances,
    Order,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Connect => "connect",
            Operation::Balances => "balances",
            Operation::Order => "order",
        };
        f.write_str(name)
    }
}

/// Field-level input errors, raised before anything is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("API key and secret are both required")]
    EmptyCredentials,

    #[error("{field}: `{input}` is not a number")]
    InvalidNumber { field: OrderField, input: String },

    #[error("{field} must be greater than zero")]
    NonPositive { field: OrderField },

    #[error("{field}: `{input}` is not a decimal amount")]
    InvalidAmount { field: &'static str, input: String },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    #[error("limit orders need a price")]
    MissingPrice,

    #[error("market orders do not take a price")]
    UnexpectedPrice,

    #[error("unsupported symbol `{0}`")]
    UnknownSymbol(String),

    #[error("unknown side `{0}` (expected BUY or SELL)")]
    UnknownSide(String),

    #[error("unknown order type `{0}` (expected MARKET or LIMIT)")]
    UnknownOrderType(String),
}

/// Why the session refused to issue a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("not connected")]
    NotConnected,

    #[error("already connected")]
    AlreadyConnected,

    #[error("{0} request already in flight")]
    InFlight(Operation),

    #[error("nothing to retry")]
    NothingToRetry,
}
