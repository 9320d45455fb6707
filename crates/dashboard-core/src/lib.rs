//! dashboard-core
//!
//! Pure account-connection and order-entry logic:
//! - credentials, user identity and supported symbols
//! - balances as exact decimals, kept in arrival order
//! - the order draft and its validation
//! - the connection session state machine
//!
//! Nothing in this crate performs I/O. The session hands out
//! [`Command`]s describing gateway calls and consumes their
//! [`Outcome`]s; the gateway crate runs them.

pub mod side;
pub mod order_type;
pub mod symbol;
pub mod credentials;
pub mod user;
pub mod balance;
pub mod order;
pub mod order_form;
pub mod session;
pub mod error;

pub use side::Side;
pub use order_type::OrderType;
pub use symbol::Symbol;
pub use credentials::Credentials;
pub use user::UserId;

pub use balance::{Balance, Balances};
pub use order::{OrderField, OrderRequest};
pub use order_form::{OrderDraft, OrderForm};

pub use session::{
    Command,
    ConnectionStatus,
    Failure,
    Outcome,
    Session,
    SessionConfig,
};

pub use error::{Operation, SessionError, ValidationError};
