//! dashboard-gateway
//!
//! Everything that talks to the exchange gateway:
//! - JSON wire types for the connect / balances / order endpoints
//! - the [`Gateway`] trait and its reqwest-backed [`HttpGateway`]
//! - an in-memory [`FixtureGateway`] for tests and offline demos
//! - the [`Dispatcher`], which runs session commands as cancellable tasks

pub mod error;
pub mod wire_types;
pub mod client;
pub mod http;
pub mod fixture;
pub mod dispatcher;

pub use error::{GatewayError, Result};
pub use client::Gateway;
pub use http::{GatewayConfig, HttpGateway};
pub use fixture::FixtureGateway;
pub use dispatcher::Dispatcher;
