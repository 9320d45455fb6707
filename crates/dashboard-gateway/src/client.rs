//! The gateway seam.
//!
//! The dispatcher only ever sees `Arc<dyn Gateway>`, so the HTTP
//! client and the in-memory fixture are interchangeable.

use async_trait::async_trait;

use dashboard_core::{Balance, Credentials, OrderRequest, UserId};

use crate::error::Result;

#[async_trait]
pub trait Gateway: Send + Sync {
    /// Link the exchange account. Any success status counts.
    async fn connect(&self, user: &UserId, credentials: &Credentials) -> Result<()>;

    /// Current balances, in the order the gateway lists them.
    async fn balances(&self, user: &UserId) -> Result<Vec<Balance>>;

    /// Place one order. The response body is opaque.
    async fn place_order(&self, user: &UserId, order: &OrderRequest) -> Result<serde_json::Value>;
}
