//! JSON bodies exchanged with the gateway.
//!
//! This module defines:
//! - endpoint paths.
//! - request bodies for connect and order.
//! - the balances response and the gateway's error body.
//!
//! Conversion into `dashboard_core` types happens here too, so the
//! HTTP client never handles raw amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dashboard_core::{Balance, Credentials, OrderRequest, UserId};

use crate::error::GatewayError;

pub const CONNECT_PATH: &str = "/api/binance/connect";
pub const BALANCES_PATH: &str = "/api/binance/balances";
pub const ORDER_PATH: &str = "/api/binance/order";

/// `POST /api/binance/connect`
#[derive(Debug, Serialize)]
pub struct ConnectBody<'a> {
    pub api_key: &'a str,
    pub api_secret: &'a str,
    pub user_id: &'a str,
}

impl<'a> ConnectBody<'a> {
    pub fn new(user: &'a UserId, credentials: &'a Credentials) -> Self {
        Self {
            api_key: credentials.api_key(),
            api_secret: credentials.api_secret(),
            user_id: user.as_str(),
        }
    }
}

/// `POST /api/binance/order`
///
/// Quantity and price go out as JSON numbers.
#[derive(Debug, Serialize)]
pub struct OrderBody<'a> {
    pub symbol: &'static str,
    pub side: &'static str,
    #[serde(rename = "type")]
    pub order_type: &'static str,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    pub user_id: &'a str,
}

impl<'a> OrderBody<'a> {
    pub fn new(user: &'a UserId, order: &OrderRequest) -> Self {
        Self {
            symbol: order.symbol().as_str(),
            side: order.side().as_str(),
            order_type: order.order_type().as_str(),
            quantity: order.quantity(),
            price: order.price(),
            user_id: user.as_str(),
        }
    }
}

/// `GET /api/binance/balances?user_id=…`
///
/// A missing or null `balances` field means "no balances".
#[derive(Debug, Deserialize)]
pub struct BalancesResponse {
    #[serde(default)]
    pub balances: Option<Vec<WireBalance>>,
}

#[derive(Debug, Deserialize)]
pub struct WireBalance {
    pub asset: String,
    pub free: WireAmount,
    pub locked: WireAmount,
}

/// Amounts are documented as decimal strings; bare JSON numbers are
/// tolerated.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WireAmount {
    Text(String),
    Number(serde_json::Number),
}

impl WireAmount {
    fn to_text(&self) -> String {
        match self {
            WireAmount::Text(s) => s.clone(),
            WireAmount::Number(n) => n.to_string(),
        }
    }
}

impl BalancesResponse {
    /// Parse every row; one bad amount rejects the whole response.
    pub fn into_balances(self) -> Result<Vec<Balance>, GatewayError> {
        self.balances
            .unwrap_or_default()
            .into_iter()
            .map(|row| {
                Balance::parse(row.asset.clone(), &row.free.to_text(), &row.locked.to_text())
                    .map_err(|e| GatewayError::MalformedBalance {
                        asset: row.asset,
                        reason: e.to_string(),
                    })
            })
            .collect()
    }
}

/// Error body of the gateway (`{"detail": ...}`).
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Fields worth logging from an otherwise opaque order response.
#[derive(Debug, Default, Deserialize)]
pub struct OrderAck {
    #[serde(rename = "orderId")]
    pub order_id: Option<serde_json::Value>,
    pub status: Option<String>,
}
