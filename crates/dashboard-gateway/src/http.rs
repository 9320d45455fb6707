//! reqwest-backed [`Gateway`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use tracing::{debug, info};

use dashboard_core::{Balance, Credentials, OrderRequest, UserId};

use crate::client::Gateway;
use crate::error::{GatewayError, Result};
use crate::wire_types::{
    BalancesResponse, ConnectBody, ErrorBody, OrderAck, OrderBody, BALANCES_PATH, CONNECT_PATH,
    ORDER_PATH,
};

/// Where the gateway lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL, e.g. `http://127.0.0.1:3000`. Endpoint paths are appended.
    pub base_url: String,

    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send, then return the body of a 2xx answer or a `Status` error.
    async fn send(&self, request: RequestBuilder) -> Result<String> {
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.message())
                .unwrap_or(body);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn connect(&self, user: &UserId, credentials: &Credentials) -> Result<()> {
        debug!(%user, "POST {}", CONNECT_PATH);
        let request = self
            .client
            .post(self.url(CONNECT_PATH))
            .json(&ConnectBody::new(user, credentials));
        self.send(request).await?;
        Ok(())
    }

    async fn balances(&self, user: &UserId) -> Result<Vec<Balance>> {
        debug!(%user, "GET {}", BALANCES_PATH);
        let request = self
            .client
            .get(self.url(BALANCES_PATH))
            .query(&[("user_id", user.as_str())]);
        let body = self.send(request).await?;
        let parsed: BalancesResponse = serde_json::from_str(&body)?;
        parsed.into_balances()
    }

    async fn place_order(&self, user: &UserId, order: &OrderRequest) -> Result<serde_json::Value> {
        debug!(%user, %order, "POST {}", ORDER_PATH);
        let request = self
            .client
            .post(self.url(ORDER_PATH))
            .json(&OrderBody::new(user, order));
        let body = self.send(request).await?;

        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        let value: serde_json::Value =
            serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));
        let ack: OrderAck = serde_json::from_value(value.clone()).unwrap_or_default();
        info!(
            order_id = ?ack.order_id,
            status = ack.status.as_deref().unwrap_or("-"),
            "order acknowledged"
        );
        Ok(value)
    }
}
