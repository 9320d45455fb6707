//! In-memory [`Gateway`] with scripted answers.
//!
//! Stands in for the real gateway in tests and in the terminal's demo
//! mode. Every call is counted, and an optional latency makes overlap
//! between requests observable.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use dashboard_core::{Balance, Credentials, OrderRequest, UserId};

use crate::client::Gateway;
use crate::error::{GatewayError, Result};

#[derive(Default)]
struct Script {
    balances: Vec<Balance>,
    // One-shot answers for upcoming balances calls, each with its own delay.
    queued_balances: VecDeque<(Vec<Balance>, Duration)>,
    connect_error: Option<GatewayError>,
    balances_error: Option<GatewayError>,
    order_error: Option<GatewayError>,
    orders: Vec<(UserId, OrderRequest)>,
}

#[derive(Default)]
pub struct FixtureGateway {
    script: Mutex<Script>,
    latency: Option<Duration>,
    connect_calls: AtomicUsize,
    balances_calls: AtomicUsize,
    order_calls: AtomicUsize,
}

impl FixtureGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample account used by the terminal's `--demo` mode.
    pub fn demo() -> Self {
        let rows = [("USDT", "100.0", "0.0"), ("BTC", "0.01", "0.0"), ("ETH", "0.25", "0.05")];
        let balances = rows
            .iter()
            .filter_map(|(asset, free, locked)| Balance::parse(*asset, free, locked).ok())
            .collect();
        Self::new()
            .with_balances(balances)
            .with_latency(Duration::from_millis(150))
    }

    pub fn with_balances(self, balances: Vec<Balance>) -> Self {
        self.lock().balances = balances;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Answer the next unanswered balances call with `balances` after
    /// `latency`, instead of the standing script. Queued answers are
    /// handed out in call order.
    pub fn queue_balances(&self, balances: Vec<Balance>, latency: Duration) {
        self.lock().queued_balances.push_back((balances, latency));
    }

    /// `Some(err)` makes every following connect fail with `err`.
    pub fn fail_connect(&self, error: Option<GatewayError>) {
        self.lock().connect_error = error;
    }

    pub fn fail_balances(&self, error: Option<GatewayError>) {
        self.lock().balances_error = error;
    }

    pub fn fail_orders(&self, error: Option<GatewayError>) {
        self.lock().order_error = error;
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn balances_calls(&self) -> usize {
        self.balances_calls.load(Ordering::SeqCst)
    }

    pub fn order_calls(&self) -> usize {
        self.order_calls.load(Ordering::SeqCst)
    }

    /// Orders that were accepted, oldest first.
    pub fn accepted_orders(&self) -> Vec<(UserId, OrderRequest)> {
        self.lock().orders.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        // A poisoned script only means another test thread panicked.
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl Gateway for FixtureGateway {
    async fn connect(&self, _user: &UserId, _credentials: &Credentials) -> Result<()> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        match self.lock().connect_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn balances(&self, _user: &UserId) -> Result<Vec<Balance>> {
        self.balances_calls.fetch_add(1, Ordering::SeqCst);
        let queued = self.lock().queued_balances.pop_front();
        if let Some((balances, latency)) = queued {
            tokio::time::sleep(latency).await;
            return Ok(balances);
        }
        self.delay().await;
        let script = self.lock();
        match &script.balances_error {
            Some(err) => Err(err.clone()),
            None => Ok(script.balances.clone()),
        }
    }

    async fn place_order(&self, user: &UserId, order: &OrderRequest) -> Result<serde_json::Value> {
        let n = self.order_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        let mut script = self.lock();
        if let Some(err) = &script.order_error {
            return Err(err.clone());
        }
        script.orders.push((user.clone(), order.clone()));
        Ok(json!({ "orderId": 100_000 + n, "status": "FILLED" }))
    }
}
