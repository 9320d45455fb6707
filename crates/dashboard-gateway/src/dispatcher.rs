//! Runs session commands against a gateway.
//!
//! Each [`Command`] becomes one spawned task; its [`Outcome`] comes back
//! over an unbounded channel and is applied by whoever owns the
//! [`Session`]. The dispatcher owns every task handle: dropping it (or
//! calling [`Dispatcher::shutdown`]) aborts whatever is still in flight,
//! so no request outlives the front-end that issued it.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use dashboard_core::{Command, Outcome, Session};

use crate::client::Gateway;
use crate::error::GatewayError;

pub type GatewayOutcome = Outcome<GatewayError>;

pub struct Dispatcher {
    gateway: Arc<dyn Gateway>,
    tx: UnboundedSender<GatewayOutcome>,
    rx: UnboundedReceiver<GatewayOutcome>,
    tasks: Vec<JoinHandle<()>>,
    // Commands dispatched whose outcome has not been taken yet.
    pending: usize,
}

impl Dispatcher {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            gateway,
            tx,
            rx,
            tasks: Vec::new(),
            pending: 0,
        }
    }

    /// Commands sent but not yet answered.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Spawn the gateway call for `command`.
    pub fn dispatch(&mut self, command: Command) {
        self.tasks.retain(|t| !t.is_finished());

        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        debug!(operation = %command.operation(), "dispatching");

        let handle = tokio::spawn(async move {
            let outcome = run(gateway.as_ref(), command).await;
            if tx.send(outcome).is_err() {
                debug!("dispatcher gone, dropping outcome");
            }
        });
        self.tasks.push(handle);
        self.pending += 1;
    }

    /// Wait for the next outcome. `None` when nothing is pending.
    pub async fn next_outcome(&mut self) -> Option<GatewayOutcome> {
        if self.pending == 0 {
            return None;
        }
        let outcome = self.rx.recv().await;
        if outcome.is_some() {
            self.pending -= 1;
        }
        outcome
    }

    /// Non-blocking variant of [`Dispatcher::next_outcome`], for UI loops.
    pub fn try_next_outcome(&mut self) -> Option<GatewayOutcome> {
        let outcome = self.rx.try_recv().ok()?;
        self.pending = self.pending.saturating_sub(1);
        Some(outcome)
    }

    /// Keep applying outcomes (and dispatching follow-ups) until nothing
    /// is in flight. Returns how many outcomes were applied.
    pub async fn settle(&mut self, session: &mut Session) -> usize {
        let mut applied = 0;
        while let Some(outcome) = self.next_outcome().await {
            applied += 1;
            if let Some(next) = session.apply(outcome) {
                self.dispatch(next);
            }
        }
        applied
    }

    /// Abort every in-flight request and forget their outcomes.
    pub fn shutdown(&mut self) {
        let live = self.tasks.iter().filter(|t| !t.is_finished()).count();
        if live > 0 {
            debug!(live, "aborting in-flight gateway calls");
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
        while self.rx.try_recv().is_ok() {}
        self.pending = 0;
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run(gateway: &dyn Gateway, command: Command) -> GatewayOutcome {
    match command {
        Command::Connect { user, credentials } => {
            Outcome::Connect(gateway.connect(&user, &credentials).await)
        }
        Command::FetchBalances { user, generation } => Outcome::Balances {
            generation,
            result: gateway.balances(&user).await,
        },
        Command::PlaceOrder { user, order, sequence } => {
            let result = gateway.place_order(&user, &order).await.map(|_| ());
            if let Err(e) = &result {
                warn!(%order, error = %e, "order rejected");
            }
            Outcome::Order { sequence, result }
        }
    }
}
