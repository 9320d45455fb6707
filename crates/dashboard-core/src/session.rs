//! Connection session: the credential → connected → balances lifecycle
//! for one linked exchange account, plus the order form it gates.
//!
//! The session never talks to the network. Each operation either
//! refuses with a [`SessionError`] or hands back a [`Command`]; the
//! caller runs the command and feeds the result back through
//! [`Session::apply`], which may in turn yield a follow-up command
//! (a balances fetch after connect or after an order).
//!
//! Concurrency policy:
//! - connect and order are reject-concurrent: a second request while
//!   one is outstanding is refused with [`SessionError::InFlight`].
//! - balances are latest-wins: every fetch carries a generation and
//!   only the outcome of the newest generation is applied.
//! - orders carry a sequence number, so an outcome that belongs to an
//!   order from before an expiry is never taken for a later one.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::balance::{Balance, Balances};
use crate::credentials::Credentials;
use crate::error::{Operation, SessionError};
use crate::order::OrderRequest;
use crate::order_form::OrderForm;
use crate::symbol::Symbol;
use crate::user::UserId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionStatus::Disconnected => "Disconnected",
            ConnectionStatus::Connecting => "Connecting",
            ConnectionStatus::Connected => "Connected",
        };
        f.write_str(name)
    }
}

/// Session tuning knobs.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Drop back to Disconnected this long after connecting.
    /// `None` keeps a session connected for as long as it lives.
    pub ttl: Option<Duration>,

    /// Pair the order form starts on.
    pub default_symbol: Symbol,
}

/// A gateway call the session wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect {
        user: UserId,
        credentials: Credentials,
    },
    FetchBalances {
        user: UserId,
        generation: u64,
    },
    PlaceOrder {
        user: UserId,
        order: OrderRequest,
        sequence: u64,
    },
}

impl Command {
    pub fn operation(&self) -> Operation {
        match self {
            Command::Connect { .. } => Operation::Connect,
            Command::FetchBalances { .. } => Operation::Balances,
            Command::PlaceOrder { .. } => Operation::Order,
        }
    }
}

/// Result of running a [`Command`], fed back into [`Session::apply`].
#[derive(Debug)]
pub enum Outcome<E> {
    Connect(Result<(), E>),
    Balances {
        generation: u64,
        result: Result<Vec<Balance>, E>,
    },
    Order {
        sequence: u64,
        result: Result<(), E>,
    },
}

impl<E> Outcome<E> {
    pub fn operation(&self) -> Operation {
        match self {
            Outcome::Connect(_) => Operation::Connect,
            Outcome::Balances { .. } => Operation::Balances,
            Outcome::Order { .. } => Operation::Order,
        }
    }
}

/// The last gateway call that failed, kept until something succeeds
/// or a new attempt starts. Front-ends render it with a retry hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub operation: Operation,
    pub message: String,
}

#[derive(Debug)]
pub struct Session {
    user: UserId,
    config: SessionConfig,
    status: ConnectionStatus,

    // Kept after a failed connect so `retry` can re-issue it.
    credentials: Option<Credentials>,
    connected_at: Option<Instant>,

    balances: Balances,
    balances_generation: u64,
    balances_pending: bool,

    form: OrderForm,
    order_sequence: u64,
    order_in_flight: bool,

    last_failure: Option<Failure>,
}

impl Session {
    pub fn new(user: UserId, config: SessionConfig) -> Self {
        let form = OrderForm::new(config.default_symbol);
        Self {
            user,
            config,
            status: ConnectionStatus::Disconnected,
            credentials: None,
            connected_at: None,
            balances: Balances::new(),
            balances_generation: 0,
            balances_pending: false,
            form,
            order_sequence: 0,
            order_in_flight: false,
            last_failure: None,
        }
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    pub fn balances(&self) -> &Balances {
        &self.balances
    }

    pub fn form(&self) -> &OrderForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut OrderForm {
        &mut self.form
    }

    pub fn last_failure(&self) -> Option<&Failure> {
        self.last_failure.as_ref()
    }

    pub fn balances_pending(&self) -> bool {
        self.balances_pending
    }

    pub fn order_in_flight(&self) -> bool {
        self.order_in_flight
    }

    /// Start linking the account.
    pub fn connect(&mut self, credentials: Credentials) -> Result<Command, SessionError> {
        credentials.validate()?;
        match self.status {
            ConnectionStatus::Connecting => return Err(SessionError::InFlight(Operation::Connect)),
            ConnectionStatus::Connected => return Err(SessionError::AlreadyConnected),
            ConnectionStatus::Disconnected => {}
        }

        info!(user = %self.user, "connecting account");
        self.status = ConnectionStatus::Connecting;
        self.last_failure = None;
        self.credentials = Some(credentials.clone());
        Ok(Command::Connect {
            user: self.user.clone(),
            credentials,
        })
    }

    /// Ask for a fresh balance list. Supersedes any fetch still pending.
    pub fn refresh_balances(&mut self) -> Result<Command, SessionError> {
        if !self.is_connected() {
            return Err(SessionError::NotConnected);
        }
        Ok(self.issue_balances_fetch())
    }

    /// Validate the draft and submit it.
    pub fn submit_order(&mut self) -> Result<Command, SessionError> {
        if !self.is_connected() {
            return Err(SessionError::NotConnected);
        }
        if self.order_in_flight {
            return Err(SessionError::InFlight(Operation::Order));
        }
        let order = self.form.validate()?;

        info!(user = %self.user, %order, "submitting order");
        self.order_sequence += 1;
        self.order_in_flight = true;
        self.last_failure = None;
        Ok(Command::PlaceOrder {
            user: self.user.clone(),
            order,
            sequence: self.order_sequence,
        })
    }

    /// Re-issue whichever operation failed last.
    pub fn retry(&mut self) -> Result<Command, SessionError> {
        let operation = self
            .last_failure
            .as_ref()
            .map(|f| f.operation)
            .ok_or(SessionError::NothingToRetry)?;
        match operation {
            Operation::Connect => {
                let credentials = self.credentials.clone().ok_or(SessionError::NothingToRetry)?;
                self.connect(credentials)
            }
            Operation::Balances => self.refresh_balances(),
            Operation::Order => self.submit_order(),
        }
    }

    /// Fold a finished gateway call into the session.
    ///
    /// Returns the follow-up command, if any: one balances fetch after a
    /// successful connect or a successful order.
    pub fn apply<E: fmt::Display>(&mut self, outcome: Outcome<E>) -> Option<Command> {
        match outcome {
            Outcome::Connect(result) => self.apply_connect(result),
            Outcome::Balances { generation, result } => {
                self.apply_balances(generation, result);
                None
            }
            Outcome::Order { sequence, result } => self.apply_order(sequence, result),
        }
    }

    /// Expire a connected session once its configured TTL has elapsed.
    ///
    /// Returns true when the session was dropped back to Disconnected.
    pub fn expire_if_due(&mut self, now: Instant) -> bool {
        let (Some(ttl), Some(since)) = (self.config.ttl, self.connected_at) else {
            return false;
        };
        if self.status != ConnectionStatus::Connected || now.saturating_duration_since(since) < ttl {
            return false;
        }

        info!(user = %self.user, "session expired");
        self.status = ConnectionStatus::Disconnected;
        self.connected_at = None;
        self.credentials = None;
        self.balances.clear();
        self.balances_pending = false;
        self.order_in_flight = false;
        // Outstanding fetches and orders now belong to a dead session.
        self.balances_generation += 1;
        self.order_sequence += 1;
        true
    }

    fn apply_connect<E: fmt::Display>(&mut self, result: Result<(), E>) -> Option<Command> {
        if self.status != ConnectionStatus::Connecting {
            debug!(status = %self.status, "ignoring connect outcome");
            return None;
        }
        match result {
            Ok(()) => {
                info!(user = %self.user, "account connected");
                self.status = ConnectionStatus::Connected;
                self.connected_at = Some(Instant::now());
                self.last_failure = None;
                Some(self.issue_balances_fetch())
            }
            Err(e) => {
                self.status = ConnectionStatus::Disconnected;
                self.record_failure(Operation::Connect, &e);
                None
            }
        }
    }

    fn apply_balances<E: fmt::Display>(&mut self, generation: u64, result: Result<Vec<Balance>, E>) {
        if generation != self.balances_generation {
            debug!(generation, latest = self.balances_generation, "discarding stale balances");
            return;
        }
        self.balances_pending = false;
        match result {
            Ok(rows) => {
                self.balances = Balances::from_rows(rows);
                debug!(assets = self.balances.len(), "balances updated");
                if self.last_failure.as_ref().map(|f| f.operation) == Some(Operation::Balances) {
                    self.last_failure = None;
                }
            }
            Err(e) => self.record_failure(Operation::Balances, &e),
        }
    }

    fn apply_order<E: fmt::Display>(&mut self, sequence: u64, result: Result<(), E>) -> Option<Command> {
        if !self.order_in_flight || sequence != self.order_sequence {
            debug!(sequence, latest = self.order_sequence, "ignoring stale order outcome");
            return None;
        }
        self.order_in_flight = false;
        match result {
            Ok(()) if self.is_connected() => {
                info!(user = %self.user, "order accepted");
                Some(self.issue_balances_fetch())
            }
            Ok(()) => None,
            Err(e) => {
                self.record_failure(Operation::Order, &e);
                None
            }
        }
    }

    fn issue_balances_fetch(&mut self) -> Command {
        self.balances_generation += 1;
        self.balances_pending = true;
        Command::FetchBalances {
            user: self.user.clone(),
            generation: self.balances_generation,
        }
    }

    fn record_failure(&mut self, operation: Operation, error: &dyn fmt::Display) {
        let message = error.to_string();
        warn!(%operation, error = %message, "gateway call failed");
        self.last_failure = Some(Failure { operation, message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::order::OrderField;

    fn session() -> Session {
        Session::new(UserId::default(), SessionConfig::default())
    }

    fn connected() -> Session {
        let mut s = session();
        s.connect(Credentials::new("k", "s")).unwrap();
        let fetch = s.apply(Outcome::<&str>::Connect(Ok(())));
        assert!(matches!(fetch, Some(Command::FetchBalances { generation: 1, .. })));
        s
    }

    fn btc(free: &str) -> Vec<Balance> {
        vec![Balance::parse("BTC", free, "0.0").unwrap()]
    }

    #[test]
    fn empty_credentials_issue_nothing() {
        let mut s = session();
        for (k, v) in [("", "s"), ("k", ""), ("", "")] {
            assert_eq!(
                s.connect(Credentials::new(k, v)),
                Err(SessionError::Validation(ValidationError::EmptyCredentials))
            );
        }
        assert_eq!(s.status(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn connect_carries_user_and_credentials() {
        let mut s = Session::new(UserId::new("alice"), SessionConfig::default());
        let cmd = s.connect(Credentials::new("k", "s")).unwrap();
        assert_eq!(
            cmd,
            Command::Connect {
                user: UserId::new("alice"),
                credentials: Credentials::new("k", "s"),
            }
        );
        assert_eq!(s.status(), ConnectionStatus::Connecting);
    }

    #[test]
    fn second_connect_while_connecting_is_rejected() {
        let mut s = session();
        s.connect(Credentials::new("k", "s")).unwrap();
        assert_eq!(
            s.connect(Credentials::new("k2", "s2")),
            Err(SessionError::InFlight(Operation::Connect))
        );
    }

    #[test]
    fn connect_failure_returns_to_disconnected_and_is_recorded() {
        let mut s = session();
        s.connect(Credentials::new("k", "s")).unwrap();
        let next = s.apply::<&str>(Outcome::Connect(Err("HTTP 502")));
        assert!(next.is_none());
        assert_eq!(s.status(), ConnectionStatus::Disconnected);
        assert_eq!(
            s.last_failure(),
            Some(&Failure { operation: Operation::Connect, message: "HTTP 502".into() })
        );
    }

    #[test]
    fn retry_after_failed_connect_reuses_credentials() {
        let mut s = session();
        s.connect(Credentials::new("k", "s")).unwrap();
        s.apply::<&str>(Outcome::Connect(Err("down")));
        let cmd = s.retry().unwrap();
        assert!(matches!(cmd, Command::Connect { ref credentials, .. } if credentials.api_key() == "k"));
        assert_eq!(s.status(), ConnectionStatus::Connecting);
        assert!(s.last_failure().is_none());
    }

    #[test]
    fn retry_without_failure_is_refused() {
        let mut s = connected();
        assert_eq!(s.retry(), Err(SessionError::NothingToRetry));
    }

    #[test]
    fn reconnect_while_connected_is_refused() {
        let mut s = connected();
        assert_eq!(s.connect(Credentials::new("k", "s")), Err(SessionError::AlreadyConnected));
    }

    #[test]
    fn balances_replace_wholesale() {
        let mut s = connected();
        s.apply::<&str>(Outcome::Balances {
            generation: 1,
            result: Ok(vec![
                Balance::parse("USDT", "100", "0").unwrap(),
                Balance::parse("BTC", "1", "0").unwrap(),
            ]),
        });
        assert_eq!(s.balances().len(), 2);

        let Command::FetchBalances { generation, .. } = s.refresh_balances().unwrap() else {
            panic!("expected a balances fetch");
        };
        s.apply::<&str>(Outcome::Balances { generation, result: Ok(btc("0.5")) });
        assert_eq!(s.balances().len(), 1);
        assert!(s.balances().get("USDT").is_none());
    }

    #[test]
    fn failed_refresh_keeps_previous_balances() {
        let mut s = connected();
        s.apply::<&str>(Outcome::Balances { generation: 1, result: Ok(btc("0.5")) });
        let before = s.balances().clone();

        s.refresh_balances().unwrap();
        s.apply::<&str>(Outcome::Balances { generation: 2, result: Err("timeout") });
        assert_eq!(s.balances(), &before);
        assert_eq!(s.last_failure().map(|f| f.operation), Some(Operation::Balances));
        assert!(!s.balances_pending());
    }

    #[test]
    fn stale_balances_never_overwrite_newer_ones() {
        let mut s = connected();
        // generation 1 from connect still pending, start generation 2
        s.refresh_balances().unwrap();
        s.apply::<&str>(Outcome::Balances { generation: 2, result: Ok(btc("2")) });
        s.apply::<&str>(Outcome::Balances { generation: 1, result: Ok(btc("1")) });
        assert_eq!(s.balances().free("BTC"), rust_decimal::Decimal::from(2));
    }

    #[test]
    fn refresh_requires_connection() {
        let mut s = session();
        assert_eq!(s.refresh_balances(), Err(SessionError::NotConnected));
    }

    #[test]
    fn order_while_disconnected_is_blocked() {
        let mut s = session();
        s.form_mut().update_field(OrderField::Quantity, "0.001").unwrap();
        assert_eq!(s.submit_order(), Err(SessionError::NotConnected));
        assert!(!s.order_in_flight());
    }

    #[test]
    fn order_success_triggers_one_refresh_for_either_side() {
        for side in ["BUY", "SELL"] {
            let mut s = connected();
            s.form_mut().update_field(OrderField::Side, side).unwrap();
            s.form_mut().update_field(OrderField::Quantity, "0.001").unwrap();
            let cmd = s.submit_order().unwrap();
            assert_eq!(cmd.operation(), Operation::Order);

            let next = s.apply::<&str>(Outcome::Order { sequence: 1, result: Ok(()) });
            assert!(matches!(next, Some(Command::FetchBalances { generation: 2, .. })));
        }
    }

    #[test]
    fn order_is_reject_concurrent() {
        let mut s = connected();
        s.form_mut().update_field(OrderField::Quantity, "1").unwrap();
        s.submit_order().unwrap();
        assert_eq!(s.submit_order(), Err(SessionError::InFlight(Operation::Order)));
    }

    #[test]
    fn failed_order_keeps_draft_and_can_be_retried() {
        let mut s = connected();
        s.form_mut().update_field(OrderField::Quantity, "0.25").unwrap();
        let first = s.submit_order().unwrap();
        let draft = s.form().draft().clone();

        assert!(s.apply::<&str>(Outcome::Order { sequence: 1, result: Err("rejected") }).is_none());
        assert_eq!(s.form().draft(), &draft);

        let (Command::PlaceOrder { order: a, .. }, Command::PlaceOrder { order: b, sequence, .. }) =
            (first, s.retry().unwrap())
        else {
            panic!("retry did not resubmit the order");
        };
        assert_eq!(a, b);
        assert_eq!(sequence, 2);
    }

    #[test]
    fn order_outcome_from_before_expiry_is_not_taken_for_a_later_order() {
        let config = SessionConfig {
            ttl: Some(Duration::from_secs(60)),
            ..SessionConfig::default()
        };
        let mut s = Session::new(UserId::default(), config);
        s.connect(Credentials::new("k", "s")).unwrap();
        s.apply::<&str>(Outcome::Connect(Ok(())));
        s.form_mut().update_field(OrderField::Quantity, "1").unwrap();
        let Command::PlaceOrder { sequence: old, .. } = s.submit_order().unwrap() else {
            panic!("expected an order");
        };

        assert!(s.expire_if_due(Instant::now() + Duration::from_secs(61)));
        s.connect(Credentials::new("k", "s")).unwrap();
        s.apply::<&str>(Outcome::Connect(Ok(())));
        let Command::PlaceOrder { sequence: new, .. } = s.submit_order().unwrap() else {
            panic!("expected an order");
        };
        assert_ne!(old, new);

        assert!(s.apply::<&str>(Outcome::Order { sequence: old, result: Err("rejected") }).is_none());
        assert!(s.order_in_flight());
        assert_eq!(s.last_failure(), None);

        let next = s.apply::<&str>(Outcome::Order { sequence: new, result: Ok(()) });
        assert!(matches!(next, Some(Command::FetchBalances { .. })));
        assert!(!s.order_in_flight());
    }

    #[test]
    fn invalid_draft_is_not_submitted() {
        let mut s = connected();
        s.form_mut().update_field(OrderField::Quantity, "abc").unwrap();
        assert!(matches!(
            s.submit_order(),
            Err(SessionError::Validation(ValidationError::InvalidNumber { .. }))
        ));
        assert!(!s.order_in_flight());
    }

    #[test]
    fn without_ttl_session_never_expires() {
        let mut s = connected();
        assert!(!s.expire_if_due(Instant::now() + Duration::from_secs(86_400 * 365)));
        assert!(s.is_connected());
    }

    #[test]
    fn ttl_expiry_clears_state() {
        let config = SessionConfig {
            ttl: Some(Duration::from_secs(60)),
            ..SessionConfig::default()
        };
        let mut s = Session::new(UserId::default(), config);
        s.connect(Credentials::new("k", "s")).unwrap();
        s.apply::<&str>(Outcome::Connect(Ok(())));
        s.apply::<&str>(Outcome::Balances { generation: 1, result: Ok(btc("1")) });

        assert!(!s.expire_if_due(Instant::now()));
        assert!(s.expire_if_due(Instant::now() + Duration::from_secs(61)));
        assert_eq!(s.status(), ConnectionStatus::Disconnected);
        assert!(s.balances().is_empty());

        // a fetch issued before expiry must not repopulate the table
        s.apply::<&str>(Outcome::Balances { generation: 1, result: Ok(btc("1")) });
        assert!(s.balances().is_empty());
    }

    #[test]
    fn outcome_reports_its_operation() {
        let o: Outcome<&str> = Outcome::Balances { generation: 3, result: Ok(vec![]) };
        assert_eq!(o.operation(), Operation::Balances);
        assert_eq!(Outcome::<&str>::Order { sequence: 1, result: Ok(()) }.operation(), Operation::Order);
    }
}
