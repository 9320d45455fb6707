// crates/dashboard-terminal/src/app.rs

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use dashboard_core::balance::format_amount;
use dashboard_core::{
    Command, ConnectionStatus, Credentials, OrderField, Session, SessionError, Side,
};
use dashboard_gateway::dispatcher::GatewayOutcome;
use dashboard_gateway::{Dispatcher, Gateway};

const MAX_ACTIVITY: usize = 100;

pub const ORDER_FIELDS: [OrderField; 5] = [
    OrderField::Symbol,
    OrderField::Side,
    OrderField::Type,
    OrderField::Quantity,
    OrderField::Price,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Connect,
    Balances,
    OrderEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectField {
    ApiKey,
    ApiSecret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Activity {
    pub kind: ActivityKind,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

pub struct App {
    pub session: Session,
    dispatcher: Dispatcher,
    pub gateway_label: String,

    // UI state
    pub input_mode: InputMode,
    pub current_panel: Panel,
    pub should_quit: bool,
    pub show_help: bool,

    // Connect panel
    pub connect_field: ConnectField,
    pub api_key_input: String,
    pub api_secret_input: String,

    // Order entry
    pub order_field: OrderField,

    // Input buffer
    pub input_buffer: String,

    /// One-line feedback for the last key action; cleared on the next one.
    pub notice: Option<String>,
    pub activity: VecDeque<Activity>,

    // Statistics
    pub message_count: u64,
}

impl App {
    pub fn new(session: Session, gateway: Arc<dyn Gateway>, gateway_label: impl Into<String>) -> Self {
        Self {
            session,
            dispatcher: Dispatcher::new(gateway),
            gateway_label: gateway_label.into(),
            input_mode: InputMode::Normal,
            current_panel: Panel::Connect,
            should_quit: false,
            show_help: false,
            connect_field: ConnectField::ApiKey,
            api_key_input: String::new(),
            api_secret_input: String::new(),
            order_field: OrderField::Quantity,
            input_buffer: String::new(),
            notice: None,
            activity: VecDeque::with_capacity(MAX_ACTIVITY),
            message_count: 0,
        }
    }

    pub fn next_panel(&mut self) {
        self.current_panel = match self.current_panel {
            Panel::Connect => Panel::Balances,
            Panel::Balances => Panel::OrderEntry,
            Panel::OrderEntry => Panel::Connect,
        };
    }

    pub fn prev_panel(&mut self) {
        self.current_panel = match self.current_panel {
            Panel::Connect => Panel::OrderEntry,
            Panel::Balances => Panel::Connect,
            Panel::OrderEntry => Panel::Balances,
        };
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn move_selection_up(&mut self) {
        match self.current_panel {
            Panel::Connect => self.connect_field = ConnectField::ApiKey,
            Panel::OrderEntry => {
                let i = field_index(self.order_field);
                self.order_field = ORDER_FIELDS[(i + ORDER_FIELDS.len() - 1) % ORDER_FIELDS.len()];
            }
            Panel::Balances => {}
        }
    }

    pub fn move_selection_down(&mut self) {
        match self.current_panel {
            Panel::Connect => self.connect_field = ConnectField::ApiSecret,
            Panel::OrderEntry => {
                let i = field_index(self.order_field);
                self.order_field = ORDER_FIELDS[(i + 1) % ORDER_FIELDS.len()];
            }
            Panel::Balances => {}
        }
    }

    /// Begin editing the selected field of the focused panel.
    pub fn start_editing(&mut self) {
        let current = match self.current_panel {
            Panel::Connect => match self.connect_field {
                ConnectField::ApiKey => self.api_key_input.clone(),
                ConnectField::ApiSecret => self.api_secret_input.clone(),
            },
            Panel::OrderEntry => {
                let draft = self.session.form().draft();
                match self.order_field {
                    OrderField::Symbol => draft.symbol.to_string(),
                    OrderField::Side => draft.side.to_string(),
                    OrderField::Type => draft.order_type.to_string(),
                    OrderField::Quantity => draft.quantity.clone(),
                    OrderField::Price => draft.price.clone(),
                }
            }
            Panel::Balances => return,
        };
        self.input_buffer = current;
        self.input_mode = InputMode::Editing;
    }

    pub fn enter_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn delete_char(&mut self) {
        self.input_buffer.pop();
    }

    pub fn cancel_input(&mut self) {
        self.input_buffer.clear();
        self.input_mode = InputMode::Normal;
    }

    pub fn submit_input(&mut self) {
        let value = std::mem::take(&mut self.input_buffer);
        self.input_mode = InputMode::Normal;

        match self.current_panel {
            Panel::Connect => match self.connect_field {
                ConnectField::ApiKey => {
                    self.api_key_input = value;
                    self.connect_field = ConnectField::ApiSecret;
                }
                ConnectField::ApiSecret => self.api_secret_input = value,
            },
            Panel::OrderEntry => {
                if let Err(e) = self.session.form_mut().update_field(self.order_field, &value) {
                    self.notice = Some(e.to_string());
                }
            }
            Panel::Balances => {}
        }
    }

    /// What the status bar echoes while editing. The secret is never shown.
    pub fn input_display(&self) -> String {
        if self.current_panel == Panel::Connect && self.connect_field == ConnectField::ApiSecret {
            mask(&self.input_buffer)
        } else {
            self.input_buffer.clone()
        }
    }

    /// Connect is only offered once both fields hold something.
    pub fn can_connect(&self) -> bool {
        self.session.status() == ConnectionStatus::Disconnected
            && Credentials::new(self.api_key_input.as_str(), self.api_secret_input.as_str()).is_complete()
    }

    pub fn connect(&mut self) {
        let credentials = Credentials::new(self.api_key_input.as_str(), self.api_secret_input.as_str());
        let result = self.session.connect(credentials);
        self.run(result);
    }

    pub fn refresh_balances(&mut self) {
        let result = self.session.refresh_balances();
        self.run(result);
    }

    pub fn place_order(&mut self) {
        let result = self.session.submit_order();
        if result.is_ok() {
            self.current_panel = Panel::OrderEntry;
        }
        self.run(result);
    }

    pub fn retry(&mut self) {
        let result = self.session.retry();
        self.run(result);
    }

    pub fn set_side(&mut self, side: Side) {
        self.session.form_mut().set_side(side);
        self.current_panel = Panel::OrderEntry;
    }

    pub fn toggle_order_type(&mut self) {
        self.session.form_mut().toggle_order_type();
    }

    pub fn cycle_symbol(&mut self) {
        self.session.form_mut().cycle_symbol();
    }

    /// Free balance of the asset the draft would spend: the quote asset
    /// for a buy, the base asset for a sell.
    pub fn available_to_spend(&self) -> (&'static str, String) {
        let draft = self.session.form().draft();
        let asset = match draft.side {
            Side::Buy => draft.symbol.quote_asset(),
            Side::Sell => draft.symbol.base_asset(),
        };
        (asset, format_amount(self.session.balances().free(asset)))
    }

    /// Apply every outcome that has arrived since the last frame.
    pub fn poll_gateway(&mut self) {
        while let Some(outcome) = self.dispatcher.try_next_outcome() {
            self.handle_outcome(outcome);
        }
    }

    pub fn handle_outcome(&mut self, outcome: GatewayOutcome) {
        self.message_count += 1;
        let (kind, text) = describe(&outcome);
        self.log(kind, text);

        if let Some(next) = self.session.apply(outcome) {
            self.dispatch(next);
        }
    }

    /// Periodic housekeeping: session expiry.
    pub fn tick(&mut self, now: Instant) {
        if self.session.expire_if_due(now) {
            self.log(ActivityKind::Info, "session expired, reconnect to continue".to_string());
        }
    }

    pub fn pending_requests(&self) -> usize {
        self.dispatcher.pending()
    }

    /// Abort whatever is still in flight. Called on quit.
    pub fn shutdown(&mut self) {
        self.dispatcher.shutdown();
    }

    fn run(&mut self, result: Result<Command, SessionError>) {
        self.notice = None;
        match result {
            Ok(command) => self.dispatch(command),
            Err(e) => {
                debug!(error = %e, "action refused");
                self.notice = Some(e.to_string());
            }
        }
    }

    fn dispatch(&mut self, command: Command) {
        let text = match &command {
            Command::Connect { user, .. } => format!("connecting as {}", user),
            Command::FetchBalances { .. } => "fetching balances".to_string(),
            Command::PlaceOrder { order, .. } => format!("placing {}", order),
        };
        info!("{}", text);
        self.log(ActivityKind::Info, text);
        self.dispatcher.dispatch(command);
    }

    fn log(&mut self, kind: ActivityKind, text: String) {
        self.activity.push_front(Activity {
            kind,
            text,
            timestamp: Local::now(),
        });
        if self.activity.len() > MAX_ACTIVITY {
            self.activity.pop_back();
        }
    }
}

pub fn mask(secret: &str) -> String {
    "*".repeat(secret.chars().count())
}

fn field_index(field: OrderField) -> usize {
    ORDER_FIELDS.iter().position(|f| *f == field).unwrap_or(0)
}

fn describe(outcome: &GatewayOutcome) -> (ActivityKind, String) {
    match outcome {
        GatewayOutcome::Connect(Ok(())) => (ActivityKind::Info, "account connected".to_string()),
        GatewayOutcome::Balances { result: Ok(rows), .. } => {
            (ActivityKind::Info, format!("balances received ({} assets)", rows.len()))
        }
        GatewayOutcome::Order { result: Ok(()), .. } => (ActivityKind::Info, "order accepted".to_string()),
        GatewayOutcome::Connect(Err(e))
        | GatewayOutcome::Balances { result: Err(e), .. }
        | GatewayOutcome::Order { result: Err(e), .. } => {
            (ActivityKind::Error, format!("{} failed: {}", outcome.operation(), e))
        }
    }
}
