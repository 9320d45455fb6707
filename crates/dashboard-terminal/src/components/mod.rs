// crates/dashboard-terminal/src/components/mod.rs

use ratatui::style::{Color, Style};

use crate::app::{App, Panel};

pub mod activity;
pub mod balances;
pub mod connect;
pub mod help;
pub mod order_entry;
pub mod status_bar;

/// Border colour for a panel: yellow when it has focus.
pub(crate) fn focus_style(app: &App, panel: Panel) -> Style {
    Style::default().fg(if app.current_panel == panel {
        Color::Yellow
    } else {
        Color::White
    })
}
