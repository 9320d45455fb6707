// crates/dashboard-terminal/src/components/connect.rs

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use dashboard_core::ConnectionStatus;

use super::focus_style;
use crate::app::{mask, App, ConnectField, InputMode, Panel};

pub fn draw_connect(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Connect Account ")
        .borders(Borders::ALL)
        .border_style(focus_style(app, Panel::Connect));

    let status = app.session.status();
    let status_style = match status {
        ConnectionStatus::Connected => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ConnectionStatus::Connecting => Style::default().fg(Color::Yellow),
        ConnectionStatus::Disconnected => Style::default().fg(Color::Red),
    };

    let editing = matches!(app.input_mode, InputMode::Editing) && app.current_panel == Panel::Connect;
    let field_line = |label: &'static str, field: ConnectField, shown: String| {
        let selected = app.current_panel == Panel::Connect && app.connect_field == field;
        let marker = if selected { "> " } else { "  " };
        let value = if editing && selected {
            Span::styled(
                format!("{}_", app.input_display()),
                Style::default().fg(Color::Yellow),
            )
        } else {
            Span::styled(shown, Style::default().fg(Color::Cyan))
        };
        Line::from(vec![Span::raw(marker), Span::raw(label), value])
    };

    let action = match status {
        ConnectionStatus::Disconnected if app.can_connect() => {
            Span::styled("[C] Connect", Style::default().fg(Color::Green))
        }
        ConnectionStatus::Disconnected => {
            Span::styled("[C] Connect (enter key and secret)", Style::default().fg(Color::DarkGray))
        }
        ConnectionStatus::Connecting => Span::styled("Connecting…", Style::default().fg(Color::Yellow)),
        ConnectionStatus::Connected => {
            Span::styled("[R] Refresh balances", Style::default().fg(Color::Gray))
        }
    };

    let lines = vec![
        Line::from(vec![Span::raw("Status: "), Span::styled(status.to_string(), status_style)]),
        field_line("API Key:    ", ConnectField::ApiKey, app.api_key_input.clone()),
        field_line("API Secret: ", ConnectField::ApiSecret, mask(&app.api_secret_input)),
        Line::from(""),
        Line::from(action),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}
