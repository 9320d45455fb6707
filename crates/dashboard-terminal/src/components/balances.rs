// crates/dashboard-terminal/src/components/balances.rs

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use dashboard_core::balance::format_amount;

use super::focus_style;
use crate::app::{App, Panel};

pub fn draw_balances(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(vec!["Asset", "Free", "Locked", "Total"])
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app.session.balances().iter().map(|balance| {
        let free_style = if balance.free.is_zero() {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::Green)
        };
        let locked_style = if balance.locked.is_zero() {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::Yellow)
        };

        Row::new(vec![
            Cell::from(balance.asset.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from(format_amount(balance.free)).style(free_style),
            Cell::from(format_amount(balance.locked)).style(locked_style),
            Cell::from(format_amount(balance.total())),
        ])
    }).collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Length(20),
        Constraint::Length(20),
        Constraint::Min(20),
    ];

    let title = if app.session.balances_pending() {
        " Balances (refreshing) ".to_string()
    } else if !app.session.is_connected() {
        " Balances (not connected) ".to_string()
    } else {
        format!(" Balances ({}) ", app.session.balances().len())
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(focus_style(app, Panel::Balances)));

    f.render_widget(table, area);
}
