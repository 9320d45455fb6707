// crates/dashboard-terminal/src/components/order_entry.rs

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use dashboard_core::{OrderField, OrderType, Side};

use super::focus_style;
use crate::app::{App, InputMode, Panel, ORDER_FIELDS};

pub fn draw_order_entry(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Order Entry ")
        .borders(Borders::ALL)
        .border_style(focus_style(app, Panel::OrderEntry));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),     // Fields
            Constraint::Length(5),  // Summary
            Constraint::Length(1),  // Actions
        ])
        .split(inner);

    let draft = app.session.form().draft();
    let focused = app.current_panel == Panel::OrderEntry;
    let editing = focused && matches!(app.input_mode, InputMode::Editing);

    let items: Vec<ListItem> = ORDER_FIELDS.iter().map(|&field| {
        let selected = focused && app.order_field == field;
        let value = if editing && selected {
            Span::styled(format!("{}_", app.input_buffer), Style::default().fg(Color::Yellow))
        } else {
            match field {
                OrderField::Symbol => Span::styled(
                    draft.symbol.to_string(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                OrderField::Side => {
                    let color = match draft.side {
                        Side::Buy => Color::Green,
                        Side::Sell => Color::Red,
                    };
                    Span::styled(
                        draft.side.to_string(),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )
                }
                OrderField::Type => Span::styled(
                    draft.order_type.to_string(),
                    Style::default().fg(Color::Blue),
                ),
                OrderField::Quantity => Span::styled(draft.quantity.clone(), Style::default().fg(Color::Cyan)),
                OrderField::Price if draft.order_type == OrderType::Market => Span::styled(
                    "MARKET",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                OrderField::Price => Span::styled(draft.price.clone(), Style::default().fg(Color::Cyan)),
            }
        };
        let marker = if selected { "> " } else { "  " };
        ListItem::new(Line::from(vec![
            Span::raw(marker),
            Span::raw(format!("{:<10}", format!("{}:", field_label(field)))),
            value,
        ]))
    }).collect();
    f.render_widget(List::new(items), chunks[0]);

    let (state, state_style) = if !app.session.is_connected() {
        ("Connect an account to trade", Style::default().fg(Color::DarkGray))
    } else if app.session.order_in_flight() {
        ("Order in flight…", Style::default().fg(Color::Yellow))
    } else {
        ("Ready", Style::default().fg(Color::Green))
    };
    let (asset, available) = app.available_to_spend();
    let summary_items = vec![
        ListItem::new(format!("User: {}", app.session.user())),
        ListItem::new(format!("Available: {} {}", available, asset)),
        ListItem::new(Span::styled(state, state_style)),
    ];
    let summary_list = List::new(summary_items)
        .block(Block::default().title("Summary").borders(Borders::TOP));
    f.render_widget(summary_list, chunks[1]);

    let actions_text = if editing {
        "[Enter] Set | [Esc] Cancel"
    } else {
        "[Enter] Edit | [B]/[S] Side | [M] Type | [Y] Symbol | [P] Place"
    };
    let actions_widget = Paragraph::new(actions_text)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(actions_widget, chunks[2]);
}

fn field_label(field: OrderField) -> &'static str {
    match field {
        OrderField::Symbol => "Symbol",
        OrderField::Side => "Side",
        OrderField::Type => "Type",
        OrderField::Quantity => "Quantity",
        OrderField::Price => "Price",
    }
}
