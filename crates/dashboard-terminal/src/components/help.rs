// crates/dashboard-terminal/src/components/help.rs

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

const SHORTCUTS: &[(&str, Color, &str)] = &[
    ("Enter", Color::Yellow, "Edit selected field"),
    ("C/c", Color::Green, "Connect account"),
    ("R/r", Color::Cyan, "Refresh balances"),
    ("B/b", Color::Green, "Side: Buy"),
    ("S/s", Color::Red, "Side: Sell"),
    ("M/m", Color::Yellow, "Toggle Market/Limit"),
    ("Y/y", Color::Cyan, "Next symbol"),
    ("P/p", Color::Magenta, "Place order"),
    ("T/t", Color::Cyan, "Retry last failed request"),
    ("Tab", Color::Blue, "Next Panel"),
    ("Shift+Tab", Color::Blue, "Previous Panel"),
    ("↑/k ↓/j", Color::White, "Select field"),
    ("F1", Color::Gray, "Toggle Help"),
    ("Q/q", Color::Red, "Quit"),
];

pub fn draw_help(f: &mut Frame, area: Rect) {
    f.render_widget(Clear, area);

    let help_items: Vec<ListItem> = SHORTCUTS.iter().map(|(key, color, action)| {
        ListItem::new(Line::from(vec![
            Span::styled(*key, Style::default().fg(*color).add_modifier(Modifier::BOLD)),
            Span::raw(format!(" - {}", action)),
        ]))
    }).collect();

    let help_list = List::new(help_items)
        .block(Block::default()
            .title(" Help - Keyboard Shortcuts ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(help_list, area);

    let footer = Paragraph::new("Press F1 or ESC to close help")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);

    let footer_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    f.render_widget(footer, footer_area);
}
