// crates/dashboard-terminal/src/components/status_bar.rs

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};

pub fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let (msg, style) = match app.input_mode {
        InputMode::Editing => {
            let input = vec![
                Span::raw("Input: "),
                Span::styled(app.input_display(), Style::default().fg(Color::Yellow)),
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
                Span::raw(" [Enter] Submit [Esc] Cancel"),
            ];
            (Line::from(input), Style::default().fg(Color::Yellow))
        }
        InputMode::Normal => {
            if let Some(notice) = &app.notice {
                (
                    Line::from(Span::styled(notice.clone(), Style::default().fg(Color::Yellow))),
                    Style::default().fg(Color::Yellow),
                )
            } else if let Some(failure) = app.session.last_failure() {
                let line = vec![
                    Span::styled(
                        format!("{} failed: {} ", failure.operation, failure.message),
                        Style::default().fg(Color::Red),
                    ),
                    Span::styled("[T]", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                    Span::raw("ry again"),
                ];
                (Line::from(line), Style::default().fg(Color::Red))
            } else {
                let shortcuts = vec![
                    Span::styled("[C]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                    Span::raw("onnect "),
                    Span::styled("[R]", Style::default().fg(Color::Cyan)),
                    Span::raw("efresh "),
                    Span::styled("[B]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                    Span::raw("uy "),
                    Span::styled("[S]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                    Span::raw("ell "),
                    Span::styled("[M]", Style::default().fg(Color::Yellow)),
                    Span::raw("arket/Limit "),
                    Span::styled("[P]", Style::default().fg(Color::Magenta)),
                    Span::raw("lace "),
                    Span::styled("[Q]", Style::default().fg(Color::Gray)),
                    Span::raw("uit"),
                ];
                (Line::from(shortcuts), Style::default())
            }
        }
    };

    let status_block = Block::default()
        .borders(Borders::ALL)
        .border_style(style);

    let paragraph = Paragraph::new(msg)
        .block(status_block)
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}
