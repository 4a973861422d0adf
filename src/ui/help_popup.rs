use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, _app: &App) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help — crm-change-request ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let bold = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(Color::Cyan);
    let dim = Style::default().fg(Color::DarkGray);

    let lines = vec![
        Line::from(Span::styled("Form", bold)),
        Line::from(""),
        key_line("Tab", "Next field", key_style),
        key_line("Shift+Tab", "Previous field", key_style),
        key_line("↑/↓ or j/k", "Change option (Client/Project/Task)", key_style),
        key_line("Enter", "Confirm select and load next list", key_style),
        key_line("Enter", "Submit (on the Submit button)", key_style),
        key_line("Ctrl+S", "Submit from any field", key_style),
        Line::from(""),
        Line::from(Span::styled("Application", bold)),
        Line::from(""),
        key_line("F1", "Show this help", key_style),
        key_line("F5", "Reload clients and reset the form", key_style),
        key_line("Esc", "Quit", key_style),
        key_line("Ctrl+C", "Quit", key_style),
        Line::from(""),
        Line::from(Span::styled(
            "Errors are written to the log file, not shown here.",
            dim,
        )),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", dim)),
    ];

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

fn key_line<'a>(key: &'a str, desc: &'a str, key_style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<14}", key), key_style),
        Span::raw(desc),
    ])
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
