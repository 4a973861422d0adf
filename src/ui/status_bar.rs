use crate::app::App;
use crate::submit::SubmitState;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let state = match app.submit_state {
        SubmitState::Idle => state_span("IDLE", Color::Green),
        SubmitState::Submitting => state_span("SUBMITTING", Color::Yellow),
    };

    let hints = Line::from(vec![
        state,
        Span::raw("  │  "),
        Span::styled(
            "Tab next  ↑↓ choose  Enter confirm  Ctrl+S submit  F5 reload  F1 help  Esc quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let info = Line::from(Span::styled(
        format!(" {} │ {} request(s) in flight", app.site_url, app.in_flight()),
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(vec![hints, info]), area);
}

fn state_span(label: &str, color: Color) -> Span<'_> {
    Span::styled(
        format!("[{}]", label),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}
