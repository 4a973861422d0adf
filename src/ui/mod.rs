pub mod form_view;
pub mod help_popup;
pub mod options_pane;
pub mod status_bar;
pub mod styles;

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),  // Title
            Constraint::Min(10),    // Form
            Constraint::Length(2),  // Status bar
        ])
        .split(frame.area());

    let title = Paragraph::new(Line::from(Span::styled(
        " Task Submission Form",
        styles::header_style(),
    )));
    frame.render_widget(title, chunks[0]);

    match &app.form {
        Some(_) => draw_dual_pane(frame, app, chunks[1]),
        None => draw_placeholder(frame, app, chunks[1]),
    }

    status_bar::draw(frame, app, chunks[2]);

    if app.show_help {
        help_popup::draw(frame, app);
    }
}

fn draw_dual_pane(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    form_view::draw(frame, app, chunks[0]);
    options_pane::draw(frame, app, chunks[1]);
}

/// Shown until the client list has arrived. Fetch failures are not reported here.
fn draw_placeholder(frame: &mut Frame, app: &App, area: Rect) {
    let msg = if app.is_loading_clients() {
        " Loading clients..."
    } else {
        ""
    };
    let para = Paragraph::new(Line::from(Span::styled(msg, styles::dim_style())));
    frame.render_widget(para, area);
}
