use crate::app::App;
use crate::form::{Field, OptionItem, Select};
use crate::ui::styles;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Right pane: the full option list of the focused select.
pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let form = match &app.form {
        Some(f) => f,
        None => return,
    };

    match form.focus {
        Field::Client => draw_options(frame, area, "Clients", &form.clients),
        Field::Project => draw_options(frame, area, "Projects", &form.projects),
        Field::Task => draw_options(frame, area, "Tasks", &form.tasks),
        _ => draw_hints(frame, area),
    }
}

fn draw_options<T: OptionItem>(frame: &mut Frame, area: Rect, title: &str, select: &Select<T>) {
    let items: Vec<ListItem> = select
        .options()
        .iter()
        .map(|o| ListItem::new(Line::from(Span::raw(o.label().to_string()))))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" {} ({}) ", title, select.options().len()))
                .borders(Borders::ALL)
                .border_style(styles::focused_border_style()),
        )
        .highlight_style(styles::selected_style())
        .highlight_symbol("▌ ");

    let mut state = ListState::default();
    state.select(select.selected_index());
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_hints(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled("Tab / Shift+Tab", styles::label_style())),
        Line::from("  move between fields"),
        Line::from(""),
        Line::from(Span::styled("↑↓ on a select", styles::label_style())),
        Line::from("  change option and load the next list"),
        Line::from(""),
        Line::from(Span::styled("Ctrl+S", styles::label_style())),
        Line::from("  submit from anywhere"),
    ];
    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::unfocused_border_style()),
        );
    frame.render_widget(para, area);
}
