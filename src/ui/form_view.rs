use crate::app::App;
use crate::form::{Field, FormState, OptionItem, Select};
use crate::submit::SubmitState;
use crate::ui::styles;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let form = match &app.form {
        Some(f) => f,
        None => return,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    draw_select(frame, chunks[0], Field::Client, &form.clients, form.focus);
    draw_select(frame, chunks[1], Field::Project, &form.projects, form.focus);
    draw_select(frame, chunks[2], Field::Task, &form.tasks, form.focus);
    draw_input(frame, chunks[3], Field::RequestType, form);
    draw_input(frame, chunks[4], Field::StartDate, form);
    draw_input(frame, chunks[5], Field::Description, form);
    draw_button(frame, chunks[6], form.focus == Field::Submit, app.submit_state);
}

fn field_block(field: Field, focused: bool) -> Block<'static> {
    let border_style = if focused {
        styles::focused_border_style()
    } else {
        styles::unfocused_border_style()
    };
    Block::default()
        .title(Span::styled(format!(" {} ", field.label()), styles::label_style()))
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn draw_select<T: OptionItem>(
    frame: &mut Frame,
    area: Rect,
    field: Field,
    select: &Select<T>,
    focus: Field,
) {
    let focused = focus == field;
    let block = field_block(field, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = match (select.selected(), select.selected_index()) {
        (Some(option), Some(i)) => {
            let count = select.options().len();
            let up = if i > 0 { "▲ " } else { "  " };
            let down = if i + 1 < count { " ▼" } else { "  " };
            Line::from(vec![
                Span::styled(up, styles::dim_style()),
                Span::raw(option.label().to_string()),
                Span::styled(down, styles::dim_style()),
                Span::styled(format!("  ({}/{})", i + 1, count), styles::dim_style()),
            ])
        }
        _ => Line::from(Span::styled("  (no options)", styles::dim_style())),
    };
    frame.render_widget(Paragraph::new(line), inner);
}

fn draw_input(frame: &mut Frame, area: Rect, field: Field, form: &FormState) {
    let input = match form.input(field) {
        Some(i) => i,
        None => return,
    };
    let focused = form.focus == field;
    let block = field_block(field, focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let value = input.value();
    let line = if value.is_empty() && field == Field::StartDate && !focused {
        Line::from(Span::styled("YYYY-MM-DD", styles::dim_style()))
    } else {
        let scroll = input.visual_scroll(inner.width.max(1) as usize);
        Line::from(Span::raw(value.chars().skip(scroll).collect::<String>()))
    };
    frame.render_widget(Paragraph::new(line), inner);

    if focused {
        let scroll = input.visual_scroll(inner.width.max(1) as usize);
        let cursor = input.visual_cursor().saturating_sub(scroll) as u16;
        frame.set_cursor_position((inner.x + cursor, inner.y));
    }
}

fn draw_button(frame: &mut Frame, area: Rect, focused: bool, state: SubmitState) {
    let label = match state {
        SubmitState::Idle => "[ Submit ]",
        SubmitState::Submitting => "[ Submitting... ]",
    };
    let line = Line::from(Span::styled(label, styles::button_style(focused)));
    let para = Paragraph::new(vec![Line::from(""), line]);
    frame.render_widget(para, area);
}
