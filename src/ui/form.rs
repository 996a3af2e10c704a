//! Create/edit form rendering.
//!
//! One row per field with its inline validation error underneath. Select
//! rows show `< value >`; the role row shows one checkbox per role with the
//! cursor marked.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::AppState;
use crate::app::form::{FormField, FormState};
use crate::model::Role;

const LABEL_WIDTH: usize = 12;

pub fn render_form(f: &mut Frame, area: Rect, app: &AppState, form: &FormState) {
    let title = if form.loading {
        format!("{} (loading...)", form.title())
    } else if form.submitting {
        format!("{} (saving...)", form.title())
    } else {
        form.title()
    };

    let mut lines: Vec<Line> = Vec::new();
    for field in form.fields() {
        let focused = *field == form.focus;
        let marker = if focused { "▶ " } else { "  " };
        let label_style = if focused {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.muted)
        };
        let mut spans = vec![Span::styled(
            format!("{marker}{:<width$}", field.label(), width = LABEL_WIDTH),
            label_style,
        )];
        spans.extend(value_spans(app, form, *field, focused));
        lines.push(Line::from(spans));

        if let Some(msg) = field.validated().and_then(|v| form.errors.get(v)) {
            lines.push(Line::from(Span::styled(
                format!("  {:<width$}{msg}", "", width = LABEL_WIDTH),
                Style::default().fg(app.theme.error),
            )));
        }
    }

    lines.push(Line::raw(""));
    let actions = if form.editing().is_some() {
        "Enter: Update   Delete: Delete   Esc: Back"
    } else {
        "Enter: Save   Esc: Back"
    };
    lines.push(Line::from(Span::styled(actions, Style::default().fg(app.theme.muted))));

    let p = Paragraph::new(lines).style(Style::default().fg(app.theme.text)).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}

fn value_spans(app: &AppState, form: &FormState, field: FormField, focused: bool) -> Vec<Span<'static>> {
    let user = &form.user;
    let text = |s: &str| {
        let cursor = if focused { "_" } else { "" };
        vec![Span::raw(format!("{s}{cursor}"))]
    };
    let select = |current: &'static str, unset: bool| {
        let style = if unset { Style::default().fg(app.theme.muted) } else { Style::default() };
        vec![Span::styled(format!("< {current} >"), style)]
    };
    match field {
        FormField::Firstname => text(&user.firstname),
        FormField::Name => text(&user.name),
        FormField::Telephone => text(&user.telephone),
        FormField::Email => text(&user.email),
        FormField::Position => {
            let p = user.position;
            select(if p.is_unset() { p.option_label() } else { p.label() }, p.is_unset())
        }
        FormField::Status => {
            let s = user.status;
            select(if s.is_unset() { s.option_label() } else { s.label() }, s.is_unset())
        }
        FormField::Role => Role::ALL
            .iter()
            .enumerate()
            .map(|(i, role)| {
                let mark = if form.roles.contains(*role) { "[x]" } else { "[ ]" };
                let style = if focused && i == form.role_cursor {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                Span::styled(format!("{mark} {}  ", role.as_str()), style)
            })
            .collect(),
        FormField::Published => {
            let mark = if user.published.unwrap_or(false) { "[x]" } else { "[ ]" };
            vec![Span::raw(format!("{mark} (Space)"))]
        }
    }
}
