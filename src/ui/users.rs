use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::AppState;
use crate::model::User;
use crate::store::PAGE_SIZES;

/// The list screen: table of the visible page over a pagination bar.
pub fn render_users_screen(f: &mut Frame, area: Rect, app: &AppState) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)].as_ref())
        .split(area);
    render_users_table(f, parts[0], app);
    render_pagination(f, parts[1], app);
}

fn user_row(u: &User) -> Row<'static> {
    let id = u.id.as_ref().map(|id| id.to_string()).unwrap_or_default();
    Row::new(vec![
        Cell::from(id),
        Cell::from(u.firstname.clone()),
        Cell::from(u.name.clone()),
        Cell::from(u.position.label()),
        Cell::from(u.telephone.clone()),
        Cell::from(u.email.clone()),
        Cell::from(u.status.label()),
        Cell::from(u.roles().encode().replace(',', ", ")),
    ])
}

pub fn render_users_table(f: &mut Frame, area: Rect, app: &AppState) {
    let visible = app.store.visible();
    let rows = visible.iter().enumerate().map(|(i, u)| {
        let style = if i == app.selected_row {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        user_row(u).style(style)
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(14),
        Constraint::Percentage(14),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Percentage(24),
        Constraint::Length(9),
        Constraint::Percentage(20),
    ];

    let header = Row::new(vec![
        "ID", "First name", "Name", "Position", "Telephone", "Email", "Status", "Roles",
    ])
    .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let title = if app.pending_fetches > 0 { "Users (loading...)" } else { "Users" };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    if visible.is_empty() {
        let msg = if app.store.filtered_count() == 0 && app.pending_fetches == 0 {
            "No users"
        } else {
            ""
        };
        let p = Paragraph::new(msg).style(Style::default().fg(app.theme.muted)).block(block);
        f.render_widget(p, area);
        return;
    }

    let table = Table::new(rows, widths).header(header).block(block).column_spacing(1);
    f.render_widget(table, area);
}

/// Page links `1..=page_count` with the current one highlighted, plus the page size picker.
pub fn render_pagination(f: &mut Frame, area: Rect, app: &AppState) {
    let store = &app.store;
    let mut spans = vec![Span::styled("Page ", Style::default().fg(app.theme.muted))];
    for page in 1..=store.page_count() {
        let label = format!(" {page} ");
        if page == store.page_index() {
            spans.push(Span::styled(
                label,
                Style::default()
                    .fg(app.theme.highlight_fg)
                    .add_modifier(Modifier::REVERSED | Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(label, Style::default().fg(app.theme.text)));
        }
    }
    spans.push(Span::styled("   Rows: ", Style::default().fg(app.theme.muted)));
    for size in PAGE_SIZES {
        let label = format!(" {size} ");
        let style = if size == store.page_size() {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.muted)
        };
        spans.push(Span::styled(label, style));
    }
    spans.push(Span::styled(
        format!("   {}/{} users", store.filtered_count(), store.all().len()),
        Style::default().fg(app.theme.muted),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
