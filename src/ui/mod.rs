pub mod components;
pub mod form;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, ModalState, View};

pub fn render(f: &mut Frame, app: &AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    render_header(f, root[0], app);

    match &app.view {
        View::List => users::render_users_screen(f, root[1], app),
        View::Form(state) => form::render_form(f, root[1], app, state),
    }

    components::render_status_bar(f, root[2], app);

    if app.modal.is_some() {
        render_modal(f, f.area(), app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let search = app.store.search_term();
    let prompt = match (app.input_mode, &app.view) {
        (InputMode::Search, _) => format!("  Search: {search}_"),
        (_, View::List) if !search.is_empty() => format!("  Search: {search}"),
        _ => String::new(),
    };
    let hint = match app.view {
        View::List => "/: search; Enter: open; n: new; d: delete; ?: help; q: quit",
        View::Form(_) => "Tab: next field; Enter: save; Esc: back",
    };
    let p = Paragraph::new(format!("{}{prompt}  {hint}", app.api_url))
        .block(
            Block::default()
                .title("user-console")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.modal {
        Some(state @ ModalState::Info { .. }) => components::render_info_modal(f, area, app, state),
        Some(state @ ModalState::DeleteConfirm { .. }) => components::render_delete_modal(f, area, app, state),
        Some(ModalState::Help { scroll }) => components::render_help_modal(f, area, app, *scroll),
        None => {}
    }
}
