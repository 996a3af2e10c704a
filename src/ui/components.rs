//! Shared UI components (status bar, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState};

/// Render the bottom status bar with mode and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Form => "FORM",
        InputMode::Modal => "MODAL",
    };
    let store = &app.store;
    let fetching = if app.pending_fetches > 0 { "  fetching..." } else { "" };
    let msg = format!(
        "mode: {mode}  users:{}  matches:{}  page:{}/{}  rows/page:{}{fetching}",
        store.all().len(),
        store.filtered_count(),
        store.page_index(),
        store.page_count(),
        store.page_size(),
    );
    let p = Paragraph::new(msg).style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render a notification; errors use the theme's error color.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info {
        title,
        message,
        is_error,
    } = state
    {
        let max_w = area.width.saturating_sub(6).max(30);
        let min_w = 44u16.min(max_w);
        let chars = u16::try_from(message.chars().count()).unwrap_or(u16::MAX);
        let approx_lines = (chars / min_w.saturating_sub(4).max(10)).max(1);
        let max_h = area.height.saturating_sub(6).max(5);
        let height = approx_lines.saturating_add(4).min(max_h).max(5);
        let rect = centered_rect(min_w, height, area);
        let color = if *is_error { app.theme.error } else { app.theme.success };
        let p = Paragraph::new(format!("{message}\n\n(Enter to close)"))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(Span::styled(title.clone(), Style::default().fg(color).add_modifier(Modifier::BOLD)))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

pub fn render_delete_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::DeleteConfirm { id, name, selected } = state {
        let rect = centered_rect(50, 7, area);
        let yes = if *selected == 0 { "[Yes]" } else { " Yes " };
        let no = if *selected == 1 { "[No]" } else { " No  " };
        let body = format!("Delete user '{name}' (id {id})?\n\n  {yes}    {no}");
        let p = Paragraph::new(body).block(
            Block::default()
                .title("Confirm delete")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Render the help modal from the live keymap plus the fixed form keys.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 72u16.min(area.width.saturating_sub(4)).max(50);
    let height = 24u16.min(area.height.saturating_sub(4)).max(12);
    let rect = centered_rect(width, height, area);

    let key_line = |label: &str, keys: String| {
        Line::from(vec![
            Span::raw(format!("  {label:<22}")),
            Span::styled(keys, Style::default().add_modifier(Modifier::ITALIC)),
        ])
    };
    let bound = |action: KeyAction| app.keymap.keys_for(action).join(", ");

    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        "User list",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (label, action) in [
        ("Move up", KeyAction::MoveUp),
        ("Move down", KeyAction::MoveDown),
        ("Previous page", KeyAction::PrevPage),
        ("Next page", KeyAction::NextPage),
        ("Cycle rows per page", KeyAction::CyclePageSize),
        ("Search", KeyAction::StartSearch),
        ("Open user", KeyAction::EnterAction),
        ("New user", KeyAction::NewUser),
        ("Delete user", KeyAction::DeleteSelection),
        ("Refresh", KeyAction::Refresh),
        ("Help", KeyAction::OpenHelp),
        ("Quit", KeyAction::Quit),
    ] {
        lines.push(key_line(label, bound(action)));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Search prompt",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(key_line("Find", "Enter".into()));
    lines.push(key_line("Leave prompt", "Esc".into()));

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Form",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for (label, keys) in [
        ("Next / previous field", "Tab, Down / Shift+Tab, Up"),
        ("Change selection", "Left, Right"),
        ("Toggle role / flag", "Space"),
        ("Save / Update", "Enter"),
        ("Delete (edit only)", "Delete"),
        ("Back to list", "Esc"),
    ] {
        lines.push(key_line(label, keys.to_string()));
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
