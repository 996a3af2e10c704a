use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::api::UserApi;
use crate::app::form::{FormState, Submission};
use crate::app::keymap::KeyAction;
use crate::app::tasks::{AppEvent, Tasks};
use crate::app::{AppState, InputMode, ModalState, View};
use crate::model::UserId;
use crate::store::PAGE_SIZES;
use crate::ui;

/// Draw, poll input, apply finished API calls; repeat until quit.
pub fn run_app<A: UserApi + 'static>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
    tasks: &Tasks<A>,
    events: &mut UnboundedReceiver<AppEvent>,
) -> Result<()> {
    request_refresh(app, tasks);

    loop {
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, tasks, key),
                Event::Paste(text) => handle_paste(app, &text),
                _ => {}
            }
        }

        while let Ok(ev) = events.try_recv() {
            handle_event(app, tasks, ev);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn request_refresh<A: UserApi + 'static>(app: &mut AppState, tasks: &Tasks<A>) {
    app.pending_fetches += 1;
    tasks.fetch_all();
}

/// Route a key press according to the current input mode.
pub fn handle_key<A: UserApi + 'static>(app: &mut AppState, tasks: &Tasks<A>, key: KeyEvent) {
    match app.input_mode {
        InputMode::Normal => handle_list_key(app, tasks, key),
        InputMode::Search => handle_search_key(app, tasks, key),
        InputMode::Form => handle_form_key(app, tasks, key),
        InputMode::Modal => handle_modal_key(app, tasks, key.code),
    }
}

/// Bracketed paste goes to the search prompt or the focused form field.
pub fn handle_paste(app: &mut AppState, text: &str) {
    match app.input_mode {
        InputMode::Search => {
            let mut term = app.store.search_term().to_string();
            term.push_str(&text.replace(['\n', '\r'], ""));
            app.store.set_search_term(term);
        }
        InputMode::Form => {
            if let Some(form) = app.form_mut() {
                form.input_str(text);
            }
        }
        InputMode::Normal | InputMode::Modal => {}
    }
}

fn handle_list_key<A: UserApi + 'static>(app: &mut AppState, tasks: &Tasks<A>, key: KeyEvent) {
    let Some(action) = app.keymap.resolve(&key) else {
        return;
    };
    match action {
        KeyAction::Quit => app.should_quit = true,
        KeyAction::Ignore => {}
        KeyAction::OpenHelp => {
            app.modal = Some(ModalState::Help { scroll: 0 });
            app.input_mode = InputMode::Modal;
        }
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::NewUser => open_form(app, FormState::create()),
        KeyAction::EnterAction => {
            if let Some(id) = app.store.open_record(app.selected_row) {
                tracing::debug!(%id, "opening user");
                tasks.fetch_one(id.clone());
                open_form(app, FormState::edit(id));
            }
        }
        KeyAction::DeleteSelection => {
            let row = app.store.visible().get(app.selected_row);
            if let Some((id, name)) = row.and_then(|u| u.id.clone().map(|id| (id, u.name.clone()))) {
                app.modal = Some(ModalState::DeleteConfirm { id, name, selected: 1 });
                app.input_mode = InputMode::Modal;
            }
        }
        KeyAction::MoveUp => app.selected_row = app.selected_row.saturating_sub(1),
        KeyAction::MoveDown => {
            if app.selected_row + 1 < app.store.visible().len() {
                app.selected_row += 1;
            }
        }
        KeyAction::PrevPage => {
            let page = app.store.page_index();
            if page > 1 {
                go_to_page(app, tasks, page - 1);
            }
        }
        KeyAction::NextPage => {
            let page = app.store.page_index();
            if page < app.store.page_count() {
                go_to_page(app, tasks, page + 1);
            }
        }
        KeyAction::CyclePageSize => {
            let current = app.store.page_size();
            let idx = PAGE_SIZES.iter().position(|s| *s == current);
            let next = match idx {
                Some(i) => PAGE_SIZES[(i + 1) % PAGE_SIZES.len()],
                None => PAGE_SIZES[0],
            };
            app.store.set_page_size(next);
            app.selected_row = 0;
            request_refresh(app, tasks);
        }
        KeyAction::Refresh => request_refresh(app, tasks),
    }
}

fn go_to_page<A: UserApi + 'static>(app: &mut AppState, tasks: &Tasks<A>, page: usize) {
    app.store.set_page_index(page);
    app.selected_row = 0;
    request_refresh(app, tasks);
}

fn handle_search_key<A: UserApi + 'static>(app: &mut AppState, tasks: &Tasks<A>, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.store.begin_find();
            app.selected_row = 0;
            app.input_mode = InputMode::Normal;
            request_refresh(app, tasks);
        }
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Backspace => {
            let mut term = app.store.search_term().to_string();
            term.pop();
            app.store.set_search_term(term);
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut term = app.store.search_term().to_string();
            term.push(c);
            app.store.set_search_term(term);
        }
        _ => {}
    }
}

fn handle_form_key<A: UserApi + 'static>(app: &mut AppState, tasks: &Tasks<A>, key: KeyEvent) {
    let Some(form) = app.form_mut() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    match key.code {
        KeyCode::Esc => back_to_list(app, tasks),
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Left => form.cycle(false),
        KeyCode::Right => form.cycle(true),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(' ') if !form.focus.is_text() => form.toggle(),
        KeyCode::Delete => {
            if let Some(id) = form.editing().cloned() {
                let name = form.user.name.clone();
                app.modal = Some(ModalState::DeleteConfirm { id, name, selected: 1 });
                app.input_mode = InputMode::Modal;
            }
        }
        KeyCode::Enter => {
            if form.loading || form.submitting {
                return;
            }
            match form.submit() {
                Some(Submission::Create(new_user)) => {
                    form.submitting = true;
                    tasks.create(new_user);
                }
                Some(Submission::Update(id, user)) => {
                    form.submitting = true;
                    tasks.update(id, user);
                }
                None => tracing::debug!(errors = form.errors.len(), "form has validation errors"),
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => form.input_char(c),
        _ => {}
    }
}

fn handle_modal_key<A: UserApi + 'static>(app: &mut AppState, tasks: &Tasks<A>, code: KeyCode) {
    match &mut app.modal {
        Some(ModalState::Info { .. }) => {
            if matches!(code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('q')) {
                app.close_modal();
            }
        }
        Some(ModalState::Help { scroll }) => match code {
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => app.close_modal(),
            _ => {}
        },
        Some(ModalState::DeleteConfirm { id, name, selected }) => match code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                *selected = 1 - *selected;
            }
            KeyCode::Char('y') => {
                let (id, name) = (id.clone(), name.clone());
                confirm_delete(app, tasks, id, name);
            }
            KeyCode::Enter => {
                if *selected == 0 {
                    let (id, name) = (id.clone(), name.clone());
                    confirm_delete(app, tasks, id, name);
                } else {
                    app.close_modal();
                }
            }
            KeyCode::Esc | KeyCode::Char('n') => app.close_modal(),
            _ => {}
        },
        None => app.close_modal(),
    }
}

fn confirm_delete<A: UserApi + 'static>(app: &mut AppState, tasks: &Tasks<A>, id: UserId, name: String) {
    tracing::debug!(%id, "deleting user");
    tasks.delete(id, name);
    app.close_modal();
}

fn open_form(app: &mut AppState, form: FormState) {
    app.view = View::Form(Box::new(form));
    app.input_mode = InputMode::Form;
}

/// Leave the form; the list screen always refetches when shown.
fn back_to_list<A: UserApi + 'static>(app: &mut AppState, tasks: &Tasks<A>) {
    app.view = View::List;
    app.input_mode = if app.modal.is_some() { InputMode::Modal } else { InputMode::Normal };
    request_refresh(app, tasks);
}

/// Apply the completion of a background API call.
pub fn handle_event<A: UserApi + 'static>(app: &mut AppState, tasks: &Tasks<A>, event: AppEvent) {
    match event {
        AppEvent::Fetched(result) => {
            app.pending_fetches = app.pending_fetches.saturating_sub(1);
            if app.store.apply_fetch_result(result).is_ok() {
                app.clamp_selection();
            }
        }
        AppEvent::Loaded { id, result } => {
            let Some(form) = app.form_mut().filter(|f| f.editing() == Some(&id)) else {
                tracing::debug!(%id, "dropping load for a form that is no longer open");
                return;
            };
            match result {
                Ok(user) => form.hydrate(user),
                Err(e) => {
                    form.loading = false;
                    tracing::error!(%id, error = %e, "failed to load user");
                    app.notify("Error", "Can't get data", true);
                }
            }
        }
        AppEvent::Created(result) => match result {
            Ok(user) => {
                tracing::info!(id = ?user.id, "user created");
                app.notify("Success", "Successfully added.", false);
                back_to_list(app, tasks);
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to create user");
                if let Some(form) = app.form_mut() {
                    form.submitting = false;
                }
                app.notify("Error", e.to_string(), true);
            }
        },
        AppEvent::Updated { name, result } => match result {
            Ok(user) => {
                tracing::info!(id = ?user.id, "user updated");
                app.notify("Success", format!("{name} Updated Successfully."), false);
                back_to_list(app, tasks);
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to update user");
                if let Some(form) = app.form_mut() {
                    form.submitting = false;
                }
                app.notify("Error", e.to_string(), true);
            }
        },
        AppEvent::Deleted { id, name, result } => match app.store.apply_delete_result(&id, result) {
            Ok(()) => {
                app.clamp_selection();
                app.notify("Success", format!("{name} Successfully Deleted."), false);
                if app.form().and_then(|f| f.editing()) == Some(&id) {
                    back_to_list(app, tasks);
                } else {
                    request_refresh(app, tasks);
                }
            }
            Err(e) => app.notify("Error", e.to_string(), true),
        },
    }
}
