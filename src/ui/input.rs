//! Input handling for the TUI.
//!
//! Overlays capture keys first (help, then the detail modal); otherwise the
//! current page handles the key and falls back to the global bindings.

use crate::app::{App, AppEvent};
use crate::filter::Direction;
use crate::modal::ModalCommand;
use crate::page::{Page, TrailsFocus};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tokio::time::Instant;

use super::Action;

/// Lines moved by PageUp/PageDown in the detail modal.
const PAGE_SCROLL: i32 = 10;

/// Main input dispatch function.
pub(super) async fn handle_input(
    app: &mut App,
    key: KeyEvent,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if key.kind != KeyEventKind::Press {
        return Ok(Action::Continue);
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(Action::Quit);
    }

    let now = Instant::now();

    if app.show_help {
        handle_help_input(app, key.code);
        return Ok(Action::Continue);
    }

    if app.modal.is_open() {
        handle_modal_input(app, key.code, now).await;
        return Ok(Action::Continue);
    }

    match app.page {
        Page::Home => Ok(handle_home_input(app, key.code, event_tx)),
        Page::Trails => handle_trails_input(app, key, now, event_tx).await,
        Page::Favorites => handle_favorites_input(app, key.code, event_tx).await,
        Page::Checklist => handle_checklist_input(app, key.code, event_tx).await,
    }
}

/// Bindings shared by every page.
fn handle_global_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('?') => {
            app.show_help = true;
            app.help_scroll = 0;
        }
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char(c) => {
            if let Some(page) = Page::from_hotkey(c) {
                app.show_page(page, event_tx);
            }
        }
        _ => {}
    }
    Action::Continue
}

fn handle_help_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll = app.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll = app.help_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

/// The modal is open: it takes every key, so the page behind neither
/// scrolls nor reacts.
async fn handle_modal_input(app: &mut App, code: KeyCode, now: Instant) {
    match code {
        KeyCode::Esc | KeyCode::Char('q') => app.modal.close(now),
        KeyCode::Tab => app.modal.focus_next(),
        KeyCode::BackTab => app.modal.focus_prev(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if app.modal.activate(now) == ModalCommand::SaveFavorite {
                app.save_favorite(now).await;
            }
        }
        KeyCode::Char('j') | KeyCode::Down => app.modal.scroll_by(1),
        KeyCode::Char('k') | KeyCode::Up => app.modal.scroll_by(-1),
        KeyCode::PageDown => app.modal.scroll_by(PAGE_SCROLL),
        KeyCode::PageUp => app.modal.scroll_by(-PAGE_SCROLL),
        _ => {}
    }
}

fn handle_home_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    match code {
        KeyCode::Enter => {
            app.open_featured_trail();
            Action::Continue
        }
        _ => handle_global_input(app, code, event_tx),
    }
}

async fn handle_trails_input(
    app: &mut App,
    key: KeyEvent,
    now: Instant,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    let Some(page) = app.pages.trails.as_mut() else {
        return Ok(handle_global_input(app, key.code, event_tx));
    };

    if page.focus == TrailsFocus::Search {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => page.focus = TrailsFocus::Grid,
            KeyCode::Backspace => page.filters.pop_search_char(now),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                page.filters.input_search("", now);
            }
            KeyCode::Char(c) => page.filters.push_search_char(c, now),
            _ => {}
        }
        return Ok(Action::Continue);
    }

    let catalog = &mut page.catalog;
    let filters = &mut page.filters;
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            page.selected = page.selected.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            page.selected = page.selected.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => page.selected = 0,
        KeyCode::Char('G') | KeyCode::End => page.selected = usize::MAX,
        KeyCode::Char('d') => filters.cycle_difficulty(Direction::Next, catalog),
        KeyCode::Char('D') => filters.cycle_difficulty(Direction::Prev, catalog),
        KeyCode::Char('l') => filters.cycle_location(Direction::Next, catalog),
        KeyCode::Char('L') => filters.cycle_location(Direction::Prev, catalog),
        KeyCode::Char('m') => filters.cycle_max_length(Direction::Next, catalog),
        KeyCode::Char('M') => filters.cycle_max_length(Direction::Prev, catalog),
        KeyCode::Char('r') => filters.reset(catalog),
        KeyCode::Char('/') | KeyCode::Tab => page.focus = TrailsFocus::Search,
        KeyCode::Char('s') => {
            app.save_filters(now).await;
            return Ok(Action::Continue);
        }
        KeyCode::Enter => {
            app.open_selected_trail();
            return Ok(Action::Continue);
        }
        code => return Ok(handle_global_input(app, code, event_tx)),
    }
    page.clamp_selection();
    Ok(Action::Continue)
}

async fn handle_favorites_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    let Some(page) = app.pages.favorites.as_mut() else {
        return Ok(handle_global_input(app, code, event_tx));
    };

    // Any key other than a second `c` cancels a pending clear.
    let confirming = std::mem::take(&mut page.confirm_clear);
    match code {
        KeyCode::Char('j') | KeyCode::Down => {
            if page.selected + 1 < page.entries.len() {
                page.selected += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            page.selected = page.selected.saturating_sub(1);
        }
        KeyCode::Char('c') if confirming => app.clear_favorites().await,
        KeyCode::Char('c') => {
            if !page.entries.is_empty() {
                page.confirm_clear = true;
                app.set_status("Press c again to clear all favorites");
            }
        }
        code => return Ok(handle_global_input(app, code, event_tx)),
    }
    Ok(Action::Continue)
}

async fn handle_checklist_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    let Some(page) = app.pages.checklist.as_mut() else {
        return Ok(handle_global_input(app, code, event_tx));
    };

    match code {
        KeyCode::Char('j') | KeyCode::Down => page.select_next(),
        KeyCode::Char('k') | KeyCode::Up => page.select_prev(),
        KeyCode::Char('g') | KeyCode::Home => page.selected = 0,
        KeyCode::Char('G') | KeyCode::End => {
            page.selected = page.checklist.len().saturating_sub(1);
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            page.toggle_selected();
        }
        KeyCode::Char('s') => app.save_checklist().await,
        KeyCode::Char('r') => app.reset_checklist().await,
        code => return Ok(handle_global_input(app, code, event_tx)),
    }
    Ok(Action::Continue)
}
