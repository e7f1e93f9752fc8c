//! Render functions for the TUI.
//!
//! Draws the page tabs, the current page, the status bar, and any overlay.

use crate::app::App;
use crate::page::Page;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
    Frame,
};
use tokio::time::Instant;

use super::{checklist, favorites, help, home, modal, status, trails};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 50;
pub(super) const MIN_HEIGHT: u16 = 12;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &App, now: Instant) {
    let area = f.area();
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_tabs(f, app, chunks[0]);
    match app.page {
        Page::Home => home::render(f, app, chunks[1]),
        Page::Trails => trails::render(f, app, chunks[1], now),
        Page::Favorites => favorites::render(f, app, chunks[1]),
        Page::Checklist => checklist::render(f, app, chunks[1]),
    }
    status::render(f, app, chunks[2]);

    // A closing modal is already hidden.
    if let Some(detail) = app.modal.detail() {
        modal::render(f, app, detail, now);
    }

    if app.show_help {
        help::render(f, app);
    }
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Page::ALL
        .iter()
        .map(|page| Line::from(Span::raw(format!("{} {}", page.hotkey(), page.title()))))
        .collect();
    let selected = Page::ALL.iter().position(|p| *p == app.page).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.palette.tab_inactive)
        .highlight_style(app.palette.tab_active)
        .divider("|");
    f.render_widget(tabs, area);
}

/// A rectangle `percent_x` by `percent_y` of `area`, centred.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
