//! Help overlay: scrollable key binding table.

use crate::app::App;
use ratatui::{
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Row, Table},
    Frame,
};

use super::render::centered_rect;

/// Bindings grouped by where they apply.
const BINDINGS: [(&str, &[(&str, &str)]); 6] = [
    (
        "General",
        &[
            ("1 - 4", "Home / Trails / Favorites / Checklist"),
            ("t", "Toggle theme"),
            ("?", "Toggle this help"),
            ("q, Ctrl+c", "Quit"),
        ],
    ),
    (
        "Trails",
        &[
            ("j/k, Up/Down", "Move selection"),
            ("g / G", "First / last trail"),
            ("Enter", "Open trail details"),
            ("d / D", "Next / previous difficulty"),
            ("l / L", "Next / previous location"),
            ("m / M", "Next / previous length limit"),
            ("/ or Tab", "Focus search"),
            ("r", "Reset filters"),
            ("s", "Save filter preferences"),
        ],
    ),
    (
        "Search",
        &[
            ("type", "Search names and descriptions"),
            ("Backspace", "Delete a character"),
            ("Ctrl+u", "Clear search"),
            ("Esc / Enter", "Back to the grid"),
        ],
    ),
    (
        "Trail Details",
        &[
            ("Tab / Shift+Tab", "Move between controls"),
            ("Enter", "Activate control"),
            ("j/k, PgUp/PgDn", "Scroll"),
            ("Esc", "Close"),
        ],
    ),
    (
        "Favorites",
        &[("j/k", "Move selection"), ("c c", "Clear all favorites")],
    ),
    (
        "Checklist",
        &[
            ("j/k, g / G", "Move selection"),
            ("Space, Enter", "Check / uncheck item"),
            ("s", "Save checklist"),
            ("r", "Reset checklist"),
        ],
    ),
];

pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(70, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }
    f.render_widget(Clear, overlay);

    let mut rows: Vec<Row> = Vec::new();
    for (group, bindings) in BINDINGS {
        rows.push(Row::new(vec![
            Line::from(Span::styled(
                format!("-- {} --", group),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ])
        .style(app.palette.modal_title));
        for (key, description) in bindings {
            rows.push(Row::new(vec![format!("  {}", key), description.to_string()]));
        }
        rows.push(Row::new(vec![String::new(), String::new()]));
    }
    rows.pop();

    let skip = usize::from(app.help_scroll).min(rows.len().saturating_sub(1));
    let rows: Vec<Row> = rows.into_iter().skip(skip).collect();

    let table = Table::new(rows, [Constraint::Length(20), Constraint::Min(20)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.palette.panel_border_focused)
            .title(" Help (Esc to close) "),
    );
    f.render_widget(table, overlay);
}
