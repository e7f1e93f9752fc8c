use crate::app::App;
use crate::trails::format_number;
use crate::util::single_line;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the saved trails, newest last.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let palette = &app.palette;
    let (entries, selected) = match &app.pages.favorites {
        Some(page) => (page.entries.as_slice(), page.selected),
        None => (&[][..], 0),
    };

    let items: Vec<ListItem> = if entries.is_empty() {
        vec![ListItem::new(Span::styled(
            "No favorites yet. Open a trail and choose Save to Favorites.",
            palette.no_results,
        ))]
    } else {
        entries
            .iter()
            .map(|entry| {
                let difficulty = entry.difficulty.map(|d| d.as_str()).unwrap_or("unknown");
                let length = entry
                    .length
                    .map(|km| format!("{} km", format_number(km)))
                    .unwrap_or_else(|| "N/A".to_string());
                ListItem::new(vec![
                    Line::from(Span::styled(single_line(&entry.name), palette.card_title)),
                    Line::from(vec![
                        Span::styled(difficulty, palette.difficulty(entry.difficulty)),
                        Span::styled(
                            format!(
                                "  {}  {}  saved {}",
                                length,
                                single_line(&entry.location),
                                entry.saved_at.format("%Y-%m-%d")
                            ),
                            palette.card_meta,
                        ),
                    ]),
                ])
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.panel_border)
                .title(format!(" Favorites ({}) ", entries.len())),
        )
        .highlight_style(palette.card_selected);

    let mut state = ListState::default();
    if !entries.is_empty() {
        state.select(Some(selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}
