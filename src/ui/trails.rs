//! Trails page: the filter bar and the card grid.

use crate::app::App;
use crate::filter::max_length_label;
use crate::page::{TrailsFocus, TrailsPage};
use crate::theme::ColorPalette;
use crate::trails::{CatalogView, TrailCard};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use tokio::time::Instant;

pub fn render(f: &mut Frame, app: &App, area: Rect, now: Instant) {
    let Some(page) = &app.pages.trails else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    render_filter_bar(f, &app.palette, page, chunks[0], now);
    render_grid(f, &app.palette, page, chunks[1], app.modal.scroll_locked());
}

fn render_filter_bar(
    f: &mut Frame,
    palette: &ColorPalette,
    page: &TrailsPage,
    area: Rect,
    now: Instant,
) {
    let state = page.filters.state();
    let searching = page.focus == TrailsFocus::Search;

    let mut controls = vec![
        Span::styled("[d] Difficulty: ", palette.filter_label),
        Span::styled(
            state.difficulty.map(|d| d.as_str()).unwrap_or("all"),
            palette.filter_value,
        ),
        Span::styled("  [l] Location: ", palette.filter_label),
        Span::styled(state.location.as_deref().unwrap_or("all"), palette.filter_value),
        Span::styled("  [m] Length: ", palette.filter_label),
        Span::styled(max_length_label(state.max_length), palette.filter_value),
        Span::styled("  [/] Search: ", palette.filter_label),
    ];
    let search_style = if searching {
        palette.search_focused
    } else {
        palette.filter_value
    };
    let cursor = if searching { "_" } else { "" };
    controls.push(Span::styled(
        format!("{}{}", page.filters.search_input(), cursor),
        search_style,
    ));

    let mut info = Vec::new();
    if page.catalog.is_loaded() {
        info.push(Span::styled(page.filters.count_label().to_string(), palette.summary));
    }
    if !page.filters.summary().is_empty() {
        info.push(Span::styled(
            format!("  {}", page.filters.summary()),
            palette.summary,
        ));
    }
    if page.filters.saved_confirmation(now) {
        info.push(Span::styled("  Saved!", palette.confirmation));
    }

    let border = if searching {
        palette.panel_border_focused
    } else {
        palette.panel_border
    };
    let paragraph = Paragraph::new(vec![Line::from(controls), Line::from(info)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" Filters "),
    );
    f.render_widget(paragraph, area);
}

fn render_grid(f: &mut Frame, palette: &ColorPalette, page: &TrailsPage, area: Rect, locked: bool) {
    let border = if page.focus == TrailsFocus::Grid && !locked {
        palette.panel_border_focused
    } else {
        palette.panel_border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" Trails ");

    if !page.catalog.is_loaded() {
        f.render_widget(Paragraph::new("Loading trails...").block(block), area);
        return;
    }

    let cards = match page.catalog.cards() {
        CatalogView::Cards(cards) => cards,
        CatalogView::NoResults => {
            let lines = vec![
                Line::from(Span::styled("No trails match your filters.", palette.no_results)),
                Line::from(Span::styled("Press r to reset filters.", palette.filter_label)),
            ];
            f.render_widget(Paragraph::new(lines).block(block), area);
            return;
        }
    };

    let items: Vec<ListItem> = cards.iter().map(|card| card_item(palette, card)).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(palette.card_selected)
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(page.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn card_item<'a>(palette: &ColorPalette, card: &'a TrailCard) -> ListItem<'a> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(card.name.as_str(), palette.card_title),
            Span::raw("  "),
            Span::styled(card.difficulty.as_str(), palette.difficulty_label(&card.difficulty)),
        ]),
        Line::from(Span::styled(
            meta_line(card),
            palette.card_meta,
        )),
    ];
    if !card.snippet.is_empty() {
        lines.push(Line::from(Span::styled(card.snippet.as_str(), palette.card_snippet)));
    }
    if !card.features.is_empty() {
        lines.push(Line::from(
            card.features
                .iter()
                .map(|f| Span::styled(format!("[{}] ", f), palette.feature_tag))
                .collect::<Vec<_>>(),
        ));
    }
    lines.push(Line::from(""));
    ListItem::new(lines)
}

/// `"8.5 km · Kigali · 3 hours"`, skipping empty parts.
fn meta_line(card: &TrailCard) -> String {
    [card.length.as_str(), card.location.as_str(), card.duration.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" · ")
}
