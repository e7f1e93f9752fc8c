use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Render the progress summary and the grouped items.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let Some(page) = &app.pages.checklist else {
        return;
    };
    let palette = &app.palette;
    let checklist = &page.checklist;
    let progress = checklist.progress();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let summary_style = if progress.checked == progress.total {
        palette.confirmation
    } else {
        palette.summary
    };
    let summary = Paragraph::new(Span::styled(progress.to_string(), summary_style)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.panel_border)
            .title(" Trip Preparation "),
    );
    f.render_widget(summary, chunks[0]);

    // Group headers take a row each, so the highlighted row is offset by the
    // number of headers drawn above the selected item.
    let mut items = Vec::with_capacity(checklist.len() + checklist.groups().len());
    let mut highlighted = None;
    let mut current_group = None;
    for (index, (group, item)) in checklist.items().enumerate() {
        if current_group != Some(group) {
            current_group = Some(group);
            items.push(ListItem::new(Line::from(Span::styled(
                checklist.groups()[group].title,
                palette.filter_label,
            ))));
        }
        if index == page.selected {
            highlighted = Some(items.len());
        }
        let mark = if checklist.is_checked(index) { "[x]" } else { "[ ]" };
        let style = if checklist.is_checked(index) {
            palette.card_meta
        } else {
            palette.card_title
        };
        items.push(ListItem::new(Line::from(Span::styled(
            format!("  {} {}", mark, item.label),
            style,
        ))));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.panel_border)
                .title(" Checklist "),
        )
        .highlight_style(palette.card_selected);

    let mut state = ListState::default();
    state.select(highlighted);
    f.render_stateful_widget(list, chunks[1], &mut state);
}
