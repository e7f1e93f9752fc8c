use crate::app::App;
use crate::trails::format_number;
use crate::util::single_line;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the home page: a short welcome and the featured trail.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let palette = &app.palette;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.panel_border)
        .title(" Featured Trail ");

    let Some(home) = &app.pages.home else {
        f.render_widget(Paragraph::new("").block(block), area);
        return;
    };
    let trail = &home.featured;

    let mut meta = vec![Span::styled(
        trail.difficulty.map(|d| d.as_str()).unwrap_or("unknown"),
        palette.difficulty(trail.difficulty),
    )];
    if let Some(length) = trail.length {
        meta.push(Span::styled(
            format!("  {} km", format_number(length)),
            palette.card_meta,
        ));
    }
    meta.push(Span::styled(
        format!("  {}", single_line(&trail.location)),
        palette.card_meta,
    ));

    let mut lines = vec![
        Line::from("Explore hiking trails, filter by difficulty, and keep the ones you love."),
        Line::from(""),
        Line::from(Span::styled(single_line(&trail.name), palette.card_title)),
        Line::from(meta),
        Line::from(""),
        Line::from(Span::styled(
            single_line(trail.description_text()),
            palette.card_snippet,
        )),
        Line::from(""),
    ];
    if !trail.features.is_empty() {
        let tags: Vec<Span> = trail
            .features
            .iter()
            .map(|f| Span::styled(format!("[{}] ", single_line(f)), palette.feature_tag))
            .collect();
        lines.push(Line::from(tags));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Press Enter to view details, 2 to browse all trails",
        palette.filter_label,
    )));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
