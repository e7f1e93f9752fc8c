//! Trail detail overlay.

use crate::app::App;
use crate::modal::{ModalFocus, TrailDetail};
use crate::theme::ColorPalette;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tokio::time::Instant;

use super::render::centered_rect;

pub fn render(f: &mut Frame, app: &App, detail: &TrailDetail, now: Instant) {
    let overlay = centered_rect(80, 85, f.area());
    if overlay.width < 20 || overlay.height < 8 {
        return;
    }
    f.render_widget(Clear, overlay);

    let palette = &app.palette;
    let focus = app.modal.focus();

    let close_icon = Span::styled(
        " [x] ",
        control_style(palette, focus == Some(ModalFocus::CloseIcon)),
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.modal_border)
        .title(Span::styled(format!(" {} ", detail.name), palette.modal_title))
        .title_top(Line::from(close_icon).right_aligned());

    let inner = block.inner(overlay);
    f.render_widget(block, overlay);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let body = Paragraph::new(body_lines(palette, detail))
        .wrap(Wrap { trim: false })
        .scroll((app.modal.scroll(), 0));
    f.render_widget(body, chunks[0]);

    let saved = app.modal.save_confirmed(now);
    let save = if saved {
        Span::styled("[ Saved! ]", palette.button_disabled)
    } else {
        Span::styled(
            "[ Save to Favorites ]",
            control_style(palette, focus == Some(ModalFocus::SaveFavorite)),
        )
    };
    let close = Span::styled(
        "[ Close ]",
        control_style(palette, focus == Some(ModalFocus::CloseButton)),
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![save, Span::raw("  "), close])),
        chunks[1],
    );
}

fn control_style(palette: &ColorPalette, focused: bool) -> Style {
    if focused {
        palette.button_focused
    } else {
        palette.button
    }
}

fn body_lines<'a>(palette: &ColorPalette, detail: &'a TrailDetail) -> Vec<Line<'a>> {
    let row = |label: &'static str, value: &'a str| {
        Line::from(vec![
            Span::styled(format!("{:<17}", label), palette.modal_label),
            Span::raw(value),
        ])
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{:<17}", "Difficulty:"), palette.modal_label),
            Span::styled(
                detail.difficulty.as_str(),
                palette.difficulty_label(&detail.difficulty),
            ),
        ]),
        row("Length:", &detail.length),
        row("Location:", &detail.location),
        row("Duration:", &detail.duration),
        row("Elevation:", &detail.elevation),
        row("Best Season:", &detail.best_season),
        row("Permit Required:", &detail.permit_required),
        row("Image:", &detail.image),
        Line::from(""),
        Line::from(Span::styled("Description", palette.modal_title)),
    ];
    lines.extend(detail.description.lines().map(Line::from));

    if !detail.features.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Features", palette.modal_title)));
        lines.push(Line::from(
            detail
                .features
                .iter()
                .map(|f| Span::styled(format!("[{}] ", f), palette.feature_tag))
                .collect::<Vec<_>>(),
        ));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Additional Information",
        palette.modal_title,
    )));
    lines.push(row("Access:", &detail.access));
    lines.push(row("Trailhead:", &detail.trailhead));
    lines.push(row("Water Sources:", &detail.water_sources));
    lines.push(row("Wildlife:", &detail.wildlife));
    lines
}
