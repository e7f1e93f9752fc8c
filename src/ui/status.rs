use crate::app::App;
use crate::page::{Page, TrailsFocus};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let (text, style): (Cow<'_, str>, _) = if let Some((msg, _)) = &app.status_message {
        (Cow::Borrowed(&**msg), app.palette.status_warning)
    } else {
        (Cow::Borrowed(hints(app)), app.palette.status_bar)
    };

    f.render_widget(Paragraph::new(text).style(style), area);
}

/// Static key hints for the current context.
fn hints(app: &App) -> &'static str {
    if app.modal.is_open() {
        return "[Tab]next control [Enter]activate [j/k]scroll [Esc]close";
    }
    match app.page {
        Page::Home => "[Enter]view featured trail [1-4]pages [t]heme [?]help [q]uit",
        Page::Trails => match app.pages.trails.as_ref().map(|p| p.focus) {
            Some(TrailsFocus::Search) => "Type to search | ESC/ENTER done",
            _ => "[j/k]move [Enter]details [d/l/m]filters [/]search [s]ave [r]eset [?]help [q]uit",
        },
        Page::Favorites => "[j/k]move [c]lear all [1-4]pages [?]help [q]uit",
        Page::Checklist => "[j/k]move [Space]check [s]ave [r]eset [1-4]pages [?]help [q]uit",
    }
}
