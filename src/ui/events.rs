//! Background task event processing.

use crate::app::{App, AppEvent};

/// Apply a result delivered by a background task.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::TrailsLoaded(outcome) => {
            tracing::debug!(
                count = outcome.trails.len(),
                fallback = outcome.origin.is_fallback(),
                "Trail load finished"
            );
            app.on_trails_loaded(outcome);
        }
    }
}
