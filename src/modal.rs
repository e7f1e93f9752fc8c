//! Trail detail overlay.
//!
//! Lifecycle: `Closed` → `open` → `Open` → `close` → `Closing` → (after the
//! close delay) → `Closed`. Only one modal exists; opening while one is up
//! replaces it at once.
use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;

use crate::preferences::{PreferenceStore, StoreError};
use crate::schedule::Transient;
use crate::trails::{format_number, Trail};
use crate::util::{single_line, strip_control_chars};

pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(300);
pub const DEFAULT_IMAGE: &str = "images/default-trail.jpg";

const NOT_SPECIFIED: &str = "Not specified";

// ============================================================================
// TrailDetail
// ============================================================================

/// Display strings for the detail view, with fallbacks filled in and all
/// text sanitised for the terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailDetail {
    pub id: u32,
    pub name: String,
    pub difficulty: String,
    pub length: String,
    pub location: String,
    pub duration: String,
    pub elevation: String,
    pub best_season: String,
    pub permit_required: String,
    pub description: String,
    pub image: String,
    pub features: Vec<String>,
    pub access: String,
    pub trailhead: String,
    pub water_sources: String,
    pub wildlife: String,
}

impl TrailDetail {
    pub fn from_trail(trail: &Trail) -> Self {
        Self {
            id: trail.id,
            name: line_or(Some(&trail.name), "Unknown Trail"),
            difficulty: trail
                .difficulty
                .map(|d| d.as_str().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            length: trail
                .length
                .map(|km| format!("{} km", format_number(km)))
                .unwrap_or_else(|| "N/A".to_string()),
            location: line_or(Some(&trail.location), "Unknown"),
            duration: line_or(trail.duration.as_ref(), "Unknown"),
            elevation: trail
                .elevation
                .map(|m| format!("{} m", format_number(m)))
                .unwrap_or_else(|| "N/A".to_string()),
            best_season: line_or(trail.best_season.as_ref(), "Year-round"),
            permit_required: if trail.permit_required { "Yes" } else { "No" }.to_string(),
            description: text_or(trail.description.as_ref(), "No description available."),
            image: line_or(trail.image.as_ref(), DEFAULT_IMAGE),
            features: trail
                .features
                .iter()
                .map(|f| single_line(f))
                .filter(|f| !f.is_empty())
                .collect(),
            access: line_or(trail.access.as_ref(), NOT_SPECIFIED),
            trailhead: line_or(trail.trailhead.as_ref(), NOT_SPECIFIED),
            water_sources: line_or(trail.water_sources.as_ref(), NOT_SPECIFIED),
            wildlife: line_or(trail.wildlife.as_ref(), NOT_SPECIFIED),
        }
    }
}

/// Sanitised single-line text, or `fallback` when absent or blank.
fn line_or(value: Option<&String>, fallback: &str) -> String {
    value
        .map(|v| single_line(v))
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Like [`line_or`] but keeps line breaks.
fn text_or(value: Option<&String>, fallback: &str) -> String {
    value
        .map(|v| strip_control_chars(v.trim()).into_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

// ============================================================================
// Focus
// ============================================================================

/// Focusable controls, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalFocus {
    CloseIcon,
    SaveFavorite,
    CloseButton,
}

impl ModalFocus {
    pub const ORDER: [ModalFocus; 3] = [Self::CloseIcon, Self::SaveFavorite, Self::CloseButton];

    fn index(self) -> usize {
        match self {
            Self::CloseIcon => 0,
            Self::SaveFavorite => 1,
            Self::CloseButton => 2,
        }
    }

    /// Tab: forward, last wraps to first.
    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    /// Shift+Tab: back, first wraps to last.
    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

// ============================================================================
// DetailModal
// ============================================================================

#[derive(Debug)]
pub enum ModalState {
    Closed,
    Open {
        trail: Box<Trail>,
        detail: Box<TrailDetail>,
        focus: ModalFocus,
        saved: Transient,
        scroll: u16,
    },
    Closing {
        until: Instant,
    },
}

/// Result of a favorites save from the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Added,
    AlreadySaved,
    /// No modal was open; nothing happened.
    NotOpen,
}

/// What the caller must do after [`DetailModal::activate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalCommand {
    None,
    SaveFavorite,
}

#[derive(Debug)]
pub struct DetailModal {
    state: ModalState,
    close_delay: Duration,
    confirm_duration: Duration,
}

impl Default for DetailModal {
    fn default() -> Self {
        Self::new(DEFAULT_CLOSE_DELAY, crate::filter::DEFAULT_CONFIRMATION)
    }
}

impl DetailModal {
    pub fn new(close_delay: Duration, confirm_duration: Duration) -> Self {
        Self {
            state: ModalState::Closed,
            close_delay,
            confirm_duration,
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open { .. })
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, ModalState::Closed)
    }

    /// Whether the page behind should ignore scroll input. Released as soon
    /// as closing starts.
    pub fn scroll_locked(&self) -> bool {
        self.is_open()
    }

    /// Detail of the open modal.
    pub fn detail(&self) -> Option<&TrailDetail> {
        match &self.state {
            ModalState::Open { detail, .. } => Some(&**detail),
            _ => None,
        }
    }

    pub fn focus(&self) -> Option<ModalFocus> {
        match &self.state {
            ModalState::Open { focus, .. } => Some(*focus),
            _ => None,
        }
    }

    pub fn scroll(&self) -> u16 {
        match &self.state {
            ModalState::Open { scroll, .. } => *scroll,
            _ => 0,
        }
    }

    /// Whether the save control shows "Saved!" and is disabled.
    pub fn save_confirmed(&self, now: Instant) -> bool {
        match &self.state {
            ModalState::Open { saved, .. } => saved.is_active(now),
            _ => false,
        }
    }

    /// Show `trail`. Any current modal is dropped straight to `Closed` first.
    pub fn open(&mut self, trail: &Trail) {
        if !self.is_closed() {
            tracing::debug!("Replacing open trail modal");
            self.state = ModalState::Closed;
        }

        let detail = TrailDetail::from_trail(trail);
        tracing::debug!(id = trail.id, name = %detail.name, "Trail modal opened");
        self.state = ModalState::Open {
            trail: Box::new(trail.clone()),
            detail: Box::new(detail),
            focus: ModalFocus::CloseIcon,
            saved: Transient::new(self.confirm_duration),
            scroll: 0,
        };
    }

    /// Hide the modal and start the close delay. No-op unless open.
    pub fn close(&mut self, now: Instant) {
        let state = std::mem::replace(&mut self.state, ModalState::Closed);
        self.state = match state {
            ModalState::Open { .. } => ModalState::Closing {
                until: now + self.close_delay,
            },
            other => other,
        };
    }

    /// Advance timers. Returns true if anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let ModalState::Closing { until } = &self.state {
            if now >= *until {
                self.state = ModalState::Closed;
                return true;
            }
            return false;
        }
        match &mut self.state {
            ModalState::Open { saved, .. } => saved.expire(now),
            _ => false,
        }
    }

    pub fn focus_next(&mut self) {
        if let ModalState::Open { focus, .. } = &mut self.state {
            *focus = focus.next();
        }
    }

    pub fn focus_prev(&mut self) {
        if let ModalState::Open { focus, .. } = &mut self.state {
            *focus = focus.prev();
        }
    }

    pub fn scroll_by(&mut self, delta: i32) {
        if let ModalState::Open { scroll, .. } = &mut self.state {
            let next = i32::from(*scroll).saturating_add(delta).clamp(0, i32::from(u16::MAX));
            *scroll = u16::try_from(next).unwrap_or(0);
        }
    }

    /// Enter on the focused control. Close controls close immediately; the
    /// save control asks the caller to run [`Self::save_favorite`] unless it
    /// is still showing its confirmation.
    pub fn activate(&mut self, now: Instant) -> ModalCommand {
        match self.focus() {
            Some(ModalFocus::CloseIcon) | Some(ModalFocus::CloseButton) => {
                self.close(now);
                ModalCommand::None
            }
            Some(ModalFocus::SaveFavorite) if !self.save_confirmed(now) => {
                ModalCommand::SaveFavorite
            }
            _ => ModalCommand::None,
        }
    }

    /// Add the shown trail to favorites and show the confirmation.
    ///
    /// The confirmation shows whether or not the trail was already saved.
    pub async fn save_favorite(
        &mut self,
        prefs: &mut PreferenceStore,
        now: Instant,
    ) -> Result<SaveOutcome, StoreError> {
        let ModalState::Open { trail, saved, .. } = &mut self.state else {
            return Ok(SaveOutcome::NotOpen);
        };

        let added = prefs.add_favorite(trail, Utc::now()).await?;
        saved.trigger(now);
        Ok(if added {
            SaveOutcome::Added
        } else {
            SaveOutcome::AlreadySaved
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use crate::trails::{fallback_trails, Difficulty};
    use pretty_assertions::assert_eq;

    fn modal() -> DetailModal {
        DetailModal::default()
    }

    async fn test_store() -> PreferenceStore {
        PreferenceStore::load(Database::open(":memory:").await.unwrap())
            .await
            .unwrap()
    }

    #[test]
    fn test_partial_trail_uses_fallbacks() {
        let trail = Trail {
            id: 12,
            ..Trail::default()
        };
        let detail = TrailDetail::from_trail(&trail);

        assert_eq!(detail.name, "Unknown Trail");
        assert_eq!(detail.difficulty, "unknown");
        assert_eq!(detail.length, "N/A");
        assert_eq!(detail.location, "Unknown");
        assert_eq!(detail.duration, "Unknown");
        assert_eq!(detail.elevation, "N/A");
        assert_eq!(detail.best_season, "Year-round");
        assert_eq!(detail.permit_required, "No");
        assert_eq!(detail.description, "No description available.");
        assert_eq!(detail.image, "images/default-trail.jpg");
        assert!(detail.features.is_empty());
        assert_eq!(detail.access, "Not specified");
        assert_eq!(detail.trailhead, "Not specified");
        assert_eq!(detail.water_sources, "Not specified");
        assert_eq!(detail.wildlife, "Not specified");
    }

    #[test]
    fn test_blank_strings_use_fallbacks() {
        let trail = Trail {
            id: 1,
            name: "   ".into(),
            duration: Some(String::new()),
            ..Trail::default()
        };
        let detail = TrailDetail::from_trail(&trail);
        assert_eq!(detail.name, "Unknown Trail");
        assert_eq!(detail.duration, "Unknown");
    }

    #[test]
    fn test_full_trail_detail() {
        let trail = Trail {
            permit_required: true,
            ..fallback_trails().remove(0)
        };
        let detail = TrailDetail::from_trail(&trail);
        assert_eq!(detail.name, "Mount Kigali Summit Trail");
        assert_eq!(detail.difficulty, Difficulty::Moderate.as_str());
        assert_eq!(detail.length, "8.5 km");
        assert_eq!(detail.elevation, "350 m");
        assert_eq!(detail.permit_required, "Yes");
        assert_eq!(detail.best_season, "Dry season");
    }

    #[test]
    fn test_control_sequences_are_stripped() {
        let trail = Trail {
            id: 1,
            name: "Bad\x1b]0;owned\x07 Name".into(),
            description: Some("Line one\n\x1b[2JLine two".into()),
            wildlife: Some("\x1b[31mLeopards".into()),
            ..Trail::default()
        };
        let detail = TrailDetail::from_trail(&trail);
        assert_eq!(detail.name, "Bad Name");
        assert_eq!(detail.description, "Line one\nLine two");
        assert_eq!(detail.wildlife, "Leopards");
    }

    #[test]
    fn test_open_focuses_close_icon_and_locks_scroll() {
        let mut modal = modal();
        modal.open(&fallback_trails()[0]);

        assert!(modal.is_open());
        assert!(modal.scroll_locked());
        assert_eq!(modal.focus(), Some(ModalFocus::CloseIcon));
    }

    #[test]
    fn test_focus_trap_wraps() {
        let mut modal = modal();
        modal.open(&fallback_trails()[0]);

        modal.focus_next();
        assert_eq!(modal.focus(), Some(ModalFocus::SaveFavorite));
        modal.focus_next();
        assert_eq!(modal.focus(), Some(ModalFocus::CloseButton));
        modal.focus_next();
        assert_eq!(modal.focus(), Some(ModalFocus::CloseIcon));
        modal.focus_prev();
        assert_eq!(modal.focus(), Some(ModalFocus::CloseButton));
    }

    #[test]
    fn test_close_then_tick_to_closed() {
        let mut modal = modal();
        let start = Instant::now();
        modal.open(&fallback_trails()[0]);
        modal.close(start);

        assert!(matches!(modal.state(), ModalState::Closing { .. }));
        assert!(!modal.scroll_locked());
        assert!(modal.detail().is_none());

        assert!(!modal.tick(start + Duration::from_millis(299)));
        assert!(modal.tick(start + Duration::from_millis(300)));
        assert!(modal.is_closed());
    }

    #[test]
    fn test_close_when_not_open_is_noop() {
        let mut modal = modal();
        modal.close(Instant::now());
        assert!(modal.is_closed());
        assert!(!modal.tick(Instant::now()));
    }

    #[test]
    fn test_open_replaces_existing() {
        let mut modal = modal();
        let first = fallback_trails().remove(0);
        let second = Trail {
            id: 2,
            name: "Huye Ridge".into(),
            ..Trail::default()
        };

        modal.open(&first);
        modal.focus_next();
        modal.open(&second);

        assert_eq!(modal.detail().map(|d| d.id), Some(2));
        assert_eq!(modal.focus(), Some(ModalFocus::CloseIcon));
    }

    #[test]
    fn test_open_during_closing_replaces() {
        let mut modal = modal();
        let now = Instant::now();
        modal.open(&fallback_trails()[0]);
        modal.close(now);
        modal.open(&fallback_trails()[0]);
        assert!(modal.is_open());
    }

    #[test]
    fn test_activate_close_controls() {
        let mut modal = modal();
        let now = Instant::now();
        modal.open(&fallback_trails()[0]);
        modal.focus_prev();
        assert_eq!(modal.focus(), Some(ModalFocus::CloseButton));

        assert_eq!(modal.activate(now), ModalCommand::None);
        assert!(matches!(modal.state(), ModalState::Closing { .. }));
    }

    #[tokio::test]
    async fn test_save_favorite_added_then_already_saved() {
        let mut prefs = test_store().await;
        let mut modal = modal();
        let start = Instant::now();
        modal.open(&fallback_trails()[0]);
        modal.focus_next();

        assert_eq!(modal.activate(start), ModalCommand::SaveFavorite);
        let outcome = modal.save_favorite(&mut prefs, start).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Added);
        assert!(modal.save_confirmed(start));

        // Disabled while confirming.
        assert_eq!(modal.activate(start), ModalCommand::None);

        let later = start + Duration::from_secs(2);
        assert!(modal.tick(later));
        assert!(!modal.save_confirmed(later));

        let outcome = modal.save_favorite(&mut prefs, later).await.unwrap();
        assert_eq!(outcome, SaveOutcome::AlreadySaved);
        assert!(modal.save_confirmed(later));
        assert_eq!(prefs.favorites().len(), 1);
    }

    #[tokio::test]
    async fn test_save_favorite_without_modal() {
        let mut prefs = test_store().await;
        let mut modal = modal();
        let outcome = modal.save_favorite(&mut prefs, Instant::now()).await.unwrap();
        assert_eq!(outcome, SaveOutcome::NotOpen);
        assert!(prefs.favorites().is_empty());
    }

    #[test]
    fn test_scroll_clamps_at_zero() {
        let mut modal = modal();
        modal.open(&fallback_trails()[0]);
        modal.scroll_by(3);
        modal.scroll_by(-10);
        assert_eq!(modal.scroll(), 0);
    }
}
