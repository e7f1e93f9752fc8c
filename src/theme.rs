//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes.

use ratatui::style::{Color, Modifier, Style};

use crate::trails::Difficulty;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Trail cards --
    pub card_title: Style,
    pub card_selected: Style,
    pub card_meta: Style,
    pub card_snippet: Style,
    pub feature_tag: Style,
    pub difficulty_easy: Style,
    pub difficulty_moderate: Style,
    pub difficulty_hard: Style,
    pub difficulty_unknown: Style,
    pub no_results: Style,

    // -- Filter bar --
    pub filter_label: Style,
    pub filter_value: Style,
    pub search_focused: Style,
    pub summary: Style,
    pub confirmation: Style,

    // -- Detail modal --
    pub modal_border: Style,
    pub modal_title: Style,
    pub modal_label: Style,
    pub button: Style,
    pub button_focused: Style,
    pub button_disabled: Style,

    // -- Chrome --
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub status_bar: Style,
    pub status_warning: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            card_title: Style::default().add_modifier(Modifier::BOLD),
            card_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            card_meta: Style::default().fg(Color::Gray),
            card_snippet: Style::default(),
            feature_tag: Style::default().fg(Color::Cyan),
            difficulty_easy: Style::default().fg(Color::Green),
            difficulty_moderate: Style::default().fg(Color::Yellow),
            difficulty_hard: Style::default().fg(Color::Red),
            difficulty_unknown: Style::default().fg(Color::DarkGray),
            no_results: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),

            filter_label: Style::default().fg(Color::DarkGray),
            filter_value: Style::default().fg(Color::White),
            search_focused: Style::default().fg(Color::Yellow),
            summary: Style::default().fg(Color::Cyan),
            confirmation: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),

            modal_border: Style::default().fg(Color::Cyan),
            modal_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            modal_label: Style::default().fg(Color::DarkGray),
            button: Style::default().fg(Color::White),
            button_focused: Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            button_disabled: Style::default().fg(Color::Green),

            tab_active: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            status_warning: Style::default().bg(Color::DarkGray).fg(Color::Yellow),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
        }
    }

    /// Adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            card_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_selected: Style::default().bg(Color::Blue).fg(Color::White),
            card_meta: Style::default().fg(Color::DarkGray),
            card_snippet: Style::default().fg(Color::Black),
            feature_tag: Style::default().fg(Color::Blue),
            difficulty_easy: Style::default().fg(Color::Green),
            difficulty_moderate: Style::default().fg(Color::Magenta),
            difficulty_hard: Style::default().fg(Color::Red),
            difficulty_unknown: Style::default().fg(Color::DarkGray),
            no_results: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            filter_label: Style::default().fg(Color::DarkGray),
            filter_value: Style::default().fg(Color::Black),
            search_focused: Style::default().fg(Color::Magenta),
            summary: Style::default().fg(Color::Blue),
            confirmation: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),

            modal_border: Style::default().fg(Color::Blue),
            modal_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            modal_label: Style::default().fg(Color::DarkGray),
            button: Style::default().fg(Color::Black),
            button_focused: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            button_disabled: Style::default().fg(Color::Green),

            tab_active: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            status_warning: Style::default().bg(Color::White).fg(Color::Red),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }

    /// Colour for a difficulty badge.
    pub fn difficulty(&self, difficulty: Option<Difficulty>) -> Style {
        match difficulty {
            Some(Difficulty::Easy) => self.difficulty_easy,
            Some(Difficulty::Moderate) => self.difficulty_moderate,
            Some(Difficulty::Hard) => self.difficulty_hard,
            None => self.difficulty_unknown,
        }
    }

    /// Same as [`Self::difficulty`], keyed by the display label.
    pub fn difficulty_label(&self, label: &str) -> Style {
        self.difficulty(label.parse().ok())
    }
}

// ============================================================================
// Tests
// ============================================================================
