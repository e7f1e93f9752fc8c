//! Trail filtering: the filter state, its predicates, and the engine that
//! ties it to the catalog and the preference store.
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;

use crate::preferences::{PreferenceStore, StoreError};
use crate::schedule::{Debouncer, Transient};
use crate::trails::{format_number, Difficulty, Trail, TrailCatalog};
use crate::util::MAX_SEARCH_QUERY_LENGTH;

/// Ceilings offered by the length control, in km.
pub const LENGTH_OPTIONS: [u32; 4] = [5, 10, 15, 20];

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_CONFIRMATION: Duration = Duration::from_millis(2000);

const ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

// ============================================================================
// FilterState
// ============================================================================

/// The user's current constraints. `None` and the empty search term mean "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub difficulty: Option<Difficulty>,
    /// Lowercase.
    pub location: Option<String>,
    pub max_length: Option<u32>,
    /// Lowercase.
    pub search_term: String,
}

impl FilterState {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// True when `trail` satisfies every active constraint.
    pub fn matches(&self, trail: &Trail) -> bool {
        if let Some(difficulty) = self.difficulty {
            if trail.difficulty != Some(difficulty) {
                return false;
            }
        }

        if let Some(location) = &self.location {
            if trail.location.trim().to_lowercase() != *location {
                return false;
            }
        }

        if let Some(max) = self.max_length {
            match trail.length {
                Some(length) if length <= f64::from(max) => {}
                _ => return false,
            }
        }

        if !self.search_term.is_empty() {
            let term = self.search_term.as_str();
            if !trail.name.to_lowercase().contains(term)
                && !trail.description_text().to_lowercase().contains(term)
            {
                return false;
            }
        }

        true
    }

    /// The persisted part of the state. The search term is never saved.
    pub fn saved(&self) -> SavedFilters {
        SavedFilters {
            difficulty: self.difficulty,
            location: self.location.clone(),
            max_length: self.max_length,
        }
    }

    pub fn restore(&mut self, saved: &SavedFilters) {
        self.difficulty = saved.difficulty;
        self.location = saved.location.as_ref().map(|l| l.to_lowercase());
        self.max_length = saved.max_length;
    }

    /// `"Active filters: Difficulty: hard, Search: \"lake\""`, or empty when
    /// nothing is active.
    pub fn summary(&self) -> String {
        let mut labels = Vec::new();
        if let Some(difficulty) = self.difficulty {
            labels.push(format!("Difficulty: {difficulty}"));
        }
        if let Some(location) = &self.location {
            labels.push(format!("Location: {location}"));
        }
        if let Some(max) = self.max_length {
            labels.push(format!("Max length: {max}km"));
        }
        if !self.search_term.is_empty() {
            labels.push(format!("Search: \"{}\"", self.search_term));
        }

        if labels.is_empty() {
            String::new()
        } else {
            format!("Active filters: {}", labels.join(", "))
        }
    }
}

/// Trails from `all` that satisfy `state`, in their original order.
pub fn matching(all: &[Trail], state: &FilterState) -> Vec<Trail> {
    all.iter().filter(|t| state.matches(t)).cloned().collect()
}

// ============================================================================
// SavedFilters
// ============================================================================

/// On-disk form of the saved filters:
/// `{"difficulty":"hard","location":"all","maxLength":"all"}`.
///
/// Reading is forgiving inside an object: a missing key or an unrecognised
/// value means "all", and `maxLength` may be a number or a numeric string.
/// Anything other than an object is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "RawSavedFilters")]
pub struct SavedFilters {
    pub difficulty: Option<Difficulty>,
    pub location: Option<String>,
    pub max_length: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RawSavedFilters {
    difficulty: Value,
    location: Value,
    max_length: Value,
}

impl TryFrom<Value> for SavedFilters {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => return Err(format!("saved filters must be an object, got {other}")),
        };
        let raw = RawSavedFilters {
            difficulty: fields.remove("difficulty").unwrap_or_default(),
            location: fields.remove("location").unwrap_or_default(),
            max_length: fields.remove("maxLength").unwrap_or_default(),
        };
        Ok(raw.into())
    }
}

impl From<RawSavedFilters> for SavedFilters {
    fn from(raw: RawSavedFilters) -> Self {
        let difficulty = match sentinel_or_str(&raw.difficulty, "difficulty") {
            Some(s) => match s.parse() {
                Ok(d) => Some(d),
                Err(_) => {
                    tracing::warn!(value = s, "Unknown saved difficulty, using all");
                    None
                }
            },
            None => None,
        };

        let location = sentinel_or_str(&raw.location, "location")
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let max_length = match &raw.max_length {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
                .and_then(|n| u32::try_from(n).ok()),
            Value::String(s) if s == ALL || s.is_empty() => None,
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        if max_length.is_none() && !is_all(&raw.max_length) {
            tracing::warn!(value = %raw.max_length, "Unknown saved maxLength, using all");
        }

        Self {
            difficulty,
            location,
            max_length,
        }
    }
}

impl From<SavedFilters> for RawSavedFilters {
    fn from(saved: SavedFilters) -> Self {
        Self {
            difficulty: Value::from(saved.difficulty.map(|d| d.as_str()).unwrap_or(ALL)),
            location: Value::from(saved.location.unwrap_or_else(|| ALL.to_string())),
            max_length: Value::from(
                saved
                    .max_length
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| ALL.to_string()),
            ),
        }
    }
}

fn is_all(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s == ALL || s.is_empty(),
        _ => false,
    }
}

/// `None` for the "all" sentinel, the string otherwise. Non-strings are
/// logged and treated as "all".
fn sentinel_or_str<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    if is_all(value) {
        return None;
    }
    match value.as_str() {
        Some(s) => Some(s),
        None => {
            tracing::warn!(field = field, value = %value, "Unexpected saved filter value, using all");
            None
        }
    }
}

// ============================================================================
// FilterEngine
// ============================================================================

/// Owns the filter state and recomputes the catalog's displayed subset.
#[derive(Debug)]
pub struct FilterEngine {
    state: FilterState,
    /// What the search box shows, as typed.
    search_input: String,
    search: Debouncer<String>,
    saved: Transient,
    summary: String,
    count: String,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE, DEFAULT_CONFIRMATION)
    }
}

impl FilterEngine {
    pub fn new(search_debounce: Duration, confirm_duration: Duration) -> Self {
        Self {
            state: FilterState::default(),
            search_input: String::new(),
            search: Debouncer::new(search_debounce),
            saved: Transient::new(confirm_duration),
            summary: String::new(),
            count: String::new(),
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn count_label(&self) -> &str {
        &self.count
    }

    /// Whether the "Saved!" confirmation is showing.
    pub fn saved_confirmation(&self, now: Instant) -> bool {
        self.saved.is_active(now)
    }

    pub fn search_pending(&self) -> bool {
        self.search.is_pending()
    }

    /// Restore saved filters, then apply.
    pub fn initialize(&mut self, prefs: &PreferenceStore, catalog: &mut TrailCatalog) {
        if let Some(saved) = prefs.saved_filters() {
            tracing::debug!(?saved, "Restoring saved filters");
            self.state.restore(&saved);
        }
        self.apply(catalog);
    }

    pub fn apply(&mut self, catalog: &mut TrailCatalog) {
        let filtered = matching(catalog.all(), &self.state);
        let shown = filtered.len();
        catalog.show(filtered);
        self.count = catalog.count_label(Some(shown));
        self.summary = self.state.summary();
        tracing::trace!(shown = shown, total = catalog.all().len(), "Filters applied");
    }

    /// Back to defaults, dropping any search that has not applied yet.
    pub fn reset(&mut self, catalog: &mut TrailCatalog) {
        self.state = FilterState::default();
        self.search_input.clear();
        self.search.cancel();
        self.apply(catalog);
    }

    /// Persist difficulty, location and length ceiling, then show "Saved!".
    ///
    /// On failure the confirmation is not shown and the error is returned
    /// for the status bar.
    pub async fn save_preferences(
        &mut self,
        prefs: &mut PreferenceStore,
        now: Instant,
    ) -> Result<(), StoreError> {
        match prefs.save_filters(&self.state.saved()).await {
            Ok(()) => {
                tracing::info!("Filter preferences saved");
                self.saved.trigger(now);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save filter preferences");
                Err(e)
            }
        }
    }

    // ========================================================================
    // Controls
    // ========================================================================

    pub fn cycle_difficulty(&mut self, direction: Direction, catalog: &mut TrailCatalog) {
        self.state.difficulty = cycle(&self.state.difficulty, &Difficulty::ALL, direction);
        self.apply(catalog);
    }

    /// Step through the catalog's locations.
    pub fn cycle_location(&mut self, direction: Direction, catalog: &mut TrailCatalog) {
        let options = catalog.location_options();
        self.state.location = cycle(&self.state.location, &options, direction);
        self.apply(catalog);
    }

    pub fn cycle_max_length(&mut self, direction: Direction, catalog: &mut TrailCatalog) {
        self.state.max_length = cycle(&self.state.max_length, &LENGTH_OPTIONS, direction);
        self.apply(catalog);
    }

    /// Replace the search box text and schedule a debounced apply.
    pub fn input_search(&mut self, text: &str, now: Instant) {
        self.search_input = text.chars().take(MAX_SEARCH_QUERY_LENGTH).collect();
        self.search.schedule(self.search_input.to_lowercase(), now);
    }

    pub fn push_search_char(&mut self, c: char, now: Instant) {
        if self.search_input.chars().count() >= MAX_SEARCH_QUERY_LENGTH {
            return;
        }
        let mut text = std::mem::take(&mut self.search_input);
        text.push(c);
        self.input_search(&text, now);
    }

    pub fn pop_search_char(&mut self, now: Instant) {
        let mut text = std::mem::take(&mut self.search_input);
        text.pop();
        self.input_search(&text, now);
    }

    /// Run a due search and lapse an expired confirmation. Returns true if
    /// anything visible changed.
    pub fn tick(&mut self, now: Instant, catalog: &mut TrailCatalog) -> bool {
        let mut changed = self.saved.expire(now);
        if let Some(term) = self.search.poll(now) {
            self.state.search_term = term;
            self.apply(catalog);
            changed = true;
        }
        changed
    }
}

/// Step through `[None, options...]`. A current value not in `options`
/// steps as if it were "all".
fn cycle<T: PartialEq + Clone>(current: &Option<T>, options: &[T], direction: Direction) -> Option<T> {
    let slots = options.len() + 1;
    let index = match current {
        None => 0,
        Some(value) => options.iter().position(|o| o == value).map_or(0, |i| i + 1),
    };
    let next = match direction {
        Direction::Next => (index + 1) % slots,
        Direction::Prev => (index + slots - 1) % slots,
    };
    if next == 0 {
        None
    } else {
        options.get(next - 1).cloned()
    }
}

/// Label for a length ceiling, as the control shows it.
pub fn max_length_label(max: Option<u32>) -> String {
    match max {
        Some(km) => format!("≤ {} km", format_number(f64::from(km))),
        None => "Any length".to_string(),
    }
}
