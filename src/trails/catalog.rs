use std::sync::Arc;

use crate::util::{single_line, strip_control_chars, truncate_to_width};

use super::model::{format_number, Trail};
use super::source::{LoadOrigin, LoadOutcome, TrailSource};

/// Card descriptions are cut to this many display columns.
pub const SNIPPET_WIDTH: usize = 100;

/// Display data for one trail in the grid. All text is sanitised.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailCard {
    pub id: u32,
    pub name: String,
    pub difficulty: String,
    pub length: String,
    pub location: String,
    pub duration: String,
    pub snippet: String,
    pub features: Vec<String>,
}

impl TrailCard {
    pub fn from_trail(trail: &Trail) -> Self {
        Self {
            id: trail.id,
            name: single_line(&trail.name),
            difficulty: trail
                .difficulty
                .map(|d| d.as_str().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            length: trail
                .length
                .map(|km| format!("{} km", format_number(km)))
                .unwrap_or_else(|| "N/A".to_string()),
            location: single_line(&trail.location),
            duration: trail.duration.as_deref().map(single_line).unwrap_or_default(),
            snippet: truncate_to_width(&single_line(trail.description_text()), SNIPPET_WIDTH)
                .into_owned(),
            features: trail
                .features
                .iter()
                .map(|f| strip_control_chars(f).into_owned())
                .collect(),
        }
    }
}

/// What the trail grid should show.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogView {
    Cards(Vec<TrailCard>),
    NoResults,
}

// ============================================================================
// TrailCatalog
// ============================================================================

/// The loaded trail set and the subset currently on screen.
///
/// Both collections are replaced wholesale, never edited in place.
#[derive(Debug, Clone)]
pub struct TrailCatalog {
    all: Arc<Vec<Trail>>,
    displayed: Arc<Vec<Trail>>,
    origin: Option<LoadOrigin>,
}

impl Default for TrailCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TrailCatalog {
    pub fn new() -> Self {
        Self {
            all: Arc::new(Vec::new()),
            displayed: Arc::new(Vec::new()),
            origin: None,
        }
    }

    /// Load from `source` and show everything.
    pub async fn initialize(&mut self, source: &TrailSource) {
        let outcome = source.load().await;
        self.set_loaded(outcome);
    }

    /// Install a finished load. The UI uses this when the load ran on a
    /// background task.
    pub fn set_loaded(&mut self, outcome: LoadOutcome) {
        let trails = Arc::new(outcome.trails);
        self.all = Arc::clone(&trails);
        self.displayed = trails;
        self.origin = Some(outcome.origin);
    }

    pub fn show(&mut self, trails: Vec<Trail>) {
        self.displayed = Arc::new(trails);
    }

    pub fn all(&self) -> &Arc<Vec<Trail>> {
        &self.all
    }

    pub fn displayed(&self) -> &Arc<Vec<Trail>> {
        &self.displayed
    }

    /// `None` until a load has finished.
    pub fn origin(&self) -> Option<&LoadOrigin> {
        self.origin.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.origin.is_some()
    }

    pub fn cards(&self) -> CatalogView {
        if self.displayed.is_empty() {
            return CatalogView::NoResults;
        }
        CatalogView::Cards(self.displayed.iter().map(TrailCard::from_trail).collect())
    }

    /// `"Showing {n} of {total} trails"`; `None` means everything is shown.
    pub fn count_label(&self, filtered: Option<usize>) -> String {
        let total = self.all.len();
        let shown = filtered.unwrap_or(total);
        format!("Showing {} of {} trails", shown, total)
    }

    /// Look `id` up in the full set, not just the displayed subset.
    pub fn find(&self, id: u32) -> Option<&Trail> {
        self.all.iter().find(|t| t.id == id)
    }

    /// Distinct lowercase locations in first-seen order.
    pub fn location_options(&self) -> Vec<String> {
        let mut options: Vec<String> = Vec::new();
        for trail in self.all.iter() {
            let location = trail.location.trim().to_lowercase();
            if !location.is_empty() && !options.contains(&location) {
                options.push(location);
            }
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trails::{fallback_trails, Difficulty};
    use pretty_assertions::assert_eq;

    fn trail(id: u32, location: &str) -> Trail {
        Trail {
            id,
            name: format!("Trail {id}"),
            location: location.to_string(),
            ..Trail::default()
        }
    }

    fn loaded(trails: Vec<Trail>) -> TrailCatalog {
        let mut catalog = TrailCatalog::new();
        catalog.set_loaded(LoadOutcome {
            trails,
            origin: LoadOrigin::Remote,
        });
        catalog
    }

    #[test]
    fn test_new_catalog_is_empty() {
        let catalog = TrailCatalog::new();
        assert!(!catalog.is_loaded());
        assert_eq!(catalog.cards(), CatalogView::NoResults);
        assert_eq!(catalog.count_label(None), "Showing 0 of 0 trails");
    }

    #[test]
    fn test_set_loaded_shows_everything() {
        let catalog = loaded(vec![trail(1, "Kigali"), trail(2, "Huye")]);
        assert_eq!(catalog.displayed().len(), 2);
        assert!(Arc::ptr_eq(catalog.all(), catalog.displayed()));
        assert_eq!(catalog.count_label(None), "Showing 2 of 2 trails");
    }

    #[test]
    fn test_show_replaces_displayed_only() {
        let mut catalog = loaded(vec![trail(1, "Kigali"), trail(2, "Huye")]);
        catalog.show(vec![trail(2, "Huye")]);

        assert_eq!(catalog.all().len(), 2);
        assert_eq!(catalog.displayed().len(), 1);
        assert_eq!(catalog.count_label(Some(1)), "Showing 1 of 2 trails");
    }

    #[test]
    fn test_show_empty_is_no_results() {
        let mut catalog = loaded(vec![trail(1, "Kigali")]);
        catalog.show(Vec::new());
        assert_eq!(catalog.cards(), CatalogView::NoResults);
    }

    #[test]
    fn test_find_uses_all_trails() {
        let mut catalog = loaded(vec![trail(1, "Kigali"), trail(2, "Huye")]);
        catalog.show(vec![trail(2, "Huye")]);

        assert_eq!(catalog.find(1).map(|t| t.id), Some(1));
        assert!(catalog.find(42).is_none());
    }

    #[test]
    fn test_location_options_distinct_lowercase() {
        let catalog = loaded(vec![
            trail(1, "Kigali"),
            trail(2, "Huye"),
            trail(3, "kigali"),
            trail(4, ""),
            trail(5, "Musanze"),
        ]);
        assert_eq!(catalog.location_options(), vec!["kigali", "huye", "musanze"]);
    }

    #[test]
    fn test_card_fields() {
        let catalog = loaded(fallback_trails());
        let CatalogView::Cards(cards) = catalog.cards() else {
            panic!("expected cards");
        };
        let card = &cards[0];
        assert_eq!(card.name, "Mount Kigali Summit Trail");
        assert_eq!(card.difficulty, "moderate");
        assert_eq!(card.length, "8.5 km");
        assert_eq!(card.duration, "3 hours");
        assert_eq!(card.features.len(), 3);
    }

    #[test]
    fn test_card_sanitises_and_truncates() {
        let long = "word ".repeat(60);
        let record = Trail {
            id: 9,
            name: "Evil\x1b[31m Trail\n".to_string(),
            difficulty: Some(Difficulty::Hard),
            description: Some(long),
            ..Trail::default()
        };
        let card = TrailCard::from_trail(&record);

        assert_eq!(card.name, "Evil Trail");
        assert!(card.snippet.ends_with("..."));
        assert!(crate::util::display_width(&card.snippet) <= SNIPPET_WIDTH);
        assert_eq!(card.length, "N/A");
    }
}
