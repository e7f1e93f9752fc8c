//! Page routing: which screen is showing, and the components each one needs.
//!
//! Pages are built lazily. Only the start page is constructed at launch;
//! the others are built the first time the user switches to them.
use std::fmt;

use serde::Deserialize;

use crate::checklist::Checklist;
use crate::config::Timings;
use crate::filter::FilterEngine;
use crate::preferences::PreferenceStore;
use crate::trails::{featured_trail, DataLocation, FavoriteEntry, Trail, TrailCatalog, TrailSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Home,
    Trails,
    Favorites,
    Checklist,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Trails, Page::Favorites, Page::Checklist];

    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Trails => "Trails",
            Self::Favorites => "Favorites",
            Self::Checklist => "Checklist",
        }
    }

    /// Number key that switches to this page.
    pub fn hotkey(self) -> char {
        match self {
            Self::Home => '1',
            Self::Trails => '2',
            Self::Favorites => '3',
            Self::Checklist => '4',
        }
    }

    pub fn from_hotkey(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.hotkey() == c)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Home => "home",
            Self::Trails => "trails",
            Self::Favorites => "favorites",
            Self::Checklist => "checklist",
        })
    }
}

// ============================================================================
// Page Components
// ============================================================================

/// Shared inputs for building pages.
pub struct PageContext<'a> {
    pub client: &'a reqwest::Client,
    pub data: &'a DataLocation,
    pub timings: Timings,
    pub prefs: &'a PreferenceStore,
}

pub struct HomePage {
    pub featured: Trail,
}

/// Which control on the trails page receives typed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailsFocus {
    Grid,
    Search,
}

pub struct TrailsPage {
    pub source: TrailSource,
    pub catalog: TrailCatalog,
    pub filters: FilterEngine,
    /// Index into the displayed trails.
    pub selected: usize,
    pub focus: TrailsFocus,
}

impl TrailsPage {
    /// Id of the highlighted card, if any.
    pub fn selected_id(&self) -> Option<u32> {
        self.catalog.displayed().get(self.selected).map(|t| t.id)
    }

    /// Keep the selection inside the displayed list after it changes.
    pub fn clamp_selection(&mut self) {
        let len = self.catalog.displayed().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

pub struct FavoritesPage {
    pub entries: Vec<FavoriteEntry>,
    pub selected: usize,
    /// Clear was pressed once and awaits confirmation.
    pub confirm_clear: bool,
}

impl FavoritesPage {
    /// Re-read the list; favorites can change while the page is hidden.
    pub fn refresh(&mut self, prefs: &PreferenceStore) {
        self.entries = prefs.favorites();
        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
    }
}

pub struct ChecklistPage {
    pub checklist: Checklist,
    /// Index into the items, across groups.
    pub selected: usize,
}

impl ChecklistPage {
    pub fn toggle_selected(&mut self) -> bool {
        self.checklist.toggle(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.checklist.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

/// The components built so far, at most one set per page.
#[derive(Default)]
pub struct PageComponents {
    pub home: Option<HomePage>,
    pub trails: Option<TrailsPage>,
    pub favorites: Option<FavoritesPage>,
    pub checklist: Option<ChecklistPage>,
}

impl PageComponents {
    pub fn is_built(&self, page: Page) -> bool {
        match page {
            Page::Home => self.home.is_some(),
            Page::Trails => self.trails.is_some(),
            Page::Favorites => self.favorites.is_some(),
            Page::Checklist => self.checklist.is_some(),
        }
    }

    /// Build `page` if it has not been built. Returns true when it was just
    /// built; for the trails page the caller then starts the data load.
    pub fn ensure(&mut self, page: Page, ctx: &PageContext<'_>) -> bool {
        if self.is_built(page) {
            return false;
        }

        tracing::debug!(page = %page, "Building page components");
        match page {
            Page::Home => {
                self.home = Some(HomePage {
                    featured: featured_trail(),
                });
            }
            Page::Trails => {
                self.trails = Some(TrailsPage {
                    source: TrailSource::new(
                        ctx.client.clone(),
                        ctx.data.clone(),
                        ctx.timings.request_timeout,
                    ),
                    catalog: TrailCatalog::new(),
                    filters: FilterEngine::new(
                        ctx.timings.search_debounce,
                        ctx.timings.confirmation,
                    ),
                    selected: 0,
                    focus: TrailsFocus::Grid,
                });
            }
            Page::Favorites => {
                self.favorites = Some(FavoritesPage {
                    entries: ctx.prefs.favorites(),
                    selected: 0,
                    confirm_clear: false,
                });
            }
            Page::Checklist => {
                let mut checklist = Checklist::default();
                if let Some(saved) = ctx.prefs.checklist() {
                    checklist.apply_saved(&saved);
                }
                tracing::debug!(progress = %checklist.progress(), "Checklist restored");
                self.checklist = Some(ChecklistPage {
                    checklist,
                    selected: 0,
                });
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    async fn test_prefs() -> PreferenceStore {
        PreferenceStore::load(Database::open(":memory:").await.unwrap())
            .await
            .unwrap()
    }

    #[test]
    fn test_hotkeys_round_trip() {
        for page in Page::ALL {
            assert_eq!(Page::from_hotkey(page.hotkey()), Some(page));
        }
        assert_eq!(Page::from_hotkey('9'), None);
    }

    #[tokio::test]
    async fn test_build_only_requested_page() {
        let prefs = test_prefs().await;
        let client = reqwest::Client::new();
        let data = DataLocation::default();
        let ctx = PageContext {
            client: &client,
            data: &data,
            timings: Timings::default(),
            prefs: &prefs,
        };

        let mut components = PageComponents::default();
        assert!(components.ensure(Page::Home, &ctx));
        assert!(components.is_built(Page::Home));
        assert!(!components.is_built(Page::Trails));
        assert!(!components.is_built(Page::Favorites));
        assert!(!components.is_built(Page::Checklist));

        let featured = &components.home.as_ref().unwrap().featured;
        assert_eq!(featured.trailhead.as_deref(), Some("Kigali Golf Club entrance"));
    }

    #[tokio::test]
    async fn test_ensure_builds_once() {
        let prefs = test_prefs().await;
        let client = reqwest::Client::new();
        let data = DataLocation::default();
        let ctx = PageContext {
            client: &client,
            data: &data,
            timings: Timings::default(),
            prefs: &prefs,
        };

        let mut components = PageComponents::default();
        components.ensure(Page::Favorites, &ctx);
        assert!(components.ensure(Page::Trails, &ctx));
        assert!(!components.ensure(Page::Trails, &ctx));

        let trails = components.trails.as_ref().unwrap();
        assert!(!trails.catalog.is_loaded());
        assert_eq!(trails.selected_id(), None);
    }

    #[tokio::test]
    async fn test_checklist_page_restores_saved_state() {
        let mut prefs = test_prefs().await;
        let mut saved = Checklist::default();
        saved.toggle(1);
        saved.toggle(3);
        prefs.save_checklist(&saved.to_saved()).await.unwrap();

        let client = reqwest::Client::new();
        let data = DataLocation::default();
        let ctx = PageContext {
            client: &client,
            data: &data,
            timings: Timings::default(),
            prefs: &prefs,
        };

        let mut components = PageComponents::default();
        assert!(components.ensure(Page::Checklist, &ctx));
        let page = components.checklist.as_mut().unwrap();
        assert_eq!(page.checklist, saved);
        assert_eq!(page.checklist.progress().checked, 2);

        page.select_prev();
        assert_eq!(page.selected, 0);
        for _ in 0..100 {
            page.select_next();
        }
        assert_eq!(page.selected, page.checklist.len() - 1);
        assert!(page.toggle_selected());
    }
}
