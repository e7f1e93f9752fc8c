use crate::config::{Config, Timings};
use crate::modal::{DetailModal, SaveOutcome};
use crate::page::{Page, PageComponents, PageContext};
use crate::preferences::PreferenceStore;
use crate::theme::{ColorPalette, ThemeVariant};
use crate::trails::{DataLocation, LoadOrigin, LoadOutcome};
use anyhow::Result;
use reqwest::redirect::Policy;
use std::borrow::Cow;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// How long a status bar message stays up.
pub const STATUS_DURATION: Duration = Duration::from_secs(3);

/// Create a redirect policy with loop detection and a hop limit.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// HTTP client for the trail data request.
///
/// The per-request timeout is enforced by the trail source as well; the
/// client timeout is a backstop for the connection itself.
pub fn create_http_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .redirect(create_redirect_policy())
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(30))
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

// ============================================================================
// Background Events
// ============================================================================

/// Results delivered to the UI loop from background tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// The trail dataset finished loading (or fell back).
    TrailsLoaded(LoadOutcome),
}

// ============================================================================
// Application State
// ============================================================================

pub struct App {
    pub prefs: PreferenceStore,
    pub http_client: reqwest::Client,
    pub data_location: DataLocation,
    pub timings: Timings,

    pub page: Page,
    pub pages: PageComponents,
    /// Shared by every page that can show a trail.
    pub modal: DetailModal,

    pub theme_variant: ThemeVariant,
    pub palette: ColorPalette,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub show_help: bool,
    pub help_scroll: u16,
    pub needs_redraw: bool,
}

impl App {
    /// Build the application shell. No page is built until
    /// [`App::show_page`] is called for the start page.
    pub fn new(config: &Config, prefs: PreferenceStore) -> Result<Self> {
        let timings = config.timings();
        let theme_variant = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %config.theme, "Unknown theme, using dark");
            ThemeVariant::Dark
        });

        Ok(Self {
            prefs,
            http_client: create_http_client(timings.request_timeout)?,
            data_location: config.data_location(),
            timings,
            page: config.default_page,
            pages: PageComponents::default(),
            modal: DetailModal::new(timings.modal_close, timings.confirmation),
            theme_variant,
            palette: theme_variant.palette(),
            status_message: None,
            show_help: false,
            help_scroll: 0,
            needs_redraw: true,
        })
    }

    /// Switch to `page`, building it on first visit. The first visit to the
    /// trails page starts the data load in the background.
    pub fn show_page(&mut self, page: Page, event_tx: &mpsc::Sender<AppEvent>) {
        let ctx = PageContext {
            client: &self.http_client,
            data: &self.data_location,
            timings: self.timings,
            prefs: &self.prefs,
        };
        let built = self.pages.ensure(page, &ctx);

        match page {
            Page::Trails if built => self.spawn_trail_load(event_tx),
            Page::Favorites if !built => {
                if let Some(favorites) = self.pages.favorites.as_mut() {
                    favorites.refresh(&self.prefs);
                }
            }
            _ => {}
        }

        if self.page != page {
            tracing::debug!(from = %self.page, to = %page, "Switching page");
        }
        self.page = page;
        self.needs_redraw = true;
    }

    fn spawn_trail_load(&self, event_tx: &mpsc::Sender<AppEvent>) {
        let Some(trails) = &self.pages.trails else {
            return;
        };
        let source = trails.source.clone();
        let tx = event_tx.clone();

        tracing::debug!(location = %source.location(), "Spawning trail load");
        tokio::spawn(async move {
            let outcome = source.load().await;
            if let Err(e) = tx.send(AppEvent::TrailsLoaded(outcome)).await {
                tracing::warn!(error = %e, "Failed to send trail data (receiver dropped)");
            }
        });
    }

    /// Install loaded trails, restore saved filters and apply them.
    pub fn on_trails_loaded(&mut self, outcome: LoadOutcome) {
        let fallback = matches!(outcome.origin, LoadOrigin::Fallback { .. });
        let Some(page) = self.pages.trails.as_mut() else {
            tracing::warn!("Trail data arrived with no trails page");
            return;
        };

        page.catalog.set_loaded(outcome);
        page.filters.initialize(&self.prefs, &mut page.catalog);
        page.clamp_selection();

        if fallback {
            self.set_status("Showing offline trail data");
        }
        self.needs_redraw = true;
    }

    // ========================================================================
    // Detail Modal
    // ========================================================================

    /// Open the modal for the highlighted card on the trails page.
    pub fn open_selected_trail(&mut self) -> bool {
        let Some(page) = &self.pages.trails else {
            return false;
        };
        let Some(trail) = page.selected_id().and_then(|id| page.catalog.find(id)) else {
            return false;
        };
        self.modal.open(trail);
        true
    }

    /// Open the modal for the home page's featured trail.
    pub fn open_featured_trail(&mut self) -> bool {
        let Some(home) = &self.pages.home else {
            return false;
        };
        self.modal.open(&home.featured);
        true
    }

    pub async fn save_favorite(&mut self, now: Instant) {
        match self.modal.save_favorite(&mut self.prefs, now).await {
            Ok(SaveOutcome::Added) => self.set_status("Added to favorites"),
            Ok(SaveOutcome::AlreadySaved) => self.set_status("Already in favorites"),
            Ok(SaveOutcome::NotOpen) => {}
            Err(e) => self.set_status(format!("Could not save favorite: {}", e)),
        }
        if let Some(favorites) = self.pages.favorites.as_mut() {
            favorites.refresh(&self.prefs);
        }
    }

    // ========================================================================
    // Preferences
    // ========================================================================

    pub async fn save_filters(&mut self, now: Instant) {
        let Some(page) = self.pages.trails.as_mut() else {
            return;
        };
        if let Err(e) = page.filters.save_preferences(&mut self.prefs, now).await {
            self.set_status(format!("Could not save filters: {}", e));
        }
    }

    pub async fn clear_favorites(&mut self) {
        match self.prefs.clear_favorites().await {
            Ok(()) => self.set_status("Favorites cleared"),
            Err(e) => self.set_status(format!("Could not clear favorites: {}", e)),
        }
        if let Some(favorites) = self.pages.favorites.as_mut() {
            favorites.refresh(&self.prefs);
            favorites.confirm_clear = false;
        }
    }

    /// Store the checklist as it stands.
    pub async fn save_checklist(&mut self) {
        let Some(page) = self.pages.checklist.as_ref() else {
            return;
        };
        let saved = page.checklist.to_saved();
        let progress = page.checklist.progress();

        match self.prefs.save_checklist(&saved).await {
            Ok(()) => {
                tracing::info!(progress = %progress, "Checklist saved");
                self.set_status("Checklist saved!");
            }
            Err(e) => self.set_status(format!("Could not save checklist: {}", e)),
        }
    }

    /// Uncheck every item and forget the saved state.
    pub async fn reset_checklist(&mut self) {
        let Some(page) = self.pages.checklist.as_mut() else {
            return;
        };
        page.checklist.reset();

        match self.prefs.clear_checklist().await {
            Ok(()) => self.set_status("Checklist reset!"),
            Err(e) => self.set_status(format!("Could not reset checklist: {}", e)),
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme_variant = self.theme_variant.next();
        self.palette = self.theme_variant.palette();
        self.set_status(format!("Theme: {}", self.theme_variant.name()));
    }

    // ========================================================================
    // Status and Timers
    // ========================================================================

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear the status message once it has been up for [`STATUS_DURATION`].
    /// Returns true if a message was actually cleared.
    pub fn clear_expired_status(&mut self, now: Instant) -> bool {
        if let Some((_, since)) = &self.status_message {
            if now.saturating_duration_since(*since) >= STATUS_DURATION {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Advance every timer: debounced search, confirmations, modal close,
    /// status expiry. Returns true if a redraw is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if let Some(page) = self.pages.trails.as_mut() {
            if page.filters.tick(now, &mut page.catalog) {
                page.clamp_selection();
                changed = true;
            }
        }
        changed |= self.modal.tick(now);
        changed |= self.clear_expired_status(now);
        changed
    }
}

// ============================================================================
// Tests
// ============================================================================
