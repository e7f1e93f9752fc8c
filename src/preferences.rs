//! Typed JSON view over the `user_preferences` table.
//!
//! All rows are read into memory once at startup, so reads are synchronous
//! and never fail. Writes go to the database first and update the map only
//! once the row is stored.
use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::checklist::SavedChecklist;
use crate::filter::SavedFilters;
use crate::storage::Database;
use crate::trails::{FavoriteEntry, Trail};

/// Saved difficulty, location and length ceiling.
pub const FILTERS_KEY: &str = "trails.filters";
/// Append-only list of saved trails.
pub const FAVORITES_KEY: &str = "trails.favorites";
/// Trip preparation checklist state.
pub const CHECKLIST_KEY: &str = "trails.checklist";

/// Errors from preference writes. Reads never fail; see [`PreferenceStore::get_json`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Could not encode preference {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Could not save preference {key}: {message}")]
    Write { key: String, message: String },
}

// ============================================================================
// PreferenceStore
// ============================================================================

pub struct PreferenceStore {
    db: Database,
    prefs: HashMap<String, String>,
}

impl PreferenceStore {
    /// Read every stored preference into memory.
    pub async fn load(db: Database) -> Result<Self> {
        let rows = db.get_preferences_by_prefix("").await?;
        tracing::debug!(count = rows.len(), "Preferences loaded");
        Ok(Self {
            db,
            prefs: rows.into_iter().collect(),
        })
    }

    /// Raw stored text for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.prefs.get(key).map(String::as_str)
    }

    /// Decode the value under `key`.
    ///
    /// Absent keys and malformed JSON both come back as `None`; the latter
    /// is logged.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.prefs.get(key)?;
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = key, error = %e, "Ignoring malformed preference");
                None
            }
        }
    }

    pub async fn set_json<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;

        self.db
            .set_preference(key, &json)
            .await
            .map_err(|e| StoreError::Write {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        self.prefs.insert(key.to_string(), json);
        Ok(())
    }

    pub async fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.db
            .remove_preference(key)
            .await
            .map_err(|e| StoreError::Write {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        self.prefs.remove(key);
        Ok(())
    }

    // ========================================================================
    // Favorites
    // ========================================================================

    /// Saved trails, oldest first. Entries that no longer decode are dropped.
    pub fn favorites(&self) -> Vec<FavoriteEntry> {
        let Some(items) = self.get_json::<Vec<serde_json::Value>>(FAVORITES_KEY) else {
            return Vec::new();
        };

        items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed favorite");
                    None
                }
            })
            .collect()
    }

    pub fn is_favorite(&self, id: u32) -> bool {
        self.favorites().iter().any(|f| f.id == id)
    }

    /// Append `trail` unless its id is already saved.
    ///
    /// Returns `true` when the entry was added, `false` when it was already
    /// present. The stored list is left untouched in the latter case.
    pub async fn add_favorite(
        &mut self,
        trail: &Trail,
        saved_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut favorites = self.favorites();
        if favorites.iter().any(|f| f.id == trail.id) {
            tracing::debug!(id = trail.id, "Trail already in favorites");
            return Ok(false);
        }

        favorites.push(FavoriteEntry::from_trail(trail, saved_at));
        self.set_json(FAVORITES_KEY, &favorites).await?;
        tracing::info!(id = trail.id, name = %trail.name, "Trail saved to favorites");
        Ok(true)
    }

    pub async fn clear_favorites(&mut self) -> Result<(), StoreError> {
        self.remove(FAVORITES_KEY).await
    }

    // ========================================================================
    // Filters
    // ========================================================================

    pub fn saved_filters(&self) -> Option<SavedFilters> {
        self.get_json(FILTERS_KEY)
    }

    pub async fn save_filters(&mut self, filters: &SavedFilters) -> Result<(), StoreError> {
        self.set_json(FILTERS_KEY, filters).await
    }

    // ========================================================================
    // Checklist
    // ========================================================================

    pub fn checklist(&self) -> Option<SavedChecklist> {
        self.get_json(CHECKLIST_KEY)
    }

    pub async fn save_checklist(&mut self, checklist: &SavedChecklist) -> Result<(), StoreError> {
        self.set_json(CHECKLIST_KEY, checklist).await
    }

    pub async fn clear_checklist(&mut self) -> Result<(), StoreError> {
        self.remove(CHECKLIST_KEY).await
    }

    /// Forget saved filters, favorites and checklist state.
    pub async fn reset(&mut self) -> Result<(), StoreError> {
        self.remove(FILTERS_KEY).await?;
        self.remove(FAVORITES_KEY).await?;
        self.remove(CHECKLIST_KEY).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::Checklist;
    use crate::trails::fallback_trails;
    use pretty_assertions::assert_eq;

    async fn test_store() -> PreferenceStore {
        let db = Database::open(":memory:").await.unwrap();
        PreferenceStore::load(db).await.unwrap()
    }

    fn trail(id: u32, name: &str) -> Trail {
        Trail {
            id,
            name: name.to_string(),
            ..Trail::default()
        }
    }

    #[tokio::test]
    async fn test_get_json_absent() {
        let store = test_store().await;
        assert_eq!(store.get_json::<Vec<u32>>("missing"), None);
    }

    #[tokio::test]
    async fn test_set_json_updates_memory_and_db() {
        let mut store = test_store().await;
        store.set_json("demo.list", &vec![1, 2, 3]).await.unwrap();

        assert_eq!(store.get_json::<Vec<u32>>("demo.list"), Some(vec![1, 2, 3]));
        assert_eq!(
            store.db.get_preference("demo.list").await.unwrap().as_deref(),
            Some("[1,2,3]")
        );
    }

    #[tokio::test]
    async fn test_malformed_json_reads_as_absent() {
        let db = Database::open(":memory:").await.unwrap();
        db.set_preference(FAVORITES_KEY, "not valid json {{")
            .await
            .unwrap();
        db.set_preference(FILTERS_KEY, "[1,2]").await.unwrap();

        let store = PreferenceStore::load(db).await.unwrap();
        assert!(store.favorites().is_empty());
        assert_eq!(store.saved_filters(), None);
    }

    #[tokio::test]
    async fn test_add_favorite_is_idempotent() {
        let mut store = test_store().await;
        let kigali = fallback_trails().remove(0);
        let now = Utc::now();

        assert!(store.add_favorite(&kigali, now).await.unwrap());
        assert!(!store.add_favorite(&kigali, now).await.unwrap());

        let favorites = store.favorites();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].name, "Mount Kigali Summit Trail");
        assert!(store.is_favorite(kigali.id));
    }

    #[tokio::test]
    async fn test_favorites_keep_insertion_order() {
        let mut store = test_store().await;
        let now = Utc::now();
        store.add_favorite(&trail(5, "Five"), now).await.unwrap();
        store.add_favorite(&trail(2, "Two"), now).await.unwrap();
        store.add_favorite(&trail(9, "Nine"), now).await.unwrap();

        let ids: Vec<u32> = store.favorites().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[tokio::test]
    async fn test_malformed_favorite_entry_skipped() {
        let db = Database::open(":memory:").await.unwrap();
        db.set_preference(
            FAVORITES_KEY,
            r#"[{"id":1,"name":"Ok","location":"Kigali","savedAt":"2026-01-01T00:00:00Z"},{"oops":true}]"#,
        )
        .await
        .unwrap();

        let store = PreferenceStore::load(db).await.unwrap();
        let favorites = store.favorites();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, 1);
    }

    #[tokio::test]
    async fn test_clear_favorites() {
        let mut store = test_store().await;
        store.add_favorite(&trail(1, "One"), Utc::now()).await.unwrap();
        store.clear_favorites().await.unwrap();

        assert!(store.favorites().is_empty());
        assert_eq!(store.db.get_preference(FAVORITES_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_survives_reload() {
        let db = Database::open(":memory:").await.unwrap();
        let mut store = PreferenceStore::load(db.clone()).await.unwrap();
        store.add_favorite(&trail(3, "Three"), Utc::now()).await.unwrap();
        drop(store);

        let reloaded = PreferenceStore::load(db).await.unwrap();
        assert!(reloaded.is_favorite(3));
    }

    #[tokio::test]
    async fn test_reset_clears_filters_and_favorites() {
        let mut store = test_store().await;
        store.set_json(FILTERS_KEY, &serde_json::json!({"difficulty": "hard"}))
            .await
            .unwrap();
        store.add_favorite(&trail(1, "One"), Utc::now()).await.unwrap();
        store
            .save_checklist(&Checklist::default().to_saved())
            .await
            .unwrap();

        store.reset().await.unwrap();
        assert_eq!(store.get(FILTERS_KEY), None);
        assert_eq!(store.get(FAVORITES_KEY), None);
        assert_eq!(store.get(CHECKLIST_KEY), None);
    }

    #[tokio::test]
    async fn test_checklist_save_and_clear() {
        let mut store = test_store().await;
        assert_eq!(store.checklist(), None);

        let mut checklist = Checklist::default();
        checklist.toggle(0);
        store.save_checklist(&checklist.to_saved()).await.unwrap();

        let mut restored = Checklist::default();
        restored.apply_saved(&store.checklist().unwrap());
        assert_eq!(restored, checklist);

        store.clear_checklist().await.unwrap();
        assert_eq!(store.checklist(), None);
        assert_eq!(store.db.get_preference(CHECKLIST_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_malformed_checklist_reads_as_absent() {
        let db = Database::open(":memory:").await.unwrap();
        db.set_preference(CHECKLIST_KEY, r#"[{"id":"water"}]"#)
            .await
            .unwrap();

        let store = PreferenceStore::load(db).await.unwrap();
        assert_eq!(store.checklist(), None);
    }
}
