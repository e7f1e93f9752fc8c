//! Trip preparation checklist.
//!
//! A fixed set of packing items grouped by category. Check state lives in
//! memory until it is saved; the saved form maps each group to the state of
//! its items, e.g. `{"checklist-0":[{"id":"water","checked":true}]}`.
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq)]
pub struct ChecklistItem {
    pub id: &'static str,
    pub label: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ChecklistGroup {
    pub title: &'static str,
    pub items: &'static [ChecklistItem],
}

const fn item(id: &'static str, label: &'static str) -> ChecklistItem {
    ChecklistItem { id, label }
}

/// What to pack before heading out.
pub const GROUPS: &[ChecklistGroup] = &[
    ChecklistGroup {
        title: "Essentials",
        items: &[
            item("water", "At least 2 liters of water"),
            item("snacks", "Energy snacks"),
            item("map", "Trail map or offline maps"),
            item("first-aid", "First aid kit"),
            item("sun-protection", "Sunscreen and sunglasses"),
            item("headlamp", "Headlamp or flashlight"),
        ],
    },
    ChecklistGroup {
        title: "Clothing",
        items: &[
            item("boots", "Broken-in hiking boots"),
            item("rain-jacket", "Rain jacket"),
            item("warm-layer", "Warm layer for the summit"),
            item("hat", "Sun hat"),
        ],
    },
    ChecklistGroup {
        title: "Documents & Safety",
        items: &[
            item("id", "ID or passport"),
            item("permit", "Park permit, if required"),
            item("emergency-contacts", "Emergency contacts"),
            item("phone", "Charged phone"),
        ],
    },
];

/// Saved state of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemState {
    pub id: String,
    pub checked: bool,
}

/// Stored form: group key (`checklist-<index>`) to item states.
pub type SavedChecklist = BTreeMap<String, Vec<ItemState>>;

// ============================================================================
// Progress
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub checked: usize,
    pub total: usize,
}

impl Progress {
    /// Whole percentage, rounded half up. An empty list is 0%.
    pub fn percent(self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.checked as f64 / self.total as f64 * 100.0).round() as u32
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} items ({}%)",
            self.checked,
            self.total,
            self.percent()
        )
    }
}

// ============================================================================
// Checklist
// ============================================================================

/// Check state for every item, indexed in display order across groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checklist {
    groups: &'static [ChecklistGroup],
    checked: Vec<bool>,
}

impl Default for Checklist {
    fn default() -> Self {
        Self::with_groups(GROUPS)
    }
}

impl Checklist {
    pub fn with_groups(groups: &'static [ChecklistGroup]) -> Self {
        let total = groups.iter().map(|g| g.items.len()).sum();
        Self {
            groups,
            checked: vec![false; total],
        }
    }

    pub fn groups(&self) -> &'static [ChecklistGroup] {
        self.groups
    }

    pub fn len(&self) -> usize {
        self.checked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checked.is_empty()
    }

    /// Every item with its group index, in display order.
    pub fn items(&self) -> impl Iterator<Item = (usize, &'static ChecklistItem)> {
        let groups: &'static [ChecklistGroup] = self.groups;
        groups
            .iter()
            .enumerate()
            .flat_map(|(g, group)| group.items.iter().map(move |item| (g, item)))
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.get(index).copied().unwrap_or(false)
    }

    /// Flip one item. Returns the new state; out of range is a no-op.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.checked.get_mut(index) {
            Some(checked) => {
                *checked = !*checked;
                *checked
            }
            None => false,
        }
    }

    pub fn progress(&self) -> Progress {
        Progress {
            checked: self.checked.iter().filter(|c| **c).count(),
            total: self.checked.len(),
        }
    }

    /// Uncheck everything.
    pub fn reset(&mut self) {
        self.checked.fill(false);
    }

    /// Restore saved state by item id. Ids no longer in the list are
    /// ignored, and items missing from `saved` keep their current state.
    pub fn apply_saved(&mut self, saved: &SavedChecklist) {
        let positions: HashMap<&str, usize> = self
            .items()
            .enumerate()
            .map(|(index, (_, item))| (item.id, index))
            .collect();

        for state in saved.values().flatten() {
            match positions.get(state.id.as_str()) {
                Some(&index) => self.checked[index] = state.checked,
                None => tracing::debug!(id = %state.id, "Ignoring unknown checklist item"),
            }
        }
    }

    pub fn to_saved(&self) -> SavedChecklist {
        let mut saved = SavedChecklist::new();
        let mut checked = self.checked.iter().copied();
        for (g, group) in self.groups.iter().enumerate() {
            let states = group
                .items
                .iter()
                .zip(checked.by_ref())
                .map(|(item, checked)| ItemState {
                    id: item.id.to_string(),
                    checked,
                })
                .collect();
            saved.insert(format!("checklist-{g}"), states);
        }
        saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SMALL: &[ChecklistGroup] = &[
        ChecklistGroup {
            title: "Pack",
            items: &[item("water", "Water"), item("map", "Map")],
        },
        ChecklistGroup {
            title: "Wear",
            items: &[item("boots", "Boots")],
        },
    ];

    #[test]
    fn test_default_list_starts_unchecked() {
        let checklist = Checklist::default();
        assert_eq!(checklist.len(), 14);
        assert_eq!(checklist.progress().to_string(), "0/14 items (0%)");
    }

    #[test]
    fn test_item_ids_are_unique() {
        let checklist = Checklist::default();
        let mut ids: Vec<&str> = checklist.items().map(|(_, item)| item.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), checklist.len());
    }

    #[test]
    fn test_progress_rounds_percentage() {
        let mut checklist = Checklist::with_groups(SMALL);
        checklist.toggle(0);
        assert_eq!(checklist.progress().to_string(), "1/3 items (33%)");

        checklist.toggle(2);
        assert_eq!(checklist.progress().to_string(), "2/3 items (67%)");

        checklist.toggle(1);
        assert_eq!(checklist.progress().percent(), 100);
    }

    #[test]
    fn test_progress_half_rounds_up() {
        let progress = Progress {
            checked: 1,
            total: 8,
        };
        assert_eq!(progress.to_string(), "1/8 items (13%)");
    }

    #[test]
    fn test_empty_progress_is_zero() {
        let progress = Progress {
            checked: 0,
            total: 0,
        };
        assert_eq!(progress.percent(), 0);
        assert_eq!(progress.to_string(), "0/0 items (0%)");
    }

    #[test]
    fn test_toggle_out_of_range_is_noop() {
        let mut checklist = Checklist::with_groups(SMALL);
        assert!(!checklist.toggle(99));
        assert_eq!(checklist.progress().checked, 0);
    }

    #[test]
    fn test_saved_shape_groups_by_index() {
        let mut checklist = Checklist::with_groups(SMALL);
        checklist.toggle(2);

        let json = serde_json::to_value(checklist.to_saved()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "checklist-0": [
                    {"id": "water", "checked": false},
                    {"id": "map", "checked": false}
                ],
                "checklist-1": [{"id": "boots", "checked": true}]
            })
        );
    }

    #[test]
    fn test_apply_saved_matches_by_id() {
        let saved: SavedChecklist = serde_json::from_str(
            r#"{"checklist-9": [
                {"id": "boots", "checked": true},
                {"id": "compass", "checked": true},
                {"id": "map", "checked": true}
            ]}"#,
        )
        .unwrap();

        let mut checklist = Checklist::with_groups(SMALL);
        checklist.apply_saved(&saved);
        assert!(!checklist.is_checked(0));
        assert!(checklist.is_checked(1));
        assert!(checklist.is_checked(2));
        assert_eq!(checklist.progress().checked, 2);
    }

    #[test]
    fn test_reset_unchecks_all() {
        let mut checklist = Checklist::with_groups(SMALL);
        checklist.toggle(0);
        checklist.toggle(1);
        checklist.reset();
        assert_eq!(checklist.progress().checked, 0);
        assert_eq!(checklist, Checklist::with_groups(SMALL));
    }
}
