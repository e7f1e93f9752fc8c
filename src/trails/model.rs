use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Difficulty
// ============================================================================

/// Trail difficulty grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Moderate, Difficulty::Hard];

    /// Lowercase name, as used in the JSON data and saved filters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Moderate => "moderate",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "moderate" => Ok(Self::Moderate),
            "hard" => Ok(Self::Hard),
            other => Err(format!("unknown difficulty: {other:?}")),
        }
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Unknown grades load as `None` instead of rejecting the whole record.
fn lenient_difficulty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Difficulty>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| s.parse().ok()))
}

/// A features value that is not an array of strings loads as empty.
fn lenient_features<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// `null` loads as the field's default, same as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Trail
// ============================================================================

/// One catalog entry. Immutable once loaded; identity is `id`.
///
/// Every field except `id` tolerates being absent so that partial records
/// still load; the detail modal supplies display fallbacks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Trail {
    pub id: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "lenient_difficulty")]
    pub difficulty: Option<Difficulty>,
    /// Kilometres.
    pub length: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    pub duration: Option<String>,
    /// Metres.
    pub elevation: Option<f64>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(deserialize_with = "lenient_features")]
    pub features: Vec<String>,
    pub best_season: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub permit_required: bool,
    pub access: Option<String>,
    pub trailhead: Option<String>,
    pub water_sources: Option<String>,
    pub wildlife: Option<String>,
}

impl Trail {
    /// Description or the empty string.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// The record shown when the trail data cannot be loaded.
pub fn fallback_trails() -> Vec<Trail> {
    vec![Trail {
        id: 1,
        name: "Mount Kigali Summit Trail".to_string(),
        difficulty: Some(Difficulty::Moderate),
        length: Some(8.5),
        location: "Kigali".to_string(),
        duration: Some("3 hours".to_string()),
        elevation: Some(350.0),
        description: Some("Panoramic views of Kigali city from the summit.".to_string()),
        image: Some("images/trail-1.jpg".to_string()),
        features: vec![
            "City views".to_string(),
            "Bird watching".to_string(),
            "Photography spots".to_string(),
        ],
        best_season: Some("Dry season".to_string()),
        permit_required: false,
        ..Trail::default()
    }]
}

/// The trail highlighted on the home page.
pub fn featured_trail() -> Trail {
    Trail {
        description: Some(
            "Panoramic views of Kigali city from the summit. This popular trail offers a \
             perfect day hike with beautiful scenery and diverse flora."
                .to_string(),
        ),
        features: vec![
            "City views".to_string(),
            "Bird watching".to_string(),
            "Photography spots".to_string(),
            "Picnic areas".to_string(),
        ],
        access: Some("Easy access from Kigali city center".to_string()),
        trailhead: Some("Kigali Golf Club entrance".to_string()),
        ..fallback_trails().remove(0)
    }
}

// ============================================================================
// Favorites
// ============================================================================

/// A saved reference to a trail, as persisted in the favorites list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub id: u32,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_difficulty")]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    pub saved_at: DateTime<Utc>,
}

impl FavoriteEntry {
    pub fn from_trail(trail: &Trail, saved_at: DateTime<Utc>) -> Self {
        Self {
            id: trail.id,
            name: trail.name.clone(),
            difficulty: trail.difficulty,
            length: trail.length,
            location: trail.location.clone(),
            saved_at,
        }
    }
}

/// Formats a length or elevation the way the cards show it: `8.5`, `12`.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_record_deserializes() {
        let json = r#"{
            "id": 7, "name": "Bisoke Crater", "difficulty": "hard", "length": 6,
            "location": "Musanze", "duration": "5 hours", "elevation": 3711,
            "description": "Crater lake", "image": "images/bisoke.jpg",
            "features": ["Crater lake", "Gorillas"], "bestSeason": "June",
            "permitRequired": true, "access": "Kinigi", "trailhead": "Park HQ",
            "waterSources": "None", "wildlife": "Golden monkeys"
        }"#;
        let trail: Trail = serde_json::from_str(json).unwrap();
        assert_eq!(trail.id, 7);
        assert_eq!(trail.difficulty, Some(Difficulty::Hard));
        assert_eq!(trail.length, Some(6.0));
        assert_eq!(trail.best_season.as_deref(), Some("June"));
        assert!(trail.permit_required);
        assert_eq!(trail.water_sources.as_deref(), Some("None"));
        assert_eq!(trail.features, vec!["Crater lake", "Gorillas"]);
    }

    #[test]
    fn test_partial_record_uses_defaults() {
        let trail: Trail = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(trail.id, 3);
        assert_eq!(trail.name, "");
        assert_eq!(trail.difficulty, None);
        assert_eq!(trail.length, None);
        assert!(trail.features.is_empty());
        assert!(!trail.permit_required);
    }

    #[test]
    fn test_unknown_difficulty_is_none() {
        let trail: Trail =
            serde_json::from_str(r#"{"id": 1, "difficulty": "extreme"}"#).unwrap();
        assert_eq!(trail.difficulty, None);
    }

    #[test]
    fn test_difficulty_case_insensitive() {
        let trail: Trail = serde_json::from_str(r#"{"id": 1, "difficulty": "Easy"}"#).unwrap();
        assert_eq!(trail.difficulty, Some(Difficulty::Easy));
    }

    #[test]
    fn test_features_not_array_is_empty() {
        let trail: Trail =
            serde_json::from_str(r#"{"id": 1, "features": "lake views"}"#).unwrap();
        assert!(trail.features.is_empty());

        let trail: Trail =
            serde_json::from_str(r#"{"id": 1, "features": ["ok", 3, null]}"#).unwrap();
        assert_eq!(trail.features, vec!["ok"]);
    }

    #[test]
    fn test_fallback_is_single_kigali_trail() {
        let trails = fallback_trails();
        assert_eq!(trails.len(), 1);
        assert_eq!(trails[0].name, "Mount Kigali Summit Trail");
        assert_eq!(trails[0].location, "Kigali");
    }

    #[test]
    fn test_featured_trail_has_access_details() {
        let trail = featured_trail();
        assert_eq!(trail.id, 1);
        assert_eq!(trail.trailhead.as_deref(), Some("Kigali Golf Club entrance"));
        assert_eq!(trail.features.len(), 4);
    }

    #[test]
    fn test_favorite_entry_json_shape() {
        let trail = fallback_trails().remove(0);
        let saved_at = DateTime::parse_from_rfc3339("2026-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let entry = FavoriteEntry::from_trail(&trail, saved_at);

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["difficulty"], "moderate");
        assert_eq!(value["savedAt"], "2026-03-01T10:00:00Z");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(8.5), "8.5");
        assert_eq!(format_number(12.0), "12");
    }
}
