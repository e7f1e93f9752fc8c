use std::collections::HashSet;

use serde_json::Value;
use thiserror::Error;

use super::model::Trail;

/// Errors that reject a trail payload as a whole.
///
/// Individual bad records never produce one of these; they are skipped and
/// counted in [`ParseResult::skipped`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// Body is not valid JSON
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Top-level value is valid JSON but not an array
    #[error("Expected a JSON array of trails, found {0}")]
    NotAnArray(&'static str),
}

/// Trails decoded from a payload, plus how many elements were dropped.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    pub trails: Vec<Trail>,
    /// Elements that were not trail objects, or repeated an earlier id.
    pub skipped: usize,
}

/// Parse a JSON array of trail records.
///
/// Each element decodes leniently (see [`Trail`]). Elements without an id,
/// or that still fail to decode, are skipped. Repeated ids keep the first
/// occurrence. An empty array is a valid, empty result.
///
/// # Errors
///
/// [`ParseError::Json`] for unparseable bytes, [`ParseError::NotAnArray`]
/// when the top-level value has the wrong shape.
pub fn parse_trails(bytes: &[u8]) -> Result<ParseResult, ParseError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let items = match value {
        Value::Array(items) => items,
        other => return Err(ParseError::NotAnArray(json_kind(&other))),
    };

    let mut seen = HashSet::with_capacity(items.len());
    let mut result = ParseResult {
        trails: Vec::with_capacity(items.len()),
        skipped: 0,
    };

    for (index, item) in items.into_iter().enumerate() {
        // Identity is the id, so a record without one cannot be kept.
        if item.get("id").is_none() {
            tracing::debug!(index = index, "Skipping trail record without id");
            result.skipped += 1;
            continue;
        }

        let trail: Trail = match serde_json::from_value(item) {
            Ok(trail) => trail,
            Err(e) => {
                tracing::debug!(index = index, error = %e, "Skipping malformed trail record");
                result.skipped += 1;
                continue;
            }
        };

        if !seen.insert(trail.id) {
            tracing::warn!(id = trail.id, index = index, "Duplicate trail id, keeping first");
            result.skipped += 1;
            continue;
        }

        result.trails.push(trail);
    }

    Ok(result)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_trails() {
        let json = br#"[
            {"id": 1, "name": "Kigali Loop", "difficulty": "easy", "length": 3, "location": "Kigali"},
            {"id": 2, "name": "Huye Ridge", "difficulty": "hard", "length": 12, "location": "Huye"}
        ]"#;
        let result = parse_trails(json).unwrap();
        assert_eq!(result.trails.len(), 2);
        assert_eq!(result.skipped, 0);
        assert_eq!(result.trails[1].name, "Huye Ridge");
    }

    #[test]
    fn test_empty_array_is_valid() {
        let result = parse_trails(b"[]").unwrap();
        assert!(result.trails.is_empty());
        assert_eq!(result.skipped, 0);
    }

    #[test]
    fn test_object_is_not_an_array() {
        let err = parse_trails(br#"{"trails": []}"#).unwrap_err();
        assert!(matches!(err, ParseError::NotAnArray("an object")));
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_trails(b"[{\"id\": 1,").unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn test_bad_records_skipped_and_counted() {
        let json = br#"[
            {"id": 1, "name": "Good"},
            "not a trail",
            {"name": "no id"},
            {"id": "seven"},
            {"id": 2, "name": "Bad length", "length": "long"},
            {"id": 3, "name": "Partial"}
        ]"#;
        let result = parse_trails(json).unwrap();
        let ids: Vec<u32> = result.trails.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(result.skipped, 4);
    }

    #[test]
    fn test_null_text_fields_load_as_defaults() {
        let json = br#"[
            {"id": 1, "name": null},
            {"id": 2, "location": null},
            {"id": 3, "permitRequired": null},
            {"id": 4, "length": "8.5"}
        ]"#;
        let result = parse_trails(json).unwrap();
        let ids: Vec<u32> = result.trails.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.trails[0].name, "");
        assert_eq!(result.trails[1].location, "");
        assert!(!result.trails[2].permit_required);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let json = br#"[
            {"id": 4, "name": "First"},
            {"id": 4, "name": "Second"}
        ]"#;
        let result = parse_trails(json).unwrap();
        assert_eq!(result.trails.len(), 1);
        assert_eq!(result.trails[0].name, "First");
        assert_eq!(result.skipped, 1);
    }
}
