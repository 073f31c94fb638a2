use serde_json::Value;

use crate::LookupError;
use crate::store::{DataStore, STATS_FILE, parse_color, value_text};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsCard {
    pub name: String,
    pub color: u32,
    pub image_url: String,
    pub icon_url: String,
    pub lines: Vec<(String, String)>,
}

impl StatsCard {
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Character stat sheet from `stats/stats.json`.
pub fn resolve_stats(store: &DataStore, character: &str) -> Result<StatsCard, LookupError> {
    let (name, _) = store.character(character)?;
    let record = store
        .stats_record(name)
        .ok_or_else(|| LookupError::StatsNotFound(name.to_string()))?;
    let context = format!("{STATS_FILE} / {name}");

    let stats = record
        .get("Stats")
        .and_then(Value::as_object)
        .ok_or_else(|| LookupError::malformed(&context, "missing \"Stats\" mapping"))?;
    let embed = record
        .get("Embed Info")
        .and_then(Value::as_object)
        .ok_or_else(|| LookupError::malformed(&context, "missing \"Embed Info\" mapping"))?;

    let color = embed
        .get("color")
        .and_then(parse_color)
        .ok_or_else(|| LookupError::malformed(&context, "missing or bad color"))?;
    let text_field = |key: &str| {
        embed
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| LookupError::malformed(&context, format!("missing {key}")))
    };

    Ok(StatsCard {
        name: name.to_string(),
        color,
        image_url: text_field("image")?,
        icon_url: text_field("icon")?,
        lines: stats
            .iter()
            .map(|(k, v)| (k.clone(), value_text(v)))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::resolve_stats;
    use crate::LookupError;
    use crate::store::test_support::fixture_store;

    #[test]
    fn stats_keep_sheet_order() {
        let (_dir, store) = fixture_store();
        let card = resolve_stats(&store, "a").unwrap();
        assert_eq!(card.name, "A");
        assert_eq!(card.color, 0xff0000);
        assert_eq!(card.image_url, "https://img.example/a-idle.gif");
        assert_eq!(card.text(), "Weight: 90\nWalk Speed: 1.1\nJumps: 2");
    }

    #[test]
    fn stats_missing_image_is_malformed() {
        let (_dir, store) = fixture_store();
        let err = resolve_stats(&store, "Bandana Dee").unwrap_err();
        assert!(matches!(err, LookupError::MalformedData { .. }), "{err}");
    }

    #[test]
    fn listed_character_without_stats_says_so() {
        let (_dir, store) = fixture_store();
        let err = resolve_stats(&store, "garbled").unwrap_err();
        assert_eq!(err, LookupError::StatsNotFound("Garbled".to_string()));
        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "No stats recorded for Garbled yet.");
    }

    #[test]
    fn stats_for_unlisted_character_is_not_found() {
        let (_dir, store) = fixture_store();
        let err = resolve_stats(&store, "Sonic").unwrap_err();
        assert_eq!(err, LookupError::CharacterNotFound("Sonic".to_string()));
    }
}
