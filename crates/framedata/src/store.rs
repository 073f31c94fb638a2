use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use anyhow::Context;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::LookupError;
use crate::roster::Roster;

pub const CHARACTERS_FILE: &str = "characters.json";
pub const INFO_DIR: &str = "info";
pub const STATS_FILE: &str = "stats/stats.json";

/// Parsed `info/<Character>.json`: move name -> raw move record, file order.
pub type MoveFile = Map<String, Value>;

pub struct DataStore {
    root: PathBuf,
    roster: Roster,
    // Raw `characters.json` entries; checked per lookup, so one bad entry
    // never takes the rest of the roster down.
    characters: HashMap<String, Value>,
    stats: Map<String, Value>,
    // name -> parsed move file; filled on first lookup, never invalidated.
    moves: RwLock<HashMap<String, Arc<MoveFile>>>,
    // Held while a missing move file is read, so each file is loaded once.
    loading: Mutex<()>,
}

impl std::fmt::Debug for DataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStore")
            .field("root", &self.root)
            .field("characters", &self.roster.len())
            .field("stats", &self.stats.len())
            .finish()
    }
}

impl DataStore {
    /// Loads the roster and the stats sheet. Move files are read lazily.
    pub fn open(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();

        let path = root.join(CHARACTERS_FILE);
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("read {}", path.display()))?;
        let entries: Map<String, Value> =
            serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;

        let mut names = Vec::with_capacity(entries.len());
        let mut characters = HashMap::with_capacity(entries.len());
        for (name, entry) in entries {
            names.push(name.clone());
            characters.insert(name, entry);
        }
        if names.is_empty() {
            anyhow::bail!("{} lists no characters", path.display());
        }

        let stats_path = root.join(STATS_FILE);
        let stats = match std::fs::read_to_string(&stats_path) {
            Ok(s) => serde_json::from_str::<Map<String, Value>>(&s)
                .with_context(|| format!("parse {}", stats_path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %stats_path.display(), "no stats sheet; /stats will find nothing");
                Map::new()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("read {}", stats_path.display()));
            }
        };

        info!(
            root = %root.display(),
            characters = names.len(),
            stats = stats.len(),
            "data store loaded"
        );

        Ok(Self {
            root,
            roster: Roster::new(names),
            characters,
            stats,
            moves: RwLock::new(HashMap::new()),
            loading: Mutex::new(()),
        })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Canonical roster name plus its raw `characters.json` entry.
    pub fn character(&self, query: &str) -> Result<(&str, &Value), LookupError> {
        let name = self
            .roster
            .find(query)
            .ok_or_else(|| LookupError::CharacterNotFound(query.trim().to_string()))?;
        let entry = self
            .characters
            .get(name)
            .ok_or_else(|| LookupError::CharacterNotFound(name.to_string()))?;
        Ok((name, entry))
    }

    /// Stats sheet record for a canonical character name.
    pub fn stats_record(&self, name: &str) -> Option<&Value> {
        self.stats.get(name)
    }

    /// Move file for a canonical roster name.
    ///
    /// A roster character without a move file has no moves yet; that is a
    /// lookup miss, not a data error.
    pub fn moves(&self, name: &str) -> Result<Arc<MoveFile>, LookupError> {
        if !self.characters.contains_key(name) {
            return Err(LookupError::CharacterNotFound(name.to_string()));
        }

        if let Some(m) = self.read_cache().get(name) {
            return Ok(Arc::clone(m));
        }

        let _loading = match self.loading.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Loaded by whoever held the lock before us.
        if let Some(m) = self.read_cache().get(name) {
            return Ok(Arc::clone(m));
        }

        let loaded = Arc::new(self.load_moves(name)?);
        let mut cache = match self.moves.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        cache.insert(name.to_string(), Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Move names for autocomplete. Empty when the file is missing or bad.
    pub fn move_names(&self, name: &str) -> Vec<String> {
        match self.moves(name) {
            Ok(m) => m.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<MoveFile>>> {
        match self.moves.read() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn load_moves(&self, name: &str) -> Result<MoveFile, LookupError> {
        let path = self.root.join(INFO_DIR).join(format!("{name}.json"));
        let context = path.display().to_string();
        let raw = match std::fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %context, "no move file");
                return Err(LookupError::MoveNotFound {
                    character: name.to_string(),
                    attack: String::new(),
                });
            }
            Err(e) => return Err(LookupError::malformed(context, format!("read failed: {e}"))),
        };
        let moves = serde_json::from_str::<MoveFile>(&raw)
            .map_err(|e| LookupError::malformed(context.clone(), format!("invalid json: {e}")))?;
        debug!(path = %context, moves = moves.len(), "move file cached");
        Ok(moves)
    }
}

/// Parses a display color: hex string (optionally `0x`/`#` prefixed) or a
/// plain integer. Values above 24-bit RGB are rejected.
pub fn parse_color(v: &Value) -> Option<u32> {
    let n = match v {
        Value::String(s) => {
            let s = s.trim();
            let hex = s
                .strip_prefix("0x")
                .or_else(|| s.strip_prefix("0X"))
                .or_else(|| s.strip_prefix('#'))
                .unwrap_or(s);
            u32::from_str_radix(hex, 16).ok()?
        }
        Value::Number(n) => u32::try_from(n.as_u64()?).ok()?,
        _ => return None,
    };
    (n <= 0xFF_FFFF).then_some(n)
}

/// Display text for an attribute value. Strings print bare, not quoted.
pub fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::test_support::fixture_store;
    use super::{DataStore, parse_color, value_text};
    use crate::LookupError;

    #[test]
    fn open_keeps_roster_file_order() {
        let (_dir, store) = fixture_store();
        assert_eq!(
            store.roster().names(),
            &["A", "Bandana Dee", "Broken", "Garbled"]
        );
    }

    #[test]
    fn open_requires_characters_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DataStore::open(dir.path()).is_err());
    }

    #[test]
    fn open_tolerates_missing_stats() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("characters.json"),
            r#"{ "A": { "color": "ff0000", "icon": "x" } }"#,
        )
        .unwrap();
        let store = DataStore::open(dir.path()).unwrap();
        assert!(store.stats_record("A").is_none());
    }

    #[test]
    fn moves_are_cached_after_first_load() {
        let (dir, store) = fixture_store();
        let first = store.moves("A").unwrap();

        std::fs::remove_file(dir.path().join("info").join("A.json")).unwrap();
        let second = store.moves("A").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn concurrent_first_lookups_share_one_load() {
        let (_dir, store) = fixture_store();
        let loaded = std::thread::scope(|s| {
            let handles = (0..8)
                .map(|_| s.spawn(|| store.moves("A").unwrap()))
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .collect::<Vec<_>>()
        });
        assert!(loaded.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn missing_move_file_is_not_found() {
        let (_dir, store) = fixture_store();
        let err = store.moves("Bandana Dee").unwrap_err();
        assert!(err.is_not_found(), "{err}");
        assert!(store.move_names("Bandana Dee").is_empty());
    }

    #[test]
    fn invalid_move_file_is_malformed() {
        let (_dir, store) = fixture_store();
        let err = store.moves("Garbled").unwrap_err();
        assert!(matches!(err, LookupError::MalformedData { .. }), "{err}");
    }

    #[test]
    fn unknown_names_never_touch_the_filesystem() {
        let (_dir, store) = fixture_store();
        let err = store.moves("../characters").unwrap_err();
        assert_eq!(err, LookupError::CharacterNotFound("../characters".to_string()));
    }

    #[test]
    fn parse_color_accepts_common_forms() {
        assert_eq!(parse_color(&json!("0xff0000")), Some(0xff0000));
        assert_eq!(parse_color(&json!("#00FF00")), Some(0x00ff00));
        assert_eq!(parse_color(&json!("F5C400")), Some(0xf5c400));
        assert_eq!(parse_color(&json!(255)), Some(255));
        assert_eq!(parse_color(&json!("1000000")), None);
        assert_eq!(parse_color(&json!("blue")), None);
        assert_eq!(parse_color(&json!(null)), None);
    }

    #[test]
    fn value_text_prints_strings_bare() {
        assert_eq!(value_text(&json!("5%")), "5%");
        assert_eq!(value_text(&json!(14)), "14");
        assert_eq!(value_text(&json!(1.5)), "1.5");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&json!(null)), "");
    }
}
