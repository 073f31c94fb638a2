use serde_json::{Map, Value};

use crate::LookupError;
use crate::store::{DataStore, parse_color, value_text};

pub const HITBOXES_KEY: &str = "Hitboxes";
pub const IMAGES_KEY: &str = "Images";
pub const FULL_SPEED_KEY: &str = "Full Speed";
pub const SLOWMO_KEY: &str = "Slowmo";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharacterProfile {
    pub name: String,
    pub color: u32,
    pub icon_url: String,
}

/// One hit of a move, ready to display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub label: String,
    pub title: String,
    /// `(name, value)` pairs in record order.
    pub attribute_lines: Vec<(String, String)>,
    pub image_full_speed: String,
    pub image_slow: String,
}

impl Page {
    pub fn attribute_text(&self) -> String {
        self.attribute_lines
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Button label; unlabeled hits are numbered from 1.
    pub fn display_label(&self, index: usize) -> String {
        if self.label.trim().is_empty() {
            format!("Hit {}", index + 1)
        } else {
            self.label.clone()
        }
    }
}

/// Looks up a character's move and projects it into one page per hit.
///
/// Pages come back in the order the hits appear in the move file, and there
/// is always at least one. A record missing anything a page needs is
/// reported as malformed rather than displayed partially.
pub fn resolve(
    store: &DataStore,
    character: &str,
    attack: &str,
) -> Result<(CharacterProfile, Vec<Page>), LookupError> {
    let profile = profile(store, character)?;

    let moves = store.moves(&profile.name).map_err(|e| match e {
        LookupError::MoveNotFound { character, .. } => LookupError::MoveNotFound {
            character,
            attack: attack.trim().to_string(),
        },
        other => other,
    })?;

    let (move_name, record) = find_move(&moves, attack).ok_or_else(|| LookupError::MoveNotFound {
        character: profile.name.clone(),
        attack: attack.trim().to_string(),
    })?;

    let title = format!("{} {}", profile.name, move_name);
    let context = format!("{} / {}", profile.name, move_name);
    let pages = pages_from_record(&context, &title, record)?;
    Ok((profile, pages))
}

pub fn profile(store: &DataStore, character: &str) -> Result<CharacterProfile, LookupError> {
    let (name, entry) = store.character(character)?;
    let context = format!("characters.json / {name}");

    let entry = entry
        .as_object()
        .ok_or_else(|| LookupError::malformed(&context, "entry is not an object"))?;
    let color = entry
        .get("color")
        .ok_or_else(|| LookupError::malformed(&context, "missing color"))?;
    let color =
        parse_color(color).ok_or_else(|| LookupError::malformed(&context, "color is not RGB hex"))?;
    let icon_url = entry
        .get("icon")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| LookupError::malformed(&context, "missing icon"))?;

    Ok(CharacterProfile {
        name: name.to_string(),
        color,
        icon_url: icon_url.to_string(),
    })
}

fn find_move<'a>(moves: &'a Map<String, Value>, attack: &str) -> Option<(&'a str, &'a Value)> {
    let q = attack.trim();
    if q.is_empty() {
        return None;
    }
    moves
        .iter()
        .find(|(k, _)| k.as_str() == q)
        .or_else(|| moves.iter().find(|(k, _)| k.eq_ignore_ascii_case(q)))
        .map(|(k, v)| (k.as_str(), v))
}

pub(crate) fn pages_from_record(
    context: &str,
    title: &str,
    record: &Value,
) -> Result<Vec<Page>, LookupError> {
    let record = record
        .as_object()
        .ok_or_else(|| LookupError::malformed(context, "move record is not an object"))?;

    let hitboxes = map_field(context, record, HITBOXES_KEY)?;
    if hitboxes.is_empty() {
        return Err(LookupError::malformed(context, "move has no recorded hits"));
    }

    let images = map_field(context, record, IMAGES_KEY)?;
    let full_speed = map_field(context, images, FULL_SPEED_KEY)?;
    let slowmo = map_field(context, images, SLOWMO_KEY)?;

    let mut pages = Vec::with_capacity(hitboxes.len());
    for (label, attrs) in hitboxes {
        let attrs = attrs.as_object().ok_or_else(|| {
            LookupError::malformed(context, format!("hit {label:?} has no attribute mapping"))
        })?;
        let attribute_lines = attrs
            .iter()
            .map(|(k, v)| (k.clone(), value_text(v)))
            .collect();

        pages.push(Page {
            label: label.clone(),
            title: title.to_string(),
            attribute_lines,
            image_full_speed: image_url(context, full_speed, FULL_SPEED_KEY, label)?,
            image_slow: image_url(context, slowmo, SLOWMO_KEY, label)?,
        });
    }
    Ok(pages)
}

fn map_field<'a>(
    context: &str,
    m: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a Map<String, Value>, LookupError> {
    m.get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| LookupError::malformed(context, format!("missing {key:?} mapping")))
}

fn image_url(
    context: &str,
    variant: &Map<String, Value>,
    variant_key: &str,
    label: &str,
) -> Result<String, LookupError> {
    variant
        .get(label)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            LookupError::malformed(context, format!("no {variant_key:?} image for hit {label:?}"))
        })
}
