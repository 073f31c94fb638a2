/// Moves every character file is expected to carry, in menu order.
pub const STANDARD_MOVES: &[&str] = &[
    "Jab",
    "Dash Attack",
    "Down Tilt",
    "Up Tilt",
    "Forward Tilt",
    "Neutral Air",
    "Down Air",
    "Up Air",
    "Forward Air",
    "Back Air",
    "Down Smash",
    "Up Smash",
    "Forward Smash",
    "Up Special",
    "Neutral Special",
    "Down Special",
    "Side Special",
    "Grab",
    "Forward Throw",
    "Back Throw",
    "Up Throw",
    "Down Throw",
];

/// Command-name form of a character name: lowercase ASCII alphanumerics only.
/// `"Mr. Game and Watch"` becomes `"mrgameandwatch"`.
pub fn slug(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Registry of valid character names, in `characters.json` order.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Exact name, then case-insensitive name, then slug.
    pub fn find(&self, query: &str) -> Option<&str> {
        let q = query.trim();
        if q.is_empty() {
            return None;
        }
        if let Some(n) = self.names.iter().find(|n| n.as_str() == q) {
            return Some(n);
        }
        if let Some(n) = self.names.iter().find(|n| n.eq_ignore_ascii_case(q)) {
            return Some(n);
        }
        self.by_slug(&slug(q))
    }

    pub fn by_slug(&self, s: &str) -> Option<&str> {
        if s.is_empty() {
            return None;
        }
        self.names
            .iter()
            .find(|n| slug(n) == s)
            .map(|n| n.as_str())
    }

    /// Case-insensitive substring match, roster order, capped at `limit`.
    pub fn suggest(&self, partial: &str, limit: usize) -> Vec<&str> {
        suggest(self.names.iter().map(|n| n.as_str()), partial, limit)
    }
}

pub fn suggest<'a>(
    candidates: impl Iterator<Item = &'a str>,
    partial: &str,
    limit: usize,
) -> Vec<&'a str> {
    let needle = partial.trim().to_lowercase();
    candidates
        .filter(|c| needle.is_empty() || c.to_lowercase().contains(&needle))
        .take(limit)
        .collect()
}
