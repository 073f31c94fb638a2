//! `framedata`: frame data lookups over the static JSON store, plus the
//! state machine behind the paged hitbox display.
//!
//! Layout of the store (all paths relative to the data directory):
//! - `characters.json`: roster, display color and icon per character
//! - `info/<Character>.json`: moves, per-hit attributes and image pairs
//! - `stats/stats.json`: per-character stat sheets (optional)
//!
//! Nothing here touches the network. The store is read-only after startup
//! apart from a read-through cache of per-character move files.

pub mod resolve;
pub mod roster;
pub mod stats;
pub mod store;
pub mod widget;

pub use resolve::{CharacterProfile, Page, resolve};
pub use roster::Roster;
pub use stats::{StatsCard, resolve_stats};
pub use store::DataStore;
pub use widget::{Control, ControlAction, RenderedPayload, UserId, Variant, Widget, WidgetError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    CharacterNotFound(String),
    MoveNotFound { character: String, attack: String },
    /// A roster character the stats sheet has no record for.
    StatsNotFound(String),
    /// A record exists but is missing something a display needs.
    MalformedData { context: String, reason: String },
}

impl LookupError {
    pub fn malformed(context: impl Into<String>, reason: impl Into<String>) -> Self {
        LookupError::MalformedData {
            context: context.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LookupError::CharacterNotFound(_)
                | LookupError::MoveNotFound { .. }
                | LookupError::StatsNotFound(_)
        )
    }

    /// Text safe to show the invoking user. Malformed data stays generic.
    pub fn user_message(&self) -> String {
        match self {
            LookupError::CharacterNotFound(c) => format!("No such character: {c}"),
            LookupError::MoveNotFound { character, attack } => {
                format!("No such move for {character}: {attack}")
            }
            LookupError::StatsNotFound(c) => format!("No stats recorded for {c} yet."),
            LookupError::MalformedData { .. } => {
                "Something went wrong loading that data. The maintainers have been notified."
                    .to_string()
            }
        }
    }
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::CharacterNotFound(c) => write!(f, "character not found: {c:?}"),
            LookupError::MoveNotFound { character, attack } => {
                write!(f, "move not found: {character:?} / {attack:?}")
            }
            LookupError::StatsNotFound(c) => write!(f, "no stats record: {c:?}"),
            LookupError::MalformedData { context, reason } => {
                write!(f, "malformed data in {context}: {reason}")
            }
        }
    }
}

impl std::error::Error for LookupError {}
