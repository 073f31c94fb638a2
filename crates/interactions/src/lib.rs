//! `interactions`: the slice of Discord's HTTP interactions API the bot speaks.
//!
//! Discord POSTs each interaction as JSON to the bot's endpoint, signed with
//! the application's Ed25519 key; the bot answers in the HTTP response body.
//! This crate holds the payload types and the signature check. It knows
//! nothing about frame data.

pub mod model;
pub mod response;
pub mod verify;

pub use model::{CommandOption, Interaction, InteractionData, InteractionType, User};
pub use response::{
    ActionRow, Button, ButtonStyle, Choice, Embed, EmbedAuthor, EmbedField, EmbedFooter,
    EmbedMedia, InteractionResponse, ResponseData, ResponseType,
};
pub use verify::{VerifyError, parse_public_key, verify_request};
