use std::collections::HashSet;

use ed25519_dalek::VerifyingKey;
use framedata::roster::STANDARD_MOVES;
use framedata::{DataStore, resolve_stats};
use interactions::response::MAX_AUTOCOMPLETE_CHOICES;
use interactions::{
    Choice, Interaction, InteractionData, InteractionResponse, InteractionType, ResponseData,
};
use tracing::{info, warn};

use crate::channel_log::ChannelLog;
use crate::hitbox::{self, HitboxDisplay};
use crate::widgets::WidgetRegistry;
use crate::{info as info_cmd, render};

#[derive(Clone, Debug)]
pub struct Settings {
    /// Footer on every data embed; names the game patch the data matches.
    pub footer: String,
}

/// Everything a request handler needs, built once in `main`.
pub struct AppContext {
    pub store: DataStore,
    pub widgets: WidgetRegistry<HitboxDisplay>,
    pub channel_log: ChannelLog,
    pub public_key: VerifyingKey,
    pub settings: Settings,
}

impl AppContext {
    /// `None` means the interaction type is not one this bot answers.
    pub fn handle(&self, interaction: &Interaction) -> Option<InteractionResponse> {
        match interaction.kind {
            InteractionType::Ping => Some(InteractionResponse::pong()),
            InteractionType::ApplicationCommand => Some(self.command(interaction)),
            InteractionType::MessageComponent => Some(hitbox::press(self, interaction)),
            InteractionType::Autocomplete => Some(self.autocomplete(interaction)),
            other => {
                warn!(id = %interaction.id, kind = ?other, "unsupported interaction type");
                None
            }
        }
    }

    fn command(&self, interaction: &Interaction) -> InteractionResponse {
        let empty = InteractionData::default();
        let data = interaction.data.as_ref().unwrap_or(&empty);
        let name = data.name.as_str();
        let user = interaction.actor().map(|u| u.id.as_str()).unwrap_or("-");
        info!(command = name, user, guild = ?interaction.guild_id, "command");
        self.channel_log.command(name, interaction.guild_id.as_deref());

        match name {
            "hitbox" => match (data.option_str("character"), data.option_str("attack")) {
                (Some(c), Some(a)) => hitbox::command(self, interaction, c, a),
                _ => missing_option("character and attack"),
            },
            "stats" => match data.option_str("character") {
                Some(c) => self.stats(c),
                None => missing_option("character"),
            },
            _ => {
                if let Some(resp) = info_cmd::reply(name) {
                    return resp;
                }
                // One command per roster character, named by its slug.
                if let Some(character) = self.store.roster().by_slug(name) {
                    return match data.option_str("attack") {
                        Some(a) => hitbox::command(self, interaction, character, a),
                        None => missing_option("attack"),
                    };
                }
                warn!(command = name, "unknown command");
                InteractionResponse::ephemeral_text(format!("Unknown command: {name}"))
            }
        }
    }

    fn stats(&self, character: &str) -> InteractionResponse {
        match resolve_stats(&self.store, character) {
            Ok(card) => InteractionResponse::message(ResponseData::embed(render::stats_embed(
                &card,
                &self.settings.footer,
            ))),
            Err(e) => hitbox::lookup_failure(self, &e),
        }
    }

    fn autocomplete(&self, interaction: &Interaction) -> InteractionResponse {
        let Some(data) = interaction.data.as_ref() else {
            return InteractionResponse::autocomplete(Vec::new());
        };
        let Some(focused) = data.focused() else {
            return InteractionResponse::autocomplete(Vec::new());
        };
        let partial = focused.as_str().unwrap_or("");

        let choices = match focused.name.as_str() {
            "character" => self
                .store
                .roster()
                .suggest(partial, MAX_AUTOCOMPLETE_CHOICES)
                .into_iter()
                .map(Choice::same)
                .collect(),
            "attack" => {
                // Slug commands carry the character in their name.
                let query = data.option_str("character").unwrap_or(data.name.as_str());
                let character = self.store.roster().find(query);
                self.attack_choices(character, partial)
            }
            _ => Vec::new(),
        };
        InteractionResponse::autocomplete(choices)
    }

    /// The character's own moves first, then whatever standard names it lacks.
    fn attack_choices(&self, character: Option<&str>, partial: &str) -> Vec<Choice> {
        let own = character
            .map(|c| self.store.move_names(c))
            .unwrap_or_default();
        let mut seen = HashSet::new();
        let candidates = own
            .iter()
            .map(String::as_str)
            .chain(STANDARD_MOVES.iter().copied())
            .filter(|m| seen.insert(m.to_lowercase()));
        framedata::roster::suggest(candidates, partial, MAX_AUTOCOMPLETE_CHOICES)
            .into_iter()
            .map(Choice::same)
            .collect()
    }
}

fn missing_option(what: &str) -> InteractionResponse {
    InteractionResponse::ephemeral_text(format!("Missing option: {what}"))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;
    use std::time::Duration;

    use ed25519_dalek::SigningKey;
    use framedata::DataStore;
    use interactions::Interaction;
    use serde_json::{Value, json};

    use super::{AppContext, Settings};
    use crate::channel_log::ChannelLog;
    use crate::widgets::WidgetRegistry;

    pub const OWNER: &str = "100";
    pub const STRANGER: &str = "200";

    pub fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[9u8; 32])
    }

    fn write_data(root: &Path) {
        std::fs::create_dir_all(root.join("info")).unwrap();
        std::fs::create_dir_all(root.join("stats")).unwrap();
        std::fs::write(
            root.join("characters.json"),
            r#"{
                "A": { "color": "0xff0000", "icon": "https://img.example/a.png" },
                "Bandana Dee": { "color": "F5C400", "icon": "https://img.example/bd.png" }
            }"#,
        )
        .unwrap();
        std::fs::write(
            root.join("info").join("A.json"),
            r#"{
                "Jab": {
                    "Hitboxes": {
                        "Hit 1": { "Damage": "5%", "Angle": "45°" },
                        "Hit 2": { "Damage": "5%", "Angle": "45°" }
                    },
                    "Images": {
                        "Full Speed": { "Hit 1": "https://img.example/jab1.gif", "Hit 2": "https://img.example/jab2.gif" },
                        "Slowmo": { "Hit 1": "https://img.example/jab1s.gif", "Hit 2": "https://img.example/jab2s.gif" }
                    }
                },
                "Spin Attack": {
                    "Hitboxes": { "Hit 1": { "Damage": "9%" } },
                    "Images": {
                        "Full Speed": { "Hit 1": "https://img.example/spin.gif" },
                        "Slowmo": { "Hit 1": "https://img.example/spins.gif" }
                    }
                }
            }"#,
        )
        .unwrap();
        std::fs::write(
            root.join("stats").join("stats.json"),
            r##"{
                "A": {
                    "Stats": { "Weight": 90, "Jumps": 2 },
                    "Embed Info": { "color": "#ff0000", "image": "https://img.example/a-idle.gif", "icon": "https://img.example/a.png" }
                }
            }"##,
        )
        .unwrap();
    }

    pub fn context() -> (tempfile::TempDir, AppContext) {
        let dir = tempfile::tempdir().unwrap();
        write_data(dir.path());
        let ctx = AppContext {
            store: DataStore::open(dir.path()).unwrap(),
            widgets: WidgetRegistry::new(Duration::from_secs(180)),
            channel_log: ChannelLog::disabled(),
            public_key: signing_key().verifying_key(),
            settings: Settings {
                footer: "Up to date as of patch 1.4.0.1".to_string(),
            },
        };
        (dir, ctx)
    }

    fn interaction(v: Value) -> Interaction {
        serde_json::from_value(v).unwrap()
    }

    pub fn command(id: &str, user: &str, name: &str, options: Value) -> Interaction {
        interaction(json!({
            "id": id,
            "type": 2,
            "guild_id": "900",
            "member": { "user": { "id": user, "username": "u" } },
            "data": { "name": name, "options": options }
        }))
    }

    pub fn press(id: &str, user: &str, custom_id: &str) -> Interaction {
        interaction(json!({
            "id": id,
            "type": 3,
            "user": { "id": user, "username": "u" },
            "data": { "custom_id": custom_id, "component_type": 2 }
        }))
    }

    pub fn autocomplete(name: &str, options: Value) -> Interaction {
        interaction(json!({
            "id": "ac",
            "type": 4,
            "data": { "name": name, "options": options }
        }))
    }
}
