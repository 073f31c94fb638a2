use serde::Deserialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "u8")]
pub enum InteractionType {
    Ping,
    ApplicationCommand,
    MessageComponent,
    Autocomplete,
    ModalSubmit,
    Unknown(u8),
}

impl From<u8> for InteractionType {
    fn from(t: u8) -> Self {
        match t {
            1 => InteractionType::Ping,
            2 => InteractionType::ApplicationCommand,
            3 => InteractionType::MessageComponent,
            4 => InteractionType::Autocomplete,
            5 => InteractionType::ModalSubmit,
            other => InteractionType::Unknown(other),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Interaction {
    pub id: String,
    #[serde(default)]
    pub application_id: String,
    #[serde(rename = "type")]
    pub kind: InteractionType,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub data: Option<InteractionData>,
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    /// Present for guild interactions.
    #[serde(default)]
    pub member: Option<Member>,
    /// Present for DM interactions.
    #[serde(default)]
    pub user: Option<User>,
}

impl Interaction {
    /// Whoever triggered the interaction, guild or DM.
    pub fn actor(&self) -> Option<&User> {
        self.member
            .as_ref()
            .and_then(|m| m.user.as_ref())
            .or(self.user.as_ref())
    }

    pub fn command_name(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.name.as_str()).filter(|n| !n.is_empty())
    }

    pub fn custom_id(&self) -> Option<&str> {
        self.data.as_ref().and_then(|d| d.custom_id.as_deref())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct InteractionData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
    #[serde(default)]
    pub custom_id: Option<String>,
    #[serde(default)]
    pub component_type: Option<u8>,
}

impl InteractionData {
    /// String value of a named option, looking through subcommand nesting.
    pub fn option_str(&self, name: &str) -> Option<&str> {
        find_option(&self.options, &|o: &CommandOption| o.name == name)
            .and_then(CommandOption::as_str)
    }

    /// The option the user is typing into during autocomplete.
    pub fn focused(&self) -> Option<&CommandOption> {
        find_option(&self.options, &|o: &CommandOption| o.focused)
    }
}

fn find_option<'a>(
    options: &'a [CommandOption],
    pred: &dyn Fn(&CommandOption) -> bool,
) -> Option<&'a CommandOption> {
    for o in options {
        if pred(o) {
            return Some(o);
        }
        if let Some(found) = find_option(&o.options, pred) {
            return Some(found);
        }
    }
    None
}

#[derive(Clone, Debug, Deserialize)]
pub struct CommandOption {
    pub name: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

impl CommandOption {
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(Value::as_str)
    }
}
