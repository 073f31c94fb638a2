use serde::Serialize;

/// Message flag: only the interacting user sees the message.
pub const FLAG_EPHEMERAL: u64 = 1 << 6;

pub const EMBED_DESCRIPTION_MAX: usize = 4096;
pub const MAX_AUTOCOMPLETE_CHOICES: usize = 25;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum ResponseType {
    Pong = 1,
    ChannelMessage = 4,
    UpdateMessage = 7,
    AutocompleteResult = 8,
}

impl From<ResponseType> for u8 {
    fn from(t: ResponseType) -> u8 {
        t as u8
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: ResponseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self {
            kind: ResponseType::Pong,
            data: None,
        }
    }

    pub fn message(data: ResponseData) -> Self {
        Self {
            kind: ResponseType::ChannelMessage,
            data: Some(data),
        }
    }

    /// Edits the message the pressed component belongs to.
    pub fn update(data: ResponseData) -> Self {
        Self {
            kind: ResponseType::UpdateMessage,
            data: Some(data),
        }
    }

    pub fn ephemeral_text(text: impl Into<String>) -> Self {
        Self::message(ResponseData::text(text).ephemeral())
    }

    pub fn autocomplete(mut choices: Vec<Choice>) -> Self {
        choices.truncate(MAX_AUTOCOMPLETE_CHOICES);
        Self {
            kind: ResponseType::AutocompleteResult,
            data: Some(ResponseData {
                choices: Some(choices),
                ..ResponseData::default()
            }),
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        self.data
            .as_ref()
            .and_then(|d| d.flags)
            .is_some_and(|f| f & FLAG_EPHEMERAL != 0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResponseData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ActionRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
}

impl ResponseData {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ..Self::default()
        }
    }

    pub fn with_components(mut self, rows: Vec<ActionRow>) -> Self {
        self.components = Some(rows);
        self
    }

    pub fn ephemeral(mut self) -> Self {
        self.flags = Some(self.flags.unwrap_or(0) | FLAG_EPHEMERAL);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedMedia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedMedia>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Clamped to the platform's description limit.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(clamp_chars(text.into(), EMBED_DESCRIPTION_MAX));
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn color(mut self, rgb: u32) -> Self {
        self.color = Some(rgb);
        self
    }

    pub fn author(mut self, name: impl Into<String>, icon_url: Option<String>) -> Self {
        self.author = Some(EmbedAuthor {
            name: name.into(),
            icon_url,
        });
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(EmbedFooter { text: text.into() });
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(EmbedMedia { url: url.into() });
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(EmbedMedia { url: url.into() });
        self
    }

    pub fn field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmbedMedia {
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum ButtonStyle {
    Primary = 1,
    Secondary = 2,
}

impl From<ButtonStyle> for u8 {
    fn from(s: ButtonStyle) -> u8 {
        s as u8
    }
}

const COMPONENT_ACTION_ROW: u8 = 1;
const COMPONENT_BUTTON: u8 = 2;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionRow {
    #[serde(rename = "type")]
    kind: u8,
    pub components: Vec<Button>,
}

impl ActionRow {
    pub const MAX_BUTTONS: usize = 5;
    pub const MAX_ROWS: usize = 5;

    pub fn new(components: Vec<Button>) -> Self {
        Self {
            kind: COMPONENT_ACTION_ROW,
            components,
        }
    }

    /// Packs buttons into rows of five. Buttons past the last row are
    /// returned separately so callers can log what was dropped.
    pub fn pack(buttons: Vec<Button>) -> (Vec<ActionRow>, Vec<Button>) {
        let cap = Self::MAX_BUTTONS * Self::MAX_ROWS;
        let mut buttons = buttons;
        let dropped = if buttons.len() > cap {
            buttons.split_off(cap)
        } else {
            Vec::new()
        };
        let rows = buttons
            .chunks(Self::MAX_BUTTONS)
            .map(|c| ActionRow::new(c.to_vec()))
            .collect();
        (rows, dropped)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Button {
    #[serde(rename = "type")]
    kind: u8,
    pub style: ButtonStyle,
    pub label: String,
    pub custom_id: String,
}

impl Button {
    pub const LABEL_MAX: usize = 80;

    pub fn new(style: ButtonStyle, label: impl Into<String>, custom_id: impl Into<String>) -> Self {
        Self {
            kind: COMPONENT_BUTTON,
            style,
            label: clamp_chars(label.into(), Self::LABEL_MAX),
            custom_id: custom_id.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Choice {
    pub name: String,
    pub value: String,
}

impl Choice {
    pub fn same(s: impl Into<String>) -> Self {
        let s = s.into();
        Self {
            name: s.clone(),
            value: s,
        }
    }
}

/// Truncates to at most `max` characters, marking the cut with an ellipsis.
pub fn clamp_chars(s: String, max: usize) -> String {
    if s.chars().count() <= max {
        return s;
    }
    let mut out = s.chars().take(max.saturating_sub(1)).collect::<String>();
    out.push('…');
    out
}
