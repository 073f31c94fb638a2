//! Turns widget renders and stat cards into Discord embeds and buttons.
//!
//! Button custom ids carry everything needed to route a press back:
//! `fd:<widget id>:v:full|slow` and `fd:<widget id>:p:<page index>`.

use framedata::{CharacterProfile, Control, ControlAction, RenderedPayload, StatsCard, Variant};
use interactions::response::{EMBED_DESCRIPTION_MAX, clamp_chars};
use interactions::{ActionRow, Button, ButtonStyle, Embed, ResponseData};
use tracing::warn;

pub const CUSTOM_ID_PREFIX: &str = "fd";

pub fn encode_custom_id(widget_id: &str, action: &ControlAction) -> String {
    match action {
        ControlAction::SetVariant(v) => format!("{CUSTOM_ID_PREFIX}:{widget_id}:v:{}", v.as_str()),
        ControlAction::SelectPage(i) => format!("{CUSTOM_ID_PREFIX}:{widget_id}:p:{i}"),
    }
}

pub fn decode_custom_id(s: &str) -> Option<(&str, ControlAction)> {
    let mut it = s.split(':');
    if it.next()? != CUSTOM_ID_PREFIX {
        return None;
    }
    let widget_id = it.next().filter(|w| !w.is_empty())?;
    let action = match (it.next()?, it.next()?) {
        ("v", v) => ControlAction::SetVariant(Variant::parse(v)?),
        ("p", i) => ControlAction::SelectPage(i.parse().ok()?),
        _ => return None,
    };
    if it.next().is_some() {
        return None;
    }
    Some((widget_id, action))
}

/// Body text wrapped in a code block, clamped so the fence survives.
fn code_block(lang: &str, body: &str) -> String {
    let overhead = "```".len() * 2 + lang.len() + 1;
    let body = clamp_chars(body.to_string(), EMBED_DESCRIPTION_MAX - overhead);
    format!("```{lang}\n{body}```")
}

pub fn hitbox_embed(profile: &CharacterProfile, payload: &RenderedPayload, footer: &str) -> Embed {
    let heading = if payload.page_count > 1 {
        format!("{} ({})", payload.title, payload.label)
    } else {
        payload.title.clone()
    };
    Embed::new()
        .description(code_block("", &payload.body))
        .color(profile.color)
        .author(heading, Some(profile.icon_url.clone()))
        .footer(footer)
        .image(payload.image_url.clone())
}

/// Speed buttons are blurple, hit buttons gray; rows fill five at a time.
pub fn control_rows(widget_id: &str, controls: &[Control]) -> Vec<ActionRow> {
    let buttons = controls
        .iter()
        .map(|c| {
            let style = match c.action {
                ControlAction::SetVariant(_) => ButtonStyle::Primary,
                ControlAction::SelectPage(_) => ButtonStyle::Secondary,
            };
            Button::new(style, c.label.clone(), encode_custom_id(widget_id, &c.action))
        })
        .collect();

    let (rows, dropped) = ActionRow::pack(buttons);
    if !dropped.is_empty() {
        warn!(
            widget = widget_id,
            dropped = dropped.len(),
            "too many hit buttons for one message"
        );
    }
    rows
}

pub fn hitbox_message(
    widget_id: &str,
    profile: &CharacterProfile,
    payload: &RenderedPayload,
    controls: &[Control],
    footer: &str,
) -> ResponseData {
    ResponseData::embed(hitbox_embed(profile, payload, footer))
        .with_components(control_rows(widget_id, controls))
}

pub fn stats_embed(card: &StatsCard, footer: &str) -> Embed {
    Embed::new()
        .description(code_block("py", &card.text()))
        .color(card.color)
        .image(card.image_url.clone())
        .author(format!("{} Information", card.name), Some(card.icon_url.clone()))
        .footer(footer)
}
