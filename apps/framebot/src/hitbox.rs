use framedata::{CharacterProfile, LookupError, UserId, Widget, WidgetError};
use interactions::{Interaction, InteractionResponse, ResponseData};
use tracing::{debug, error, warn};

use crate::app::AppContext;
use crate::render;
use crate::widgets::lock;

pub const NOT_ALLOWED: &str = "You're not allowed to use this button.";
pub const EXPIRED: &str = "This display has expired. Run the command again.";
pub const GENERIC_FAILURE: &str = "Something went wrong with that request.";

/// A live frame-data message: the character it shows plus the page widget.
#[derive(Debug)]
pub struct HitboxDisplay {
    pub profile: CharacterProfile,
    pub widget: Widget,
}

/// Resolves `character`/`attack`, registers a widget owned by the invoking
/// user, and replies with its first page.
pub fn command(
    ctx: &AppContext,
    interaction: &Interaction,
    character: &str,
    attack: &str,
) -> InteractionResponse {
    let Some(actor) = interaction.actor() else {
        warn!(id = %interaction.id, "command without a user");
        return InteractionResponse::ephemeral_text(GENERIC_FAILURE);
    };

    let (profile, pages) = match framedata::resolve(&ctx.store, character, attack) {
        Ok(v) => v,
        Err(e) => return lookup_failure(ctx, &e),
    };
    let widget = match Widget::new(pages, UserId::new(actor.id.as_str())) {
        Ok(w) => w,
        Err(e) => {
            error!(character, attack, err = %e, "widget construction failed");
            ctx.channel_log.error(format!("hitbox {character} / {attack}: {e}"));
            return InteractionResponse::message(ResponseData::text(GENERIC_FAILURE));
        }
    };

    let data = render::hitbox_message(
        &interaction.id,
        &profile,
        &widget.render(),
        &widget.controls(),
        &ctx.settings.footer,
    );
    ctx.widgets.insert(interaction.id.clone(), HitboxDisplay { profile, widget });
    debug!(widget = %interaction.id, live = ctx.widgets.len(), "widget registered");
    InteractionResponse::message(data)
}

/// Routes a button press to the widget it belongs to.
pub fn press(ctx: &AppContext, interaction: &Interaction) -> InteractionResponse {
    let custom_id = interaction.custom_id();
    let Some((widget_id, action)) = custom_id.and_then(render::decode_custom_id) else {
        warn!(id = %interaction.id, ?custom_id, "unrecognized component");
        return InteractionResponse::ephemeral_text(GENERIC_FAILURE);
    };
    let Some(actor) = interaction.actor() else {
        warn!(id = %interaction.id, "component press without a user");
        return InteractionResponse::ephemeral_text(GENERIC_FAILURE);
    };
    let Some(entry) = ctx.widgets.get(widget_id) else {
        debug!(widget = widget_id, "press on expired widget");
        return InteractionResponse::ephemeral_text(EXPIRED);
    };

    let mut guard = lock(&entry);
    let shown = &mut *guard;
    match shown.widget.apply(&UserId::new(actor.id.as_str()), &action) {
        Ok(payload) => InteractionResponse::update(render::hitbox_message(
            widget_id,
            &shown.profile,
            &payload,
            &shown.widget.controls(),
            &ctx.settings.footer,
        )),
        Err(WidgetError::Unauthorized { actor }) => {
            let owner = shown.widget.owner();
            debug!(widget = widget_id, %actor, %owner, "press by non-owner");
            InteractionResponse::ephemeral_text(NOT_ALLOWED)
        }
        Err(e) => {
            error!(widget = widget_id, err = %e, "widget rejected press");
            ctx.channel_log.error(format!("widget {widget_id}: {e}"));
            InteractionResponse::ephemeral_text(GENERIC_FAILURE)
        }
    }
}

/// Reply for a failed lookup. Not-found is the user's typo; malformed data is ours.
pub fn lookup_failure(ctx: &AppContext, e: &LookupError) -> InteractionResponse {
    if e.is_not_found() {
        debug!(err = %e, "lookup miss");
    } else {
        error!(err = %e, "lookup failed");
        ctx.channel_log.error(e.to_string());
    }
    InteractionResponse::message(ResponseData::text(e.user_message()))
}
