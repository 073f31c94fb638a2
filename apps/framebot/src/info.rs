//! Fixed informational replies: links, universal mechanics, replay paths.

use interactions::{Embed, InteractionResponse, ResponseData};

pub const COMMANDS: &[&str] = &[
    "about",
    "feedback",
    "craft",
    "angles",
    "aura",
    "meteorsmash",
    "teching",
    "clanking",
    "replays",
];

const FEEDBACK_URL: &str = "https://docs.google.com/forms/d/e/1FAIpQLSdaIXOACep8Rgo4YwTEuOPfs6lWYnPWXHYvYHgVpWHrxbRY2g/viewform?usp=header";
const CRAFT_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/19OQka-j6OdKqjibINSZUQ5mrtNyDE2xrD4fqmk1orvA/edit?gid=1085478440#gid=1085478440";

pub fn reply(name: &str) -> Option<InteractionResponse> {
    let resp = match name {
        "about" => ephemeral(about()),
        "feedback" => ephemeral(
            Embed::new()
                .url(FEEDBACK_URL)
                .title("Feedback Form")
                .description("Use this link to submit feedback to the developers of the bot"),
        ),
        "craft" => public(
            Embed::new()
                .url(CRAFT_SHEET_URL)
                .title("Craft's Framedata Directory")
                .description(
                    "Informational data collected and maintained by craftyfurry. Contains more \
                     info about each move than the bot does. Not all characters are included.",
                )
                .thumbnail("https://i.imgur.com/ScoQwQk.png"),
        ),
        "angles" => public(
            Embed::new()
                .description(
                    "```py\n\
                     337° to 22°  :  Up & Down \n \
                     22° to 23°  :  Down & Down+Away\n \
                     23° to 44°  :  Down+Away\n \
                     45°         :  Down+Away & Up+In\n \
                     46° to 67°  :  Up+In\n \
                     67° to 68°  :  In & Up+In\n \
                     68° to 112° :  In & Away```",
                )
                .author("The DI which will most influence the direction you're sent in", None),
        ),
        "aura" => public(
            Embed::new()
                .description(
                    "\n**Aura Multiplier** ```ml\n\
                     When damage < 40%\n\
                     Aura = 0.8 + damage/200\n\n\
                     When damage < 130%\n\
                     Aura = 1 + (damage-40)/300\n\n\
                     When damage > 130%\n\
                     Aura = 1.3```",
                )
                .author("Aura Multiplier Formula and Graph", None)
                .image("https://i.imgur.com/w0DIwDs.png"),
        ),
        "meteorsmash" => public(
            Embed::new()
                .description(
                    "**Angles:**\n\
                     Any angle that sends between 250° and 290°.\n\
                     Any move which sends outside this range is considered a spike.\n\n\
                     Meteor cancelling is when a double jump or up special is performed while in \
                     hitstun from a meteor smash. Meteor cancelling can be performed after 9 \
                     frames of entering hitstun (not including hitpause, hitlag, etc). \
                     Attempting a meteor cancel too early results in a lockout and you cannot \
                     attempt to meteor cancel again until you leave hitstun.",
                )
                .author("Meteor Smash Info", None)
                .image("https://i.imgur.com/ljVnFpg.png"),
        ),
        "teching" => public(
            Embed::new()
                .description(
                    "**Tech on Surface**\n\
                     There is a 10 frame buffer to allow you to tech. \n\
                     Going out of hitstun resets the buffer window.\n\
                     \n**Tech Lockout**\n\
                     After attempting a tech and failing you are unable to tech for 12 frames\n\
                     \n**Ground Bounce**\n\
                     When missing the tech on a meteor smash you will bounce on the stage while \
                     still being in hitstun. The window to tech the bounce is 1 frame.\n\
                     \n**Wall Tech**\n\
                     Wall techs recover instantly, if teching off a wall gravity takes effect \
                     immediately.",
                )
                .author("Universal Teching Frame Data", None),
        ),
        "clanking" => public(
            Embed::new()
                .description(
                    "**Clanking**\n\
                     If two attacks collide and the damage values are within 8% of each other \
                     both characters will recoil.\n\
                     If the clank involves a projectile the projectile will simply be cancelled \
                     out without causing recoil.\n\
                     Physical air attacks cannot clank with other physical attacks.\n\
                     \n**Out-Prioritizing**\n\
                     When the difference in damage is greater than 8% the stronger attack \
                     cancels out the weaker attack.\n\
                     Between physical attacks the weaker one will enter recoil, while the \
                     stronger attack will continue.\n\
                     Between two projectiles the stronger projectile will cancel out the weaker \
                     one and continue as normal.\n\
                     Between a projectile and physical attack a stronger projectile will simply \
                     ignore the attack, while a weaker projectile will be cancelled out without \
                     causing a clank.",
                )
                .author("Universal Clanking Information", None),
        ),
        "replays" => public(
            Embed::new()
                .author("How to Access Your Auto-Saved Replays", None)
                .field(
                    "When Using Windows",
                    "1. Press `Win + R`\n\
                     2. Put in the following: ```\"C:\\Users\\%username%\\SSF2Replays\"```",
                    false,
                )
                .field(
                    "When Using Mac",
                    "The location of your autosaved replays will be something like:\n\
                     ```Mac SSD > Users > <username> > SSF2Replays```",
                    false,
                ),
        ),
        _ => return None,
    };
    Some(resp)
}

fn about() -> Embed {
    Embed::new()
        .description(
            "A Discord bot based off the Rivals of Aether Academy Mentorbot 3.0, modified by \
             justsomeguy__",
        )
        .author("About SSF2 Framedata", None)
        .field(
            "Developed by blair, adapted by justsomeguy",
            "https://github.com/blair-c/Mentorbot3.0\nhttps://github.com/JustSomeGuy2295/ssf2framedata2",
            false,
        )
        .field(
            "Data curated by the SSF2 Framedata team and craftyfurry",
            "\u{200b}",
            false,
        )
        .field(
            "Profile picture made by Abby (a.k.a. abbeast)",
            "https://www.instagram.com/daabbeast",
            false,
        )
}

fn public(embed: Embed) -> InteractionResponse {
    InteractionResponse::message(ResponseData::embed(embed))
}

fn ephemeral(embed: Embed) -> InteractionResponse {
    InteractionResponse::message(ResponseData::embed(embed).ephemeral())
}
