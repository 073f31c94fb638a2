use std::sync::Arc;

use anyhow::Context;
use interactions::response::clamp_chars;
use serde::Serialize;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";
const MESSAGE_MAX: usize = 2000;

/// Mirrors command usage and operator-facing errors into Discord channels.
///
/// Posting happens on a spawned task; the interaction reply never waits on
/// it. Without a bot token every call is a no-op.
#[derive(Clone, Default)]
pub struct ChannelLog {
    inner: Option<Arc<Inner>>,
}

struct Inner {
    http: reqwest::Client,
    api_base: String,
    token: String,
    error_channel: Option<String>,
    command_channel: Option<String>,
}

#[derive(Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
}

impl ChannelLog {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn new(
        token: String,
        error_channel: Option<String>,
        command_channel: Option<String>,
    ) -> Self {
        Self {
            inner: Some(Arc::new(Inner {
                http: reqwest::Client::new(),
                api_base: DEFAULT_API_BASE.to_string(),
                token,
                error_channel,
                command_channel,
            })),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    pub fn command(&self, name: &str, guild: Option<&str>) {
        let Some(inner) = &self.inner else {
            return;
        };
        let guild = guild.unwrap_or("DM");
        self.post(
            inner.command_channel.clone(),
            format!("Slash command '{name}' used in '{guild}'"),
        );
    }

    pub fn error(&self, text: impl Into<String>) {
        let Some(inner) = &self.inner else {
            return;
        };
        self.post(inner.error_channel.clone(), text.into());
    }

    fn post(&self, channel: Option<String>, content: String) {
        let (Some(inner), Some(channel)) = (self.inner.clone(), channel) else {
            return;
        };
        let Ok(rt) = tokio::runtime::Handle::try_current() else {
            debug!("no runtime; channel log skipped");
            return;
        };
        rt.spawn(async move {
            if let Err(e) = send(&inner, &channel, &content).await {
                warn!(channel = %channel, err = %e, "channel log post failed");
            }
        });
    }
}

async fn send(inner: &Inner, channel: &str, content: &str) -> anyhow::Result<()> {
    let url = format!(
        "{}/channels/{channel}/messages",
        inner.api_base.trim_end_matches('/')
    );
    let content = clamp_chars(content.to_string(), MESSAGE_MAX);
    let resp = inner
        .http
        .post(url)
        .header("Authorization", format!("Bot {}", inner.token))
        .json(&CreateMessage { content: &content })
        .send()
        .await
        .context("send")?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("create message http={} body={body}", status.as_u16());
    }
    Ok(())
}
