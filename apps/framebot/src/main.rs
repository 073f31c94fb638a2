use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use framedata::DataStore;
use interactions::parse_public_key;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{Level, info, warn};

mod app;
mod channel_log;
mod hitbox;
mod http;
mod info;
mod render;
mod widgets;

use app::{AppContext, Settings};
use channel_log::ChannelLog;
use widgets::WidgetRegistry;

const DEFAULT_PATCH_NOTE: &str = "Up to date as of patch 1.4.0.1";

fn usage_and_exit() -> ! {
    eprintln!(
        "framebot\n\n\
USAGE:\n  framebot [--bind HOST:PORT] [--data-dir PATH] [--keys PATH] [--public-key HEX] [--widget-timeout-s N]\n\n\
ENV:\n  BIND                   default 127.0.0.1:8787\n  DATA_DIR               default data\n  KEYS_PATH              optional KEYS.json (TOKEN, PUBLIC_KEY, ERRORLOG, COMMANDLOG)\n  DISCORD_PUBLIC_KEY     required unless in KEYS.json\n  DISCORD_BOT_TOKEN      optional; enables channel logging\n  ERRORLOG_CHANNEL_ID    optional\n  COMMANDLOG_CHANNEL_ID  optional\n  WIDGET_TIMEOUT_S       default 180\n  PATCH_NOTE             default \"{DEFAULT_PATCH_NOTE}\"\n"
    );
    std::process::exit(2);
}

#[derive(Clone, Debug)]
struct Config {
    bind: SocketAddr,
    data_dir: PathBuf,
    keys_path: Option<PathBuf>,
    public_key: Option<String>,
    bot_token: Option<String>,
    errorlog_channel: Option<String>,
    commandlog_channel: Option<String>,
    widget_timeout: Duration,
    patch_note: String,
}

fn parse_args() -> Config {
    let mut bind: SocketAddr = std::env::var("BIND")
        .unwrap_or_else(|_| "127.0.0.1:8787".to_string())
        .parse()
        .unwrap_or_else(|_| usage_and_exit());

    let mut data_dir: PathBuf = std::env::var("DATA_DIR")
        .unwrap_or_else(|_| "data".to_string())
        .into();

    let mut keys_path: Option<PathBuf> = std::env::var("KEYS_PATH").ok().map(Into::into);
    let mut public_key = env_nonempty("DISCORD_PUBLIC_KEY");

    let mut widget_timeout_s: u64 = std::env::var("WIDGET_TIMEOUT_S")
        .ok()
        .map(|v| v.parse().unwrap_or_else(|_| usage_and_exit()))
        .unwrap_or(180);

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--bind" => {
                let v = it.next().unwrap_or_else(|| usage_and_exit());
                bind = v.parse().unwrap_or_else(|_| usage_and_exit());
            }
            "--data-dir" => {
                let v = it.next().unwrap_or_else(|| usage_and_exit());
                data_dir = v.into();
            }
            "--keys" => {
                let v = it.next().unwrap_or_else(|| usage_and_exit());
                keys_path = Some(v.into());
            }
            "--public-key" => {
                public_key = Some(it.next().unwrap_or_else(|| usage_and_exit()));
            }
            "--widget-timeout-s" => {
                let v = it.next().unwrap_or_else(|| usage_and_exit());
                widget_timeout_s = v.parse().unwrap_or_else(|_| usage_and_exit());
            }
            _ => usage_and_exit(),
        }
    }
    if widget_timeout_s == 0 {
        usage_and_exit();
    }

    Config {
        bind,
        data_dir,
        keys_path,
        public_key,
        bot_token: env_nonempty("DISCORD_BOT_TOKEN"),
        errorlog_channel: env_nonempty("ERRORLOG_CHANNEL_ID"),
        commandlog_channel: env_nonempty("COMMANDLOG_CHANNEL_ID"),
        widget_timeout: Duration::from_secs(widget_timeout_s),
        patch_note: env_nonempty("PATCH_NOTE").unwrap_or_else(|| DEFAULT_PATCH_NOTE.to_string()),
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Secrets file kept next to the bot; environment and flags win over it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
struct KeysFile {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    public_key: Option<String>,
    #[serde(default, deserialize_with = "snowflake")]
    errorlog: Option<String>,
    #[serde(default, deserialize_with = "snowflake")]
    commandlog: Option<String>,
}

/// Channel ids show up both as JSON numbers and strings.
fn snowflake<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn load_keys(path: &Path) -> anyhow::Result<KeysFile> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

fn build_context(cfg: &Config) -> anyhow::Result<AppContext> {
    let keys = match &cfg.keys_path {
        Some(p) => load_keys(p)?,
        None => KeysFile::default(),
    };

    let public_key_hex = cfg
        .public_key
        .clone()
        .or(keys.public_key)
        .context("DISCORD_PUBLIC_KEY (or PUBLIC_KEY in KEYS.json) is required")?;
    let public_key = parse_public_key(&public_key_hex).context("DISCORD_PUBLIC_KEY")?;

    let store = DataStore::open(&cfg.data_dir)
        .with_context(|| format!("open data store {}", cfg.data_dir.display()))?;

    let channel_log = match cfg.bot_token.clone().or(keys.token) {
        Some(token) => ChannelLog::new(
            token,
            cfg.errorlog_channel.clone().or(keys.errorlog),
            cfg.commandlog_channel.clone().or(keys.commandlog),
        ),
        None => {
            warn!("no bot token; channel logging disabled");
            ChannelLog::disabled()
        }
    };

    info!(
        characters = store.roster().len(),
        data_dir = %cfg.data_dir.display(),
        channel_log = channel_log.is_enabled(),
        "data store loaded"
    );

    Ok(AppContext {
        store,
        widgets: WidgetRegistry::new(cfg.widget_timeout),
        channel_log,
        public_key,
        settings: Settings {
            footer: cfg.patch_note.clone(),
        },
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with_target(false)
        .with_max_level(Level::INFO)
        .init();

    let cfg = parse_args();
    let ctx = Arc::new(build_context(&cfg)?);
    info!(
        bind = %cfg.bind,
        widget_timeout_s = ctx.widgets.ttl().as_secs(),
        "starting framebot"
    );
    let app = http::router(ctx);

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        let _ = shutdown_tx.send(true);
        info!("shutdown signal received");
    });

    let listener = tokio::net::TcpListener::bind(cfg.bind)
        .await
        .with_context(|| format!("bind {}", cfg.bind))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown(shutdown_rx))
        .await
        .context("http server failed")?;
    Ok(())
}

async fn wait_for_shutdown(mut rx: tokio::sync::watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::KeysFile;

    #[test]
    fn keys_file_accepts_numeric_and_string_channel_ids() {
        let k: KeysFile = serde_json::from_str(
            r#"{ "TOKEN": "t", "ERRORLOG": 1234567890123456789, "COMMANDLOG": "42" }"#,
        )
        .unwrap();
        assert_eq!(k.token.as_deref(), Some("t"));
        assert_eq!(k.errorlog.as_deref(), Some("1234567890123456789"));
        assert_eq!(k.commandlog.as_deref(), Some("42"));
        assert_eq!(k.public_key, None);
    }

    #[test]
    fn keys_file_ignores_blank_ids() {
        let k: KeysFile =
            serde_json::from_str(r#"{ "ERRORLOG": "", "COMMANDLOG": null }"#).unwrap();
        assert_eq!(k.errorlog, None);
        assert_eq!(k.commandlog, None);
    }
}
