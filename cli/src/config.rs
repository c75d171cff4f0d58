use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use todo_sync::SyncConfig;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/todo.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub user_id: Option<u64>,
    pub error_timeout_ms: u64,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            user_id: None,
            error_timeout_ms: todo_sync::DEFAULT_ERROR_TIMEOUT.as_millis() as u64,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            error_timeout: Duration::from_millis(self.error_timeout_ms),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "todo", about = "Line-oriented client for the todo list service")]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    /// Sign in as this user on startup.
    #[arg(long)]
    user_id: Option<u64>,
    /// How long errors stay visible, in milliseconds.
    #[arg(long)]
    error_timeout_ms: Option<u64>,
    /// Log level for stderr output.
    #[arg(long, env = "TODO_LOG")]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    load_from(Args::parse())
}

/// File first, then `TODO_*` environment, then command-line overrides.
pub fn load_from(args: Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("TODO"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(user_id) = args.user_id {
        settings.user_id = Some(user_id);
    }
    if let Some(error_timeout_ms) = args.error_timeout_ms {
        settings.error_timeout_ms = error_timeout_ms;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    Ok(settings)
}
