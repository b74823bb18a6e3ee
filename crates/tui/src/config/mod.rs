use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/splits.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub log_level: String,
    /// Logging is disabled when unset; the terminal UI owns stdout.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://api.localhost".to_string(),
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "tincan-splits", about = "Edit the splits of one transaction")]
struct Args {
    /// Id of the transaction whose splits are edited.
    transaction_id: i64,
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://api.localhost).
    #[arg(long)]
    base_url: Option<String>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
    /// Write logs to this file.
    #[arg(long)]
    log_file: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Launch {
    pub config: AppConfig,
    pub transaction_id: i64,
}

pub fn load() -> Result<Launch> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("TINCAN_SPLITS"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = Some(log_file);
    }

    Ok(Launch {
        config: settings,
        transaction_id: args.transaction_id,
    })
}
