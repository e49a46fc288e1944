//! Handles settings for the application.
//!
//! Sources, lowest priority first: built-in defaults, the optional TOML file
//! (`settings` unless `--config` is given), `REGISTERS_*` environment
//! variables (`__` between nested keys), `ADDR`, then `--addr`.
use clap::Parser;
use config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Parser)]
#[command(name = "registers", about = "Register bookkeeping HTTP service")]
pub struct Args {
    /// Config file path, with or without extension.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,
    /// Override the listen address (e.g. 0.0.0.0:8080).
    #[arg(long)]
    pub addr: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

/// Where documents are persisted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Storage {
    /// One JSON file per document under this directory.
    Directory(String),
    /// SQLite database file.
    Sqlite(String),
    /// In-memory SQLite, lost on exit.
    Memory,
}

impl Default for Storage {
    fn default() -> Self {
        Self::Directory(DEFAULT_DATA_DIR.to_string())
    }
}

impl std::fmt::Display for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Storage::Directory(path) => write!(f, "directory {path}"),
            Storage::Sqlite(path) => write!(f, "sqlite {path}"),
            Storage::Memory => f.write_str("in-memory sqlite"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub addr: String,
    pub storage: Option<Storage>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        let file = File::with_name(&args.config).required(false);
        Self::from_sources(file, &args, std::env::var("ADDR").ok())
    }

    fn from_sources<S>(file: S, args: &Args, addr_env: Option<String>) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("server.addr", DEFAULT_ADDR)?
            .add_source(file)
            .add_source(
                Environment::with_prefix("REGISTERS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("server.addr", addr_env.filter(|addr| !addr.is_empty()))?
            .set_override_option("server.addr", args.addr.clone())?
            .build()?;

        settings.try_deserialize()
    }
}
