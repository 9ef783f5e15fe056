use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/admin_tui.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub username: String,
    /// Only read from the config file or `ADMIN_TUI_PASSWORD`.
    pub password: String,
    pub page_size: usize,
    /// Delay before a search edit triggers a fetch.
    pub debounce_ms: u64,
    /// Serve in-memory fixtures instead of calling the server.
    pub demo: bool,
    pub demo_latency_ms: u64,
    pub log_level: String,
    /// The terminal owns stdout, so logs go to a file.
    pub log_file: String,
    pub state_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            username: String::new(),
            password: String::new(),
            page_size: listing::DEFAULT_PAGE_SIZE,
            debounce_ms: 300,
            demo: false,
            demo_latency_ms: 250,
            log_level: "info".to_string(),
            log_file: "admin_tui.log".to_string(),
            state_file: "config/admin_tui_state.json".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "admin_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override username (password is never read from CLI).
    #[arg(long)]
    username: Option<String>,
    /// Override rows per page.
    #[arg(long)]
    page_size: Option<usize>,
    /// Run against in-memory demo data.
    #[arg(long)]
    demo: bool,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    resolve(Args::parse())
}

fn resolve(args: Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("ADMIN_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(username) = args.username {
        settings.username = username;
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size;
    }
    if args.demo {
        settings.demo = true;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    if settings.page_size == 0 {
        return Err(listing::ListError::InvalidPageSize.into());
    }

    Ok(settings)
}
