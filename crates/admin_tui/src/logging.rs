use std::{fs::OpenOptions, path::Path, sync::Mutex};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
};

/// Installs the global subscriber, appending to `config.log_file`.
pub fn init(config: &AppConfig) -> Result<()> {
    if let Some(parent) = Path::new(&config.log_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "admin_tui={level},listing={level}",
            level = config.log_level
        ))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}
