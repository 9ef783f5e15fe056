mod app;
mod client;
mod config;
mod demo;
mod error;
mod local_state;
mod logging;
mod rows;
mod sections;
mod ui;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    logging::init(&config)?;
    tracing::info!(base_url = %config.base_url, demo = config.demo, "starting admin console");

    let mut app = app::App::new(config)?;
    app.run().await?;
    Ok(())
}
