mod app;
mod logic;
mod models;
mod mvu;
mod ui;
mod utils;

use anyhow::Result;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(logic::event_log::console_filter())
        .init();

    let settings = models::Settings::from_env()?;
    tracing::debug!(?settings, "settings loaded");

    app::run(settings).map_err(|err| anyhow::anyhow!("UI error: {err}"))
}
