mod app;
mod catalog;
mod config;
mod error;
mod favorites;
mod search;
mod theme;
mod ui;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::app::App;
use crate::catalog::animedb::AnimeDbClient;
use crate::config::Config;
use crate::error::Result;
use crate::favorites::Favorites;
use crate::theme::ThemeStore;

fn setup_logging() -> Result<()> {
    let data_dir = config::data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    let file_appender = tracing_appender::rolling::daily(&data_dir, "anisearch.log");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("anisearch=info".parse().unwrap()))
        .with(fmt::layer().with_writer(file_appender).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Set up file-based logging (we own the terminal for TUI)
    if let Err(e) = setup_logging() {
        eprintln!("Warning: Could not set up logging: {}", e);
    }

    info!("Starting anisearch");

    let config = Config::load()?;
    info!("Loaded config");

    let (key, host) = match config.api_credentials() {
        Ok(creds) => creds,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!(
                "Set ANISEARCH_API_KEY, or add the key under [api] in {}",
                config::config_path()?.display()
            );
            return Ok(());
        }
    };

    let favorites = Favorites::load(config::favorites_path()?);
    info!(count = favorites.len(), "Loaded favorites");

    let theme = ThemeStore::load(config::theme_path()?);
    info!(theme = theme.current().as_str(), "Resolved theme");

    let provider = Arc::new(AnimeDbClient::new(&key, &host));

    // Initialize terminal
    let mut terminal = app::init_terminal()?;

    // Run the app (async)
    let mut app = App::new(&config, provider, favorites, theme);
    let result = app.run(&mut terminal).await;

    // Restore terminal on exit
    app::restore_terminal()?;

    result
}
