//! Application core for the Gratia gratitude journal.
//!
//! Ties the other layers together: a shared [`AppState`] holds the loaded
//! configuration, the session manager, the row-store client, and the
//! security log, and the [`api`] modules implement the user-facing
//! operations on top of it. Everything here is frontend-agnostic; a shell
//! (desktop, web, CLI) drives these functions and renders the results.

#[macro_use]
extern crate serde;

extern crate tracing as log;

pub mod api;
pub mod error;
pub mod logging;
pub mod services;
pub mod state;
pub mod tasks;

pub use error::Error;
pub use state::AppState;

use std::path::Path;

/// Loads the configuration file, falling back to defaults when it does not
/// exist yet, then applies environment overrides.
pub async fn load_config(path: impl AsRef<Path>) -> anyhow::Result<config::Config> {
    let path = path.as_ref();

    log::info!("Loading config from: {}", path.display());

    let mut config = match config::Config::load(path).await {
        Ok(config) => config,
        Err(config::ConfigError::IOError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("Config file not found, using defaults");

            config::Config::default()
        }
        Err(e) => return Err(e.into()),
    };

    log::info!("Applying environment overrides to configuration");
    ::config::Configuration::configure(&mut config);

    Ok(config)
}
