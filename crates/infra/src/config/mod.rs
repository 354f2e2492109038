//! Settings loader.
//!
//! Environment variables win; a TOML file is the fallback. `.env` files are
//! honoured through dotenvy before the environment is read.
//!
//! Environment variables:
//! - `TALLY_API_TOKEN`: the remote service API token (required)
//! - `TALLY_BASE_URL`: API base URL (optional)
//!
//! File fallback probes `./tally.toml` then `./config.toml` in the working
//! directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tally_domain::{Result, TallyError};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://track.tally.app/api/v1/";

/// Everything the adapters need to talk to the remote service.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// API token used for basic auth.
    pub api_token: String,
    /// Base URL of the REST API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Load settings, environment first, file fallback.
///
/// # Errors
/// Returns [`TallyError::Config`] when neither source yields a usable
/// configuration.
pub fn load() -> Result<Settings> {
    dotenvy::dotenv().ok();
    match load_from_env() {
        Ok(settings) => {
            debug!("settings loaded from environment");
            Ok(settings)
        }
        Err(err) => {
            debug!(error = %err, "environment incomplete, trying file");
            load_from_file(None)
        }
    }
}

/// Load settings from environment variables only.
///
/// # Errors
/// Returns [`TallyError::Config`] when `TALLY_API_TOKEN` is missing.
pub fn load_from_env() -> Result<Settings> {
    let api_token = env_var("TALLY_API_TOKEN")?;
    let base_url = std::env::var("TALLY_BASE_URL").unwrap_or_else(|_| default_base_url());
    Ok(Settings { api_token, base_url })
}

/// Load settings from a TOML file.
///
/// With `path` unset, probes the standard locations.
///
/// # Errors
/// Returns [`TallyError::Config`] when no file is found or it does not
/// parse.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Settings> {
    let path = match path {
        Some(path) => {
            if !path.exists() {
                return Err(TallyError::Config(format!(
                    "settings file not found: {}",
                    path.display()
                )));
            }
            path
        }
        None => probe_paths().ok_or_else(|| {
            TallyError::Config("no settings file found in the standard locations".to_string())
        })?,
    };

    let raw = std::fs::read_to_string(&path)
        .map_err(|err| TallyError::Config(format!("cannot read {}: {err}", path.display())))?;
    let settings: Settings = toml::from_str(&raw)
        .map_err(|err| TallyError::Config(format!("cannot parse {}: {err}", path.display())))?;
    debug!(path = %path.display(), "settings loaded from file");
    Ok(settings)
}

fn probe_paths() -> Option<PathBuf> {
    ["tally.toml", "config.toml"].into_iter().map(Path::new).find(|p| p.exists()).map(Path::to_path_buf)
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| TallyError::Config(format!("{name} is not set")))
}
