//! Infrastructure adapters for the Tally engine.
//!
//! Everything that touches the outside world lives here: the REST client
//! behind the `TrackerApi` port, the regex time-span parser, a default
//! fuzzy matcher, a tracing-backed notifier and the settings loader. The
//! core crate only ever sees these through its port traits.

pub mod config;
pub mod http;
pub mod matcher;
pub mod notify;
pub mod span;
pub mod tracker;

use std::sync::Arc;

use tally_core::PaletteEngine;
use tally_domain::Result;

pub use config::Settings;
pub use http::HttpClient;
pub use matcher::SubsequenceMatcher;
pub use notify::LogNotifier;
pub use span::RegexSpanParser;
pub use tracker::RestTrackerClient;

/// Wire a ready-to-use engine from loaded settings.
///
/// Hosts with their own matcher or notifier assemble [`PaletteEngine`]
/// directly instead.
///
/// # Errors
/// Returns a configuration or authentication error when the settings are
/// unusable (empty token, malformed base URL).
pub fn build_engine(settings: &Settings) -> Result<PaletteEngine> {
    let client = RestTrackerClient::new(&settings.base_url, settings.api_token.clone())?;
    Ok(PaletteEngine::new(
        Arc::new(client),
        Arc::new(SubsequenceMatcher),
        Arc::new(RegexSpanParser),
        Arc::new(LogNotifier),
    ))
}
