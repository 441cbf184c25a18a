use std::path::Path;

use crate::error::ConfigError;
use crate::events::{default_events, load_events, WrEvent};

/// Elden Ring, Any% glitchless.
pub const DEFAULT_LEADERBOARD_URL: &str =
    "https://www.speedrun.com/eldenring?h=Any-glitchless&x=02qr00pk-7891zr5n.qj740p3q";

pub const DEFAULT_GAME: &str = "Elden Ring";

pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// The API key must be present and non-blank before anything touches the network.
pub fn require_api_key(key: Option<&str>) -> Result<String, ConfigError> {
    match key.map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => Err(ConfigError::MissingApiKey),
    }
}

/// Events from `path` if given, otherwise the built-in list.
pub fn resolve_events(path: Option<&Path>) -> Result<Vec<WrEvent>, ConfigError> {
    match path {
        Some(path) => {
            let events = load_events(path)?;
            log::info!("Loaded {} event(s) from {}", events.len(), path.display());
            Ok(events)
        }
        None => Ok(default_events()),
    }
}
