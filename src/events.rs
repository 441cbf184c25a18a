use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A world-record run whose effect on video views is measured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrEvent {
    pub runner: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub time: String,
}

impl WrEvent {
    pub fn new(runner: &str, date: &str, time: &str) -> Self {
        Self {
            runner: runner.to_string(),
            date: date.to_string(),
            time: time.to_string(),
        }
    }

    /// Broad query used as the baseline before the record.
    pub fn before_query(&self, game: &str) -> String {
        format!("{} speedrun Any%", game)
    }

    /// Query targeting coverage of this record.
    pub fn after_query(&self, game: &str) -> String {
        format!("{} WR {} {}", game, self.runner, self.time)
    }
}

/// Elden Ring Any% records.
pub fn default_events() -> Vec<WrEvent> {
    vec![
        WrEvent::new("sutemou", "2022-06-17", "1h 08m 48s"),
        WrEvent::new("KEMIST_C10H15N", "2022-08-31", "59m 41s"),
        WrEvent::new("Distortion2", "2023-03-01", "58m 35s"),
    ]
}

/// Read a JSON array of events, e.g.
/// `[{"runner": "Distortion2", "date": "2023-03-01", "time": "58m 35s"}]`.
pub fn load_events(path: &Path) -> Result<Vec<WrEvent>, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::EventsFile {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| ConfigError::EventsFormat {
        path: path.to_path_buf(),
        source,
    })
}
