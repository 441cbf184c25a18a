//! Date-bounded video searches around a record event.

use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::youtube::{SearchQuery, VideoApi, MAX_SEARCH_RESULTS};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Which side of the event date a search covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Before,
    After,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Before => "before",
            Period::After => "after",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publish-date bounds for one search, as RFC 3339 UTC timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchWindow {
    pub published_before: Option<String>,
    pub published_after: Option<String>,
}

/// Bounds for `date` (`YYYY-MM-DD`, midnight UTC).
///
/// `Before` ends one second before midnight and `After` starts at midnight,
/// so the two windows never overlap and together cover every instant.
pub fn search_window(date: &str, period: Period) -> Result<SearchWindow, SearchError> {
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|source| {
        SearchError::InvalidDate {
            date: date.to_string(),
            source,
        }
    })?;
    let midnight = day.and_time(chrono::NaiveTime::MIN);

    Ok(match period {
        Period::Before => SearchWindow {
            published_before: Some(
                (midnight - Duration::seconds(1))
                    .format(TIMESTAMP_FORMAT)
                    .to_string(),
            ),
            published_after: None,
        },
        Period::After => SearchWindow {
            published_before: None,
            published_after: Some(midnight.format(TIMESTAMP_FORMAT).to_string()),
        },
    })
}

pub struct PeriodSearcher<A> {
    api: A,
}

impl<A: VideoApi> PeriodSearcher<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Newest videos matching `query` on one side of `date`.
    ///
    /// Errors are logged and yield an empty list.
    pub async fn search_videos(
        &self,
        query: &str,
        date: &str,
        period: Period,
        max_results: u32,
    ) -> Vec<String> {
        let window = match search_window(date, period) {
            Ok(window) => window,
            Err(e) => {
                log::error!("Skipping search '{}': {}", query, e);
                return Vec::new();
            }
        };

        let request = SearchQuery {
            query: query.to_string(),
            max_results: max_results.clamp(1, MAX_SEARCH_RESULTS),
            published_before: window.published_before,
            published_after: window.published_after,
        };
        log::info!(
            "Searching {} video(s) {} {}: '{}'",
            request.max_results,
            period,
            date,
            query
        );

        match self.api.search(&request).await {
            Ok(ids) => {
                log::debug!("Search '{}' returned {} id(s)", query, ids.len());
                ids
            }
            Err(e) => {
                log::warn!("Search '{}' ({} {}) failed: {}", query, period, date, e);
                Vec::new()
            }
        }
    }
}
