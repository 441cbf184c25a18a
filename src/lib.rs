//! Speedrun leaderboard scraping enriched with YouTube engagement statistics.

pub mod aggregate;
pub mod config;
pub mod enrich;
pub mod error;
pub mod events;
pub mod export;
pub mod fetch;
pub mod leaderboard;
pub mod pipeline;
pub mod report;
pub mod search;
pub mod video_id;
pub mod youtube;

pub use enrich::StatsEnricher;
pub use error::{
    ApiError, ConfigError, ExportError, ExtractionError, FetchError, PipelineError, SearchError,
};
pub use fetch::PageFetcher;
pub use leaderboard::LeaderboardRow;
pub use search::{Period, PeriodSearcher};
pub use youtube::{VideoApi, VideoStats, YouTubeClient};
