//! Statistics lookups with per-item failure isolation.
//!
//! Every API error is logged and turned into a missing result for the
//! affected video(s). Nothing in this module returns an error to the caller.

use std::collections::HashMap;

use futures::stream::{self, StreamExt};

use crate::leaderboard::LeaderboardRow;
use crate::video_id::resolve_video_id;
use crate::youtube::{VideoApi, VideoStats, MAX_BATCH_IDS};

pub struct StatsEnricher<A> {
    api: A,
}

impl<A: VideoApi> StatsEnricher<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Statistics for a single video, or `None` if the lookup failed or the id is unknown.
    pub async fn fetch_stats(&self, video_id: &str) -> Option<VideoStats> {
        let ids = [video_id.to_string()];
        match self.api.list_videos(&ids).await {
            Ok(items) => {
                let found = items.into_iter().find(|s| s.video_id == video_id);
                if found.is_none() {
                    log::debug!("Video {} not found by the API", video_id);
                }
                found
            }
            Err(e) => {
                log::warn!("Failed to fetch stats for video {}: {}", video_id, e);
                None
            }
        }
    }

    /// Statistics for many videos, looked up [`MAX_BATCH_IDS`] at a time.
    ///
    /// A failed chunk only loses the ids it contained.
    pub async fn fetch_stats_batch(&self, video_ids: &[String]) -> HashMap<String, VideoStats> {
        let mut found = HashMap::new();

        for chunk in video_ids.chunks(MAX_BATCH_IDS) {
            match self.api.list_videos(chunk).await {
                Ok(items) => {
                    log::debug!("Batch of {} id(s) returned {} item(s)", chunk.len(), items.len());
                    for stats in items {
                        found.insert(stats.video_id.clone(), stats);
                    }
                }
                Err(e) => {
                    log::warn!(
                        "Failed to fetch stats for video(s) {}: {}",
                        chunk.join(","),
                        e
                    );
                }
            }
        }

        found
    }

    /// Look up every row's video, keeping the result aligned with `rows`.
    ///
    /// Rows whose link is not a YouTube video get `None` without an API call.
    /// Up to `concurrency` lookups run at once; results keep row order.
    pub async fn enrich_runs(
        &self,
        rows: &[LeaderboardRow],
        concurrency: usize,
    ) -> Vec<Option<VideoStats>> {
        stream::iter(rows)
            .map(|row| async move {
                match resolve_video_id(&row.video_url) {
                    Some(id) => self.fetch_stats(&id).await,
                    None => {
                        log::debug!(
                            "Rank {}: no YouTube video in '{}'",
                            row.rank,
                            row.video_url
                        );
                        None
                    }
                }
            })
            .buffered(concurrency.max(1))
            .collect()
            .await
    }
}
