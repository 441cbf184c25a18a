//! The two collection workflows.
//!
//! Fatal errors (fetch, extraction, export) end the run before anything is
//! written. Per-video API failures are absorbed by [`StatsEnricher`] and
//! [`PeriodSearcher`] and only show up as empty fields.

use std::path::PathBuf;

use crate::aggregate::{
    build_search_records, merge_runs, period_averages, platform_averages, CategoryAverage,
    EnrichedRun, PeriodAverage, SearchVideoRecord,
};
use crate::enrich::StatsEnricher;
use crate::error::PipelineError;
use crate::events::WrEvent;
use crate::export::{
    commit_all, stage_csv, write_csv, LEADERBOARD_FILE, WR_AVERAGES_FILE, WR_VIDEOS_FILE,
};
use crate::fetch::PageFetcher;
use crate::leaderboard::extract_runs;
use crate::search::{Period, PeriodSearcher};
use crate::youtube::VideoApi;

#[derive(Debug, Clone)]
pub struct LeaderboardOptions {
    pub url: String,
    pub output_dir: PathBuf,
    pub concurrency: usize,
}

#[derive(Debug)]
pub struct LeaderboardOutcome {
    pub runs: Vec<EnrichedRun>,
    pub averages: Vec<CategoryAverage>,
    pub path: PathBuf,
}

impl LeaderboardOutcome {
    pub fn enriched_count(&self) -> usize {
        self.runs.iter().filter(|r| r.views.is_some()).count()
    }
}

/// Scrape the leaderboard, attach YouTube stats to each run and write the table.
pub async fn run_leaderboard<A: VideoApi>(
    fetcher: &PageFetcher,
    enricher: &StatsEnricher<A>,
    options: &LeaderboardOptions,
) -> Result<LeaderboardOutcome, PipelineError> {
    log::info!("Fetching leaderboard: {}", options.url);
    let html = fetcher.fetch(&options.url).await?;

    let rows = extract_runs(&html)?;
    if rows.is_empty() {
        return Err(PipelineError::NoRuns {
            url: options.url.clone(),
        });
    }

    log::info!("Fetching YouTube stats for {} run(s)", rows.len());
    let stats = enricher.enrich_runs(&rows, options.concurrency).await;

    let runs = merge_runs(&rows, &stats);
    let averages = platform_averages(&runs);

    let path = options.output_dir.join(LEADERBOARD_FILE);
    write_csv(&runs, &path)?;

    Ok(LeaderboardOutcome {
        runs,
        averages,
        path,
    })
}

#[derive(Debug, Clone)]
pub struct WrImpactOptions {
    pub events: Vec<WrEvent>,
    pub game: String,
    pub max_results: u32,
    pub output_dir: PathBuf,
}

#[derive(Debug, Default)]
pub struct WrImpactOutcome {
    pub records: Vec<SearchVideoRecord>,
    pub averages: Vec<PeriodAverage>,
    /// Empty when no video was found at all.
    pub paths: Vec<PathBuf>,
}

/// For each record event, compare views of videos published before and after it.
pub async fn run_wr_impact<A: VideoApi>(
    searcher: &PeriodSearcher<A>,
    enricher: &StatsEnricher<A>,
    options: &WrImpactOptions,
) -> Result<WrImpactOutcome, PipelineError> {
    let mut records = Vec::new();

    for event in &options.events {
        log::info!(
            "Processing WR event: {} on {} ({})",
            event.runner,
            event.date,
            event.time
        );

        let before_ids = searcher
            .search_videos(
                &event.before_query(&options.game),
                &event.date,
                Period::Before,
                options.max_results,
            )
            .await;
        let after_ids = searcher
            .search_videos(
                &event.after_query(&options.game),
                &event.date,
                Period::After,
                options.max_results,
            )
            .await;

        let all_ids: Vec<String> = before_ids.iter().chain(&after_ids).cloned().collect();
        let stats = enricher.fetch_stats_batch(&all_ids).await;

        records.extend(build_search_records(&before_ids, &stats, event, Period::Before));
        records.extend(build_search_records(&after_ids, &stats, event, Period::After));
    }

    if records.is_empty() {
        log::warn!("No videos were collected; check the API key and quota");
        return Ok(WrImpactOutcome::default());
    }

    let averages = period_averages(&records);

    let videos_path = options.output_dir.join(WR_VIDEOS_FILE);
    let averages_path = options.output_dir.join(WR_AVERAGES_FILE);
    // Both tables are published together or not at all.
    let staged = vec![
        stage_csv(&records, &videos_path)?,
        stage_csv(&averages, &averages_path)?,
    ];
    commit_all(staged)?;

    Ok(WrImpactOutcome {
        records,
        averages,
        paths: vec![videos_path, averages_path],
    })
}
