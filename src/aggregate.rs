//! Joining rows with statistics and computing grouped view averages.
//!
//! Absent statistics are never treated as zero: merged rows keep empty
//! fields, and averages only count videos whose view count is known.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::events::WrEvent;
use crate::leaderboard::LeaderboardRow;
use crate::search::Period;
use crate::youtube::VideoStats;

/// A leaderboard row with its video's statistics, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRun {
    pub rank: String,
    pub player: String,
    pub time: String,
    pub platform: String,
    pub date: String,
    pub video_url: String,
    pub views: Option<u64>,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
}

/// One video found around a record event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchVideoRecord {
    pub video_id: String,
    pub title: Option<String>,
    pub published_at: Option<String>,
    pub view_count: Option<u64>,
    pub period: Period,
    pub wr_event_date: String,
    pub runner: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodAverage {
    pub wr_event_date: String,
    pub period: Period,
    pub mean_views: Option<f64>,
    pub videos_counted: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAverage {
    pub platform: String,
    pub mean_views: Option<f64>,
    pub runs_counted: usize,
}

/// Left join `rows` with the index-aligned `stats`.
///
/// Every row appears exactly once, in input order. A short `stats` slice
/// leaves the remaining rows without statistics.
pub fn merge_runs(rows: &[LeaderboardRow], stats: &[Option<VideoStats>]) -> Vec<EnrichedRun> {
    if stats.len() != rows.len() {
        log::warn!(
            "Merging {} row(s) with {} stats entries",
            rows.len(),
            stats.len()
        );
    }

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let s = stats.get(i).and_then(Option::as_ref);
            EnrichedRun {
                rank: row.rank.clone(),
                player: row.player.clone(),
                time: row.time.clone(),
                platform: row.platform.clone(),
                date: row.date.clone(),
                video_url: row.video_url.clone(),
                views: s.map(|s| s.view_count),
                likes: s.map(|s| s.like_count),
                comments: s.map(|s| s.comment_count),
            }
        })
        .collect()
}

/// One record per searched id, in search order, with whatever stats were found.
pub fn build_search_records(
    video_ids: &[String],
    stats: &HashMap<String, VideoStats>,
    event: &WrEvent,
    period: Period,
) -> Vec<SearchVideoRecord> {
    video_ids
        .iter()
        .map(|id| {
            let s = stats.get(id);
            if s.is_none() {
                log::debug!("No stats for {} ({} {})", id, period, event.date);
            }
            SearchVideoRecord {
                video_id: id.clone(),
                title: s.and_then(|s| s.title.clone()),
                published_at: s.and_then(|s| s.published_at.clone()),
                view_count: s.map(|s| s.view_count),
                period,
                wr_event_date: event.date.clone(),
                runner: event.runner.clone(),
            }
        })
        .collect()
}

/// Arithmetic mean of the known values; `None` when nothing is known.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<u64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0u128, 0usize), |(sum, count), v| (sum + v as u128, count + 1));

    (count > 0).then(|| sum as f64 / count as f64)
}

/// Mean views per (event date, period), ordered by date then period.
pub fn period_averages(records: &[SearchVideoRecord]) -> Vec<PeriodAverage> {
    let mut groups: BTreeMap<(String, Period), Vec<Option<u64>>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.wr_event_date.clone(), record.period))
            .or_default()
            .push(record.view_count);
    }

    groups
        .into_iter()
        .map(|((wr_event_date, period), views)| PeriodAverage {
            wr_event_date,
            period,
            videos_counted: views.iter().flatten().count(),
            mean_views: mean(views),
        })
        .collect()
}

/// Mean views per platform, ordered by platform name.
pub fn platform_averages(runs: &[EnrichedRun]) -> Vec<CategoryAverage> {
    let mut groups: BTreeMap<&str, Vec<Option<u64>>> = BTreeMap::new();
    for run in runs {
        groups.entry(run.platform.as_str()).or_default().push(run.views);
    }

    groups
        .into_iter()
        .map(|(platform, views)| CategoryAverage {
            platform: platform.to_string(),
            runs_counted: views.iter().flatten().count(),
            mean_views: mean(views),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(rank: &str, platform: &str) -> LeaderboardRow {
        LeaderboardRow {
            rank: rank.to_string(),
            player: format!("p{}", rank),
            time: "1h".to_string(),
            platform: platform.to_string(),
            date: "2023-01-01".to_string(),
            video_url: "N/A".to_string(),
        }
    }

    fn stats(views: u64) -> VideoStats {
        VideoStats {
            video_id: format!("v{}", views),
            view_count: views,
            like_count: 1,
            comment_count: 2,
            ..Default::default()
        }
    }

    fn record(date: &str, period: Period, views: Option<u64>) -> SearchVideoRecord {
        SearchVideoRecord {
            video_id: "id".to_string(),
            title: None,
            published_at: None,
            view_count: views,
            period,
            wr_event_date: date.to_string(),
            runner: "r".to_string(),
        }
    }

    #[test]
    fn mean_excludes_missing_values() {
        assert_eq!(mean([Some(100), Some(200), None]), Some(150.0));
        assert_eq!(mean([Some(0), None]), Some(0.0));
        assert_eq!(mean([None, None]), None);
        assert_eq!(mean(Vec::new()), None);
    }

    #[test]
    fn merge_keeps_every_row_in_order() {
        let rows = vec![row("1", "PC"), row("2", "PC"), row("3", "PS5")];
        let patterns: Vec<Vec<Option<VideoStats>>> = vec![
            vec![None, None, None],
            vec![Some(stats(1)), None, Some(stats(3))],
            vec![Some(stats(1)), Some(stats(2)), Some(stats(3))],
            vec![Some(stats(1))],
        ];

        for pattern in patterns {
            let merged = merge_runs(&rows, &pattern);
            assert_eq!(merged.len(), rows.len());
            let ranks: Vec<&str> = merged.iter().map(|r| r.rank.as_str()).collect();
            assert_eq!(ranks, vec!["1", "2", "3"]);
        }
    }

    #[test]
    fn merge_leaves_missing_stats_empty() {
        let rows = vec![row("1", "PC"), row("2", "PC")];
        let merged = merge_runs(&rows, &[Some(stats(500)), None]);

        assert_eq!(merged[0].views, Some(500));
        assert_eq!(merged[0].likes, Some(1));
        assert_eq!(merged[0].comments, Some(2));
        assert_eq!(merged[1].views, None);
        assert_eq!(merged[1].likes, None);
    }

    #[test]
    fn search_records_keep_ids_without_stats() {
        let event = WrEvent::new("Distortion2", "2023-03-01", "58m 35s");
        let mut found = HashMap::new();
        found.insert("a".to_string(), stats(10));
        let ids = vec!["a".to_string(), "b".to_string()];

        let records = build_search_records(&ids, &found, &event, Period::After);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].view_count, Some(10));
        assert_eq!(records[1].view_count, None);
        assert_eq!(records[1].wr_event_date, "2023-03-01");
        assert_eq!(records[1].runner, "Distortion2");
    }

    #[test]
    fn period_averages_group_and_sort() {
        let records = vec![
            record("2023-03-01", Period::After, Some(100)),
            record("2022-06-17", Period::After, Some(10)),
            record("2023-03-01", Period::After, Some(200)),
            record("2023-03-01", Period::After, None),
            record("2023-03-01", Period::Before, None),
            record("2022-06-17", Period::Before, Some(30)),
        ];

        let averages = period_averages(&records);

        let keys: Vec<(&str, Period)> = averages
            .iter()
            .map(|a| (a.wr_event_date.as_str(), a.period))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("2022-06-17", Period::Before),
                ("2022-06-17", Period::After),
                ("2023-03-01", Period::Before),
                ("2023-03-01", Period::After),
            ]
        );
        assert_eq!(averages[3].mean_views, Some(150.0));
        assert_eq!(averages[3].videos_counted, 2);
        assert_eq!(averages[2].mean_views, None);
        assert_eq!(averages[2].videos_counted, 0);
    }

    #[test]
    fn platform_averages_ignore_runs_without_video() {
        let rows = vec![row("1", "PC"), row("2", "PS5"), row("3", "PC")];
        let merged = merge_runs(&rows, &[Some(stats(100)), None, Some(stats(300))]);

        let averages = platform_averages(&merged);

        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0].platform, "PC");
        assert_eq!(averages[0].mean_views, Some(200.0));
        assert_eq!(averages[1].platform, "PS5");
        assert_eq!(averages[1].mean_views, None);
    }
}
