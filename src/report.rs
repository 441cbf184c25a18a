//! Plain-text summaries printed at the end of a run.

use crate::aggregate::{CategoryAverage, PeriodAverage};
use crate::pipeline::{LeaderboardOutcome, WrImpactOutcome};

const PREVIEW_ROWS: usize = 5;

pub fn leaderboard_summary(outcome: &LeaderboardOutcome) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Runs: {} ({} with YouTube stats)\n",
        outcome.runs.len(),
        outcome.enriched_count()
    ));
    output.push_str(&format!("Saved to: {}\n", outcome.path.display()));

    output.push_str(&format!("\nFirst {} row(s):\n", PREVIEW_ROWS.min(outcome.runs.len())));
    for run in outcome.runs.iter().take(PREVIEW_ROWS) {
        output.push_str(&format!(
            "  {:>4}  {:<20} {:<12} {:<8} {:>10} {:>8} {:>8}\n",
            run.rank,
            run.player,
            run.time,
            run.platform,
            count(run.views),
            count(run.likes),
            count(run.comments),
        ));
    }

    if !outcome.averages.is_empty() {
        output.push_str("\nMean views per platform:\n");
        output.push_str(&platform_table(&outcome.averages));
    }

    output
}

pub fn wr_impact_summary(outcome: &WrImpactOutcome) -> String {
    if outcome.records.is_empty() {
        return "No videos were collected. Check your API key and quota limits.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&"=".repeat(50));
    output.push_str("\nMean views per WR event\n");
    output.push_str(&"=".repeat(50));
    output.push('\n');
    output.push_str(&period_table(&outcome.averages));

    output.push_str(&format!("\nVideos collected: {}\n", outcome.records.len()));
    for path in &outcome.paths {
        output.push_str(&format!("Saved to: {}\n", path.display()));
    }

    output
}

fn period_table(averages: &[PeriodAverage]) -> String {
    let mut output = format!("{:<12} {:<8} {:>14} {:>7}\n", "wr_date", "period", "mean_views", "videos");
    for avg in averages {
        output.push_str(&format!(
            "{:<12} {:<8} {:>14} {:>7}\n",
            avg.wr_event_date,
            avg.period.as_str(),
            mean_text(avg.mean_views),
            avg.videos_counted
        ));
    }
    output
}

fn platform_table(averages: &[CategoryAverage]) -> String {
    averages
        .iter()
        .map(|avg| {
            format!(
                "  {:<12} {:>14} ({} run(s))\n",
                avg.platform,
                mean_text(avg.mean_views),
                avg.runs_counted
            )
        })
        .collect()
}

fn count(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn mean_text(value: Option<f64>) -> String {
    value.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".to_string())
}
