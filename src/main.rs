use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use speedrun_views::config::{
    require_api_key, resolve_events, API_KEY_ENV, DEFAULT_GAME, DEFAULT_LEADERBOARD_URL,
};
use speedrun_views::pipeline::{run_leaderboard, run_wr_impact, LeaderboardOptions, WrImpactOptions};
use speedrun_views::{report, PageFetcher, PeriodSearcher, StatsEnricher, YouTubeClient};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "speedrun-views")]
#[command(about = "Speedrun leaderboards enriched with YouTube view statistics", long_about = None)]
struct Args {
    /// YouTube Data API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Directory the CSV files are written to
    #[arg(short, long, default_value = ".", global = true)]
    output_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: only errors are logged and the end-of-run summary is not printed
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape a leaderboard and attach views/likes/comments to every run
    Leaderboard {
        /// Leaderboard page URL
        #[arg(long, default_value = DEFAULT_LEADERBOARD_URL)]
        url: String,

        /// Number of stats lookups in flight at once
        #[arg(short, long, default_value = "1")]
        concurrency: usize,
    },
    /// Compare views of videos published before and after each WR
    WrImpact {
        /// Game name used in search queries
        #[arg(long, default_value = DEFAULT_GAME)]
        game: String,

        /// Videos per search (1-50)
        #[arg(short, long, default_value = "2")]
        max_results: u32,

        /// JSON file with the events to analyse (defaults to the built-in list)
        #[arg(long)]
        events: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    let log_level = if args.verbose {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let api_key = require_api_key(args.api_key.as_deref())?;
    let api = Arc::new(YouTubeClient::new(api_key)?);
    let enricher = StatsEnricher::new(Arc::clone(&api));

    let summary = match args.command {
        Command::Leaderboard { url, concurrency } => {
            url::Url::parse(&url).map_err(|e| anyhow::anyhow!("Invalid URL {}: {}", url, e))?;
            let fetcher = PageFetcher::new()?;
            let options = LeaderboardOptions {
                url,
                output_dir: args.output_dir,
                concurrency,
            };

            log::info!("🚀 Collecting leaderboard runs");
            let outcome = run_leaderboard(&fetcher, &enricher, &options).await?;
            log::info!("✅ Enriched {} of {} run(s)", outcome.enriched_count(), outcome.runs.len());
            report::leaderboard_summary(&outcome)
        }
        Command::WrImpact {
            game,
            max_results,
            events,
        } => {
            let events = resolve_events(events.as_deref())?;
            let searcher = PeriodSearcher::new(Arc::clone(&api));
            let options = WrImpactOptions {
                events,
                game,
                max_results,
                output_dir: args.output_dir,
            };

            log::info!("🚀 Analysing {} WR event(s)", options.events.len());
            let outcome = run_wr_impact(&searcher, &enricher, &options).await?;
            log::info!("✅ Collected {} video(s)", outcome.records.len());
            report::wr_impact_summary(&outcome)
        }
    };

    if !args.quiet {
        println!("{}", summary);
    }

    Ok(())
}
