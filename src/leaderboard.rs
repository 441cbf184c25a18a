//! Leaderboard table extraction.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

/// CSS selector of the runs table on a speedrun.com leaderboard page.
pub const TABLE_SELECTOR: &str = "table.table-condensed";

/// Placeholder stored when a run has no video link.
pub const NO_VIDEO: &str = "N/A";

/// Columns a row needs to be considered a run.
const MIN_COLUMNS: usize = 6;

/// One run as rendered on the leaderboard. Values are kept as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: String,
    pub player: String,
    pub time: String,
    pub platform: String,
    pub date: String,
    pub video_url: String,
}

/// Parse the runs table out of a leaderboard page.
///
/// The first `tr` is the header and is skipped. Rows with fewer than six
/// cells are skipped without error; a page without the table is an error.
pub fn extract_runs(html: &str) -> Result<Vec<LeaderboardRow>, ExtractionError> {
    let document = Html::parse_document(html);
    let table_selector = selector(TABLE_SELECTOR)?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;
    let link_selector = selector("a")?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| ExtractionError::TableNotFound {
            selector: TABLE_SELECTOR.to_string(),
        })?;

    let mut runs = Vec::new();
    for (index, row) in table.select(&row_selector).enumerate().skip(1) {
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        if cells.len() < MIN_COLUMNS {
            log::debug!("Skipping row {} with {} cells", index, cells.len());
            continue;
        }

        let video_url = cells[5]
            .select(&link_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| href.trim().to_string())
            .unwrap_or_else(|| NO_VIDEO.to_string());

        runs.push(LeaderboardRow {
            rank: cell_text(&cells[0]),
            player: cell_text(&cells[1]),
            time: cell_text(&cells[2]),
            platform: cell_text(&cells[3]),
            date: cell_text(&cells[4]),
            video_url,
        });
    }

    log::info!("Extracted {} run(s) from the leaderboard", runs.len());
    Ok(runs)
}

fn selector(css: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|e| ExtractionError::InvalidSelector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}
