//! CSV export.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ExportError;

pub const LEADERBOARD_FILE: &str = "speedrun_leaderboard_stats.csv";
pub const WR_VIDEOS_FILE: &str = "youtube_wr_videos.csv";
pub const WR_AVERAGES_FILE: &str = "youtube_wr_period_averages.csv";

/// Write `records` to `path` as UTF-8 CSV with a header row.
///
/// The table is written to a sibling temporary file and renamed into place,
/// so on error the previous contents of `path` are left as they were.
pub fn write_csv<T: Serialize>(records: &[T], path: &Path) -> Result<(), ExportError> {
    commit_all(vec![stage_csv(records, path)?])
}

/// A table fully written to its temporary sibling, not yet visible at `path`.
///
/// Dropping it without [`commit_all`] removes the temporary file.
#[derive(Debug)]
pub struct StagedCsv {
    tmp: PathBuf,
    path: PathBuf,
    rows: usize,
    committed: bool,
}

impl Drop for StagedCsv {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.tmp);
        }
    }
}

/// Write `records` next to `path` without touching `path` itself.
pub fn stage_csv<T: Serialize>(records: &[T], path: &Path) -> Result<StagedCsv, ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ExportError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let staged = StagedCsv {
        tmp: temp_path(path),
        path: path.to_path_buf(),
        rows: records.len(),
        committed: false,
    };
    write_to(records, &staged.tmp)?;
    Ok(staged)
}

/// Move every staged table into place.
///
/// Callers stage all tables of a run first, so a failed write leaves none of
/// them published.
pub fn commit_all(staged: Vec<StagedCsv>) -> Result<(), ExportError> {
    for mut table in staged {
        fs::rename(&table.tmp, &table.path).map_err(|source| ExportError::Io {
            path: table.path.clone(),
            source,
        })?;
        table.committed = true;
        log::info!("💾 Wrote {} row(s) to {}", table.rows, table.path.display());
    }
    Ok(())
}

/// Load a table previously written by [`write_csv`].
pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(csv_err)
}

fn write_to<T: Serialize>(records: &[T], tmp: &Path) -> Result<(), ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: tmp.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(tmp).map_err(csv_err)?;
    for record in records {
        writer.serialize(record).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: tmp.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        name: String,
        views: Option<u64>,
    }

    #[test]
    fn header_and_empty_optionals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let rows = vec![
            Row { name: "Alice, the fast".to_string(), views: Some(10) },
            Row { name: "Bob".to_string(), views: None },
        ];

        write_csv(&rows, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "name,views\n\"Alice, the fast\",10\nBob,\n");
        assert_eq!(read_csv::<Row>(&path).unwrap(), rows);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "old contents").unwrap();

        write_csv(&[Row { name: "new".to_string(), views: Some(1) }], &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "name,views\nnew,1\n");
    }

    #[test]
    fn creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.csv");

        write_csv(&[Row { name: "x".to_string(), views: None }], &path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn failure_leaves_previous_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        // A directory squatting on the temp name makes the write fail.
        let path = dir.path().join("out.csv");
        fs::write(&path, "previous").unwrap();
        fs::create_dir(temp_path(&path)).unwrap();

        let result = write_csv(&[Row { name: "x".to_string(), views: None }], &path);

        assert!(matches!(result, Err(ExportError::Csv { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous");
    }

    #[test]
    fn dropped_stage_leaves_no_trace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let staged = stage_csv(&[Row { name: "x".to_string(), views: None }], &path).unwrap();
        assert!(temp_path(&path).exists());
        assert!(!path.exists());
        drop(staged);

        assert!(!temp_path(&path).exists());
        assert!(!path.exists());
    }

    #[test]
    fn temp_path_is_a_sibling() {
        assert_eq!(
            temp_path(Path::new("out/data.csv")),
            PathBuf::from("out/data.csv.tmp")
        );
    }
}
