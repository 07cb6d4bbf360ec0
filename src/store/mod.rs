//! Local persistence.
//!
//! Everything lives under one data directory:
//! - `<subreddit>.db`: SQLite table of posts already processed
//! - `stats.json`: the day/hour activity snapshot
//!
//! The data directory is `~/.local/share/subwatch` or the platform
//! equivalent, unless the config points somewhere else.

pub mod posts;

use std::path::{Path, PathBuf};

use crate::error::StorageError;

pub const STATS_FILE: &str = "stats.json";

/// Default data directory, created if missing
pub fn default_data_dir() -> Result<PathBuf, StorageError> {
    let data_dir = directories::ProjectDirs::from("", "", "subwatch")
        .ok_or(StorageError::NoDataDir)?
        .data_dir()
        .to_path_buf();

    std::fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

pub fn db_path(data_dir: &Path, subreddit: &str) -> PathBuf {
    data_dir.join(format!("{}.db", subreddit.to_lowercase()))
}

pub fn stats_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STATS_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_file_named_after_subreddit() {
        let path = db_path(Path::new("/data"), "Relationships");
        assert_eq!(path, PathBuf::from("/data/relationships.db"));
    }

    #[test]
    fn stats_file_in_data_dir() {
        assert_eq!(stats_path(Path::new("/data")), PathBuf::from("/data/stats.json"));
    }
}
