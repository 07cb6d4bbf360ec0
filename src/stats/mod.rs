//! Post activity counters.
//!
//! Counts accepted posts per (day-of-month, hour-of-day) bucket:
//! - Sparse two-level map, only buckets that saw a post exist
//! - Missing day or hour reads as zero
//! - Persisted as a JSON snapshot, overwritten wholesale on save
//!
//! Buckets are keyed by day-of-month only, so the same day number in two
//! different months lands in the same bucket.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, Timelike};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// day-of-month -> hour-of-day -> count
pub type IntervalCounts = BTreeMap<u32, BTreeMap<u32, u64>>;

#[derive(Debug, Clone)]
pub struct PostStats {
    path: PathBuf,
    counts: IntervalCounts,
}

impl PostStats {
    /// Empty aggregator that will save to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PostStats {
            path: path.into(),
            counts: IntervalCounts::new(),
        }
    }

    /// Restore from the snapshot at `path`, or start empty when there is none.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let counts = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => IntervalCounts::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(PostStats { path, counts })
    }

    /// Write the snapshot. Does nothing while no post has been counted, so an
    /// early empty run never replaces a good snapshot.
    pub fn save(&self) -> Result<(), StorageError> {
        if self.counts.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // readers may poll the file at any time, swap it in whole
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(&self.counts)?)?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }

    pub fn increment<T: Datelike + Timelike>(&mut self, at: &T) {
        *self
            .counts
            .entry(at.day())
            .or_default()
            .entry(at.hour())
            .or_insert(0) += 1;
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn counts(&self) -> &IntervalCounts {
        &self.counts
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn count(&self, day: u32, hour: u32) -> u64 {
        self.counts
            .get(&day)
            .and_then(|hours| hours.get(&hour))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts
            .values()
            .flat_map(|hours| hours.values())
            .fold(0u64, |sum, n| sum.saturating_add(*n))
    }

    pub fn day_total(&self, day: u32) -> u64 {
        self.counts
            .get(&day)
            .map(|hours| hours.values().fold(0u64, |sum, n| sum.saturating_add(*n)))
            .unwrap_or(0)
    }

    /// Number of hour buckets recorded for `day`
    pub fn hours_on(&self, day: u32) -> usize {
        self.counts.get(&day).map_or(0, BTreeMap::len)
    }

    pub fn today_total_at<T: Datelike>(&self, now: &T) -> u64 {
        self.day_total(now.day())
    }

    pub fn current_hour_total_at<T: Datelike + Timelike>(&self, now: &T) -> u64 {
        self.count(now.day(), now.hour())
    }

    pub fn today_total(&self) -> u64 {
        self.today_total_at(&Local::now())
    }

    pub fn current_hour_total(&self) -> u64 {
        self.current_hour_total_at(&Local::now())
    }

    /// Earliest recorded bucket, placed in the month of `now`.
    ///
    /// Returns `None` when nothing is recorded or the day number does not
    /// exist in the current month.
    pub fn earliest(&self, now: &DateTime<Local>) -> Option<NaiveDateTime> {
        let (day, hours) = self.counts.iter().find(|(_, hours)| !hours.is_empty())?;
        let hour = *hours.keys().next()?;

        NaiveDate::from_ymd_opt(now.year(), now.month(), *day)?.and_hms_opt(hour, 0, 0)
    }
}
