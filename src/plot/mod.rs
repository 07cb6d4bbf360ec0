//! Live posts-per-hour chart.
//!
//! The chart process never talks to the watcher. It rereads the stats
//! snapshot on every tick and appends one point, so a snapshot caught
//! mid-write only costs one skipped tick.

#[cfg(feature = "tui")]
pub mod tui;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDateTime, Timelike};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::error::{error_chain, RenderError};
use crate::stats::PostStats;

/// Points the live chart keeps; older ones scroll off the left edge.
/// A bit over a day of backfill plus an hour of 500ms ticks.
pub const MAX_POINTS: usize = 8_000;

/// Parallel x/y sequences, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub xs: Vec<NaiveDateTime>,
    pub ys: Vec<u64>,
}

impl Series {
    /// One point per hour from the earliest recorded hour up to `now`.
    pub fn backfill(stats: &PostStats, now: &DateTime<Local>) -> Self {
        let mut series = Series::default();
        let Some(mut at) = stats.earliest(now) else {
            return series;
        };

        let end = now.naive_local();
        while at <= end {
            series.push(at, stats.count(at.day(), at.hour()));
            at += Duration::hours(1);
        }

        series
    }

    pub fn push(&mut self, x: NaiveDateTime, y: u64) {
        self.xs.push(x);
        self.ys.push(y);
    }

    /// Drop the oldest points so at most `n` remain.
    pub fn keep_last(&mut self, n: usize) {
        let excess = self.len().saturating_sub(n);
        if excess > 0 {
            self.xs.drain(..excess);
            self.ys.drain(..excess);
        }
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// ((x min, x max), (y min, y max)), or None for an empty series
    pub fn bounds(&self) -> Option<((NaiveDateTime, NaiveDateTime), (u64, u64))> {
        let x_min = *self.xs.iter().min()?;
        let x_max = *self.xs.iter().max()?;
        let y_min = *self.ys.iter().min()?;
        let y_max = *self.ys.iter().max()?;
        Some(((x_min, x_max), (y_min, y_max)))
    }
}

/// Totals shown under the chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub total: u64,
    pub today: u64,
    pub this_hour: u64,
}

pub struct Plotter {
    path: PathBuf,
    series: Series,
    totals: Totals,
}

impl Plotter {
    /// Start from whatever the snapshot holds. An unreadable snapshot
    /// starts an empty chart instead of failing.
    pub fn new(path: impl Into<PathBuf>, now: &DateTime<Local>) -> Self {
        let path = path.into();

        let (series, totals) = match PostStats::load(&path) {
            Ok(stats) => (Series::backfill(&stats, now), totals_of(&stats, now)),
            Err(e) => {
                warn!(path = %path.display(), "starting with an empty chart: {}", error_chain(&e));
                (Series::default(), Totals::default())
            }
        };

        Plotter { path, series, totals }
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    /// Reload the snapshot and append (now, posts this hour).
    /// On failure the series is left as it was.
    pub fn tick(&mut self, now: &DateTime<Local>) -> Result<(), RenderError> {
        let stats = match PostStats::load(&self.path) {
            Ok(stats) => stats,
            Err(e) => {
                info!("could not update: {}", error_chain(&e));
                return Err(e.into());
            }
        };

        self.totals = totals_of(&stats, now);
        self.series.push(now.naive_local(), self.totals.this_hour);
        self.series.keep_last(MAX_POINTS);
        Ok(())
    }
}

fn totals_of(stats: &PostStats, now: &DateTime<Local>) -> Totals {
    Totals {
        total: stats.total(),
        today: stats.today_total_at(now),
        this_hour: stats.current_hour_total_at(now),
    }
}
