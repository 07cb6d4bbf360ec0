//! JSON output for the activity counters.
//!
//! Same day -> hour -> count shape as the snapshot, plus the derived totals.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::stats::{IntervalCounts, PostStats};

#[derive(Serialize)]
struct StatsReport<'a> {
    total: u64,
    today: u64,
    this_hour: u64,
    counts: &'a IntervalCounts,
}

pub fn render(stats: &PostStats, now: &DateTime<Local>) -> String {
    let report = StatsReport {
        total: stats.total(),
        today: stats.today_total_at(now),
        this_hour: stats.current_hour_total_at(now),
        counts: stats.counts(),
    };

    serde_json::to_string_pretty(&report).unwrap_or_else(|_| String::from("{}"))
}
