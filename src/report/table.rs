//! Terminal tables.
//!
//! - Per-day blocks of hourly counts with a subtotal and grand total
//! - Recorded post history, newest first

use crate::stats::PostStats;
use crate::store::posts::StoredPost;

pub fn render_stats(stats: &PostStats) -> String {
    if stats.is_empty() {
        return String::from("No posts counted yet.\n");
    }

    let mut output = String::new();
    let peak = stats
        .counts()
        .values()
        .flat_map(|hours| hours.values())
        .copied()
        .max()
        .unwrap_or(0);

    for (day, hours) in stats.counts() {
        output.push_str(&format!("\nday {day}\n"));
        output.push_str(&"-".repeat(40));
        output.push('\n');

        for (hour, count) in hours {
            output.push_str(&format!(
                "  {hour:02}:00  {:<24} {count:>6}\n",
                bar(*count, peak, 24)
            ));
        }

        output.push_str(&format!("  {:31} {:>6}\n", "subtotal", stats.day_total(*day)));
    }

    output.push_str(&format!("\n{:>40}\n", format!("TOTAL: {}", stats.total())));

    output
}

pub fn render_history(posts: &[StoredPost]) -> String {
    if posts.is_empty() {
        return String::from("No posts recorded yet. Run 'subwatch watch' to collect some.\n");
    }

    let mut output = format!("{:<12} {:<20} {}\n", "ID", "Cached", "Title");
    output.push_str(&"-".repeat(80));
    output.push('\n');

    for post in posts {
        output.push_str(&format!(
            "{:<12} {:<20} {}\n",
            truncate(&post.id, 12),
            truncate(&post.cached, 19),
            truncate(&post.title, 46)
        ));
    }

    output
}

fn bar(count: u64, peak: u64, width: usize) -> String {
    if peak == 0 {
        return String::new();
    }
    let len = (count.saturating_mul(width as u64) / peak) as usize;
    "#".repeat(len.max(1))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn empty_stats_message() {
        assert_eq!(render_stats(&PostStats::new("x.json")), "No posts counted yet.\n");
    }

    #[test]
    fn stats_table_lists_days_hours_and_total() {
        let mut stats = PostStats::new("x.json");
        stats.increment(&at(15, 10));
        stats.increment(&at(15, 10));
        stats.increment(&at(16, 9));

        let out = render_stats(&stats);
        assert!(out.contains("day 15"));
        assert!(out.contains("day 16"));
        assert!(out.contains("10:00"));
        assert!(out.contains("TOTAL: 3"));
    }

    #[test]
    fn bar_scales_to_peak() {
        assert_eq!(bar(4, 4, 8), "########");
        assert_eq!(bar(1, 4, 8), "##");
        assert_eq!(bar(1, 100, 8), "#");
    }

    #[test]
    fn history_truncates_long_titles() {
        let posts = vec![StoredPost {
            id: "t3_abc".into(),
            subreddit: "relationships".into(),
            cached: "2024-01-15 10:00:00.000000".into(),
            title: "x".repeat(80),
            url: String::new(),
        }];

        let out = render_history(&posts);
        assert!(out.contains("t3_abc"));
        assert!(out.contains("..."));
        assert!(!out.contains(&"x".repeat(47)));
    }

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("this is too long", 10), "this is...");
    }
}
