pub mod table;
pub mod json;

use chrono::{DateTime, Datelike, Local};

use crate::post::PostRecord;
use crate::stats::PostStats;
use crate::title;

/// Console dump of a post as it comes off the stream
pub fn print_contents(post: &PostRecord, verbose: bool) {
    print!("{}", render_contents(post, verbose));
}

/// Gauge and totals printed after every processed post
pub fn print_summary(stats: &PostStats, now: &DateTime<Local>) {
    println!("{}", render_summary(stats, now));
}

pub fn render_contents(post: &PostRecord, verbose: bool) -> String {
    let mut output = format!("---- {} ----\n", post.observed_at.format("%Y-%m-%d %H:%M:%S"));
    output.push_str(&format!(
        "Submission ID: {} Title: {}\n",
        post.fullname(),
        title::clean_title(&post.title)
    ));

    let body = post.selftext.replace('\n', "\t");
    if verbose || body.chars().count() <= 200 {
        output.push_str(&body);
    } else {
        output.extend(body.chars().take(200));
        output.push_str("...");
    }
    output.push('\n');

    let gender = title::op_gender(&post.title).map_or("~", |g| g.as_str());
    output.push_str(&format!(
        "Flair: {} OP gender: {gender}\n",
        post.flair.as_deref().unwrap_or("None")
    ));

    output
}

/// One gauge column per hour that saw a post today, then the totals line.
pub fn render_summary(stats: &PostStats, now: &DateTime<Local>) -> String {
    let hours = stats.hours_on(now.day());
    let inner = " ".repeat(hours);
    let floor = "-".repeat(hours);

    format!(
        "|{inner}|\n|{inner}|\n|{floor}|\n{} total posts, {} posts collected today, {} this hour",
        stats.total(),
        stats.today_total_at(now),
        stats.current_hour_total_at(now)
    )
}
