use chrono::{DateTime, Local};

/// Type tag reddit puts in front of link (submission) ids.
pub const LINK_PREFIX: &str = "t3_";

/// One submission as seen by the watcher.
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub id: String,
    pub subreddit: String,
    pub title: String,
    pub selftext: String,
    pub url: String,
    pub flair: Option<String>,
    pub observed_at: DateTime<Local>,
}

impl PostRecord {
    /// Fully qualified id, regardless of which form the source handed over.
    pub fn fullname(&self) -> String {
        normalize_id(&self.id)
    }
}

/// Bare ids ("abc123") get the link tag; ids that already carry a tag are kept.
pub fn normalize_id(id: &str) -> String {
    if id.contains('_') {
        id.to_string()
    } else {
        format!("{LINK_PREFIX}{id}")
    }
}
