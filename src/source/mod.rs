//! Post sources.
//!
//! A [`Listing`] returns whatever the forum currently shows as newest.
//! [`SubmissionStream`] polls a listing repeatedly and hands out each post
//! once, oldest first, blocking until something new shows up.

pub mod reddit;

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use tracing::debug;

use crate::error::SourceError;
use crate::post::PostRecord;

/// How many ids the stream remembers between polls
const SEEN_CAPACITY: usize = 301;

pub trait Listing {
    /// Newest posts, newest first
    fn fetch_new(&mut self) -> Result<Vec<PostRecord>, SourceError>;
}

/// Open-ended supply of posts
pub trait PostSource {
    /// Start a fresh stream. Fails when the source cannot be reached.
    fn connect(&mut self) -> Result<(), SourceError>;

    /// Block until the next unseen post arrives.
    fn next_post(&mut self) -> Result<PostRecord, SourceError>;
}

/// Insertion-ordered set that forgets its oldest entries past `capacity`.
#[derive(Debug)]
struct BoundedSet {
    capacity: usize,
    order: VecDeque<String>,
    items: HashSet<String>,
}

impl BoundedSet {
    fn new(capacity: usize) -> Self {
        BoundedSet {
            capacity,
            order: VecDeque::with_capacity(capacity),
            items: HashSet::with_capacity(capacity),
        }
    }

    /// Returns false when `item` was already present
    fn insert(&mut self, item: &str) -> bool {
        if self.items.contains(item) {
            return false;
        }

        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.items.remove(&oldest);
            }
        }

        self.order.push_back(item.to_string());
        self.items.insert(item.to_string());
        true
    }

    fn clear(&mut self) {
        self.order.clear();
        self.items.clear();
    }
}

pub struct SubmissionStream<L> {
    listing: L,
    poll_interval: Duration,
    seen: BoundedSet,
    pending: VecDeque<PostRecord>,
}

impl<L: Listing> SubmissionStream<L> {
    pub fn new(listing: L, poll_interval: Duration) -> Self {
        SubmissionStream {
            listing,
            poll_interval,
            seen: BoundedSet::new(SEEN_CAPACITY),
            pending: VecDeque::new(),
        }
    }

    /// Fetch once and queue the unseen posts. Returns how many were queued.
    fn poll(&mut self) -> Result<usize, SourceError> {
        let posts = self.listing.fetch_new()?;
        let mut queued = 0;

        for post in posts.into_iter().rev() {
            if self.seen.insert(&post.fullname()) {
                self.pending.push_back(post);
                queued += 1;
            }
        }

        debug!(queued, "listing polled");
        Ok(queued)
    }
}

impl<L: Listing> PostSource for SubmissionStream<L> {
    fn connect(&mut self) -> Result<(), SourceError> {
        self.seen.clear();
        self.pending.clear();
        self.poll().map(|_| ())
    }

    fn next_post(&mut self) -> Result<PostRecord, SourceError> {
        loop {
            if let Some(post) = self.pending.pop_front() {
                return Ok(post);
            }

            if self.poll()? == 0 && !self.poll_interval.is_zero() {
                std::thread::sleep(self.poll_interval);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn post(id: &str) -> PostRecord {
        PostRecord {
            id: format!("t3_{id}"),
            subreddit: "relationships".to_string(),
            title: format!("title {id}"),
            selftext: String::new(),
            url: String::new(),
            flair: None,
            observed_at: Local::now(),
        }
    }

    /// Replays canned pages, then reports the stream as ended.
    struct Scripted {
        pages: VecDeque<Vec<PostRecord>>,
    }

    impl Scripted {
        fn new(pages: Vec<Vec<&str>>) -> Self {
            Scripted {
                pages: pages
                    .into_iter()
                    .map(|ids| ids.into_iter().map(post).collect())
                    .collect(),
            }
        }
    }

    impl Listing for Scripted {
        fn fetch_new(&mut self) -> Result<Vec<PostRecord>, SourceError> {
            self.pages.pop_front().ok_or(SourceError::Ended)
        }
    }

    fn drain(stream: &mut SubmissionStream<Scripted>) -> Vec<String> {
        let mut ids = Vec::new();
        while let Ok(post) = stream.next_post() {
            ids.push(post.id);
        }
        ids
    }

    #[test]
    fn first_page_comes_out_oldest_first() {
        let mut stream = SubmissionStream::new(Scripted::new(vec![vec!["c", "b", "a"]]), Duration::ZERO);
        stream.connect().unwrap();

        assert_eq!(drain(&mut stream), vec!["t3_a", "t3_b", "t3_c"]);
    }

    #[test]
    fn overlapping_pages_yield_each_post_once() {
        let pages = vec![vec!["b", "a"], vec!["c", "b", "a"], vec!["c", "b"], vec!["e", "d", "c"]];
        let mut stream = SubmissionStream::new(Scripted::new(pages), Duration::ZERO);
        stream.connect().unwrap();

        assert_eq!(drain(&mut stream), vec!["t3_a", "t3_b", "t3_c", "t3_d", "t3_e"]);
    }

    #[test]
    fn listing_failure_surfaces_from_next_post() {
        let mut stream = SubmissionStream::new(Scripted::new(vec![vec![]]), Duration::ZERO);
        stream.connect().unwrap();

        assert!(matches!(stream.next_post(), Err(SourceError::Ended)));
    }

    #[test]
    fn connect_fails_when_listing_unreachable() {
        let mut stream = SubmissionStream::new(Scripted::new(vec![]), Duration::ZERO);
        assert!(stream.connect().is_err());
    }

    #[test]
    fn bounded_set_forgets_oldest() {
        let mut set = BoundedSet::new(2);
        assert!(set.insert("a"));
        assert!(set.insert("b"));
        assert!(!set.insert("a"));
        assert!(set.insert("c"));
        assert!(set.insert("a"));
    }
}
