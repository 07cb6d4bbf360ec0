//! Per-post pipeline.
//!
//! For every post pulled off the source:
//! 1. skip it if the store has seen it
//! 2. skip it if the interest policy rejects it
//! 3. read it aloud, record it, count it
//!
//! and after each post the activity snapshot is written back.

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::error::{error_chain, BotError, StorageError};
use crate::filter::InterestFilter;
use crate::post::PostRecord;
use crate::report;
use crate::source::PostSource;
use crate::speech::Narrator;
use crate::stats::PostStats;
use crate::store::posts::PostStore;
use crate::supervisor::LoopState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Duplicate,
    Uninteresting,
    Accepted,
}

pub struct Bot<F, N> {
    subreddit: String,
    store: PostStore,
    stats: PostStats,
    filter: F,
    narrator: N,
    console: bool,
    verbose: bool,
}

impl<F: InterestFilter, N: Narrator> Bot<F, N> {
    pub fn new(
        subreddit: impl Into<String>,
        store: PostStore,
        stats: PostStats,
        filter: F,
        narrator: N,
    ) -> Self {
        Bot {
            subreddit: subreddit.into(),
            store,
            stats,
            filter,
            narrator,
            console: false,
            verbose: false,
        }
    }

    /// Print every post and the activity gauge to stdout.
    pub fn with_console(mut self, verbose: bool) -> Self {
        self.console = true;
        self.verbose = verbose;
        self
    }

    pub fn store(&self) -> &PostStore {
        &self.store
    }

    pub fn stats(&self) -> &PostStats {
        &self.stats
    }

    pub fn process(&mut self, post: &PostRecord, now: DateTime<Local>) -> Result<Outcome, StorageError> {
        if self.console {
            report::print_contents(post, self.verbose);
        }

        let outcome = if self.store.exists(&post.id)? {
            Outcome::Duplicate
        } else if !self.filter.is_interesting(post) {
            Outcome::Uninteresting
        } else {
            if let Err(e) = self.narrator.narrate(post) {
                warn!(id = %post.fullname(), "could not narrate post: {}", error_chain(&e));
            }
            self.store.record(post, now)?;
            self.stats.increment(&now);
            Outcome::Accepted
        };

        match outcome {
            Outcome::Accepted => info!(id = %post.fullname(), "cached interesting post"),
            _ => debug!(id = %post.fullname(), ?outcome, "skipped post"),
        }

        if self.console {
            report::print_summary(&self.stats, &now);
            println!();
        }

        self.stats.save()?;
        Ok(outcome)
    }

    /// Connect to `source` and process posts until something fails.
    pub fn stream<S: PostSource>(&mut self, source: &mut S, state: &mut LoopState) -> Result<(), BotError> {
        info!(subreddit = %self.subreddit, "checking /r/{}", self.subreddit);
        source.connect()?;
        *state = LoopState::Streaming;

        loop {
            let post = source.next_post()?;
            self.process(&post, Local::now())?;
        }
    }
}
