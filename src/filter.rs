//! Interest policies.
//!
//! A policy only looks at the post itself. Whether the post was already
//! processed is the store's business; the bot composes the two.

use std::collections::HashSet;

use crate::config::{FilterConfig, FilterKind};
use crate::post::PostRecord;

pub trait InterestFilter {
    fn is_interesting(&self, post: &PostRecord) -> bool;
}

impl<F> InterestFilter for F
where
    F: Fn(&PostRecord) -> bool,
{
    fn is_interesting(&self, post: &PostRecord) -> bool {
        self(post)
    }
}

/// Accepts every post
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl InterestFilter for AcceptAll {
    fn is_interesting(&self, _post: &PostRecord) -> bool {
        true
    }
}

/// Accepts a post when any word of its title or body is in the vocabulary.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    vocabulary: HashSet<String>,
}

impl KeywordFilter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        KeywordFilter {
            vocabulary: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }
}

impl InterestFilter for KeywordFilter {
    fn is_interesting(&self, post: &PostRecord) -> bool {
        tokenize(&post.title)
            .chain(tokenize(&post.selftext))
            .any(|token| self.vocabulary.contains(&token))
    }
}

/// Accepts a post whose link flair matches, ignoring case.
#[derive(Debug, Clone)]
pub struct FlairFilter {
    flair: String,
}

impl FlairFilter {
    pub fn new(flair: impl Into<String>) -> Self {
        FlairFilter { flair: flair.into() }
    }
}

impl InterestFilter for FlairFilter {
    fn is_interesting(&self, post: &PostRecord) -> bool {
        post.flair
            .as_deref()
            .is_some_and(|flair| flair.eq_ignore_ascii_case(&self.flair))
    }
}

/// Policy picked at runtime from the config file.
#[derive(Debug, Clone)]
pub enum Policy {
    All(AcceptAll),
    Keywords(KeywordFilter),
    Flair(FlairFilter),
}

impl Policy {
    pub fn from_config(config: &FilterConfig) -> Self {
        match config.kind {
            FilterKind::All => Policy::All(AcceptAll),
            FilterKind::Keywords => Policy::Keywords(KeywordFilter::new(&config.keywords)),
            FilterKind::Flair => Policy::Flair(FlairFilter::new(config.flair.clone())),
        }
    }
}

impl InterestFilter for Policy {
    fn is_interesting(&self, post: &PostRecord) -> bool {
        match self {
            Policy::All(f) => f.is_interesting(post),
            Policy::Keywords(f) => f.is_interesting(post),
            Policy::Flair(f) => f.is_interesting(post),
        }
    }
}

/// Lowercase words; apostrophes stay inside words ("can't").
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|word| word.trim_matches('\''))
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
}
