use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use chrono::Local;
use subwatch::bot::Bot;
use subwatch::error::{BotError, SourceError, SpeechError};
use subwatch::filter::KeywordFilter;
use subwatch::plot::Plotter;
use subwatch::post::PostRecord;
use subwatch::source::{Listing, SubmissionStream};
use subwatch::speech::Narrator;
use subwatch::stats::PostStats;
use subwatch::store::{self, posts::PostStore};
use subwatch::supervisor::{LoopState, RetryPolicy, Supervisor};

/// Hands out one scripted response per fetch, then reports the forum as down.
struct Scripted(VecDeque<Result<Vec<PostRecord>, u16>>);

impl Listing for Scripted {
    fn fetch_new(&mut self) -> Result<Vec<PostRecord>, SourceError> {
        match self.0.pop_front() {
            Some(Ok(posts)) => Ok(posts),
            Some(Err(status)) => Err(SourceError::Status { status }),
            None => Err(SourceError::Status { status: 503 }),
        }
    }
}

#[derive(Default)]
struct Transcript(RefCell<Vec<String>>);

impl Narrator for &Transcript {
    fn narrate(&self, post: &PostRecord) -> Result<(), SpeechError> {
        self.0.borrow_mut().push(post.title.clone());
        Ok(())
    }
}

fn post(id: &str, title: &str) -> PostRecord {
    PostRecord {
        id: id.to_string(),
        subreddit: "relationships".to_string(),
        title: title.to_string(),
        selftext: String::new(),
        url: format!("https://www.reddit.com/r/relationships/comments/{id}"),
        flair: None,
        observed_at: Local::now(),
    }
}

#[test]
fn watcher_survives_restarts_without_double_counting() {
    let dir = tempfile::tempdir().unwrap();
    let db = store::db_path(dir.path(), "Relationships");
    let snapshot = store::stats_path(dir.path());

    // newest first, the way the listing endpoint returns them
    let listing = Scripted(VecDeque::from(vec![
        Ok(vec![post("b2", "Our divorce is final"), post("b1", "Breakup after 5 years")]),
        Err(502),
        // the fresh connection sees the old posts again
        Ok(vec![
            post("b4", "Dumped by text"),
            post("b3", "Wedding plans"),
            post("b2", "Our divorce is final"),
            post("b1", "Breakup after 5 years"),
        ]),
    ]));
    let mut source = SubmissionStream::new(listing, Duration::ZERO);

    let transcript = Transcript::default();
    let mut bot = Bot::new(
        "relationships",
        PostStore::open(&db).unwrap(),
        PostStats::load(&snapshot).unwrap(),
        KeywordFilter::new(["breakup", "divorce", "dumped"]),
        &transcript,
    );

    let mut naps = Vec::new();
    let policy = RetryPolicy {
        delay: Duration::from_secs(10),
        max_restarts: Some(1),
    };
    let mut supervisor = Supervisor::with_sleep(policy, |d| naps.push(d));

    let stopped = supervisor.run(|state| bot.stream(&mut source, state));

    assert_eq!(stopped.restarts, 1);
    assert!(matches!(
        stopped.last_error,
        Some(BotError::Source(SourceError::Status { status: 503 }))
    ));
    assert_eq!(supervisor.state(), LoopState::Idle);
    drop(supervisor);
    assert_eq!(naps, vec![Duration::from_secs(10)]);

    assert_eq!(
        *transcript.0.borrow(),
        vec!["Breakup after 5 years", "Our divorce is final", "Dumped by text"]
    );

    drop(bot);
    let reopened = PostStore::open(&db).unwrap();
    assert_eq!(reopened.count().unwrap(), 3);
    assert!(reopened.exists("t3_b1").unwrap());
    assert!(!reopened.exists("b3").unwrap());

    let stats = PostStats::load(&snapshot).unwrap();
    assert_eq!(stats.total(), 3);
}

#[test]
fn plotter_follows_the_snapshot_the_watcher_writes() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = store::stats_path(dir.path());

    let mut plotter = Plotter::new(&snapshot, &Local::now());
    assert!(plotter.series().is_empty());

    let transcript = Transcript::default();
    let mut bot = Bot::new(
        "relationships",
        PostStore::open_in_memory().unwrap(),
        PostStats::load(&snapshot).unwrap(),
        |_: &PostRecord| true,
        &transcript,
    );

    let now = Local::now();
    bot.process(&post("p1", "first"), now).unwrap();
    bot.process(&post("p2", "second"), now).unwrap();

    plotter.tick(&now).unwrap();

    assert_eq!(plotter.totals().total, 2);
    assert_eq!(plotter.totals().this_hour, 2);
    assert_eq!(*plotter.series().ys.last().unwrap(), 2);
}
