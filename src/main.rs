use clap::Parser;
use std::path::{Path, PathBuf};
use subwatch::bot::Bot;
use subwatch::cli::{Cli, Command, HistoryArgs, PlotArgs, StatsArgs, WatchArgs};
use subwatch::config::Config;
use subwatch::error::{error_chain, StorageError};
use subwatch::filter::Policy;
use subwatch::platform;
use subwatch::report;
use subwatch::source::reddit::RedditClient;
use subwatch::source::SubmissionStream;
use subwatch::speech::{SpeechCommand, Voice};
use subwatch::stats::PostStats;
use subwatch::store::{self, posts::PostStore};
use subwatch::supervisor::{RetryPolicy, Supervisor};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_config(path: Option<&Path>) -> Config {
    Config::load(path).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", error_chain(&e));
        std::process::exit(1);
    })
}

fn data_dir(config: &Config) -> PathBuf {
    let dir: Result<PathBuf, StorageError> = match &config.data_dir {
        Some(dir) => std::fs::create_dir_all(dir).map(|_| dir.clone()).map_err(Into::into),
        None => store::default_data_dir(),
    };

    dir.unwrap_or_else(|e| {
        eprintln!("Error preparing data directory: {}", error_chain(&e));
        std::process::exit(1);
    })
}

fn watch(args: &WatchArgs) {
    let mut config = load_config(args.config.as_deref());
    config.merge_watch_args(args);
    init_logging(config.verbose);

    let dir = data_dir(&config);
    let db_path = store::db_path(&dir, &config.subreddit);
    let stats_path = store::stats_path(&dir);

    let post_store = match PostStore::open(&db_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error opening {}: {}", db_path.display(), error_chain(&e));
            std::process::exit(1);
        }
    };

    let stats = match PostStats::load(&stats_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading stats snapshot {}: {}", stats_path.display(), error_chain(&e));
            std::process::exit(1);
        }
    };

    if config.speech.enabled {
        let speech = SpeechCommand::new(&config.speech);
        if !platform::command_available(speech.program(), platform::speech_probe(speech.program())) {
            warn!(program = speech.program(), "speech program did not answer a probe, narration may fail");
        }
    }

    let client = match RedditClient::new(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error building HTTP client: {}", error_chain(&e));
            std::process::exit(1);
        }
    };

    info!(
        subreddit = %config.subreddit,
        db = %db_path.display(),
        snapshot = %stats_path.display(),
        "watching"
    );

    let mut source = SubmissionStream::new(client, config.poll_interval);
    let mut bot = Bot::new(
        config.subreddit.clone(),
        post_store,
        stats,
        Policy::from_config(&config.filter),
        Voice::from_config(&config.speech),
    )
    .with_console(config.verbose);

    let policy = RetryPolicy {
        delay: config.retry_delay,
        max_restarts: config.max_restarts,
    };

    let stopped = Supervisor::new(policy).run(|state| bot.stream(&mut source, state));

    if let Some(e) = stopped.last_error {
        eprintln!(
            "Giving up after {} restarts: {}",
            stopped.restarts,
            error_chain(&e)
        );
        std::process::exit(1);
    }
}

fn plot(args: &PlotArgs) {
    let mut config = load_config(args.config.as_deref());
    config.merge_plot_args(args);

    let snapshot = store::stats_path(&data_dir(&config));

    // no log subscriber here: the chart owns the terminal
    #[cfg(feature = "tui")]
    {
        if let Err(e) = subwatch::plot::tui::run(&snapshot, config.plot.refresh) {
            eprintln!("Error running plot: {}", error_chain(&e));
            std::process::exit(1);
        }
    }

    #[cfg(not(feature = "tui"))]
    {
        let _ = snapshot;
        eprintln!("subwatch was built without the 'tui' feature; plotting is unavailable.");
        std::process::exit(1);
    }
}

fn stats(args: &StatsArgs) {
    let mut config = load_config(args.config.as_deref());
    if let Some(dir) = &args.data_dir {
        config.data_dir = Some(dir.clone());
    }

    let path = store::stats_path(&data_dir(&config));
    let stats = match PostStats::load(&path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading stats snapshot {}: {}", path.display(), error_chain(&e));
            std::process::exit(1);
        }
    };

    let now = chrono::Local::now();
    if args.json {
        println!("{}", report::json::render(&stats, &now));
    } else {
        print!("{}", report::table::render_stats(&stats));
        println!("\n{}", report::render_summary(&stats, &now));
    }
}

fn history(args: &HistoryArgs) {
    let mut config = load_config(args.config.as_deref());
    if let Some(subreddit) = &args.subreddit {
        config.subreddit = subreddit.clone();
    }
    if let Some(dir) = &args.data_dir {
        config.data_dir = Some(dir.clone());
    }

    let db_path = store::db_path(&data_dir(&config), &config.subreddit);
    let posts = PostStore::open(&db_path).and_then(|s| s.recent(args.limit));

    match posts {
        Ok(posts) => print!("{}", report::table::render_history(&posts)),
        Err(e) => {
            eprintln!("Error reading {}: {}", db_path.display(), error_chain(&e));
            std::process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Watch(args) => watch(&args),
        Command::Plot(args) => plot(&args),
        Command::Stats(args) => stats(&args),
        Command::History(args) => history(&args),
    }
}
