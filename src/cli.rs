use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "subwatch")]
#[command(about = "Watches a subreddit for new posts and charts posting activity")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Stream new posts, narrate the interesting ones and count them
    Watch(WatchArgs),

    /// Live chart of posts per hour, reloaded from the stats snapshot
    Plot(PlotArgs),

    /// Print the collected per-hour counts
    Stats(StatsArgs),

    /// List posts already recorded
    History(HistoryArgs),
}

#[derive(Parser)]
pub struct WatchArgs {
    /// Subreddit to watch (defaults to the config value)
    #[arg(long, short = 's')]
    pub subreddit: Option<String>,

    /// Path to config.toml
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Directory holding the database and stats snapshot
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Do not read posts aloud
    #[arg(long, default_value_t = false)]
    pub no_speech: bool,

    /// Delay before restarting after a failure, e.g. "10s"
    #[arg(long)]
    pub retry_delay: Option<humantime::Duration>,

    /// Show debug logging and full post bodies
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

#[derive(Parser)]
pub struct PlotArgs {
    /// Path to config.toml
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Directory holding the stats snapshot
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Redraw cadence, e.g. "500ms"
    #[arg(long)]
    pub refresh: Option<humantime::Duration>,
}

#[derive(Parser)]
pub struct StatsArgs {
    /// Path to config.toml
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Directory holding the stats snapshot
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Parser)]
pub struct HistoryArgs {
    /// Subreddit whose database to read (defaults to the config value)
    #[arg(long, short = 's')]
    pub subreddit: Option<String>,

    /// Path to config.toml
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Directory holding the database
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Number of posts to show
    #[arg(long, short = 'n', default_value_t = 20)]
    pub limit: usize,
}
