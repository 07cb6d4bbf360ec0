//! Runtime configuration.
//!
//! Read from `~/.config/subwatch/config.toml` (or the platform equivalent)
//! or an explicit `--config` path. Every field is optional; command line
//! flags win over the file.

use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::{PlotArgs, WatchArgs};
use crate::error::ConfigError;
use crate::platform::{self, Platform};

pub const DEFAULT_SUBREDDIT: &str = "relationships";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    All,
    Keywords,
    Flair,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub kind: FilterKind,
    pub keywords: Vec<String>,
    pub flair: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            kind: FilterKind::All,
            keywords: vec![
                "breakup".into(),
                "broke".into(),
                "divorce".into(),
                "dumped".into(),
                "ex".into(),
                "separated".into(),
            ],
            flair: "Breakups".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub enabled: bool,
    pub program: String,
    pub male_voice: String,
    pub female_voice: String,
}

impl SpeechConfig {
    fn for_platform(platform: Platform) -> Self {
        let (program, male, female) = platform::default_speech(platform);
        SpeechConfig {
            enabled: true,
            program: program.into(),
            male_voice: male.into(),
            female_voice: female.into(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        SpeechConfig::for_platform(platform::detect())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    #[serde(deserialize_with = "human_duration")]
    pub refresh: Duration,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            refresh: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub subreddit: String,
    pub data_dir: Option<PathBuf>,
    pub user_agent: String,
    pub api_base: String,
    #[serde(deserialize_with = "human_duration")]
    pub poll_interval: Duration,
    #[serde(deserialize_with = "human_duration")]
    pub retry_delay: Duration,
    #[serde(deserialize_with = "human_duration")]
    pub request_timeout: Duration,
    pub max_restarts: Option<u32>,
    pub verbose: bool,
    pub filter: FilterConfig,
    pub speech: SpeechConfig,
    pub plot: PlotConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            subreddit: DEFAULT_SUBREDDIT.into(),
            data_dir: None,
            user_agent: format!("subwatch/{} (post watcher)", env!("CARGO_PKG_VERSION")),
            api_base: "https://www.reddit.com".into(),
            poll_interval: Duration::from_secs(5),
            retry_delay: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_restarts: None,
            verbose: false,
            filter: FilterConfig::default(),
            speech: SpeechConfig::default(),
            plot: PlotConfig::default(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load `path`, or the default config file when it exists, or defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Config::default()),
            },
        };

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Config::from_toml(&content)
    }

    pub fn merge_watch_args(&mut self, args: &WatchArgs) {
        if let Some(subreddit) = &args.subreddit {
            self.subreddit = subreddit.clone();
        }
        if let Some(dir) = &args.data_dir {
            self.data_dir = Some(dir.clone());
        }
        if args.no_speech {
            self.speech.enabled = false;
        }
        if let Some(delay) = &args.retry_delay {
            self.retry_delay = **delay;
        }
        if args.verbose {
            self.verbose = true;
        }
    }

    pub fn merge_plot_args(&mut self, args: &PlotArgs) {
        if let Some(refresh) = &args.refresh {
            self.plot.refresh = **refresh;
        }
        if let Some(dir) = &args.data_dir {
            self.data_dir = Some(dir.clone());
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "subwatch")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn human_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
}
