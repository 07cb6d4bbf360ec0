//! Error types, one enum per failure source.
//!
//! Display strings describe only their own layer; the cause is reachable
//! through `source()`. Use [`error_chain`] to print the whole story.

use std::error::Error as StdError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request failed")]
    Http(#[from] reqwest::Error),

    #[error("listing endpoint returned HTTP {status}")]
    Status { status: u16 },

    #[error("invalid listing payload")]
    Decode(#[from] serde_json::Error),

    #[error("submission stream ended")]
    Ended,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQL error")]
    Sql(#[from] rusqlite::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding error")]
    Snapshot(#[from] serde_json::Error),

    #[error("could not determine data directory")]
    NoDataDir,
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("could not reload stats snapshot")]
    Snapshot(#[from] StorageError),

    #[error("terminal error")]
    Terminal(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("failed to spawn speech program")]
    Spawn(#[from] std::io::Error),

    #[error("speech program exited with status {code:?}")]
    Exit { code: Option<i32> },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read {path}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config")]
    Parse(#[from] toml::de::Error),
}

/// Failure of one watch cycle, classified by where it came from.
#[derive(Error, Debug)]
pub enum BotError {
    #[error("source stream failed")]
    Source(#[from] SourceError),

    #[error("storage failed")]
    Storage(#[from] StorageError),

    #[error("render failed")]
    Render(#[from] RenderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Source,
    Storage,
    Render,
}

impl BotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BotError::Source(_) => ErrorKind::Source,
            BotError::Storage(_) => ErrorKind::Storage,
            BotError::Render(_) => ErrorKind::Render,
        }
    }
}

/// "outer: inner: root" for an error and all its sources.
pub fn error_chain(err: &dyn StdError) -> String {
    let mut out = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk_full() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::Other, "disk full")
    }

    #[test]
    fn chain_names_each_layer_once() {
        let err: BotError = StorageError::Io(disk_full()).into();

        assert_eq!(error_chain(&err), "storage failed: IO error: disk full");
    }

    #[test]
    fn chain_of_config_read_error_keeps_the_path() {
        let err = ConfigError::Read {
            path: "/etc/subwatch.toml".into(),
            source: disk_full(),
        };

        assert_eq!(error_chain(&err), "could not read /etc/subwatch.toml: disk full");
    }

    #[test]
    fn render_wraps_storage_cause() {
        let err: BotError = RenderError::from(StorageError::NoDataDir).into();

        assert_eq!(
            error_chain(&err),
            "render failed: could not reload stats snapshot: could not determine data directory"
        );
        assert_eq!(err.kind(), ErrorKind::Render);
    }
}
