//! Error types for the paneclone core.

use thiserror::Error;

/// Failure querying the process table.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The process exited (or never existed) between the caller learning its
    /// pid and the query.
    #[error("no such process: {0}")]
    NotFound(u32),

    #[error("process table io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure talking to the host application that owns the panes.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("pane not found: {0}")]
    PaneNotFound(String),

    #[error("host command failed: {0}")]
    CommandFailed(String),

    #[error("unexpected host output: {0}")]
    Protocol(String),
}

/// Reasons a clone request is refused before anything is sent to the host.
#[derive(Debug, Error)]
pub enum CloneError {
    #[error("a clone is already waiting for its pane")]
    AlreadyPending,

    #[error("pane {0} has no remote session")]
    NoRemoteSession(String),

    #[error("pane {0} has no known process id")]
    NoPanePid(String),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Problems reading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
