//! Error types for the tmux host.

use paneclone_core::HostError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TmuxError {
    #[error("tmux command failed: {0}")]
    CommandFailed(String),

    #[error("failed to parse tmux output line {line_num}: {detail}")]
    ParseError { line_num: usize, detail: String },

    #[error("tmux io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TmuxError> for HostError {
    fn from(e: TmuxError) -> Self {
        match e {
            TmuxError::ParseError { .. } => HostError::Protocol(e.to_string()),
            TmuxError::CommandFailed(_) | TmuxError::Io(_) => HostError::CommandFailed(e.to_string()),
        }
    }
}
