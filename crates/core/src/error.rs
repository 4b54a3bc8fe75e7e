use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing the persisted leaderboard
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("leaderboard file {path} is not valid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode leaderboard: {0}")]
    Encode(#[from] serde_json::Error),
}

impl LeaderboardError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
