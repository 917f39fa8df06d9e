//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, level lookup and player input so
//! clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use game_core::{ActionError, ErrorSeverity, GameError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("no level named `{name}` is registered")]
    UnknownLevel { name: String },

    #[error("player action rejected: {0}")]
    InvalidAction(#[from] ActionError),

    #[error("environment variable {key} has an invalid value `{value}`")]
    InvalidEnv { key: &'static str, value: String },
}

impl RuntimeError {
    /// Severity of the underlying failure; a broken worker is an internal fault.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidAction(error) => error.severity(),
            Self::UnknownLevel { .. } | Self::InvalidEnv { .. } => ErrorSeverity::Validation,
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => {
                ErrorSeverity::Internal
            }
        }
    }
}
