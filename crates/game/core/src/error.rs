//! Error types at the boundary of the simulation.
//!
//! The simulation itself never fails: blocked moves, deadlocks and deaths are
//! reported as events. Errors only exist at the boundary where an outside
//! caller hands the core something to act on, such as a player action.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each boundary has its own error type with specific variants
//! - **Rich Context**: Errors include actor, position, and tick for debugging
//! - **Severity**: callers decide whether to retry from the severity alone

use crate::grid::Pos;
use crate::state::EntityId;

/// How a caller should react to an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Can retry with the same or an alternative action.
    ///
    /// Examples: the player is dead this tick, target moved away
    Recoverable,

    /// Invalid input, should not retry without changes.
    ///
    /// Examples: unknown entity, destination not adjacent
    Validation,

    /// Unexpected state inconsistency. These indicate bugs.
    Internal,
}

impl ErrorSeverity {
    /// Lower-case name, used as a log field.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Retrying later, or with another action, may succeed.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// The error points at a bug rather than bad input.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Where and when an error happened.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Entity that triggered the error (if applicable).
    pub actor: Option<EntityId>,

    /// Position where the error occurred (if applicable).
    pub position: Option<Pos>,

    /// Turn counter at the time of error.
    pub tick: u64,
}

impl ErrorContext {
    /// Creates a new error context for the given tick.
    #[must_use]
    pub const fn new(tick: u64) -> Self {
        Self {
            actor: None,
            position: None,
            tick,
        }
    }

    #[must_use]
    pub const fn with_actor(mut self, actor: EntityId) -> Self {
        self.actor = Some(actor);
        self
    }

    #[must_use]
    pub const fn with_position(mut self, position: Pos) -> Self {
        self.position = Some(position);
        self
    }
}

/// Shared classification for every boundary error.
///
/// Provides a uniform interface for error classification and context
/// retrieval across the error types in the crate.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Stable identifier, suitable for logs and event payloads.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Rejection of an externally submitted player action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),

    #[error("entity {actor} is not driven by the player controller")]
    NotPlayerControlled { actor: EntityId },

    #[error("target {target} is not adjacent to {from}")]
    NotAdjacent {
        from: Pos,
        target: Pos,
        context: ErrorContext,
    },

    #[error("target {target} lies on the grid edge")]
    OutOfBounds { target: Pos, context: ErrorContext },

    #[error("the player is dead")]
    PlayerDead { context: ErrorContext },
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownEntity(_) | Self::NotPlayerControlled { .. } => {
                ErrorSeverity::Validation
            }
            Self::NotAdjacent { .. } | Self::OutOfBounds { .. } => ErrorSeverity::Validation,
            Self::PlayerDead { .. } => ErrorSeverity::Recoverable,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::NotAdjacent { context, .. }
            | Self::OutOfBounds { context, .. }
            | Self::PlayerDead { context } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEntity(_) => "ACTION_UNKNOWN_ENTITY",
            Self::NotPlayerControlled { .. } => "ACTION_NOT_PLAYER_CONTROLLED",
            Self::NotAdjacent { .. } => "ACTION_NOT_ADJACENT",
            Self::OutOfBounds { .. } => "ACTION_OUT_OF_BOUNDS",
            Self::PlayerDead { .. } => "ACTION_PLAYER_DEAD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_errors_are_classified() {
        let err = ActionError::NotAdjacent {
            from: Pos::new(1, 1),
            target: Pos::new(5, 5),
            context: ErrorContext::new(3).with_actor(EntityId::PLAYER),
        };
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.error_code(), "ACTION_NOT_ADJACENT");
        assert_eq!(err.context().map(|c| c.tick), Some(3));
        assert!(
            ActionError::PlayerDead {
                context: ErrorContext::default()
            }
            .severity()
            .is_recoverable()
        );
    }
}
