//! Common error infrastructure for tactics-core.
//!
//! Each subsystem has its own `thiserror` enum; [`SessionError`] folds them
//! together for callers driving a [`GameSession`](crate::session::GameSession).
//!
//! # Severity
//!
//! - **Internal**: programmer-precondition violations (second resolver,
//!   malformed timeline data, out-of-order phase transition). Also guarded by
//!   `debug_assert!` where they occur.
//! - **Recoverable**: data lookup misses (stale unit handle, AI decision for a
//!   unit that cannot act). Logged and resolved to a safe default.
//! - **Validation**: requests the current state rejects outright, such as any
//!   transition out of a terminal phase.

use crate::event::BusError;
use crate::state::{Phase, UnitId};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
}

impl ErrorSeverity {
    /// Returns true if this error indicates a bug in the caller.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all tactics-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for the variant, used in structured logs.
    fn error_code(&self) -> &'static str;
}

/// Malformed timeline data.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TimelineError {
    #[error("channel needs at least two keyframes")]
    EmptyChannel,

    #[error("channel must span t=0..1, got first={first} last={last}")]
    BoundaryViolation { first: f32, last: f32 },

    #[error("channel keyframes are not ascending by t")]
    UnsortedKeyframes,

    #[error("event samples are not ascending by t")]
    UnsortedEvents,

    #[error("animation finish must be at least one frame")]
    ZeroFinish,

    #[error("animation supports at most {max} channels")]
    TooManyChannels { max: usize },
}

impl GameError for TimelineError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyChannel => "TIMELINE_EMPTY_CHANNEL",
            Self::BoundaryViolation { .. } => "TIMELINE_BOUNDARY",
            Self::UnsortedKeyframes => "TIMELINE_UNSORTED_KEYFRAMES",
            Self::UnsortedEvents => "TIMELINE_UNSORTED_EVENTS",
            Self::ZeroFinish => "TIMELINE_ZERO_FINISH",
            Self::TooManyChannels { .. } => "TIMELINE_TOO_MANY_CHANNELS",
        }
    }
}

/// Combat resolver misuse.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolverError {
    #[error("an engagement between {attacker} and {victim} is still resolving")]
    AlreadyActive { attacker: UnitId, victim: UnitId },

    #[error("unit {0} no longer exists")]
    UnknownUnit(UnitId),
}

impl GameError for ResolverError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyActive { .. } => ErrorSeverity::Internal,
            Self::UnknownUnit(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyActive { .. } => "RESOLVER_ALREADY_ACTIVE",
            Self::UnknownUnit(_) => "RESOLVER_UNKNOWN_UNIT",
        }
    }
}

/// Rejected phase transitions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PhaseError {
    #[error("phase {0} is terminal")]
    Terminal(Phase),

    #[error("cannot enter {to} from {from}")]
    InvalidTransition { from: Phase, to: Phase },
}

impl GameError for PhaseError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Terminal(_) => ErrorSeverity::Validation,
            Self::InvalidTransition { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Terminal(_) => "PHASE_TERMINAL",
            Self::InvalidTransition { .. } => "PHASE_INVALID_TRANSITION",
        }
    }
}

/// Errors surfaced while driving a game session.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Resolver(#[from] ResolverError),

    #[error(transparent)]
    Phase(#[from] PhaseError),

    #[error(transparent)]
    Bus(#[from] BusError),

    #[error("AI decisions are only accepted while searching in the AI phase (phase {phase})")]
    AiOutOfPhase { phase: Phase },
}

impl GameError for SessionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Resolver(err) => err.severity(),
            Self::Phase(err) => err.severity(),
            Self::Bus(_) => ErrorSeverity::Internal,
            Self::AiOutOfPhase { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Resolver(err) => err.error_code(),
            Self::Phase(err) => err.error_code(),
            Self::Bus(_) => "BUS_DRAIN_LIMIT",
            Self::AiOutOfPhase { .. } => "SESSION_AI_OUT_OF_PHASE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_error_delegates_severity() {
        let err: SessionError = PhaseError::Terminal(Phase::Victory).into();
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.error_code(), "PHASE_TERMINAL");
        assert_eq!(err.to_string(), "phase victory is terminal");
    }

    #[test]
    fn precondition_violations_are_internal() {
        let err: SessionError = ResolverError::AlreadyActive {
            attacker: UnitId {
                index: 0,
                generation: 0,
            },
            victim: UnitId {
                index: 1,
                generation: 0,
            },
        }
        .into();
        assert!(err.severity().is_internal());
        assert_eq!(err.error_code(), "RESOLVER_ALREADY_ACTIVE");
        assert!(TimelineError::ZeroFinish.severity().is_internal());
        let err = PhaseError::InvalidTransition {
            from: Phase::Player,
            to: Phase::Ai,
        };
        assert!(err.severity().is_internal());
        assert_eq!(err.to_string(), "cannot enter ai from player");
    }
}
