//! Event handlers: the single dispatch point for side effects.
//!
//! Every event drained from the session bus is offered to each registered
//! handler in priority order. Handlers may mutate the session and emit
//! follow-up events; those are dispatched by the same drain.
//!
//! # Default handlers
//!
//! - [`FadeHandler`] (-50): busy exit after fades and the
//!   RESOLUTION → AI and SPAWNING → PLAYER transitions
//! - [`MovementHandler`] (-40): walk completion
//! - [`AudioCueHandler`] (10): cue requests
//! - [`CombatLogHandler`] and [`PhaseLogHandler`] (50): structured logs

mod audio_cue;
mod fade;
mod log;
mod movement;
mod registry;

pub use audio_cue::AudioCueHandler;
pub use fade::FadeHandler;
pub use log::{CombatLogHandler, PhaseLogHandler};
pub use movement::MovementHandler;
pub use registry::HandlerRegistry;

use tactics_core::{Event, GameSession, SessionError};

use crate::audio::AudioSink;

/// How a handler failure affects the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerCriticality {
    /// Logged, the drain finishes, then the frame fails.
    Critical,
    /// Logged as an error; the frame carries on.
    Important,
    /// Logged at debug level.
    Optional,
}

/// Mutable access handed to a handler for one event.
pub struct HandlerContext<'a> {
    pub session: &'a mut GameSession,
    pub audio: &'a mut dyn AudioSink,
}

pub trait EventHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Lower values run first.
    fn priority(&self) -> i32 {
        0
    }

    fn criticality(&self) -> HandlerCriticality {
        HandlerCriticality::Important
    }

    fn should_trigger(&self, event: &Event) -> bool;

    fn handle(&self, event: &Event, ctx: &mut HandlerContext<'_>) -> Result<(), SessionError>;
}
