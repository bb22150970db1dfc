//! Runtime orchestration for the tactics core.
//!
//! This crate wires a [`tactics_core::GameSession`] to the outside world:
//! handlers turn drained events into side effects, an audio sink receives
//! cue requests, and an AI driver supplies enemy decisions. Hosts embed
//! [`Runtime`] and call [`Runtime::frame`] once per tick.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the frame loop and builder
//! - [`handlers`] is the single dispatch point for event side effects
//! - [`audio`] defines the cue contract and the default cue table
//! - [`ai`] is the seam for enemy decision logic
//! - [`config`] loads [`RuntimeConfig`] from RON
pub mod ai;
pub mod audio;
pub mod config;
pub mod error;
pub mod handlers;
pub mod runtime;

pub use ai::{AiDriver, PassiveAi, ScriptedAi};
pub use audio::{AudioSink, CueTable, RecordingAudio, TracingAudio};
pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use handlers::{
    AudioCueHandler, CombatLogHandler, EventHandler, FadeHandler, HandlerContext,
    HandlerCriticality, HandlerRegistry, MovementHandler, PhaseLogHandler,
};
pub use runtime::{FrameReport, Runtime, RuntimeBuilder};
