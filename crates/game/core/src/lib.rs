//! Deterministic tactics-battle core.
//!
//! `tactics-core` couples four cooperating state machines (player interface,
//! turn phase, AI turn progression, combat resolution) over a single FIFO
//! [`event::EventBus`] and a keyframe [`timeline`] engine. Everything hangs
//! off a [`GameSession`]; there are no globals, threads or I/O.
//!
//! A frame, as driven by `tactics-runtime`:
//!
//! 1. [`GameSession::apply_command`] feeds player input through
//!    [`interface::transition`].
//! 2. The AI driver, if it is the AI phase, hands a decision to
//!    [`GameSession::apply_ai_decision`].
//! 3. Pending events are drained through the runtime's handlers.
//! 4. [`GameSession::advance`] ticks fades, parcels and the
//!    [`combat::CombatResolver`].
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod interface;
pub mod session;
pub mod state;
pub mod timeline;

pub use combat::{
    CombatPreview, CombatResolver, DiceSource, Engagement, ScriptedDice, SeededDice,
};
pub use config::GameConfig;
pub use engine::TurnController;
pub use error::{
    ErrorSeverity, GameError, PhaseError, ResolverError, SessionError, TimelineError,
};
pub use event::{BusError, Event, EventBus, EventKind};
pub use interface::{
    Command, Effect, Interface, InterfaceState, OpenField, Pathfinder, Selection,
};
pub use session::{AiAction, AiDecision, GameSession, Parcel};
pub use state::{
    AiState, Direction, Faction, MapDimensions, Phase, Position, RangeSpan, Unit, UnitId,
    UnitRoster,
};
pub use timeline::{Animation, AnimationId, Easing, Status};
