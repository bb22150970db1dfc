//! Typed, payload-carrying notifications and the FIFO bus that carries them.
//!
//! Events are the only channel between components. Anything that produces a
//! side effect (audio cue, new animation, phase change) does so by emitting an
//! [`Event`]; the runtime's handler registry is the single dispatch point.

mod bus;

pub use bus::{BusError, EventBus};

use crate::state::UnitId;

/// Canonical enumeration of everything that can happen in a frame.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    // ----- interface feedback -----
    CursorMoved,
    MenuOpened,
    MenuClosed,
    MenuNavigated,
    MenuConfirmed,
    UnitSelected,
    UnitDeselected,
    ActionDenied,
    MoveUndone,
    PauseToggled,
    DebugToggled,
    FastForwardToggled,

    // ----- committed actions -----
    UnitMoved,
    AttackCommitted,
    HealCommitted,
    UnitWaited,
    PlayerEndedTurn,

    // ----- combat -----
    CombatStarted,
    AttackImpact,
    AttackHit,
    AttackMiss,
    CounterHit,
    CounterMiss,
    UnitHealed,
    UnitDied,
    ResolutionDone,

    // ----- effects and phases -----
    MoveFinished,
    FadeDone,
    EndTurn,
    UnitSpawned,
    Victory,
    GameOver,
}

impl EventKind {
    /// Commits are the interface transitions that hand control to a busy
    /// sentinel; exactly one is emitted per committed action.
    pub const fn is_commit(self) -> bool {
        matches!(
            self,
            EventKind::UnitMoved
                | EventKind::AttackCommitted
                | EventKind::HealCommitted
                | EventKind::UnitWaited
                | EventKind::PlayerEndedTurn
        )
    }
}

/// A queued notification. Immutable once built and consumed exactly once.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub kind: EventKind,
    /// Weak reference: the unit may be gone by the time the event drains.
    pub unit: Option<UnitId>,
    pub integer: Option<i64>,
    pub number: Option<f32>,
}

impl Event {
    pub const fn new(kind: EventKind) -> Self {
        Self {
            kind,
            unit: None,
            integer: None,
            number: None,
        }
    }

    #[must_use]
    pub const fn with_unit(mut self, unit: UnitId) -> Self {
        self.unit = Some(unit);
        self
    }

    #[must_use]
    pub const fn with_integer(mut self, value: i64) -> Self {
        self.integer = Some(value);
        self
    }

    #[must_use]
    pub const fn with_number(mut self, value: f32) -> Self {
        self.number = Some(value);
        self
    }
}

impl From<EventKind> for Event {
    fn from(kind: EventKind) -> Self {
        Event::new(kind)
    }
}
