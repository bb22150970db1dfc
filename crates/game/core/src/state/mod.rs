//! Units, grid coordinates, and the phase enumerations.
//!
//! Nothing here is global: every value lives inside a
//! [`GameSession`](crate::session::GameSession) owned by the top-level loop.
mod common;
mod phase;
mod roster;
mod unit;

pub use common::{Direction, MapDimensions, Position};
pub use phase::{AiState, Phase};
pub use roster::UnitRoster;
pub use unit::{Faction, RangeSpan, Unit, UnitId};
