//! Combat resolution.
//!
//! # Architecture
//!
//! - **Pure rules** ([`rules`]): hit checks, damage floor, counter suppression.
//!   Side-effect free and driven by explicit rolls.
//! - **Dice** ([`DiceSource`]): the only source of randomness. Seeded for play,
//!   scripted for tests.
//! - **Resolver** ([`CombatResolver`]): the staged SIMULATING → PLAYING → IDLE
//!   process that computes an outcome once, plays it back over a fixed number
//!   of frames, and assigns damage exactly once at the end.

mod dice;
mod resolver;
pub mod rules;

pub use dice::{DiceSource, ScriptedDice, SeededDice};
pub use resolver::{CombatPreview, CombatResolver, Completion, Engagement};
pub use rules::{AttackOutcome, EngagementOutcome, calculate_damage, check_hit, resolve_attack};
