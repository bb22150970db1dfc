use std::fmt;

use super::Position;

/// Generational handle into a [`UnitRoster`](super::UnitRoster).
///
/// Handles behave like weak references: once the unit is removed, the slot's
/// generation moves on and lookups through a stale handle return `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl UnitId {
    pub const fn index(self) -> u32 {
        self.index
    }

    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Side a unit fights for.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Faction {
    /// Controlled through the interface state machine.
    #[default]
    Player,
    /// Controlled by the AI driver during the AI phase.
    Enemy,
}

impl Faction {
    pub fn is_hostile_to(self, other: Faction) -> bool {
        self != other
    }
}

/// Inclusive Manhattan distance band an equipped item can reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeSpan {
    pub min: u32,
    pub max: u32,
}

impl RangeSpan {
    pub const MELEE: Self = Self { min: 1, max: 1 };

    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(self, distance: u32) -> bool {
        distance >= self.min && distance <= self.max
    }
}

impl Default for RangeSpan {
    fn default() -> Self {
        Self::MELEE
    }
}

/// A combatant on the map.
///
/// Stats are read-only snapshots supplied by the unit data loader. The combat
/// resolver is the sole writer of `hp` during an engagement; `exhausted` is
/// written by the resolver, the wait command, and the phase controller.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub name: String,
    pub faction: Faction,
    pub position: Position,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    /// Hit chance in percent; a d100 roll strictly below it hits.
    pub accuracy: u32,
    /// Hit points restored by a heal; zero means the unit cannot heal.
    pub healing: u32,
    pub movement: u32,
    pub range: RangeSpan,
    #[cfg_attr(feature = "serde", serde(default))]
    pub exhausted: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub should_die: bool,
}

impl Unit {
    pub fn new(name: impl Into<String>, faction: Faction, position: Position) -> Self {
        Self {
            name: name.into(),
            faction,
            position,
            hp: 10,
            max_hp: 10,
            attack: 5,
            defense: 2,
            accuracy: 80,
            healing: 0,
            movement: 4,
            range: RangeSpan::MELEE,
            exhausted: false,
            should_die: false,
        }
    }

    #[must_use]
    pub fn with_hp(mut self, hp: u32, max_hp: u32) -> Self {
        self.hp = hp.min(max_hp);
        self.max_hp = max_hp;
        self
    }

    #[must_use]
    pub fn with_combat(mut self, attack: u32, defense: u32, accuracy: u32) -> Self {
        self.attack = attack;
        self.defense = defense;
        self.accuracy = accuracy;
        self
    }

    #[must_use]
    pub fn with_healing(mut self, healing: u32) -> Self {
        self.healing = healing;
        self
    }

    #[must_use]
    pub fn with_movement(mut self, movement: u32) -> Self {
        self.movement = movement;
        self
    }

    #[must_use]
    pub fn with_range(mut self, range: RangeSpan) -> Self {
        self.range = range;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0 && !self.should_die
    }

    /// Alive and not yet spent this turn.
    pub fn can_act(&self) -> bool {
        self.is_alive() && !self.exhausted
    }

    pub fn is_wounded(&self) -> bool {
        self.hp < self.max_hp
    }

    pub fn can_heal(&self) -> bool {
        self.healing > 0
    }

    /// Whether `target` sits inside this unit's range from `from`.
    pub fn reaches_from(&self, from: Position, target: Position) -> bool {
        self.range.contains(from.distance(target))
    }

    pub fn reaches(&self, target: Position) -> bool {
        self.reaches_from(self.position, target)
    }
}
