//! Menu item lists and the wrap-around menu cursor.

use crate::state::{Direction, Unit, UnitRoster};

/// Entries of the game menu opened over empty ground.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum GameMenuItem {
    EndTurn,
    Options,
}

impl GameMenuItem {
    pub const ALL: [GameMenuItem; 2] = [GameMenuItem::EndTurn, GameMenuItem::Options];
}

/// Entries of the unit action menu opened after a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum UnitMenuItem {
    Attack,
    Heal,
    Wait,
}

/// Unit menu entries available to `unit` where it stands.
///
/// `Attack` needs a living hostile in range, `Heal` needs healing power and a
/// wounded living ally in range. `Wait` is always offered.
pub fn unit_menu_items(units: &UnitRoster, unit: &Unit) -> Vec<UnitMenuItem> {
    let mut items = Vec::with_capacity(3);
    let hostile_in_range = units.iter().any(|(_, other)| {
        other.is_alive()
            && unit.faction.is_hostile_to(other.faction)
            && unit.reaches(other.position)
    });
    if hostile_in_range {
        items.push(UnitMenuItem::Attack);
    }
    let wounded_in_range = unit.can_heal()
        && units.iter().any(|(_, other)| {
            other.is_alive()
                && other.faction == unit.faction
                && other.is_wounded()
                && other.position != unit.position
                && unit.reaches(other.position)
        });
    if wounded_in_range {
        items.push(UnitMenuItem::Heal);
    }
    items.push(UnitMenuItem::Wait);
    items
}

/// Highlight index into whichever menu is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MenuCursor {
    pub index: usize,
}

impl MenuCursor {
    /// Moves the highlight with wrap-around. Returns `false` for horizontal
    /// input or a single-entry menu, which leave the highlight in place.
    pub fn navigate(&mut self, direction: Direction, len: usize) -> bool {
        if len <= 1 {
            return false;
        }
        match direction {
            Direction::Up => self.index = (self.index + len - 1) % len,
            Direction::Down => self.index = (self.index + 1) % len,
            Direction::Left | Direction::Right => return false,
        }
        true
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}
