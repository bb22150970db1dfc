//! Generational arena holding every unit on the map.

use super::{Faction, Position, Unit, UnitId};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Slot {
    generation: u32,
    unit: Option<Unit>,
}

/// Slot map of units indexed by stable [`UnitId`] handles.
///
/// Removed slots are recycled with a bumped generation, so handles held in
/// queued events never alias a newer unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitRoster {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl UnitRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit: Unit) -> UnitId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.unit = Some(unit);
            return UnitId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            unit: Some(unit),
        });
        UnitId {
            index,
            generation: 0,
        }
    }

    pub fn remove(&mut self, id: UnitId) -> Option<Unit> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let unit = slot.unit.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(unit)
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.unit.as_ref())
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.unit.as_mut())
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.unit.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates units in slot order, which is also insertion order until a
    /// slot is recycled.
    pub fn iter(&self) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.unit.as_ref().map(|unit| {
                (
                    UnitId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    unit,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (UnitId, &mut Unit)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.unit.as_mut().map(|unit| {
                (
                    UnitId {
                        index: index as u32,
                        generation,
                    },
                    unit,
                )
            })
        })
    }

    /// Living unit standing on `position`, if any.
    pub fn unit_at(&self, position: Position) -> Option<UnitId> {
        self.iter()
            .find(|(_, unit)| unit.position == position && unit.is_alive())
            .map(|(id, _)| id)
    }

    pub fn living(&self, faction: Faction) -> impl Iterator<Item = (UnitId, &Unit)> {
        self.iter()
            .filter(move |(_, unit)| unit.faction == faction && unit.is_alive())
    }

    pub fn has_living(&self, faction: Faction) -> bool {
        self.living(faction).next().is_some()
    }

    /// First living unit of the faction in slot order; the canonical cursor
    /// anchor at the start of a player turn.
    pub fn first_living(&self, faction: Faction) -> Option<UnitId> {
        self.living(faction).next().map(|(id, _)| id)
    }

    /// Clears exhaustion on every unit.
    pub fn reactivate_all(&mut self) {
        for (_, unit) in self.iter_mut() {
            unit.exhausted = false;
        }
    }

    /// Removes units flagged `should_die`, returning their handles.
    pub fn reap(&mut self) -> Vec<UnitId> {
        let doomed: Vec<UnitId> = self
            .iter()
            .filter(|(_, unit)| unit.should_die)
            .map(|(id, _)| id)
            .collect();
        for id in &doomed {
            self.remove(*id);
        }
        doomed
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
