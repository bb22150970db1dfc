//! Staged combat resolver.
//!
//! ```text
//!   start()          tick #1 (inc == 0)     ticks 2..=frames_active   tick frames_active+1
//!  ────────▶ SIMULATING ─────────────▶ PLAYING ──────────────────▶ assign_damage ─▶ IDLE
//! ```
//!
//! The outcome is rolled once on the first tick and never recomputed; the
//! remaining ticks only drive the playback animation.

use crate::error::ResolverError;
use crate::event::{Event, EventBus, EventKind};
use crate::state::{UnitId, UnitRoster};
use crate::timeline::{Animation, AnimationId, Status};

use super::dice::DiceSource;
use super::rules::{AttackOutcome, EngagementOutcome, resolve_attack};

/// What kind of engagement the resolver is playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Engagement {
    /// Accuracy rolls, damage and a possible counterattack.
    Attack,
    /// Restores the healer's `healing`, capped at the target's `max_hp`.
    Heal,
}

impl Engagement {
    fn animation(self) -> AnimationId {
        match self {
            Engagement::Attack => AnimationId::AttackLunge,
            Engagement::Heal => AnimationId::HealPulse,
        }
    }
}

/// Summary handed back to the session when an engagement finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub kind: Engagement,
    pub attacker: UnitId,
    pub victim: UnitId,
}

/// Read-only view of an in-flight engagement for renderers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatPreview {
    pub kind: Engagement,
    pub attacker: UnitId,
    pub victim: UnitId,
    pub counter_attack: bool,
    pub damage_to_victim: u32,
    pub damage_to_attacker: u32,
    pub healing: u32,
    pub inc: u32,
    pub frames_active: u32,
    /// Lunge offset (attack) or glow (heal) of the playback animation.
    pub motion: f32,
}

#[derive(Clone, Debug)]
struct Active {
    kind: Engagement,
    attacker: UnitId,
    victim: UnitId,
    counter_attack: bool,
    frames_active: u32,
    inc: u32,
    outcome: EngagementOutcome,
    healing: u32,
}

/// At most one engagement at a time. `active == None` is the IDLE state.
///
/// `track` is the attacker's playback animation. It outlives the engagement
/// and is rewound to its rest pose on completion.
#[derive(Clone, Debug, Default)]
pub struct CombatResolver {
    active: Option<Active>,
    track: Option<Animation>,
}

impl CombatResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Begins a new engagement. Nothing is rolled until the first tick.
    ///
    /// Both participants must still be on the roster.
    pub fn start(
        &mut self,
        kind: Engagement,
        attacker: UnitId,
        victim: UnitId,
        frames_active: u32,
        units: &UnitRoster,
    ) -> Result<(), ResolverError> {
        if let Some(active) = &self.active {
            return Err(ResolverError::AlreadyActive {
                attacker: active.attacker,
                victim: active.victim,
            });
        }
        if let Some(missing) = [attacker, victim]
            .into_iter()
            .find(|id| units.get(*id).is_none())
        {
            tracing::warn!(%kind, unit = %missing, "engagement names a missing unit");
            return Err(ResolverError::UnknownUnit(missing));
        }
        let frames_active = frames_active.max(1);
        let animation = Animation::from_preset(
            kind.animation(),
            kind.animation().modulation_for(frames_active),
        );
        tracing::debug!(%kind, %attacker, %victim, frames_active, "engagement started");
        self.track = Some(animation);
        self.active = Some(Active {
            kind,
            attacker,
            victim,
            counter_attack: false,
            frames_active,
            inc: 0,
            outcome: EngagementOutcome::default(),
            healing: 0,
        });
        Ok(())
    }

    /// Advances one frame. Returns [`Status::Done`] (with the completion
    /// summary) on the tick that assigns damage, and `Done` with `None`
    /// whenever the resolver is already idle.
    pub fn tick(
        &mut self,
        units: &mut UnitRoster,
        dice: &mut dyn DiceSource,
        bus: &mut EventBus,
    ) -> (Status, Option<Completion>) {
        let Some(active) = self.active.as_mut() else {
            return (Status::Done, None);
        };

        if active.inc == 0 {
            Self::simulate(active, units, dice);
        }
        active.inc += 1;

        if active.inc <= active.frames_active {
            if let Some(track) = self.track.as_mut() {
                track.update(bus);
            }
            return (Status::Running, None);
        }

        self.assign_damage(units, bus);
        let completion = self.active.take().map(|done| Completion {
            kind: done.kind,
            attacker: done.attacker,
            victim: done.victim,
        });
        if let Some(track) = self.track.as_mut() {
            track.restart();
        }
        if let Some(completion) = completion {
            match units.get_mut(completion.attacker) {
                Some(attacker) => attacker.exhausted = true,
                None => {
                    tracing::warn!(unit = %completion.attacker, "attacker gone before completion")
                }
            }
            tracing::debug!(kind = %completion.kind, "engagement resolved");
        }
        (Status::Done, completion)
    }

    fn simulate(active: &mut Active, units: &UnitRoster, dice: &mut dyn DiceSource) {
        let (Some(attacker), Some(victim)) = (units.get(active.attacker), units.get(active.victim))
        else {
            tracing::warn!(
                attacker = %active.attacker,
                victim = %active.victim,
                "engagement references a missing unit, resolving to nothing"
            );
            active.outcome = EngagementOutcome::default();
            active.counter_attack = false;
            return;
        };

        match active.kind {
            Engagement::Attack => {
                let eligible = victim.is_alive() && victim.reaches(attacker.position);
                active.outcome = resolve_attack(attacker, victim, eligible, dice);
                active.counter_attack = active.outcome.counter_attack;
            }
            Engagement::Heal => {
                active.healing = attacker.healing.min(victim.max_hp.saturating_sub(victim.hp));
            }
        }
        tracing::trace!(
            damage_to_victim = active.outcome.damage_to_victim,
            damage_to_attacker = active.outcome.damage_to_attacker,
            healing = active.healing,
            counter = active.counter_attack,
            "engagement simulated"
        );
    }

    /// Applies the precomputed outcome, then zeroes it so a second call is a
    /// no-op. Units dropping to zero hit points are flagged `should_die`.
    pub fn assign_damage(&mut self, units: &mut UnitRoster, bus: &mut EventBus) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let outcome = std::mem::take(&mut active.outcome);
        let healing = std::mem::take(&mut active.healing);
        let counter_attack = std::mem::replace(&mut active.counter_attack, false);

        match active.kind {
            Engagement::Attack => {
                if let Some(strike) = outcome.strike {
                    let kind = match strike {
                        AttackOutcome::Hit => EventKind::AttackHit,
                        AttackOutcome::Miss => EventKind::AttackMiss,
                    };
                    bus.emit(
                        Event::new(kind)
                            .with_unit(active.victim)
                            .with_integer(i64::from(outcome.damage_to_victim)),
                    );
                }
                Self::wound(units, active.victim, outcome.damage_to_victim, bus);

                if counter_attack {
                    let kind = match outcome.counter {
                        Some(AttackOutcome::Hit) => EventKind::CounterHit,
                        _ => EventKind::CounterMiss,
                    };
                    bus.emit(
                        Event::new(kind)
                            .with_unit(active.attacker)
                            .with_integer(i64::from(outcome.damage_to_attacker)),
                    );
                    Self::wound(units, active.attacker, outcome.damage_to_attacker, bus);
                }
            }
            Engagement::Heal => {
                if healing == 0 {
                    return;
                }
                match units.get_mut(active.victim) {
                    Some(target) => {
                        target.hp = (target.hp + healing).min(target.max_hp);
                        bus.emit(
                            Event::new(EventKind::UnitHealed)
                                .with_unit(active.victim)
                                .with_integer(i64::from(healing)),
                        );
                    }
                    None => tracing::warn!(unit = %active.victim, "heal target vanished"),
                }
            }
        }
    }

    fn wound(units: &mut UnitRoster, id: UnitId, damage: u32, bus: &mut EventBus) {
        let Some(unit) = units.get_mut(id) else {
            tracing::warn!(unit = %id, "damage target vanished");
            return;
        };
        unit.hp = unit.hp.saturating_sub(damage);
        if unit.hp == 0 && !unit.should_die {
            unit.should_die = true;
            bus.emit(Event::new(EventKind::UnitDied).with_unit(id));
        }
    }

    pub fn preview(&self) -> Option<CombatPreview> {
        self.active.as_ref().map(|active| CombatPreview {
            kind: active.kind,
            attacker: active.attacker,
            victim: active.victim,
            counter_attack: active.counter_attack,
            damage_to_victim: active.outcome.damage_to_victim,
            damage_to_attacker: active.outcome.damage_to_attacker,
            healing: active.healing,
            inc: active.inc,
            frames_active: active.frames_active,
            motion: self.motion(),
        })
    }

    /// Attacker's playback animation, if an engagement has ever started.
    pub fn track(&self) -> Option<&Animation> {
        self.track.as_ref()
    }

    /// Lunge offset (attack) or glow (heal) of the attacker's track. Zero
    /// at rest.
    pub fn motion(&self) -> f32 {
        self.track
            .as_ref()
            .and_then(|track| track.value(0))
            .unwrap_or(0.0)
    }

    /// Discards any engagement without applying it. Level teardown only.
    pub fn clear(&mut self) {
        self.active = None;
        self.track = None;
    }
}
