use tactics_core::{Event, EventKind, GameSession, SessionError};
use tracing::{debug, info};

use super::{EventHandler, HandlerContext, HandlerCriticality};

fn unit_name(session: &GameSession, event: &Event) -> String {
    event
        .unit
        .and_then(|id| session.units().get(id))
        .map_or_else(|| "<gone>".to_owned(), |unit| unit.name.clone())
}

/// Structured log of every combat beat.
#[derive(Debug, Clone, Copy, Default)]
pub struct CombatLogHandler;

impl EventHandler for CombatLogHandler {
    fn name(&self) -> &'static str {
        "combat_log"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn criticality(&self) -> HandlerCriticality {
        HandlerCriticality::Optional
    }

    fn should_trigger(&self, event: &Event) -> bool {
        matches!(
            event.kind,
            EventKind::CombatStarted
                | EventKind::AttackImpact
                | EventKind::AttackHit
                | EventKind::AttackMiss
                | EventKind::CounterHit
                | EventKind::CounterMiss
                | EventKind::UnitHealed
                | EventKind::UnitDied
                | EventKind::ResolutionDone
        )
    }

    fn handle(&self, event: &Event, ctx: &mut HandlerContext<'_>) -> Result<(), SessionError> {
        let unit = unit_name(ctx.session, event);
        match event.kind {
            EventKind::CombatStarted | EventKind::AttackImpact => {
                debug!(target: "runtime::combat", kind = %event.kind, "combat beat");
            }
            EventKind::AttackHit | EventKind::CounterHit => {
                info!(
                    target: "runtime::combat",
                    kind = %event.kind,
                    victim = %unit,
                    damage = event.integer.unwrap_or(0),
                    "hit"
                );
            }
            EventKind::UnitHealed => {
                info!(
                    target: "runtime::combat",
                    target_unit = %unit,
                    amount = event.integer.unwrap_or(0),
                    "healed"
                );
            }
            EventKind::UnitDied => {
                info!(target: "runtime::combat", %unit, "unit died");
            }
            EventKind::ResolutionDone => {
                debug!(
                    target: "runtime::combat",
                    attacker = %unit,
                    reaped = event.integer.unwrap_or(0),
                    "engagement resolved"
                );
            }
            _ => {
                info!(target: "runtime::combat", kind = %event.kind, victim = %unit, "miss");
            }
        }
        Ok(())
    }
}

/// Logs turn changes, arrivals and the battle outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseLogHandler;

impl EventHandler for PhaseLogHandler {
    fn name(&self) -> &'static str {
        "phase_log"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn criticality(&self) -> HandlerCriticality {
        HandlerCriticality::Optional
    }

    fn should_trigger(&self, event: &Event) -> bool {
        matches!(
            event.kind,
            EventKind::EndTurn | EventKind::UnitSpawned | EventKind::Victory | EventKind::GameOver
        )
    }

    fn handle(&self, event: &Event, ctx: &mut HandlerContext<'_>) -> Result<(), SessionError> {
        let session = &*ctx.session;
        match event.kind {
            EventKind::UnitSpawned => {
                info!(
                    target: "runtime::phase",
                    unit = %unit_name(session, event),
                    "reinforcement arrived"
                );
            }
            EventKind::EndTurn => {
                info!(
                    target: "runtime::phase",
                    phase = %session.phase(),
                    turn = session.turn(),
                    "phase changed"
                );
            }
            _ => {
                info!(
                    target: "runtime::phase",
                    outcome = %event.kind,
                    turn = session.turn(),
                    "battle over"
                );
            }
        }
        Ok(())
    }
}
