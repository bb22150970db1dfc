use tactics_core::{Event, EventKind, Phase, SessionError};
use tracing::warn;

use super::{EventHandler, HandlerContext, HandlerCriticality};

/// Continues a turn once a unit has finished walking: the player gets the
/// unit menu, an AI unit performs the action queued behind its walk.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementHandler;

impl EventHandler for MovementHandler {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn priority(&self) -> i32 {
        -40
    }

    fn criticality(&self) -> HandlerCriticality {
        HandlerCriticality::Critical
    }

    fn should_trigger(&self, event: &Event) -> bool {
        event.kind == EventKind::MoveFinished
    }

    fn handle(&self, event: &Event, ctx: &mut HandlerContext<'_>) -> Result<(), SessionError> {
        match ctx.session.phase() {
            Phase::Player => {
                ctx.session.open_unit_menu();
            }
            Phase::Ai => ctx.session.resume_ai_action()?,
            phase => {
                warn!(
                    target: "runtime::handlers",
                    %phase,
                    unit = ?event.unit,
                    "walk finished outside a turn"
                );
            }
        }
        Ok(())
    }
}
