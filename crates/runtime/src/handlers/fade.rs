use tactics_core::{Event, EventKind, Phase, SessionError, TurnController};
use tracing::debug;

use super::{EventHandler, HandlerContext, HandlerCriticality};

/// Reacts to a finished fade according to whose turn it is.
///
/// In PLAYER it is the only way out of `NoOp` back to a neutral state; in
/// RESOLUTION and SPAWNING the banner fade hands over to the next phase. A
/// fade ending during the AI turn never touches the interface.
#[derive(Debug, Clone, Copy, Default)]
pub struct FadeHandler;

impl EventHandler for FadeHandler {
    fn name(&self) -> &'static str {
        "fade"
    }

    fn priority(&self) -> i32 {
        -50
    }

    fn criticality(&self) -> HandlerCriticality {
        HandlerCriticality::Critical
    }

    fn should_trigger(&self, event: &Event) -> bool {
        event.kind == EventKind::FadeDone
    }

    fn handle(&self, _event: &Event, ctx: &mut HandlerContext<'_>) -> Result<(), SessionError> {
        match ctx.session.phase() {
            Phase::Player => {
                if ctx.session.restore_neutral() {
                    debug!(
                        target: "runtime::handlers",
                        state = %ctx.session.interface_state(),
                        "interface restored"
                    );
                }
            }
            Phase::Resolution => {
                TurnController::new(ctx.session).enter_ai()?;
            }
            Phase::Spawning => {
                TurnController::new(ctx.session).enter_player()?;
            }
            Phase::Ai | Phase::Victory | Phase::GameOver => {}
        }
        Ok(())
    }
}
