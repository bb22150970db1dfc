//! Turn/phase controller.
//!
//! [`TurnController`] is the only writer of [`Phase`]. It wraps a mutable
//! borrow of the session for the duration of one transition, the same way
//! every phase-entry side effect (reactivating units, resetting the interface,
//! spawning reinforcements) runs synchronously inside the transition call.
//!
//! ```text
//! PLAYER ──▶ RESOLUTION ──▶ AI ──▶ SPAWNING ──▶ PLAYER
//!    └───────────┴───────────┴────────┴──▶ GAME_OVER / VICTORY (absorbing)
//! ```

mod phases;

use crate::error::PhaseError;
use crate::event::{Event, EventKind};
use crate::session::GameSession;
use crate::state::{AiState, Faction, Phase};

pub struct TurnController<'a> {
    session: &'a mut GameSession,
}

impl<'a> TurnController<'a> {
    pub fn new(session: &'a mut GameSession) -> Self {
        Self { session }
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    /// Rejects transitions out of terminal phases and anything but the
    /// successor of the current phase.
    fn guard(&self, to: Phase) -> Result<(), PhaseError> {
        let from = self.session.phase;
        if from.is_terminal() {
            return Err(PhaseError::Terminal(from));
        }
        if from.next() != Some(to) {
            tracing::warn!(%from, %to, "out-of-order phase transition rejected");
            return Err(PhaseError::InvalidTransition { from, to });
        }
        Ok(())
    }

    /// Terminal phase the battle has reached, if any: no living player units
    /// means defeat, no living enemies and nobody left to reinforce them
    /// means victory.
    pub fn outcome(&self) -> Option<Phase> {
        let units = &self.session.units;
        if !units.has_living(Faction::Player) {
            return Some(Phase::GameOver);
        }
        let reinforcing = self
            .session
            .reinforcements
            .iter()
            .any(|unit| unit.faction == Faction::Enemy);
        if !units.has_living(Faction::Enemy) && !reinforcing {
            return Some(Phase::Victory);
        }
        None
    }

    /// Enters the terminal phase if the battle is decided. Returns the phase
    /// entered, or `None` if play continues.
    pub fn check_outcome(&mut self) -> Result<Option<Phase>, PhaseError> {
        if self.session.phase.is_terminal() {
            return Ok(Some(self.session.phase));
        }
        match self.outcome() {
            Some(Phase::Victory) => self.enter_victory().map(Some),
            Some(_) => self.enter_game_over().map(Some),
            None => Ok(None),
        }
    }

    /// Shared tail of every transition: set the phase and its entry states,
    /// then announce it.
    fn settle(&mut self, phase: Phase, ai: AiState) {
        let from = self.session.phase;
        self.session.phase = phase;
        self.session.ai = ai;
        if phase != Phase::Player {
            self.session.interface.state = crate::interface::InterfaceState::NoOp;
            self.session.interface.selection = None;
            self.session.interface.targeting = None;
        }
        tracing::info!(%from, to = %phase, turn = self.session.turn, "phase transition");
        self.session.emit(
            Event::new(EventKind::EndTurn).with_integer(i64::from(self.session.turn)),
        );
    }
}
