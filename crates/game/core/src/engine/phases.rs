//! Named phase transitions.

use crate::error::PhaseError;
use crate::event::{Event, EventKind};
use crate::interface::InterfaceState;
use crate::state::{AiState, Faction, Phase, Position};
use crate::timeline::AnimationId;

use super::TurnController;

impl<'a> TurnController<'a> {
    /// First player entry of a battle (turn 1), followed by a fade-in.
    pub fn begin_battle(&mut self) -> Result<Phase, PhaseError> {
        let phase = self.session.phase;
        if phase.is_terminal() {
            return Err(PhaseError::Terminal(phase));
        }
        if phase != Phase::Player || self.session.turn != 0 {
            return Err(PhaseError::InvalidTransition {
                from: phase,
                to: Phase::Player,
            });
        }
        if let Some(terminal) = self.check_outcome()? {
            return Ok(terminal);
        }
        self.player_entry();
        let modulation = self.session.config.fade_modulation;
        self.session.start_fade(AnimationId::FadeIn, modulation);
        Ok(Phase::Player)
    }

    /// `PLAYER → RESOLUTION`: reaps the dead and plays the turn banner.
    pub fn enter_resolution(&mut self) -> Result<Phase, PhaseError> {
        self.guard(Phase::Resolution)?;
        let reaped = self.session.units.reap();
        if !reaped.is_empty() {
            tracing::debug!(count = reaped.len(), "units reaped before resolution");
        }
        if let Some(terminal) = self.check_outcome()? {
            return Ok(terminal);
        }
        self.settle(Phase::Resolution, AiState::Idle);
        let modulation = self.session.config.fade_modulation;
        self.session.start_fade(AnimationId::TurnBanner, modulation);
        Ok(Phase::Resolution)
    }

    /// `RESOLUTION → AI`: the runtime takes over from `EnemyTurn`.
    pub fn enter_ai(&mut self) -> Result<Phase, PhaseError> {
        self.guard(Phase::Ai)?;
        if let Some(terminal) = self.check_outcome()? {
            return Ok(terminal);
        }
        self.settle(Phase::Ai, AiState::EnemyTurn);
        Ok(Phase::Ai)
    }

    /// `AI → SPAWNING`: places queued reinforcements on free tiles and plays
    /// the turn banner. Reinforcements whose tile is occupied wait for the
    /// next spawning phase.
    pub fn enter_spawning(&mut self) -> Result<Phase, PhaseError> {
        self.guard(Phase::Spawning)?;
        if let Some(terminal) = self.check_outcome()? {
            return Ok(terminal);
        }
        self.session.pending_ai_action = None;
        self.settle(Phase::Spawning, AiState::Idle);

        let queued = std::mem::take(&mut self.session.reinforcements);
        for unit in queued {
            if self.session.units.unit_at(unit.position).is_some() {
                tracing::debug!(
                    name = %unit.name,
                    position = %unit.position,
                    "spawn tile occupied, deferring"
                );
                self.session.reinforcements.push(unit);
                continue;
            }
            let name = unit.name.clone();
            let id = self.session.units.insert(unit);
            tracing::debug!(unit = %id, %name, "reinforcement spawned");
            self.session
                .emit(Event::new(EventKind::UnitSpawned).with_unit(id));
        }

        let modulation = self.session.config.fade_modulation;
        self.session.start_fade(AnimationId::TurnBanner, modulation);
        Ok(Phase::Spawning)
    }

    /// `SPAWNING → PLAYER`: a new turn. Every unit is reactivated.
    pub fn enter_player(&mut self) -> Result<Phase, PhaseError> {
        self.guard(Phase::Player)?;
        if let Some(terminal) = self.check_outcome()? {
            return Ok(terminal);
        }
        self.player_entry();
        Ok(Phase::Player)
    }

    fn player_entry(&mut self) {
        self.session.turn += 1;
        self.session.units.reactivate_all();

        let anchor = self
            .session
            .units
            .first_living(Faction::Player)
            .and_then(|id| self.session.units.get(id))
            .map(|unit| unit.position);
        let interface = &mut self.session.interface;
        interface.cursor = anchor.unwrap_or(Position::ORIGIN);
        interface.reset_to_neutral(&self.session.units);

        self.settle(Phase::Player, AiState::Idle);
    }

    pub fn enter_victory(&mut self) -> Result<Phase, PhaseError> {
        self.enter_terminal(Phase::Victory, EventKind::Victory)
    }

    pub fn enter_game_over(&mut self) -> Result<Phase, PhaseError> {
        self.enter_terminal(Phase::GameOver, EventKind::GameOver)
    }

    fn enter_terminal(&mut self, phase: Phase, kind: EventKind) -> Result<Phase, PhaseError> {
        let from = self.session.phase;
        if from.is_terminal() {
            return Err(PhaseError::Terminal(from));
        }
        self.session.phase = phase;
        self.session.ai = AiState::Idle;
        self.session.pending_ai_action = None;
        self.session.interface.state = InterfaceState::NoOp;
        self.session.interface.selection = None;
        tracing::info!(%from, to = %phase, turn = self.session.turn, "battle decided");
        self.session
            .emit(Event::new(kind).with_integer(i64::from(self.session.turn)));
        Ok(phase)
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::TurnController;
    use crate::engine::tests::session;
    use crate::error::PhaseError;
    use crate::event::EventKind;
    use crate::interface::InterfaceState;
    use crate::state::{AiState, Faction, Phase, Position, Unit};
    use crate::timeline::AnimationId;

    #[test]
    fn full_cycle_returns_to_player_with_everyone_rested() {
        let mut session = session();
        TurnController::new(&mut session).begin_battle().unwrap();
        assert_eq!(session.turn(), 1);

        for (_, unit) in session.units.iter_mut() {
            unit.exhausted = true;
        }

        let mut controller = TurnController::new(&mut session);
        assert_eq!(controller.enter_resolution(), Ok(Phase::Resolution));
        assert_eq!(controller.enter_ai(), Ok(Phase::Ai));
        assert_eq!(controller.enter_spawning(), Ok(Phase::Spawning));
        assert_eq!(controller.enter_player(), Ok(Phase::Player));

        assert_eq!(session.phase(), Phase::Player);
        assert_eq!(session.turn(), 2);
        assert!(session.units().iter().all(|(_, unit)| !unit.exhausted));
        assert_eq!(session.cursor(), Position::new(1, 1));
        assert_eq!(session.interface_state(), InterfaceState::NeutralOverUnit);
    }

    #[test]
    fn each_transition_sets_entry_states_and_announces_itself() {
        let mut session = session();
        TurnController::new(&mut session).begin_battle().unwrap();
        assert_eq!(
            session.fade_value().map(|(id, _)| id),
            Some(AnimationId::FadeIn)
        );
        session.bus.clear();

        TurnController::new(&mut session).enter_resolution().unwrap();
        assert_eq!(session.interface_state(), InterfaceState::NoOp);
        assert_eq!(session.ai_state(), AiState::Idle);
        assert_eq!(
            session.fade_value().map(|(id, _)| id),
            Some(AnimationId::TurnBanner)
        );

        TurnController::new(&mut session).enter_ai().unwrap();
        assert_eq!(session.ai_state(), AiState::EnemyTurn);
        assert_eq!(session.interface_state(), InterfaceState::NoOp);

        assert_eq!(
            session.pending_kinds(),
            vec![EventKind::EndTurn, EventKind::EndTurn]
        );
    }

    #[test]
    fn out_of_order_transitions_are_rejected() {
        let mut session = session();
        TurnController::new(&mut session).begin_battle().unwrap();
        let mut controller = TurnController::new(&mut session);
        assert_eq!(
            controller.enter_ai(),
            Err(PhaseError::InvalidTransition {
                from: Phase::Player,
                to: Phase::Ai
            })
        );
        assert_eq!(
            controller.begin_battle(),
            Err(PhaseError::InvalidTransition {
                from: Phase::Player,
                to: Phase::Player
            })
        );
        assert_eq!(controller.phase(), Phase::Player);
    }

    #[test]
    fn terminal_phases_absorb_everything() {
        let mut session = session();
        let mut controller = TurnController::new(&mut session);
        assert_eq!(controller.enter_victory(), Ok(Phase::Victory));
        assert_eq!(
            controller.enter_resolution(),
            Err(PhaseError::Terminal(Phase::Victory))
        );
        assert_eq!(
            controller.enter_game_over(),
            Err(PhaseError::Terminal(Phase::Victory))
        );
        assert_eq!(
            session.pending_kinds(),
            vec![EventKind::Victory]
        );
    }

    #[test]
    fn resolution_reaps_and_detects_victory() {
        let mut session = session();
        TurnController::new(&mut session).begin_battle().unwrap();
        let orc = session.units.first_living(Faction::Enemy).unwrap();
        session.units.get_mut(orc).unwrap().should_die = true;

        let entered = TurnController::new(&mut session).enter_resolution();
        assert_eq!(entered, Ok(Phase::Victory));
        assert!(session.units().get(orc).is_none());
        assert!(session.pending_kinds().contains(&EventKind::Victory));
    }

    #[test]
    fn spawning_places_reinforcements_on_free_tiles() {
        let mut session = session();
        session.queue_reinforcement(Unit::new("wolf", Faction::Enemy, Position::new(7, 7)));
        session.queue_reinforcement(Unit::new("blocked", Faction::Enemy, Position::new(5, 5)));
        TurnController::new(&mut session).begin_battle().unwrap();
        let mut controller = TurnController::new(&mut session);
        controller.enter_resolution().unwrap();
        controller.enter_ai().unwrap();
        session.bus.clear();

        TurnController::new(&mut session).enter_spawning().unwrap();
        assert_eq!(session.units().len(), 3);
        assert_eq!(session.reinforcements().len(), 1);
        assert_eq!(
            session.pending_kinds(),
            vec![EventKind::EndTurn, EventKind::UnitSpawned]
        );
    }
}
