//! The game-session context.
//!
//! [`GameSession`] owns everything that would otherwise be process-wide: the
//! phase, interface and AI states, the unit roster, the event bus, the combat
//! resolver and the effect animations. Each field has one writer:
//!
//! - `interface` is written by the transition function (through
//!   [`GameSession::apply_command`]), by the busy-exit helpers the runtime's
//!   handlers call, and by resolver completion.
//! - `phase` and the phase-entry value of `ai` are written only by
//!   [`TurnController`].
//! - unit hit points are written only by the [`CombatResolver`].

use crate::combat::{CombatPreview, CombatResolver, Completion, DiceSource, Engagement};
use crate::config::GameConfig;
use crate::engine::TurnController;
use crate::error::SessionError;
use crate::event::{BusError, Event, EventBus, EventKind};
use crate::interface::{
    Command, Effect, Interface, InterfaceState, InterfaceView, OpenField, Pathfinder, path_cost,
    transition,
};
use crate::state::{AiState, Faction, Phase, Position, Unit, UnitId, UnitRoster};
use crate::timeline::{Animation, AnimationId};

/// What an AI-controlled unit does once it has finished walking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AiAction {
    Attack(UnitId),
    Heal(UnitId),
    Wait,
}

/// One AI unit's turn: walk `path` (possibly empty), then perform `action`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AiDecision {
    pub unit: UnitId,
    pub path: Vec<Position>,
    pub action: AiAction,
}

/// A unit walking along a path.
#[derive(Clone, Debug)]
pub struct Parcel {
    unit: UnitId,
    path: Vec<Position>,
    animation: Animation,
}

impl Parcel {
    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn path(&self) -> &[Position] {
        &self.path
    }

    /// Tile the walker is currently drawn on.
    pub fn position(&self) -> Option<Position> {
        let progress = self.animation.value(0).unwrap_or(0.0);
        let last = self.path.len().checked_sub(1)?;
        let index = ((progress * last as f32).floor() as usize).min(last);
        self.path.get(index).copied()
    }
}

#[derive(Debug)]
pub struct GameSession {
    pub(crate) config: GameConfig,
    pub(crate) phase: Phase,
    pub(crate) interface: Interface,
    pub(crate) ai: AiState,
    pub(crate) units: UnitRoster,
    pub(crate) reinforcements: Vec<Unit>,
    pub(crate) bus: EventBus,
    pub(crate) resolver: CombatResolver,
    pub(crate) dice: Box<dyn DiceSource>,
    pub(crate) pathfinder: Box<dyn Pathfinder>,
    pub(crate) fade: Option<Animation>,
    pub(crate) parcel: Option<Parcel>,
    pub(crate) cursor_blink: Animation,
    pub(crate) pending_ai_action: Option<(UnitId, AiAction)>,
    pub(crate) turn: u32,
    paused: bool,
    debug: bool,
    fast_forward: bool,
}

impl GameSession {
    pub fn new(config: GameConfig, dice: impl DiceSource + 'static) -> Self {
        Self {
            config,
            phase: Phase::Player,
            interface: Interface::default(),
            ai: AiState::Idle,
            units: UnitRoster::new(),
            reinforcements: Vec::new(),
            bus: EventBus::new(),
            resolver: CombatResolver::new(),
            dice: Box::new(dice),
            pathfinder: Box::new(OpenField),
            fade: None,
            parcel: None,
            cursor_blink: Animation::from_preset(AnimationId::CursorBlink, 1.0),
            pending_ai_action: None,
            turn: 0,
            paused: false,
            debug: false,
            fast_forward: false,
        }
    }

    #[must_use]
    pub fn with_pathfinder(mut self, pathfinder: impl Pathfinder + 'static) -> Self {
        self.pathfinder = Box::new(pathfinder);
        self
    }

    // ===== level setup =====

    /// Places a unit on the map immediately.
    pub fn spawn(&mut self, unit: Unit) -> UnitId {
        self.units.insert(unit)
    }

    /// Queues a unit to arrive during the next spawning phase.
    pub fn queue_reinforcement(&mut self, unit: Unit) {
        self.reinforcements.push(unit);
    }

    /// Level teardown: discards pending engagements, animations and events
    /// and returns to a pre-battle player phase.
    pub fn clear(&mut self) {
        let dropped = self.bus.clear();
        tracing::debug!(dropped, "session cleared");
        self.resolver.clear();
        self.fade = None;
        self.parcel = None;
        self.pending_ai_action = None;
        self.cursor_blink.restart();
        self.units.clear();
        self.reinforcements.clear();
        self.phase = Phase::Player;
        self.ai = AiState::Idle;
        self.interface = Interface::default();
        self.turn = 0;
        self.paused = false;
    }

    /// Replaces the battlefield and resets every state machine.
    pub fn load_level(&mut self, units: impl IntoIterator<Item = Unit>, reinforcements: Vec<Unit>) {
        self.clear();
        for unit in units {
            self.units.insert(unit);
        }
        self.reinforcements = reinforcements;
    }

    // ===== queries =====

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn interface(&self) -> &Interface {
        &self.interface
    }

    pub fn interface_state(&self) -> InterfaceState {
        self.interface.state
    }

    pub fn ai_state(&self) -> AiState {
        self.ai
    }

    pub fn units(&self) -> &UnitRoster {
        &self.units
    }

    pub fn pathfinder(&self) -> &dyn Pathfinder {
        self.pathfinder.as_ref()
    }

    pub fn cursor(&self) -> Position {
        self.interface.cursor
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn reinforcements(&self) -> &[Unit] {
        &self.reinforcements
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn is_fast_forward(&self) -> bool {
        self.fast_forward
    }

    pub fn is_resolving(&self) -> bool {
        self.resolver.is_active()
    }

    pub fn combat_preview(&self) -> Option<CombatPreview> {
        self.resolver.preview()
    }

    /// Active fade's preset and channel-0 value.
    pub fn fade_value(&self) -> Option<(AnimationId, f32)> {
        let fade = self.fade.as_ref()?;
        Some((fade.id()?, fade.value(0)?))
    }

    pub fn parcel(&self) -> Option<&Parcel> {
        self.parcel.as_ref()
    }

    pub fn cursor_alpha(&self) -> f32 {
        self.cursor_blink.value(0).unwrap_or(1.0)
    }

    pub fn pending_events(&self) -> usize {
        self.bus.len()
    }

    pub fn pending_kinds(&self) -> Vec<EventKind> {
        self.bus.pending_kinds().collect()
    }

    // ===== event bus =====

    pub fn emit(&mut self, event: impl Into<Event>) {
        self.bus.emit(event);
    }

    pub fn pop_event(&mut self) -> Option<Event> {
        self.bus.pop()
    }

    /// Drains the bus, handing each event to `handler` together with the
    /// session so handlers can mutate state and emit follow-ups. Follow-ups
    /// are dispatched by the same call.
    pub fn drain_events<F>(&mut self, limit: usize, mut handler: F) -> Result<usize, BusError>
    where
        F: FnMut(Event, &mut GameSession),
    {
        let mut processed = 0;
        while let Some(event) = self.bus.next_within(processed, limit)? {
            handler(event, self);
            processed += 1;
        }
        Ok(processed)
    }

    // ===== input =====

    /// Feeds one player command through the interface state machine.
    ///
    /// Outside the player phase, and while paused, only meta commands are
    /// honoured.
    pub fn apply_command(&mut self, command: Command) -> Result<(), SessionError> {
        if !command.is_meta() && (self.paused || self.phase != Phase::Player) {
            tracing::trace!(%command, phase = %self.phase, paused = self.paused, "input ignored");
            return Ok(());
        }

        let view = InterfaceView {
            units: &self.units,
            map: self.config.map,
            pathfinder: self.pathfinder.as_ref(),
        };
        let next = transition(&self.interface, command, &view);
        if next.interface.state != self.interface.state {
            tracing::debug!(
                from = %self.interface.state,
                to = %next.interface.state,
                %command,
                "interface transition"
            );
        }
        self.interface = next.interface;
        for event in next.events {
            self.bus.emit(event);
        }
        match next.effect {
            Some(effect) => self.perform(effect),
            None => Ok(()),
        }
    }

    fn perform(&mut self, effect: Effect) -> Result<(), SessionError> {
        match effect {
            Effect::Move { unit, path } => self.start_parcel(unit, path),
            Effect::Attack { attacker, victim } => {
                self.resolver.start(
                    Engagement::Attack,
                    attacker,
                    victim,
                    self.config.combat_frames,
                    &self.units,
                )?;
            }
            Effect::Heal { healer, target } => {
                self.resolver.start(
                    Engagement::Heal,
                    healer,
                    target,
                    self.config.heal_frames,
                    &self.units,
                )?;
            }
            Effect::Wait { unit } => {
                self.exhaust(unit);
                self.start_fade(AnimationId::UnitExhaust, 1.0);
            }
            Effect::EndTurn => {
                TurnController::new(self).enter_resolution()?;
            }
            Effect::UndoMove { unit, origin } => match self.units.get_mut(unit) {
                Some(walker) => walker.position = origin,
                None => tracing::warn!(%unit, "undo for a missing unit"),
            },
            Effect::TogglePause => self.paused = !self.paused,
            Effect::ToggleDebug => self.debug = !self.debug,
            Effect::ToggleFastForward => self.fast_forward = !self.fast_forward,
        }
        Ok(())
    }

    fn exhaust(&mut self, unit: UnitId) {
        match self.units.get_mut(unit) {
            Some(unit) => unit.exhausted = true,
            None => tracing::warn!(%unit, "exhausting a missing unit"),
        }
    }

    pub(crate) fn start_fade(&mut self, id: AnimationId, modulation: f32) {
        if let Some(previous) = self.fade.as_ref().and_then(Animation::id) {
            tracing::debug!(%previous, next = %id, "fade replaced");
        }
        self.fade = Some(Animation::from_preset(id, modulation));
    }

    fn start_parcel(&mut self, unit: UnitId, path: Vec<Position>) {
        let frames = self.config.move_frames(path_cost(&path));
        let animation = Animation::from_preset(
            AnimationId::MoveParcel,
            AnimationId::MoveParcel.modulation_for(frames),
        );
        self.parcel = Some(Parcel {
            unit,
            path,
            animation,
        });
    }

    // ===== busy exits (called by the runtime's handlers) =====

    /// Restores a neutral interface after a player-turn fade. Only acts in
    /// the player phase while the interface is `NoOp` and no walk is in
    /// flight.
    pub fn restore_neutral(&mut self) -> bool {
        if self.phase != Phase::Player
            || self.interface.state != InterfaceState::NoOp
            || self.parcel.is_some()
        {
            return false;
        }
        self.interface.reset_to_neutral(&self.units);
        true
    }

    /// Opens the unit action menu once the selected unit finished walking.
    pub fn open_unit_menu(&mut self) -> bool {
        if self.phase != Phase::Player || self.interface.state != InterfaceState::NoOp {
            return false;
        }
        let Some(selection) = self.interface.selection else {
            return false;
        };
        let Some(unit) = self.units.get(selection.unit) else {
            tracing::warn!(unit = %selection.unit, "moved unit vanished");
            self.interface.reset_to_neutral(&self.units);
            return false;
        };
        self.interface.cursor = unit.position;
        self.interface.state = InterfaceState::UnitMenuRoot;
        self.interface.menu.reset();
        self.bus
            .emit(Event::new(EventKind::MenuOpened).with_unit(selection.unit));
        true
    }

    // ===== AI =====

    /// `EnemyTurn → FindingNext`.
    pub fn begin_ai_search(&mut self) -> bool {
        if self.phase != Phase::Ai || self.ai != AiState::EnemyTurn {
            return false;
        }
        self.ai = AiState::FindingNext;
        true
    }

    /// Carries out a driver decision. The AI state is parked at `Idle` until
    /// the walk and the action complete.
    pub fn apply_ai_decision(&mut self, decision: AiDecision) -> Result<(), SessionError> {
        if self.phase != Phase::Ai || !self.ai.may_decide() {
            return Err(SessionError::AiOutOfPhase { phase: self.phase });
        }
        let AiDecision { unit, path, action } = decision;
        let Some(actor) = self.units.get(unit) else {
            tracing::warn!(%unit, "AI decision for a missing unit ignored");
            return Ok(());
        };
        if !actor.can_act() || actor.faction != Faction::Enemy {
            tracing::warn!(%unit, "AI decision for a unit that cannot act ignored");
            return Ok(());
        }

        let walk = path.len() > 1
            && path.first() == Some(&actor.position)
            && path_cost(&path) <= actor.movement as usize
            && path
                .last()
                .is_some_and(|end| self.units.unit_at(*end).is_none());
        if path.len() > 1 && !walk {
            tracing::warn!(%unit, "AI path rejected, acting in place");
        }

        self.ai = AiState::Idle;
        self.pending_ai_action = Some((unit, action));
        if walk {
            self.bus.emit(
                Event::new(EventKind::UnitMoved)
                    .with_unit(unit)
                    .with_integer(path_cost(&path) as i64),
            );
            self.start_parcel(unit, path);
            return Ok(());
        }
        self.resume_ai_action()
    }

    /// Performs the action queued behind an AI walk.
    pub fn resume_ai_action(&mut self) -> Result<(), SessionError> {
        let Some((unit, action)) = self.pending_ai_action.take() else {
            return Ok(());
        };
        let Some(actor) = self.units.get(unit) else {
            tracing::warn!(%unit, "AI unit vanished before acting");
            self.ai = AiState::FindingNext;
            return Ok(());
        };

        let engagement = match action {
            AiAction::Attack(target) => self
                .units
                .get(target)
                .filter(|victim| {
                    victim.is_alive()
                        && actor.faction.is_hostile_to(victim.faction)
                        && actor.reaches(victim.position)
                })
                .map(|_| (Engagement::Attack, target, EventKind::AttackCommitted)),
            AiAction::Heal(target) => self
                .units
                .get(target)
                .filter(|ally| {
                    actor.can_heal()
                        && ally.is_alive()
                        && ally.faction == actor.faction
                        && actor.reaches(ally.position)
                })
                .map(|_| (Engagement::Heal, target, EventKind::HealCommitted)),
            AiAction::Wait => None,
        };

        match engagement {
            Some((kind, target, commit)) => {
                let frames = match kind {
                    Engagement::Attack => self.config.combat_frames,
                    Engagement::Heal => self.config.heal_frames,
                };
                self.bus.emit(Event::new(commit).with_unit(unit));
                self.resolver
                    .start(kind, unit, target, frames, &self.units)?;
            }
            None => {
                if action != AiAction::Wait {
                    tracing::warn!(%unit, ?action, "AI target invalid, waiting instead");
                }
                self.exhaust(unit);
                self.bus.emit(Event::new(EventKind::UnitWaited).with_unit(unit));
                self.ai = AiState::FindingNext;
            }
        }
        Ok(())
    }

    // ===== per-frame advancement =====

    /// Advances every running effect by one frame (several with
    /// fast-forward). Nothing advances while paused.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        if self.paused {
            return Ok(());
        }
        let steps = if self.fast_forward {
            self.config.fast_forward_steps.max(1)
        } else {
            1
        };
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    fn step(&mut self) -> Result<(), SessionError> {
        self.cursor_blink.update(&mut self.bus);

        if let Some(fade) = self.fade.as_mut() {
            if fade.update(&mut self.bus).is_done() {
                let finished = fade.id();
                self.fade = None;
                tracing::trace!(fade = ?finished, "fade finished");
                self.bus.emit(EventKind::FadeDone);
            }
        }

        if let Some(parcel) = self.parcel.as_mut() {
            if parcel.animation.update(&mut self.bus).is_done() {
                let unit = parcel.unit;
                let end = parcel.path.last().copied();
                self.parcel = None;
                match (self.units.get_mut(unit), end) {
                    (Some(walker), Some(end)) => walker.position = end,
                    _ => tracing::warn!(%unit, "parcel finished without a walker"),
                }
                self.bus
                    .emit(Event::new(EventKind::MoveFinished).with_unit(unit));
            }
        }

        if self.resolver.is_active() {
            let (_, completion) =
                self.resolver
                    .tick(&mut self.units, self.dice.as_mut(), &mut self.bus);
            if let Some(completion) = completion {
                self.finish_engagement(completion)?;
            }
        }
        Ok(())
    }

    /// Returns control to whichever phase started the engagement.
    fn finish_engagement(&mut self, completion: Completion) -> Result<(), SessionError> {
        let reaped = self.units.reap();
        if !reaped.is_empty() {
            tracing::debug!(count = reaped.len(), "units reaped");
        }
        self.bus.emit(
            Event::new(EventKind::ResolutionDone)
                .with_unit(completion.attacker)
                .with_integer(reaped.len() as i64),
        );

        match self.phase {
            Phase::Player => self.interface.reset_to_neutral(&self.units),
            Phase::Ai => self.ai = AiState::FindingNext,
            other => {
                tracing::warn!(phase = %other, "engagement finished outside player or AI phase")
            }
        }

        TurnController::new(self).check_outcome()?;
        Ok(())
    }
}
