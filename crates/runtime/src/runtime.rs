//! Per-frame orchestrator.
//!
//! The runtime owns the [`GameSession`], the handler registry, the audio
//! sink and the AI driver, and exposes a builder-based API for hosts to
//! drive the battle one frame at a time.
use std::sync::Arc;

use tactics_core::{
    AiState, Command, DiceSource, GameSession, InterfaceState, OpenField, Pathfinder, Phase,
    SeededDice, SessionError, TurnController, Unit,
};
use tracing::{debug, info};

use crate::ai::{AiDriver, PassiveAi};
use crate::audio::{AudioSink, CueTable, TracingAudio};
use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::handlers::{EventHandler, HandlerRegistry};

/// Snapshot of the state machines after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u64,
    pub phase: Phase,
    pub interface: InterfaceState,
    pub ai: AiState,
    pub events_dispatched: usize,
}

/// Drives a battle frame by frame.
pub struct Runtime<A: AudioSink = TracingAudio> {
    session: GameSession,
    registry: HandlerRegistry,
    audio: A,
    ai: Box<dyn AiDriver>,
    frame: u64,
}

impl Runtime<TracingAudio> {
    pub fn builder() -> RuntimeBuilder<TracingAudio> {
        RuntimeBuilder::new()
    }
}

impl<A: AudioSink> Runtime<A> {
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn frames_run(&self) -> u64 {
        self.frame
    }

    pub fn set_ai(&mut self, ai: impl AiDriver + 'static) {
        self.ai = Box::new(ai);
    }

    /// Runs one frame:
    ///
    /// 1. apply the player's command, if any
    /// 2. take one AI step when it is the AI phase
    /// 3. drain every pending event through the handlers
    /// 4. advance fades, walks and the combat resolver
    pub fn frame(&mut self, command: Option<Command>) -> Result<FrameReport> {
        if let Some(command) = command {
            self.session.apply_command(command)?;
        }

        if !self.session.is_paused() {
            self.ai_step()?;
        }

        let events_dispatched = self.registry.drain(&mut self.session, &mut self.audio)?;
        self.session.advance()?;
        self.frame += 1;

        Ok(FrameReport {
            frame: self.frame,
            phase: self.session.phase(),
            interface: self.session.interface_state(),
            ai: self.session.ai_state(),
            events_dispatched,
        })
    }

    /// Runs input-free frames until `done` holds, for at most `max_frames`.
    /// Returns the number of frames run, or `None` if `done` never held.
    pub fn run_until(
        &mut self,
        max_frames: u32,
        mut done: impl FnMut(&GameSession) -> bool,
    ) -> Result<Option<u32>> {
        for ran in 0..max_frames {
            if done(&self.session) {
                return Ok(Some(ran));
            }
            self.frame(None)?;
        }
        Ok(done(&self.session).then_some(max_frames))
    }

    /// `ENEMY_TURN → AI_FINDING_NEXT`, then one driver decision. A driver
    /// with nothing left to do ends the AI turn.
    fn ai_step(&mut self) -> Result<()> {
        if self.session.phase() != Phase::Ai {
            return Ok(());
        }
        match self.session.ai_state() {
            AiState::EnemyTurn => {
                self.session.begin_ai_search();
            }
            AiState::FindingNext => match self.ai.decide(&self.session) {
                Some(decision) => {
                    debug!(
                        target: "runtime::ai",
                        unit = %decision.unit,
                        action = ?decision.action,
                        steps = decision.path.len(),
                        "AI decision"
                    );
                    self.session.apply_ai_decision(decision)?;
                }
                None => {
                    debug!(target: "runtime::ai", "AI turn finished");
                    TurnController::new(&mut self.session)
                        .enter_spawning()
                        .map_err(SessionError::from)?;
                }
            },
            AiState::Idle => {}
        }
        Ok(())
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder<A: AudioSink = TracingAudio> {
    config: RuntimeConfig,
    audio: A,
    ai: Box<dyn AiDriver>,
    dice: Option<Box<dyn DiceSource>>,
    pathfinder: Option<Box<dyn Pathfinder>>,
    units: Option<Vec<Unit>>,
    reinforcements: Option<Vec<Unit>>,
    registry: Option<HandlerRegistry>,
    extra_handlers: Vec<Arc<dyn EventHandler>>,
}

impl RuntimeBuilder<TracingAudio> {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            audio: TracingAudio,
            ai: Box::new(PassiveAi),
            dice: None,
            pathfinder: None,
            units: None,
            reinforcements: None,
            registry: None,
            extra_handlers: Vec::new(),
        }
    }
}

impl<A: AudioSink> RuntimeBuilder<A> {
    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the audio sink
    pub fn audio<B: AudioSink>(self, audio: B) -> RuntimeBuilder<B> {
        RuntimeBuilder {
            config: self.config,
            audio,
            ai: self.ai,
            dice: self.dice,
            pathfinder: self.pathfinder,
            units: self.units,
            reinforcements: self.reinforcements,
            registry: self.registry,
            extra_handlers: self.extra_handlers,
        }
    }

    /// Set the AI driver (defaults to [`PassiveAi`])
    pub fn ai(mut self, ai: impl AiDriver + 'static) -> Self {
        self.ai = Box::new(ai);
        self
    }

    /// Use a specific dice source instead of one seeded from the config
    pub fn dice(mut self, dice: impl DiceSource + 'static) -> Self {
        self.dice = Some(Box::new(dice));
        self
    }

    pub fn pathfinder(mut self, pathfinder: impl Pathfinder + 'static) -> Self {
        self.pathfinder = Some(Box::new(pathfinder));
        self
    }

    /// Units on the field at the start. Overrides the config's units.
    pub fn units(mut self, units: impl IntoIterator<Item = Unit>) -> Self {
        self.units = Some(units.into_iter().collect());
        self
    }

    /// Units queued for later spawning phases. Overrides the config's list.
    pub fn reinforcements(mut self, units: impl IntoIterator<Item = Unit>) -> Self {
        self.reinforcements = Some(units.into_iter().collect());
        self
    }

    /// Replace the handler set entirely.
    pub fn with_handlers(mut self, registry: HandlerRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Add handlers on top of the default set.
    pub fn add_handlers(mut self, handlers: Vec<Arc<dyn EventHandler>>) -> Self {
        self.extra_handlers.extend(handlers);
        self
    }

    /// Loads the level and performs the first player entry.
    pub fn build(self) -> Result<Runtime<A>> {
        let RuntimeConfig {
            game,
            seed,
            cues,
            units,
            reinforcements,
        } = self.config;

        let registry = match self.registry {
            Some(registry) if self.extra_handlers.is_empty() => registry,
            Some(registry) => {
                let mut handlers: Vec<Arc<dyn EventHandler>> =
                    registry.iter().cloned().collect();
                handlers.extend(self.extra_handlers);
                HandlerRegistry::new(handlers)
            }
            None => {
                let mut handlers = HandlerRegistry::default_handlers(CueTable::new(cues));
                handlers.extend(self.extra_handlers);
                HandlerRegistry::new(handlers)
            }
        };

        let mut session = match self.dice {
            Some(dice) => GameSession::new(game, dice),
            None => GameSession::new(game, SeededDice::new(seed)),
        };
        session = match self.pathfinder {
            Some(pathfinder) => session.with_pathfinder(pathfinder),
            None => session.with_pathfinder(OpenField),
        };
        session.load_level(
            self.units.unwrap_or(units),
            self.reinforcements.unwrap_or(reinforcements),
        );

        let phase = TurnController::new(&mut session)
            .begin_battle()
            .map_err(SessionError::from)?;
        info!(
            target: "runtime",
            units = session.units().len(),
            reinforcements = session.reinforcements().len(),
            handlers = registry.len(),
            %phase,
            "battle started"
        );

        Ok(Runtime {
            session,
            registry,
            audio: self.audio,
            ai: self.ai,
            frame: 0,
        })
    }
}
