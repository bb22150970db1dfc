use std::sync::Arc;

use tactics_core::{Event, GameError, GameSession};
use tracing::{debug, error, trace, warn};

use super::{
    AudioCueHandler, CombatLogHandler, EventHandler, FadeHandler, HandlerContext,
    HandlerCriticality, MovementHandler, PhaseLogHandler,
};
use crate::audio::{AudioSink, CueTable};
use crate::error::{Result, RuntimeError};

/// Handlers sorted by priority.
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: Arc<[Arc<dyn EventHandler>]>,
}

impl HandlerRegistry {
    pub fn new(mut handlers: Vec<Arc<dyn EventHandler>>) -> Self {
        handlers.sort_by_key(|handler| handler.priority());
        Self {
            handlers: handlers.into(),
        }
    }

    /// The five built-in handlers, with `cues` feeding the audio handler.
    pub fn with_defaults(cues: CueTable) -> Self {
        Self::new(Self::default_handlers(cues))
    }

    pub fn default_handlers(cues: CueTable) -> Vec<Arc<dyn EventHandler>> {
        vec![
            Arc::new(FadeHandler),
            Arc::new(MovementHandler),
            Arc::new(AudioCueHandler::new(cues)),
            Arc::new(CombatLogHandler),
            Arc::new(PhaseLogHandler),
        ]
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn EventHandler>> + '_ {
        self.handlers.iter()
    }

    /// Handler names and priorities in dispatch order.
    pub fn handlers(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.handlers.iter().map(|h| (h.name(), h.priority()))
    }

    /// Offers one event to every handler. An event no handler wants is
    /// reported and otherwise ignored.
    ///
    /// Returns `Err` only when a critical handler failed; every remaining
    /// handler still sees the event.
    pub fn dispatch(&self, event: &Event, ctx: &mut HandlerContext<'_>) -> Result<usize> {
        let mut triggered = 0;
        let mut failure = None;

        for handler in self.handlers.iter() {
            if !handler.should_trigger(event) {
                continue;
            }
            triggered += 1;
            trace!(
                target: "runtime::handlers",
                handler = handler.name(),
                kind = %event.kind,
                "dispatch"
            );

            if let Err(source) = handler.handle(event, ctx) {
                let code = source.error_code();
                let severity = source.severity();
                match handler.criticality() {
                    HandlerCriticality::Critical => {
                        error!(
                            target: "runtime::handlers",
                            handler = handler.name(),
                            kind = %event.kind,
                            criticality = "critical",
                            code,
                            %severity,
                            error = %source,
                            "critical handler failed"
                        );
                        failure.get_or_insert(RuntimeError::Handler {
                            handler: handler.name(),
                            kind: event.kind,
                            source,
                        });
                    }
                    HandlerCriticality::Important if severity.is_internal() => error!(
                        target: "runtime::handlers",
                        handler = handler.name(),
                        kind = %event.kind,
                        code,
                        %severity,
                        error = %source,
                        "handler failed, continuing"
                    ),
                    HandlerCriticality::Important => warn!(
                        target: "runtime::handlers",
                        handler = handler.name(),
                        kind = %event.kind,
                        code,
                        %severity,
                        error = %source,
                        "handler rejected event, continuing"
                    ),
                    HandlerCriticality::Optional => debug!(
                        target: "runtime::handlers",
                        handler = handler.name(),
                        kind = %event.kind,
                        code,
                        error = %source,
                        "optional handler failed"
                    ),
                }
            }
        }

        if triggered == 0 {
            warn!(
                target: "runtime::handlers",
                kind = %event.kind,
                "no handler registered for event"
            );
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(triggered),
        }
    }

    /// Drains the session bus through the registry, including events
    /// emitted by the handlers themselves.
    ///
    /// The first critical failure is returned after the drain completes.
    pub fn drain(&self, session: &mut GameSession, audio: &mut dyn AudioSink) -> Result<usize> {
        let limit = session.config().max_events_per_drain;
        let mut failure = None;

        let dispatched = session.drain_events(limit, |event, session| {
            let mut ctx = HandlerContext {
                session,
                audio: &mut *audio,
            };
            if let Err(error) = self.dispatch(&event, &mut ctx) {
                failure.get_or_insert(error);
            }
        })?;

        match failure {
            Some(error) => Err(error),
            None => Ok(dispatched),
        }
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults(CueTable::default())
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.handlers()).finish()
    }
}
