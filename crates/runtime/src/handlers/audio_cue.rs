use tactics_core::{Event, SessionError};

use super::{EventHandler, HandlerContext, HandlerCriticality};
use crate::audio::CueTable;

/// Requests the cues mapped to each event.
#[derive(Debug, Clone, Default)]
pub struct AudioCueHandler {
    table: CueTable,
}

impl AudioCueHandler {
    pub fn new(table: CueTable) -> Self {
        Self { table }
    }
}

impl EventHandler for AudioCueHandler {
    fn name(&self) -> &'static str {
        "audio_cue"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn criticality(&self) -> HandlerCriticality {
        HandlerCriticality::Optional
    }

    fn should_trigger(&self, event: &Event) -> bool {
        self.table.has_cues(event.kind)
    }

    fn handle(&self, event: &Event, ctx: &mut HandlerContext<'_>) -> Result<(), SessionError> {
        for cue in self.table.cues(event.kind) {
            ctx.audio.request_cue(cue);
        }
        Ok(())
    }
}
