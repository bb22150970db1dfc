//! Fire-and-forget audio contract.
//!
//! The runtime never plays sound itself: it maps each dispatched event to
//! zero or more named cues and hands them to an [`AudioSink`].
use std::collections::HashMap;

use tactics_core::EventKind;
use tracing::debug;

/// Receives cue requests. Implementations must not block.
pub trait AudioSink {
    fn request_cue(&mut self, cue: &str);
}

/// Logs every requested cue. Used when no audio backend is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAudio;

impl AudioSink for TracingAudio {
    fn request_cue(&mut self, cue: &str) {
        debug!(target: "runtime::audio", cue, "cue requested");
    }
}

/// Collects cues in request order.
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    cues: Vec<String>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> &[String] {
        &self.cues
    }

    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.cues)
    }
}

impl AudioSink for RecordingAudio {
    fn request_cue(&mut self, cue: &str) {
        self.cues.push(cue.to_owned());
    }
}

/// Event kind to cue names. A miss plays the swing and the whiff.
const fn default_cues(kind: EventKind) -> &'static [&'static str] {
    match kind {
        EventKind::CursorMoved => &["cursor"],
        EventKind::MenuOpened => &["menu_open"],
        EventKind::MenuClosed => &["menu_close"],
        EventKind::MenuNavigated => &["menu_tick"],
        EventKind::MenuConfirmed => &["menu_select"],
        EventKind::UnitSelected => &["select"],
        EventKind::UnitDeselected | EventKind::MoveUndone => &["deselect"],
        EventKind::ActionDenied => &["denied"],
        EventKind::PauseToggled => &["pause"],
        EventKind::UnitMoved => &["footsteps"],
        EventKind::AttackCommitted | EventKind::HealCommitted | EventKind::PlayerEndedTurn => {
            &["confirm"]
        }
        EventKind::UnitWaited => &["wait"],
        EventKind::AttackHit | EventKind::CounterHit => &["hit"],
        EventKind::AttackMiss | EventKind::CounterMiss => &["swing", "whiff"],
        EventKind::UnitHealed => &["heal"],
        EventKind::UnitDied => &["death"],
        EventKind::EndTurn => &["turn_change"],
        EventKind::UnitSpawned => &["spawn"],
        EventKind::Victory => &["victory"],
        EventKind::GameOver => &["defeat"],
        EventKind::DebugToggled
        | EventKind::FastForwardToggled
        | EventKind::CombatStarted
        | EventKind::AttackImpact
        | EventKind::ResolutionDone
        | EventKind::MoveFinished
        | EventKind::FadeDone => &[],
    }
}

/// Default cue table with per-event overrides layered on top.
#[derive(Debug, Default, Clone)]
pub struct CueTable {
    overrides: HashMap<EventKind, Vec<String>>,
}

impl CueTable {
    pub fn new(overrides: HashMap<EventKind, Vec<String>>) -> Self {
        Self { overrides }
    }

    /// Cues for `kind`, in the order they should be requested.
    pub fn cues(&self, kind: EventKind) -> Vec<&str> {
        match self.overrides.get(&kind) {
            Some(names) => names.iter().map(String::as_str).collect(),
            None => default_cues(kind).to_vec(),
        }
    }

    pub fn has_cues(&self, kind: EventKind) -> bool {
        match self.overrides.get(&kind) {
            Some(names) => !names.is_empty(),
            None => !default_cues(kind).is_empty(),
        }
    }
}
