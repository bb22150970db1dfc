#![allow(dead_code)]

use tactics_core::{Command, Direction, GameSession, ScriptedDice, Unit};
use tactics_runtime::{AiDriver, FrameReport, RecordingAudio, Runtime};

pub const MAX_FRAMES: u32 = 600;

pub fn runtime(
    units: impl IntoIterator<Item = Unit>,
    rolls: impl IntoIterator<Item = u32>,
    ai: impl AiDriver + 'static,
) -> Runtime<RecordingAudio> {
    let mut runtime = Runtime::builder()
        .audio(RecordingAudio::new())
        .dice(ScriptedDice::new(rolls))
        .ai(ai)
        .units(units)
        .build()
        .unwrap();
    settle_intro(&mut runtime);
    runtime
}

/// Lets the opening fade finish and clears its cues.
pub fn settle_intro(runtime: &mut Runtime<RecordingAudio>) {
    runtime
        .run_until(MAX_FRAMES, |s| s.fade_value().is_none() && s.pending_events() == 0)
        .unwrap()
        .expect("intro fade never finished");
    runtime.audio_mut().take();
}

pub fn press(runtime: &mut Runtime<RecordingAudio>, commands: &[Command]) -> FrameReport {
    let mut last = None;
    for command in commands {
        last = Some(runtime.frame(Some(*command)).unwrap());
    }
    last.expect("no commands pressed")
}

pub fn right() -> Command {
    Command::Move(Direction::Right)
}

/// Opens the game menu and confirms End Turn.
pub fn end_turn(runtime: &mut Runtime<RecordingAudio>) -> FrameReport {
    press(
        runtime,
        &[Command::OpenMenu, Command::Confirm, Command::Confirm],
    )
}

pub fn wait_for(
    runtime: &mut Runtime<RecordingAudio>,
    done: impl FnMut(&GameSession) -> bool,
) -> u32 {
    runtime
        .run_until(MAX_FRAMES, done)
        .unwrap()
        .expect("condition never held")
}
