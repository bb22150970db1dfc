mod common;

use common::{end_turn, runtime, MAX_FRAMES};
use tactics_core::{AiState, Faction, InterfaceState, Phase, Position, Unit};
use tactics_runtime::{PassiveAi, Runtime};

fn skirmish() -> Vec<Unit> {
    vec![
        Unit::new("knight", Faction::Player, Position::new(1, 1)),
        Unit::new("orc", Faction::Enemy, Position::new(8, 8)),
    ]
}

#[test]
fn end_turn_cycles_through_every_phase() {
    let mut runtime = runtime(skirmish(), [0], PassiveAi);
    let report = end_turn(&mut runtime);
    assert_eq!(report.phase, Phase::Resolution);
    assert_eq!(report.interface, InterfaceState::NoOp);

    let mut phases = vec![Phase::Player, report.phase];
    for _ in 0..MAX_FRAMES {
        let report = runtime.frame(None).unwrap();
        if phases.last() != Some(&report.phase) {
            phases.push(report.phase);
        }
        if report.phase == Phase::Player {
            break;
        }
    }

    assert_eq!(
        phases,
        vec![
            Phase::Player,
            Phase::Resolution,
            Phase::Ai,
            Phase::Spawning,
            Phase::Player
        ]
    );
    let session = runtime.session();
    assert_eq!(session.turn(), 2);
    assert_eq!(session.ai_state(), AiState::Idle);
    assert_eq!(session.interface_state(), InterfaceState::NeutralOverUnit);
    assert_eq!(session.cursor(), Position::new(1, 1));
}

#[test]
fn nobody_enters_a_player_turn_exhausted() {
    let mut runtime = runtime(skirmish(), [0], PassiveAi);
    end_turn(&mut runtime);
    runtime
        .run_until(MAX_FRAMES, |s| s.phase() == Phase::Spawning)
        .unwrap()
        .unwrap();
    let orc = runtime.session().units().first_living(Faction::Enemy).unwrap();
    assert!(runtime.session().units().get(orc).unwrap().exhausted);

    runtime
        .run_until(MAX_FRAMES, |s| s.phase() == Phase::Player)
        .unwrap()
        .unwrap();
    assert!(runtime.session().units().iter().all(|(_, unit)| !unit.exhausted));
}

#[test]
fn every_phase_change_announces_itself() {
    let mut runtime = runtime(skirmish(), [0], PassiveAi);
    end_turn(&mut runtime);
    runtime
        .run_until(MAX_FRAMES, |s| {
            s.phase() == Phase::Player && s.turn() == 2 && s.pending_events() == 0
        })
        .unwrap()
        .unwrap();

    let cues = runtime.audio().cues();
    let banners = cues.iter().filter(|c| *c == "turn_change").count();
    assert_eq!(banners, 4);
    assert!(cues.iter().any(|c| c == "wait"));
}

#[test]
fn reinforcements_arrive_during_spawning() {
    let mut runtime = Runtime::builder()
        .audio(tactics_runtime::RecordingAudio::new())
        .units(skirmish())
        .reinforcements([
            Unit::new("wolf", Faction::Enemy, Position::new(10, 10)),
            Unit::new("stuck", Faction::Enemy, Position::new(8, 8)),
        ])
        .build()
        .unwrap();
    common::settle_intro(&mut runtime);
    end_turn(&mut runtime);
    runtime
        .run_until(MAX_FRAMES, |s| s.phase() == Phase::Player && s.turn() == 2)
        .unwrap()
        .unwrap();

    let session = runtime.session();
    assert_eq!(session.units().len(), 3);
    assert!(session.units().unit_at(Position::new(10, 10)).is_some());
    assert_eq!(session.reinforcements().len(), 1);
    assert_eq!(session.reinforcements()[0].name, "stuck");
}

#[test]
fn pending_reinforcements_hold_off_victory() {
    let brute = Unit::new("brute", Faction::Player, Position::new(1, 1));
    let mut runtime = Runtime::builder()
        .audio(tactics_runtime::RecordingAudio::new())
        .units([brute])
        .reinforcements([Unit::new("wolf", Faction::Enemy, Position::new(10, 10))])
        .build()
        .unwrap();
    assert_eq!(runtime.session().phase(), Phase::Player);

    common::settle_intro(&mut runtime);
    end_turn(&mut runtime);
    runtime
        .run_until(MAX_FRAMES, |s| s.phase() == Phase::Player && s.turn() == 2)
        .unwrap()
        .unwrap();
    assert!(runtime.session().units().has_living(Faction::Enemy));
}
