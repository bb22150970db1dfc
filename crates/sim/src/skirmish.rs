//! Built-in level used when the config brings no units.
use tactics_core::{AiAction, AiDecision, Faction, Position, RangeSpan, Unit};
use tactics_runtime::ScriptedAi;

pub fn units() -> Vec<Unit> {
    vec![
        Unit::new("knight", Faction::Player, Position::new(2, 2))
            .with_hp(14, 14)
            .with_combat(7, 2, 85),
        Unit::new("cleric", Faction::Player, Position::new(1, 2))
            .with_combat(2, 1, 70)
            .with_healing(5),
        Unit::new("orc", Faction::Enemy, Position::new(3, 2)).with_combat(5, 1, 75),
        Unit::new("goblin", Faction::Enemy, Position::new(5, 4))
            .with_hp(8, 8)
            .with_combat(4, 0, 80),
    ]
}

pub fn reinforcements() -> Vec<Unit> {
    vec![
        Unit::new("archer", Faction::Enemy, Position::new(12, 6))
            .with_range(RangeSpan::new(2, 3))
            .with_movement(3),
    ]
}

/// The goblin flanks the knight on the first enemy turn and keeps hitting
/// it afterwards.
pub fn enemy_script(units: &tactics_core::UnitRoster) -> ScriptedAi {
    let (Some(goblin), Some(knight)) = (
        units.unit_at(Position::new(5, 4)),
        units.unit_at(Position::new(2, 2)),
    ) else {
        return ScriptedAi::default();
    };

    let flank = [(5, 4), (4, 4), (3, 4), (2, 4), (2, 3)]
        .into_iter()
        .map(|(x, y)| Position::new(x, y))
        .collect();
    let mut script = vec![AiDecision {
        unit: goblin,
        path: flank,
        action: AiAction::Attack(knight),
    }];
    script.extend((0..3).map(|_| AiDecision {
        unit: goblin,
        path: Vec::new(),
        action: AiAction::Attack(knight),
    }));
    ScriptedAi::new(script).per_turn(1)
}
