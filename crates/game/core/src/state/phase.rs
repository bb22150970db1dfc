/// Top-level turn-cycle state.
///
/// Exactly one value is active per session. It is written only by
/// [`TurnController`](crate::engine::TurnController) transition functions.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Player,
    Resolution,
    Ai,
    Spawning,
    GameOver,
    Victory,
}

impl Phase {
    /// Terminal phases absorb every further transition.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::GameOver | Phase::Victory)
    }

    /// Successor in the `PLAYER → RESOLUTION → AI → SPAWNING` cycle.
    pub const fn next(self) -> Option<Phase> {
        match self {
            Phase::Player => Some(Phase::Resolution),
            Phase::Resolution => Some(Phase::Ai),
            Phase::Ai => Some(Phase::Spawning),
            Phase::Spawning => Some(Phase::Player),
            Phase::GameOver | Phase::Victory => None,
        }
    }
}

/// Sub-state of the AI phase gating whether decision logic may run.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AiState {
    /// AI phase just began; the next step starts the unit search.
    EnemyTurn,
    /// Ready to ask the driver for the next unit's decision.
    FindingNext,
    /// Waiting on a move, combat, or fade to finish (also the resting value
    /// outside the AI phase).
    Idle,
}

impl AiState {
    pub const fn may_decide(self) -> bool {
        matches!(self, AiState::FindingNext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn cycle_returns_to_player_after_four_steps() {
        let mut phase = Phase::Player;
        for _ in 0..4 {
            phase = phase.next().unwrap();
        }
        assert_eq!(phase, Phase::Player);
    }

    #[test]
    fn only_outcomes_are_terminal() {
        let terminal: Vec<_> = Phase::iter().filter(|p| p.is_terminal()).collect();
        assert_eq!(terminal, vec![Phase::GameOver, Phase::Victory]);
        assert!(Phase::Victory.next().is_none());
    }

    #[test]
    fn phase_names_are_snake_case() {
        assert_eq!(Phase::GameOver.to_string(), "game_over");
        assert_eq!(AiState::FindingNext.as_ref(), "finding_next");
    }
}
