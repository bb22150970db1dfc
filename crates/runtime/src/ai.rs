//! Pluggable sources of AI decisions.
//!
//! The runtime owns the AI phase envelope; a driver only answers "what does
//! the next enemy do?". Returning `None` ends the AI turn.
use std::collections::VecDeque;

use tactics_core::{AiAction, AiDecision, Faction, GameSession};

pub trait AiDriver {
    fn decide(&mut self, session: &GameSession) -> Option<AiDecision>;
}

/// Every enemy that can still act waits in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassiveAi;

impl AiDriver for PassiveAi {
    fn decide(&mut self, session: &GameSession) -> Option<AiDecision> {
        session
            .units()
            .living(Faction::Enemy)
            .find(|(_, unit)| unit.can_act())
            .map(|(unit, _)| AiDecision {
                unit,
                path: Vec::new(),
                action: AiAction::Wait,
            })
    }
}

/// Replays a fixed list of decisions, one per request, across turns.
#[derive(Debug, Default, Clone)]
pub struct ScriptedAi {
    decisions: VecDeque<AiDecision>,
    /// Decisions handed out in the current AI turn.
    issued: usize,
    /// Decisions per AI turn; `None` drains the whole script in one turn.
    per_turn: Option<usize>,
}

impl ScriptedAi {
    pub fn new(decisions: impl IntoIterator<Item = AiDecision>) -> Self {
        Self {
            decisions: decisions.into_iter().collect(),
            issued: 0,
            per_turn: None,
        }
    }

    /// Ends each AI turn after `count` decisions.
    #[must_use]
    pub fn per_turn(mut self, count: usize) -> Self {
        self.per_turn = Some(count);
        self
    }

    pub fn push(&mut self, decision: AiDecision) {
        self.decisions.push_back(decision);
    }

    pub fn remaining(&self) -> usize {
        self.decisions.len()
    }
}

impl AiDriver for ScriptedAi {
    fn decide(&mut self, _session: &GameSession) -> Option<AiDecision> {
        if self.per_turn.is_some_and(|limit| self.issued >= limit) {
            self.issued = 0;
            return None;
        }
        match self.decisions.pop_front() {
            Some(decision) => {
                self.issued += 1;
                Some(decision)
            }
            None => {
                self.issued = 0;
                None
            }
        }
    }
}
