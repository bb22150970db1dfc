//! Scripted player input.
//!
//! Each player turn the autopilot has every rested unit with a hostile in
//! reach strike it, then ends the turn through the game menu. It only speaks
//! while the interface is live, so busy states never see its input.
use std::collections::VecDeque;

use tactics_core::{Command, Direction, Faction, GameSession, Phase, Position};

#[derive(Debug, Default)]
pub struct Autopilot {
    queue: VecDeque<Command>,
}

impl Autopilot {
    pub fn next(&mut self, session: &GameSession) -> Option<Command> {
        if session.phase() != Phase::Player || session.is_paused() {
            self.queue.clear();
            return None;
        }
        let state = session.interface_state();
        if state.is_busy() {
            return None;
        }
        if self.queue.is_empty() {
            if !state.is_neutral() {
                return Some(Command::Cancel);
            }
            self.plan(session);
        }
        self.queue.pop_front()
    }

    fn plan(&mut self, session: &GameSession) {
        let units = session.units();
        let strike = units
            .living(Faction::Player)
            .filter(|(_, unit)| unit.can_act())
            .find_map(|(_, unit)| {
                units
                    .iter()
                    .find(|(_, target)| {
                        target.is_alive()
                            && unit.faction.is_hostile_to(target.faction)
                            && unit.reaches(target.position)
                    })
                    .map(|(_, target)| (unit.position, target.position))
            });

        match strike {
            Some((from, to)) => {
                self.steer(session.cursor(), from);
                self.queue.push_back(Command::Confirm);
                self.steer(from, to);
                self.queue.push_back(Command::Confirm);
            }
            None => self
                .queue
                .extend([Command::OpenMenu, Command::Confirm, Command::Confirm]),
        }
    }

    fn steer(&mut self, from: Position, to: Position) {
        let horizontal = if to.x > from.x {
            Direction::Right
        } else {
            Direction::Left
        };
        let vertical = if to.y > from.y {
            Direction::Down
        } else {
            Direction::Up
        };
        let steps = std::iter::repeat_n(Command::Move(horizontal), from.x.abs_diff(to.x) as usize)
            .chain(std::iter::repeat_n(
                Command::Move(vertical),
                from.y.abs_diff(to.y) as usize,
            ));
        self.queue.extend(steps);
    }
}
