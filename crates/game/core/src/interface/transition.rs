//! The interface transition function.
//!
//! [`transition`] is pure: it reads the current [`Interface`] and a borrowed
//! [`InterfaceView`] of the world and returns the next interface value, the
//! feedback events to emit, and at most one [`Effect`] for the session to
//! carry out. It knows nothing about turn phases; the session only calls it
//! during the player phase.

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::event::{Event, EventKind};
use crate::state::{Direction, Faction, MapDimensions, Position, Unit, UnitId, UnitRoster};

use super::command::Command;
use super::grid::{Pathfinder, path_cost};
use super::menu::{GameMenuItem, MenuCursor, UnitMenuItem, unit_menu_items};
use super::state::{InterfaceState, StateFamily};

/// Action being aimed while in a targeting state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TargetAction {
    Attack,
    Heal,
}

/// The picked-up unit and where it stood when picked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    pub unit: UnitId,
    pub origin: Position,
}

/// Everything the interface remembers between commands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interface {
    pub state: InterfaceState,
    pub cursor: Position,
    pub selection: Option<Selection>,
    pub menu: MenuCursor,
    pub targeting: Option<TargetAction>,
}

impl Interface {
    /// Drops selection, menu and targeting and reclassifies the cursor tile.
    pub fn reset_to_neutral(&mut self, units: &UnitRoster) {
        self.selection = None;
        self.targeting = None;
        self.menu.reset();
        self.state = neutral_over(units, self.cursor);
    }
}

/// Side effect requested by a transition. The session performs it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Walk `unit` along `path` (both endpoints included).
    Move { unit: UnitId, path: Vec<Position> },
    Attack { attacker: UnitId, victim: UnitId },
    Heal { healer: UnitId, target: UnitId },
    /// Spend `unit` for the rest of the turn.
    Wait { unit: UnitId },
    EndTurn,
    /// Put `unit` back on `origin` after an uncommitted move.
    UndoMove { unit: UnitId, origin: Position },
    TogglePause,
    ToggleDebug,
    ToggleFastForward,
}

/// Read-only world context a transition is evaluated against.
#[derive(Clone, Copy, Debug)]
pub struct InterfaceView<'a> {
    pub units: &'a UnitRoster,
    pub map: MapDimensions,
    pub pathfinder: &'a dyn Pathfinder,
}

/// Result of feeding one command to the interface.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub interface: Interface,
    pub events: ArrayVec<Event, { GameConfig::MAX_TRANSITION_EVENTS }>,
    pub effect: Option<Effect>,
}

impl Transition {
    fn stay(interface: &Interface) -> Self {
        Self {
            interface: interface.clone(),
            events: ArrayVec::new(),
            effect: None,
        }
    }

    fn emit(&mut self, event: impl Into<Event>) {
        if self.events.try_push(event.into()).is_err() {
            tracing::warn!("interface transition event list full, dropping event");
        }
    }

    fn deny(interface: &Interface) -> Self {
        let mut transition = Self::stay(interface);
        transition.emit(EventKind::ActionDenied);
        transition
    }

    /// Hands control to a busy sentinel with exactly one semantic event.
    fn commit(
        mut interface: Interface,
        state: InterfaceState,
        event: Event,
        effect: Effect,
    ) -> Self {
        debug_assert!(event.kind.is_commit());
        interface.state = state;
        interface.targeting = None;
        let mut events = ArrayVec::new();
        events.push(event);
        Self {
            interface,
            events,
            effect: Some(effect),
        }
    }
}

/// Computes the interface's response to `command`.
pub fn transition(current: &Interface, command: Command, view: &InterfaceView<'_>) -> Transition {
    match command {
        Command::Pause => {
            let mut transition = Transition::stay(current);
            transition.emit(EventKind::PauseToggled);
            transition.effect = Some(Effect::TogglePause);
            return transition;
        }
        Command::ToggleDebug => {
            let mut transition = Transition::stay(current);
            transition.emit(EventKind::DebugToggled);
            transition.effect = Some(Effect::ToggleDebug);
            return transition;
        }
        _ => {}
    }

    match current.state.family() {
        StateFamily::Busy => Transition::stay(current),
        StateFamily::Neutral => neutral(current, command, view),
        StateFamily::Selected => selected(current, command, view),
        StateFamily::Targeting => targeting(current, command, view),
        StateFamily::GameMenu => game_menu(current, command, view),
        StateFamily::UnitMenu => unit_menu(current, command, view),
        StateFamily::EnemyInfo => enemy_info(current, command, view),
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Neutral state for a free cursor over `position`.
pub fn neutral_over(units: &UnitRoster, position: Position) -> InterfaceState {
    match units.unit_at(position).and_then(|id| units.get(id)) {
        Some(unit) if unit.faction == Faction::Player => InterfaceState::NeutralOverUnit,
        Some(_) => InterfaceState::NeutralOverEnemy,
        None => InterfaceState::NeutralOverGround,
    }
}

fn occupied_except(units: &UnitRoster, mover: UnitId) -> Vec<Position> {
    units
        .iter()
        .filter(|(id, unit)| *id != mover && unit.is_alive())
        .map(|(_, unit)| unit.position)
        .collect()
}

/// Path `unit` would walk to `target`, or empty if blocked or too long.
fn reachable_path(
    view: &InterfaceView<'_>,
    id: UnitId,
    unit: &Unit,
    target: Position,
) -> Vec<Position> {
    let avoid = occupied_except(view.units, id);
    let path = view.pathfinder.path(view.map, unit.position, target, &avoid);
    if path.is_empty() || path_cost(&path) > unit.movement as usize {
        return Vec::new();
    }
    path
}

fn selected_over(
    view: &InterfaceView<'_>,
    selection: Selection,
    cursor: Position,
) -> InterfaceState {
    let Some(unit) = view.units.get(selection.unit) else {
        return InterfaceState::SelectedOverInaccessible;
    };
    if cursor == unit.position {
        return InterfaceState::SelectedOverGround;
    }
    if let Some(other) = view.units.unit_at(cursor).and_then(|id| view.units.get(id)) {
        return if other.faction == unit.faction {
            InterfaceState::SelectedOverAlly
        } else {
            InterfaceState::SelectedOverEnemy
        };
    }
    if reachable_path(view, selection.unit, unit, cursor).is_empty() {
        InterfaceState::SelectedOverInaccessible
    } else {
        InterfaceState::SelectedOverGround
    }
}

fn is_valid_target(actor: &Unit, action: TargetAction, target: &Unit) -> bool {
    if !target.is_alive() || !actor.reaches(target.position) {
        return false;
    }
    match action {
        TargetAction::Attack => actor.faction.is_hostile_to(target.faction),
        TargetAction::Heal => {
            actor.can_heal()
                && target.faction == actor.faction
                && target.is_wounded()
                && target.position != actor.position
        }
    }
}

fn targeting_over(
    view: &InterfaceView<'_>,
    selection: Selection,
    action: TargetAction,
    cursor: Position,
) -> InterfaceState {
    let Some(actor) = view.units.get(selection.unit) else {
        return InterfaceState::TargetingOverUntargetable;
    };
    match view.units.unit_at(cursor).and_then(|id| view.units.get(id)) {
        Some(target) if is_valid_target(actor, action, target) => {
            InterfaceState::TargetingOverValid
        }
        Some(target) if target.faction == actor.faction => InterfaceState::TargetingOverAlly,
        Some(_) => InterfaceState::TargetingOverEnemy,
        None => InterfaceState::TargetingOverUntargetable,
    }
}

fn first_valid_target(
    view: &InterfaceView<'_>,
    actor: &Unit,
    action: TargetAction,
) -> Option<Position> {
    view.units
        .iter()
        .find(|(_, target)| is_valid_target(actor, action, target))
        .map(|(_, target)| target.position)
}

/// Moves the cursor one tile, clamped to the map. Emits `CursorMoved` only
/// when the cursor actually moved.
fn step_cursor(
    current: &Interface,
    direction: Direction,
    view: &InterfaceView<'_>,
) -> Transition {
    let mut transition = Transition::stay(current);
    let next = view.map.clamp(current.cursor.step(direction));
    if next != current.cursor {
        transition.interface.cursor = next;
        transition.emit(EventKind::CursorMoved);
    }
    transition
}

// ============================================================================
// Families
// ============================================================================

fn neutral(current: &Interface, command: Command, view: &InterfaceView<'_>) -> Transition {
    let units = view.units;
    match command {
        Command::Move(direction) => {
            let mut transition = step_cursor(current, direction, view);
            transition.interface.state = neutral_over(units, transition.interface.cursor);
            transition
        }
        Command::Confirm => match current.state {
            InterfaceState::NeutralOverUnit => {
                let Some(id) = units.unit_at(current.cursor) else {
                    return Transition::deny(current);
                };
                match units.get(id) {
                    Some(unit) if unit.can_act() => {
                        let mut transition = Transition::stay(current);
                        transition.interface.selection = Some(Selection {
                            unit: id,
                            origin: unit.position,
                        });
                        transition.interface.state = InterfaceState::SelectedOverGround;
                        transition.emit(Event::new(EventKind::UnitSelected).with_unit(id));
                        transition
                    }
                    _ => Transition::deny(current),
                }
            }
            InterfaceState::NeutralOverEnemy => open_enemy_info(current, units),
            _ => open_game_menu(current),
        },
        Command::OpenMenu => open_game_menu(current),
        Command::Info if current.state == InterfaceState::NeutralOverEnemy => {
            open_enemy_info(current, units)
        }
        _ => Transition::stay(current),
    }
}

fn open_game_menu(current: &Interface) -> Transition {
    let mut transition = Transition::stay(current);
    transition.interface.state = InterfaceState::GameMenuRoot;
    transition.interface.menu.reset();
    transition.emit(EventKind::MenuOpened);
    transition
}

fn open_enemy_info(current: &Interface, units: &UnitRoster) -> Transition {
    let mut transition = Transition::stay(current);
    transition.interface.state = InterfaceState::EnemyInfoRoot;
    let mut event = Event::new(EventKind::MenuOpened);
    if let Some(id) = units.unit_at(current.cursor) {
        event = event.with_unit(id);
    }
    transition.emit(event);
    transition
}

fn selected(current: &Interface, command: Command, view: &InterfaceView<'_>) -> Transition {
    let Some(selection) = current.selection else {
        tracing::warn!(state = %current.state, "selected state without a selection");
        let mut transition = Transition::stay(current);
        transition.interface.reset_to_neutral(view.units);
        return transition;
    };

    match command {
        Command::Move(direction) => {
            let mut transition = step_cursor(current, direction, view);
            transition.interface.state =
                selected_over(view, selection, transition.interface.cursor);
            transition
        }
        Command::Confirm => confirm_selected(current, selection, view),
        Command::Cancel => {
            let mut transition = Transition::stay(current);
            transition.interface.cursor = selection.origin;
            transition.interface.reset_to_neutral(view.units);
            transition.emit(Event::new(EventKind::UnitDeselected).with_unit(selection.unit));
            transition
        }
        _ => Transition::stay(current),
    }
}

fn confirm_selected(
    current: &Interface,
    selection: Selection,
    view: &InterfaceView<'_>,
) -> Transition {
    let Some(unit) = view.units.get(selection.unit) else {
        return Transition::deny(current);
    };
    let target = view
        .units
        .unit_at(current.cursor)
        .filter(|id| *id != selection.unit);

    match current.state {
        InterfaceState::SelectedOverGround => {
            let path = reachable_path(view, selection.unit, unit, current.cursor);
            if path.is_empty() {
                return Transition::deny(current);
            }
            let event = Event::new(EventKind::UnitMoved)
                .with_unit(selection.unit)
                .with_integer(path_cost(&path) as i64);
            Transition::commit(
                current.clone(),
                InterfaceState::NoOp,
                event,
                Effect::Move {
                    unit: selection.unit,
                    path,
                },
            )
        }
        InterfaceState::SelectedOverEnemy | InterfaceState::SelectedOverAlly => {
            let action = if current.state == InterfaceState::SelectedOverEnemy {
                TargetAction::Attack
            } else {
                TargetAction::Heal
            };
            match target.and_then(|id| view.units.get(id).map(|t| (id, t))) {
                Some((id, victim)) if is_valid_target(unit, action, victim) => {
                    commit_action(current, selection.unit, action, id)
                }
                _ => Transition::deny(current),
            }
        }
        _ => Transition::deny(current),
    }
}

fn commit_action(
    current: &Interface,
    actor: UnitId,
    action: TargetAction,
    target: UnitId,
) -> Transition {
    let (event, effect) = match action {
        TargetAction::Attack => (
            Event::new(EventKind::AttackCommitted).with_unit(actor),
            Effect::Attack {
                attacker: actor,
                victim: target,
            },
        ),
        TargetAction::Heal => (
            Event::new(EventKind::HealCommitted).with_unit(actor),
            Effect::Heal {
                healer: actor,
                target,
            },
        ),
    };
    Transition::commit(current.clone(), InterfaceState::Combat, event, effect)
}

fn unit_menu(current: &Interface, command: Command, view: &InterfaceView<'_>) -> Transition {
    let Some(selection) = current.selection else {
        tracing::warn!(state = %current.state, "unit menu without a selection");
        let mut transition = Transition::stay(current);
        transition.interface.reset_to_neutral(view.units);
        return transition;
    };
    let Some(unit) = view.units.get(selection.unit) else {
        let mut transition = Transition::stay(current);
        transition.interface.reset_to_neutral(view.units);
        return transition;
    };

    if current.state == InterfaceState::UnitMenuStats {
        return match command {
            Command::Confirm | Command::Cancel | Command::Info => {
                let mut transition = Transition::stay(current);
                transition.interface.state = InterfaceState::UnitMenuRoot;
                transition.emit(EventKind::MenuClosed);
                transition
            }
            _ => Transition::stay(current),
        };
    }

    let items = unit_menu_items(view.units, unit);
    match command {
        Command::Move(direction) => {
            let mut transition = Transition::stay(current);
            if transition.interface.menu.navigate(direction, items.len()) {
                transition.emit(EventKind::MenuNavigated);
            }
            transition
        }
        Command::Confirm => {
            let item = items
                .get(current.menu.index)
                .copied()
                .unwrap_or(UnitMenuItem::Wait);
            match item {
                UnitMenuItem::Attack | UnitMenuItem::Heal => {
                    let action = if item == UnitMenuItem::Attack {
                        TargetAction::Attack
                    } else {
                        TargetAction::Heal
                    };
                    let Some(position) = first_valid_target(view, unit, action) else {
                        return Transition::deny(current);
                    };
                    let mut transition = Transition::stay(current);
                    transition.interface.targeting = Some(action);
                    transition.interface.cursor = position;
                    transition.interface.state =
                        targeting_over(view, selection, action, position);
                    transition.emit(EventKind::MenuConfirmed);
                    transition
                }
                UnitMenuItem::Wait => Transition::commit(
                    current.clone(),
                    InterfaceState::NoOp,
                    Event::new(EventKind::UnitWaited).with_unit(selection.unit),
                    Effect::Wait {
                        unit: selection.unit,
                    },
                ),
            }
        }
        Command::Cancel => {
            let mut transition = Transition::stay(current);
            transition.interface.state = InterfaceState::SelectedOverGround;
            transition.interface.cursor = selection.origin;
            transition.interface.menu.reset();
            transition.emit(Event::new(EventKind::MoveUndone).with_unit(selection.unit));
            transition.effect = Some(Effect::UndoMove {
                unit: selection.unit,
                origin: selection.origin,
            });
            transition
        }
        Command::Info => {
            let mut transition = Transition::stay(current);
            transition.interface.state = InterfaceState::UnitMenuStats;
            transition.emit(Event::new(EventKind::MenuOpened).with_unit(selection.unit));
            transition
        }
        _ => Transition::stay(current),
    }
}

fn targeting(current: &Interface, command: Command, view: &InterfaceView<'_>) -> Transition {
    let (Some(selection), Some(action)) = (current.selection, current.targeting) else {
        tracing::warn!(state = %current.state, "targeting state without an action");
        let mut transition = Transition::stay(current);
        transition.interface.reset_to_neutral(view.units);
        return transition;
    };

    match command {
        Command::Move(direction) => {
            let mut transition = step_cursor(current, direction, view);
            transition.interface.state =
                targeting_over(view, selection, action, transition.interface.cursor);
            transition
        }
        Command::Confirm => {
            if current.state != InterfaceState::TargetingOverValid {
                return Transition::deny(current);
            }
            match view.units.unit_at(current.cursor) {
                Some(target) => commit_action(current, selection.unit, action, target),
                None => Transition::deny(current),
            }
        }
        Command::Cancel => {
            let mut transition = Transition::stay(current);
            transition.interface.targeting = None;
            transition.interface.state = InterfaceState::UnitMenuRoot;
            if let Some(unit) = view.units.get(selection.unit) {
                transition.interface.cursor = unit.position;
            }
            transition.emit(EventKind::MenuOpened);
            transition
        }
        _ => Transition::stay(current),
    }
}

fn game_menu(current: &Interface, command: Command, view: &InterfaceView<'_>) -> Transition {
    let mut transition = Transition::stay(current);
    match (current.state, command) {
        (InterfaceState::GameMenuRoot, Command::Move(direction)) => {
            if transition
                .interface
                .menu
                .navigate(direction, GameMenuItem::ALL.len())
            {
                transition.emit(EventKind::MenuNavigated);
            }
        }
        (InterfaceState::GameMenuRoot, Command::Confirm) => {
            transition.interface.state = match GameMenuItem::ALL.get(current.menu.index) {
                Some(GameMenuItem::Options) => InterfaceState::GameMenuOptions,
                _ => InterfaceState::GameMenuEndTurn,
            };
            transition.emit(EventKind::MenuConfirmed);
        }
        (InterfaceState::GameMenuRoot, Command::Cancel | Command::OpenMenu) => {
            transition.interface.reset_to_neutral(view.units);
            transition.emit(EventKind::MenuClosed);
        }
        (InterfaceState::GameMenuEndTurn, Command::Confirm) => {
            transition.interface.menu.reset();
            return Transition::commit(
                transition.interface,
                InterfaceState::NoOp,
                Event::new(EventKind::PlayerEndedTurn),
                Effect::EndTurn,
            );
        }
        (InterfaceState::GameMenuOptions, Command::Confirm) => {
            transition.emit(EventKind::FastForwardToggled);
            transition.effect = Some(Effect::ToggleFastForward);
        }
        (InterfaceState::GameMenuEndTurn | InterfaceState::GameMenuOptions, Command::Cancel) => {
            transition.interface.state = InterfaceState::GameMenuRoot;
            transition.emit(EventKind::MenuClosed);
        }
        _ => {}
    }
    transition
}

fn enemy_info(current: &Interface, command: Command, view: &InterfaceView<'_>) -> Transition {
    let mut transition = Transition::stay(current);
    match (current.state, command) {
        (InterfaceState::EnemyInfoRoot, Command::Confirm | Command::Info) => {
            transition.interface.state = InterfaceState::EnemyInfoDetail;
            transition.emit(EventKind::MenuOpened);
        }
        (InterfaceState::EnemyInfoRoot, Command::Cancel) => {
            transition.interface.reset_to_neutral(view.units);
            transition.emit(EventKind::MenuClosed);
        }
        (InterfaceState::EnemyInfoDetail, Command::Confirm | Command::Cancel | Command::Info) => {
            transition.interface.state = InterfaceState::EnemyInfoRoot;
            transition.emit(EventKind::MenuClosed);
        }
        _ => {}
    }
    transition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::OpenField;
    use crate::state::RangeSpan;

    struct World {
        units: UnitRoster,
        knight: UnitId,
        cleric: UnitId,
        orc: UnitId,
    }

    fn world() -> World {
        let mut units = UnitRoster::new();
        let knight = units.insert(
            Unit::new("knight", Faction::Player, Position::new(2, 2)).with_movement(3),
        );
        let cleric = units.insert(
            Unit::new("cleric", Faction::Player, Position::new(2, 4))
                .with_healing(4)
                .with_range(RangeSpan::new(1, 2)),
        );
        let orc = units.insert(Unit::new("orc", Faction::Enemy, Position::new(3, 2)));
        World {
            units,
            knight,
            cleric,
            orc,
        }
    }

    fn view(units: &UnitRoster) -> InterfaceView<'_> {
        InterfaceView {
            units,
            map: MapDimensions::new(8, 8),
            pathfinder: &OpenField,
        }
    }

    fn at(units: &UnitRoster, cursor: Position) -> Interface {
        Interface {
            state: neutral_over(units, cursor),
            cursor,
            ..Interface::default()
        }
    }

    fn kinds(transition: &Transition) -> Vec<EventKind> {
        transition.events.iter().map(|event| event.kind).collect()
    }

    fn selected_knight(w: &World) -> Interface {
        let start = at(&w.units, Position::new(2, 2));
        transition(&start, Command::Confirm, &view(&w.units)).interface
    }

    #[test]
    fn cursor_move_reclassifies_and_emits_feedback() {
        let w = world();
        let start = at(&w.units, Position::new(1, 2));
        assert_eq!(start.state, InterfaceState::NeutralOverGround);

        let next = transition(&start, Command::Move(Direction::Right), &view(&w.units));
        assert_eq!(next.interface.state, InterfaceState::NeutralOverUnit);
        assert_eq!(kinds(&next), vec![EventKind::CursorMoved]);
        assert!(next.effect.is_none());
    }

    #[test]
    fn cursor_stops_at_map_edge_silently() {
        let w = world();
        let start = at(&w.units, Position::new(0, 0));
        let next = transition(&start, Command::Move(Direction::Left), &view(&w.units));
        assert_eq!(next.interface.cursor, Position::new(0, 0));
        assert!(next.events.is_empty());
    }

    #[test]
    fn confirm_over_ally_selects_it() {
        let w = world();
        let next = transition(
            &at(&w.units, Position::new(2, 2)),
            Command::Confirm,
            &view(&w.units),
        );
        assert_eq!(next.interface.state, InterfaceState::SelectedOverGround);
        assert_eq!(
            next.interface.selection,
            Some(Selection {
                unit: w.knight,
                origin: Position::new(2, 2)
            })
        );
        assert_eq!(kinds(&next), vec![EventKind::UnitSelected]);
    }

    #[test]
    fn exhausted_ally_cannot_be_selected() {
        let mut w = world();
        w.units.get_mut(w.knight).unwrap().exhausted = true;
        let start = at(&w.units, Position::new(2, 2));
        let next = transition(&start, Command::Confirm, &view(&w.units));
        assert_eq!(next.interface, start);
        assert_eq!(kinds(&next), vec![EventKind::ActionDenied]);
    }

    #[test]
    fn confirm_on_ground_opens_game_menu_and_enemy_opens_info() {
        let w = world();
        let ground = transition(
            &at(&w.units, Position::new(0, 0)),
            Command::Confirm,
            &view(&w.units),
        );
        assert_eq!(ground.interface.state, InterfaceState::GameMenuRoot);

        let enemy = transition(
            &at(&w.units, Position::new(3, 2)),
            Command::Confirm,
            &view(&w.units),
        );
        assert_eq!(enemy.interface.state, InterfaceState::EnemyInfoRoot);
        assert_eq!(enemy.events[0].unit, Some(w.orc));
    }

    #[test]
    fn selected_hover_distinguishes_reachability() {
        let w = world();
        let selected = selected_knight(&w);

        let mut over = selected.clone();
        over.cursor = Position::new(2, 5);
        over = transition(&over, Command::Move(Direction::Up), &view(&w.units)).interface;
        // (2, 4) holds the cleric.
        assert_eq!(over.state, InterfaceState::SelectedOverAlly);

        let right = transition(&selected, Command::Move(Direction::Right), &view(&w.units));
        assert_eq!(right.interface.state, InterfaceState::SelectedOverEnemy);

        let mut far = selected.clone();
        far.cursor = Position::new(7, 6);
        let far = transition(&far, Command::Move(Direction::Down), &view(&w.units));
        assert_eq!(far.interface.state, InterfaceState::SelectedOverInaccessible);
    }

    #[test]
    fn confirm_on_reachable_ground_commits_move() {
        let w = world();
        let mut selected = selected_knight(&w);
        selected.cursor = Position::new(2, 1);
        selected.state = InterfaceState::SelectedOverGround;

        let next = transition(&selected, Command::Confirm, &view(&w.units));
        assert_eq!(next.interface.state, InterfaceState::NoOp);
        assert_eq!(kinds(&next), vec![EventKind::UnitMoved]);
        assert_eq!(
            next.effect,
            Some(Effect::Move {
                unit: w.knight,
                path: vec![Position::new(2, 2), Position::new(2, 1)],
            })
        );
    }

    #[test]
    fn confirm_on_inaccessible_ground_is_denied() {
        let w = world();
        let mut selected = selected_knight(&w);
        selected.cursor = Position::new(7, 7);
        selected.state = InterfaceState::SelectedOverGround;

        let next = transition(&selected, Command::Confirm, &view(&w.units));
        assert_eq!(next.interface, selected);
        assert_eq!(kinds(&next), vec![EventKind::ActionDenied]);
        assert!(next.effect.is_none());
    }

    #[test]
    fn confirm_on_adjacent_enemy_commits_attack() {
        let w = world();
        let selected = selected_knight(&w);
        let over_enemy = transition(&selected, Command::Move(Direction::Right), &view(&w.units));

        let next = transition(&over_enemy.interface, Command::Confirm, &view(&w.units));
        assert_eq!(next.interface.state, InterfaceState::Combat);
        assert_eq!(kinds(&next), vec![EventKind::AttackCommitted]);
        assert_eq!(
            next.effect,
            Some(Effect::Attack {
                attacker: w.knight,
                victim: w.orc
            })
        );
    }

    #[test]
    fn cancel_deselects_and_returns_cursor() {
        let w = world();
        let mut selected = selected_knight(&w);
        selected.cursor = Position::new(4, 4);
        let next = transition(&selected, Command::Cancel, &view(&w.units));
        assert_eq!(next.interface.cursor, Position::new(2, 2));
        assert_eq!(next.interface.state, InterfaceState::NeutralOverUnit);
        assert!(next.interface.selection.is_none());
        assert_eq!(kinds(&next), vec![EventKind::UnitDeselected]);
    }

    #[test]
    fn busy_states_ignore_everything_but_meta() {
        let w = world();
        for state in [InterfaceState::NoOp, InterfaceState::Combat] {
            let busy = Interface {
                state,
                ..Interface::default()
            };
            for command in [
                Command::Move(Direction::Up),
                Command::Confirm,
                Command::Cancel,
                Command::OpenMenu,
                Command::Info,
            ] {
                let next = transition(&busy, command, &view(&w.units));
                assert_eq!(next.interface, busy);
                assert!(next.events.is_empty());
                assert!(next.effect.is_none());
            }
            let paused = transition(&busy, Command::Pause, &view(&w.units));
            assert_eq!(paused.effect, Some(Effect::TogglePause));
            assert_eq!(kinds(&paused), vec![EventKind::PauseToggled]);
        }
    }

    #[test]
    fn unit_menu_wait_commits_and_cancel_undoes_move() {
        let w = world();
        let mut menu = selected_knight(&w);
        menu.state = InterfaceState::UnitMenuRoot;

        // Items: Attack (orc adjacent), Wait.
        let down = transition(&menu, Command::Move(Direction::Down), &view(&w.units));
        assert_eq!(down.interface.menu.index, 1);
        let wait = transition(&down.interface, Command::Confirm, &view(&w.units));
        assert_eq!(wait.interface.state, InterfaceState::NoOp);
        assert_eq!(kinds(&wait), vec![EventKind::UnitWaited]);
        assert_eq!(wait.effect, Some(Effect::Wait { unit: w.knight }));

        let undo = transition(&menu, Command::Cancel, &view(&w.units));
        assert_eq!(undo.interface.state, InterfaceState::SelectedOverGround);
        assert_eq!(
            undo.effect,
            Some(Effect::UndoMove {
                unit: w.knight,
                origin: Position::new(2, 2)
            })
        );
    }

    #[test]
    fn unit_menu_attack_snaps_cursor_to_first_target() {
        let w = world();
        let mut menu = selected_knight(&w);
        menu.state = InterfaceState::UnitMenuRoot;

        let aiming = transition(&menu, Command::Confirm, &view(&w.units));
        assert_eq!(aiming.interface.state, InterfaceState::TargetingOverValid);
        assert_eq!(aiming.interface.cursor, Position::new(3, 2));
        assert_eq!(aiming.interface.targeting, Some(TargetAction::Attack));

        let off = transition(&aiming.interface, Command::Move(Direction::Down), &view(&w.units));
        assert_eq!(off.interface.state, InterfaceState::TargetingOverUntargetable);
        let denied = transition(&off.interface, Command::Confirm, &view(&w.units));
        assert_eq!(kinds(&denied), vec![EventKind::ActionDenied]);

        let fire = transition(&aiming.interface, Command::Confirm, &view(&w.units));
        assert_eq!(fire.interface.state, InterfaceState::Combat);
        assert_eq!(kinds(&fire), vec![EventKind::AttackCommitted]);
    }

    #[test]
    fn heal_targets_wounded_ally_in_range() {
        let mut w = world();
        w.units.get_mut(w.knight).unwrap().hp = 4;
        let start = at(&w.units, Position::new(2, 4));
        let mut selected = transition(&start, Command::Confirm, &view(&w.units)).interface;
        selected.cursor = Position::new(2, 2);
        selected.state = InterfaceState::SelectedOverAlly;

        let next = transition(&selected, Command::Confirm, &view(&w.units));
        assert_eq!(next.interface.state, InterfaceState::Combat);
        assert_eq!(
            next.effect,
            Some(Effect::Heal {
                healer: w.cleric,
                target: w.knight
            })
        );
    }

    #[test]
    fn end_turn_goes_through_confirmation() {
        let w = world();
        let root = transition(
            &at(&w.units, Position::new(0, 0)),
            Command::OpenMenu,
            &view(&w.units),
        );
        let confirm = transition(&root.interface, Command::Confirm, &view(&w.units));
        assert_eq!(confirm.interface.state, InterfaceState::GameMenuEndTurn);

        let back = transition(&confirm.interface, Command::Cancel, &view(&w.units));
        assert_eq!(back.interface.state, InterfaceState::GameMenuRoot);

        let ended = transition(&confirm.interface, Command::Confirm, &view(&w.units));
        assert_eq!(ended.interface.state, InterfaceState::NoOp);
        assert_eq!(kinds(&ended), vec![EventKind::PlayerEndedTurn]);
        assert_eq!(ended.effect, Some(Effect::EndTurn));
    }

    #[test]
    fn options_toggles_fast_forward() {
        let w = world();
        let mut root = at(&w.units, Position::new(0, 0));
        root.state = InterfaceState::GameMenuRoot;
        let options = transition(&root, Command::Move(Direction::Down), &view(&w.units));
        let opened = transition(&options.interface, Command::Confirm, &view(&w.units));
        assert_eq!(opened.interface.state, InterfaceState::GameMenuOptions);
        let toggled = transition(&opened.interface, Command::Confirm, &view(&w.units));
        assert_eq!(toggled.effect, Some(Effect::ToggleFastForward));
        assert_eq!(toggled.interface.state, InterfaceState::GameMenuOptions);
    }
}
