//! Player interface state machine.
//!
//! States fall into families: *neutral* (free cursor), *selected* (a unit is
//! picked up), *targeting* (aiming an action), three *menu* families, and the
//! *busy* sentinels `Combat` and `NoOp`. Inputs that only move the cursor or
//! a menu highlight emit feedback events and stay in the live families; every
//! committing confirm emits exactly one semantic event and hands control to a
//! busy sentinel.

mod command;
mod grid;
mod menu;
mod state;
mod transition;

pub use command::Command;
pub use grid::{OpenField, Pathfinder, path_cost};
pub use menu::{GameMenuItem, MenuCursor, UnitMenuItem, unit_menu_items};
pub use state::{InterfaceState, StateFamily};
pub use transition::{
    Effect, Interface, InterfaceView, Selection, TargetAction, Transition, neutral_over,
    transition,
};
