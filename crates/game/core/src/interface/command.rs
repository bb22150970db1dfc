use crate::state::Direction;

/// Semantic input, already decoded from whatever device produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    Move(Direction),
    Confirm,
    Cancel,
    OpenMenu,
    Info,
    /// Meta: toggles the pause freeze.
    Pause,
    /// Meta: toggles the debug overlay.
    ToggleDebug,
}

impl Command {
    /// Meta commands are honoured even in busy states and while paused.
    pub const fn is_meta(self) -> bool {
        matches!(self, Command::Pause | Command::ToggleDebug)
    }
}
