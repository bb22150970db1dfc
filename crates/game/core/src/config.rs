use crate::state::MapDimensions;

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct GameConfig {
    /// Battle map bounds used by the cursor and the default pathfinder.
    pub map: MapDimensions,
    /// Frames an attack plays back before damage is assigned.
    pub combat_frames: u32,
    /// Frames a heal plays back before hit points are restored.
    pub heal_frames: u32,
    /// Parcel length per tile walked.
    pub move_frames_per_tile: u32,
    /// Uniform stretch applied to fade and banner presets.
    pub fade_modulation: f32,
    /// Upper bound on events dispatched by one drain.
    pub max_events_per_drain: usize,
    /// Simulation steps per frame while fast-forward is on.
    pub fast_forward_steps: u32,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Events a single interface transition may emit.
    pub const MAX_TRANSITION_EVENTS: usize = 4;
    /// Upper bound on a d100 roll (exclusive).
    pub const ROLL_SIDES: u32 = 100;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_COMBAT_FRAMES: u32 = 40;
    pub const DEFAULT_HEAL_FRAMES: u32 = 30;
    pub const DEFAULT_MOVE_FRAMES_PER_TILE: u32 = 6;
    pub const DEFAULT_FADE_MODULATION: f32 = 1.0;
    pub const DEFAULT_MAX_EVENTS_PER_DRAIN: usize = 1024;
    pub const DEFAULT_FAST_FORWARD_STEPS: u32 = 2;

    pub fn new() -> Self {
        Self {
            map: MapDimensions::default(),
            combat_frames: Self::DEFAULT_COMBAT_FRAMES,
            heal_frames: Self::DEFAULT_HEAL_FRAMES,
            move_frames_per_tile: Self::DEFAULT_MOVE_FRAMES_PER_TILE,
            fade_modulation: Self::DEFAULT_FADE_MODULATION,
            max_events_per_drain: Self::DEFAULT_MAX_EVENTS_PER_DRAIN,
            fast_forward_steps: Self::DEFAULT_FAST_FORWARD_STEPS,
        }
    }

    #[must_use]
    pub fn with_map(mut self, map: MapDimensions) -> Self {
        self.map = map;
        self
    }

    #[must_use]
    pub fn with_combat_frames(mut self, frames: u32) -> Self {
        self.combat_frames = frames;
        self
    }

    /// Parcel length for a path of `tiles` steps, never below one frame.
    pub fn move_frames(&self, tiles: usize) -> u32 {
        (self.move_frames_per_tile.saturating_mul(tiles as u32)).max(1)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
