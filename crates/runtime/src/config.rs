//! RON-loaded runtime configuration.
use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tactics_core::{EventKind, GameConfig, Unit};

use crate::error::{Result, RuntimeError};

/// Everything a [`crate::Runtime`] needs besides its collaborators.
///
/// Every field has a default, so a config file only lists what it changes:
///
/// ```ron
/// (
///     seed: 7,
///     game: (combat_frames: 20),
///     cues: { AttackMiss: ["swing"] },
/// )
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    /// Seed for the combat dice.
    pub seed: u64,
    /// Per-event cue overrides, merged on top of the default cue table.
    /// An empty list silences the event.
    pub cues: HashMap<EventKind, Vec<String>>,
    /// Units placed when the battle starts. Empty means the caller supplies
    /// its own level.
    pub units: Vec<Unit>,
    /// Units that arrive during later spawning phases.
    pub reinforcements: Vec<Unit>,
}

impl RuntimeConfig {
    /// Load a configuration from a RON file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: RuntimeConfig =
            ron::from_str(&content).map_err(|source| RuntimeError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(
            path = %path.display(),
            seed = config.seed,
            cue_overrides = config.cues.len(),
            units = config.units.len(),
            "runtime config loaded"
        );
        Ok(config)
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_game(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_the_default() {
        let config: RuntimeConfig = ron::from_str("()").unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn partial_game_section_keeps_other_defaults() {
        let config: RuntimeConfig =
            ron::from_str("(seed: 3, game: (combat_frames: 12))").unwrap();
        assert_eq!(config.seed, 3);
        assert_eq!(config.game.combat_frames, 12);
        assert_eq!(config.game.heal_frames, GameConfig::DEFAULT_HEAL_FRAMES);
    }
}
