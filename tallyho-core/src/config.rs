//! Game configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::tiles::Team;

/// Moves each team gets once the final phase starts
pub const FINAL_PHASE_MOVES: u8 = 5;

/// Number of log lines kept in the game state
pub const LOG_CAPACITY: usize = 20;

/// Rules knobs that are fixed for a whole game
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Moves per team in the final phase
    pub final_phase_moves: u8,
    /// Rolling log length
    pub log_capacity: usize,
    /// Team that acts first in every round
    pub first_team: Team,
    /// Team the human user controls in round 1 (swapped in round 2)
    pub user_team: Team,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            final_phase_moves: FINAL_PHASE_MOVES,
            log_capacity: LOG_CAPACITY,
            first_team: Team::Humans,
            user_team: Team::Humans,
        }
    }
}

impl GameConfig {
    /// Load from JSON file; missing fields fall back to defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.first_team == Team::Neutral || self.user_team == Team::Neutral {
            anyhow::bail!("first_team and user_team must be Humans or Animals");
        }
        if self.log_capacity == 0 {
            anyhow::bail!("log_capacity must be at least 1");
        }
        Ok(())
    }
}
