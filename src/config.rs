//! Game configuration: grid size, win length, match format.

use crate::error::GameError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default grid size when the caller omits one.
pub const DEFAULT_GRID_SIZE: usize = 3;
/// Default win length when the caller omits one.
pub const DEFAULT_WIN_LENGTH: usize = 3;

/// Upper bound for a per-turn time limit (24 hours in milliseconds).
pub const MAX_TURN_DURATION_MS: u64 = 86_400_000;

/// Validates an optional per-turn time limit.
///
/// # Errors
///
/// Returns [`GameError::InvalidConfig`] when the duration is zero or above
/// [`MAX_TURN_DURATION_MS`].
pub fn validate_turn_duration(turn_duration_ms: Option<u64>) -> Result<(), GameError> {
    if let Some(ms) = turn_duration_ms {
        if ms == 0 || ms > MAX_TURN_DURATION_MS {
            return Err(GameError::InvalidConfig(format!(
                "turn duration must be between 1 and {} milliseconds",
                MAX_TURN_DURATION_MS
            )));
        }
    }
    Ok(())
}

/// Best-of-N match format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchFormat {
    /// One round decides the match.
    #[default]
    Single,
    /// First to two round wins.
    Bo3,
    /// First to three round wins.
    Bo5,
}

impl MatchFormat {
    /// Round wins required to take the match. Fixed at match creation and
    /// never recomputed mid-match.
    pub fn target_wins(self) -> u32 {
        match self {
            MatchFormat::Single => 1,
            MatchFormat::Bo3 => 2,
            MatchFormat::Bo5 => 3,
        }
    }
}

/// Validated rules configuration for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board side length (board holds `grid_size^2` cells).
    pub grid_size: usize,
    /// Contiguous cells of one slot needed to win a round.
    pub win_length: usize,
    /// Match format.
    pub format: MatchFormat,
}

impl GameConfig {
    /// Resolves optional caller inputs against the defaults (3x3, win-3,
    /// single) and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] if `grid_size` is zero or
    /// `win_length` is zero or exceeds `grid_size`.
    pub fn resolve(
        grid_size: Option<usize>,
        win_length: Option<usize>,
        format: Option<MatchFormat>,
    ) -> Result<Self, GameError> {
        let config = Self {
            grid_size: grid_size.unwrap_or(DEFAULT_GRID_SIZE),
            win_length: win_length.unwrap_or(DEFAULT_WIN_LENGTH),
            format: format.unwrap_or_default(),
        };
        config.validate()?;
        debug!(
            grid_size = config.grid_size,
            win_length = config.win_length,
            format = %config.format,
            "Resolved game config"
        );
        Ok(config)
    }

    /// Checks the grid/win-length invariants.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] describing the violated bound.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.grid_size == 0 {
            return Err(GameError::InvalidConfig(
                "grid size must be a positive integer".to_string(),
            ));
        }
        if self.win_length == 0 || self.win_length > self.grid_size {
            return Err(GameError::InvalidConfig(format!(
                "win length must be between 1 and {}",
                self.grid_size
            )));
        }
        Ok(())
    }

    /// Total number of cells on the board.
    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            win_length: DEFAULT_WIN_LENGTH,
            format: MatchFormat::Single,
        }
    }
}
