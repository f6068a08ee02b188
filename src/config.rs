//! Generation parameters

use crate::error::{MazeError, Result};

/// How a positive restriction draw changes an interior edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestrictionEffect {
    /// An edge the generator left open becomes walled.
    #[default]
    ClosePassage,
    /// An edge the generator left walled is opened, adding loops.
    RemoveWall,
}

/// Parameters of a maze build
#[derive(Debug, Clone, PartialEq)]
pub struct MazeConfig {
    /// Number of grid rows (world z axis)
    pub rows: usize,
    /// Number of grid columns (world x axis)
    pub cols: usize,
    /// Requested number of coins, the far corner included
    pub coins: usize,
    /// Seed of the random stream. `None` draws from entropy.
    pub seed: Option<u64>,
    /// World width of one cell
    pub cell_width: f32,
    /// World depth of one cell
    pub cell_height: f32,
    /// An interior edge is restricted with probability `1 / restriction_odds`.
    pub restriction_odds: u32,
    pub restriction_effect: RestrictionEffect,
}

impl MazeConfig {
    pub const DEFAULT_SEED: u64 = 70;
    pub const DEFAULT_RESTRICTION_ODDS: u32 = 16;

    pub fn new(rows: usize, cols: usize, coins: usize, seed: u64) -> Self {
        Self {
            rows,
            cols,
            coins,
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Reject parameters that cannot describe a maze
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(MazeError::InvalidArgument(format!(
                "maze dimensions must be positive, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.coins == 0 {
            return Err(MazeError::InvalidArgument(
                "coin count must be positive".to_string(),
            ));
        }
        if self.restriction_odds == 0 {
            return Err(MazeError::InvalidArgument(
                "restriction odds must be positive".to_string(),
            ));
        }
        // Negated comparison also rejects NaN.
        if !(self.cell_width > 0.0 && self.cell_height > 0.0) {
            return Err(MazeError::InvalidArgument(format!(
                "cell size must be positive, got {}x{}",
                self.cell_width, self.cell_height
            )));
        }
        Ok(())
    }
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 10,
            coins: 1,
            seed: Some(Self::DEFAULT_SEED),
            cell_width: 4.0,
            cell_height: 4.0,
            restriction_odds: Self::DEFAULT_RESTRICTION_ODDS,
            restriction_effect: RestrictionEffect::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MazeConfig;
    use crate::error::MazeError;

    #[test]
    fn default_config_is_valid() {
        assert!(MazeConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        for (rows, cols) in [(0, 3), (3, 0), (0, 0)] {
            let config = MazeConfig::new(rows, cols, 1, 0);
            assert!(matches!(
                config.validate(),
                Err(MazeError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn zero_coins_are_rejected() {
        let config = MazeConfig::new(3, 3, 0, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_cell_size_is_rejected() {
        let config = MazeConfig {
            cell_width: 0.0,
            ..MazeConfig::default()
        };
        assert!(config.validate().is_err());
        let config = MazeConfig {
            cell_height: f32::NAN,
            ..MazeConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
