//! Configuration types for the simulation.

use crate::types::Coord;
use serde::{Deserialize, Serialize};

/// Grid dimensions shared by both simulation variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Width of the grid in cells
    pub width: i32,
    /// Height of the grid in cells
    pub height: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
        }
    }
}

/// Game-of-life scenario configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifeConfig {
    /// Grid dimensions
    pub grid: GridConfig,
    /// Cells that start alive
    pub seeds: Vec<Coord>,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            // A horizontal blinker plus a glider in the top-left corner
            seeds: vec![
                Coord::new(4, 6),
                Coord::new(5, 6),
                Coord::new(6, 6),
                Coord::new(1, 0),
                Coord::new(2, 1),
                Coord::new(0, 2),
                Coord::new(1, 2),
                Coord::new(2, 2),
            ],
        }
    }
}

/// Predator-prey scenario configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcosystemConfig {
    /// Grid dimensions
    pub grid: GridConfig,
    /// Seed for the movement RNG; a fixed seed reproduces the run exactly
    pub rng_seed: u64,
    /// Cells that start with a predator
    pub predators: Vec<Coord>,
    /// Cells that start with a prey
    pub prey: Vec<Coord>,
}

impl Default for EcosystemConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            rng_seed: 0,
            predators: vec![Coord::new(0, 0), Coord::new(7, 3), Coord::new(4, 8)],
            prey: vec![Coord::new(0, 1), Coord::new(5, 5), Coord::new(9, 0)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let grid_config = GridConfig::default();
        assert_eq!(grid_config.width, 10);
        assert_eq!(grid_config.height, 10);

        let life_config = LifeConfig::default();
        assert_eq!(life_config.seeds.len(), 8);

        let eco_config = EcosystemConfig::default();
        assert_eq!(eco_config.rng_seed, 0);
        assert_eq!(eco_config.predators.len(), 3);
        assert_eq!(eco_config.prey.len(), 3);
    }

    #[test]
    fn test_ecosystem_config_serialization() {
        let config = EcosystemConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EcosystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.grid.width, deserialized.grid.width);
        assert_eq!(config.predators, deserialized.predators);
        assert_eq!(config.prey, deserialized.prey);
    }
}
