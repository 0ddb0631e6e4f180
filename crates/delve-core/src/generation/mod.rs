//! Dungeon generation pipeline:
//!   1. split     -- recursively partition the root volume into a cell tree
//!   2. rooms     -- carve one room per leaf, publish to the geometry index
//!   3. bounds    -- aggregate room bounds bottom-up
//!   4. hallways  -- tick-driven corridor connection against published geometry

pub mod bounds;
pub mod hallways;
pub mod rooms;
pub mod split;

use delve_logic::aabb::Vec3;
use serde::{Deserialize, Serialize};

/// Configuration for dungeon generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DungeonConfig {
    /// Cells below this volume are never split further.
    pub min_cell_volume: f32,
    /// Lower bound on the X/Z footprint ratio of a valid cell.
    pub min_cell_aspect: f32,
    /// Upper bound on the X/Z footprint ratio of a valid cell.
    pub max_cell_aspect: f32,
    /// Split coordinates stay this fraction of the cell extent away from both
    /// cell edges along the split axis.
    pub min_split_fraction: f32,
    /// A carved room covers at least this fraction of its cell on each
    /// horizontal axis.
    pub min_room_fraction: f32,
    /// Clearance kept between a room and its cell walls.
    pub min_room_border: f32,
    /// Half-width of corridors on the overlap axis (and half their height).
    pub hallway_half_width: f32,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            min_cell_volume: 800.0,
            min_cell_aspect: 0.2,
            max_cell_aspect: 5.0,
            min_split_fraction: 0.25,
            min_room_fraction: 0.5,
            min_room_border: 1.5,
            hallway_half_width: 0.5,
        }
    }
}

impl DungeonConfig {
    /// Reject configurations that would break the generator's invariants.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.min_cell_volume <= 0.0 {
            return Err(GenerationError::InvalidConfiguration {
                reason: "min_cell_volume must be positive",
            });
        }
        if self.min_cell_aspect <= 0.0 || self.min_cell_aspect > self.max_cell_aspect {
            return Err(GenerationError::InvalidConfiguration {
                reason: "cell aspect bounds must satisfy 0 < min <= max",
            });
        }
        if self.min_split_fraction <= 0.0 || self.min_split_fraction >= 0.5 {
            return Err(GenerationError::InvalidConfiguration {
                reason: "min_split_fraction must lie strictly between 0 and 0.5",
            });
        }
        if self.min_room_fraction <= 0.0 || self.min_room_fraction > 1.0 {
            return Err(GenerationError::InvalidConfiguration {
                reason: "min_room_fraction must lie in (0, 1]",
            });
        }
        if self.min_room_border < 0.0 {
            return Err(GenerationError::InvalidConfiguration {
                reason: "min_room_border must not be negative",
            });
        }
        if self.hallway_half_width <= 0.0 {
            return Err(GenerationError::InvalidConfiguration {
                reason: "hallway_half_width must be positive",
            });
        }
        Ok(())
    }
}

/// Errors that can occur before any tree work begins.
#[derive(Debug)]
pub enum GenerationError {
    /// Root volume has a zero or negative extent on some axis.
    DegenerateVolume { size: Vec3 },
    /// A configuration value is out of its legal range.
    InvalidConfiguration { reason: &'static str },
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::DegenerateVolume { size } => {
                write!(
                    f,
                    "Degenerate root volume: {}x{}x{}",
                    size.x, size.y, size.z
                )
            }
            GenerationError::InvalidConfiguration { reason } => {
                write!(f, "Invalid configuration: {}", reason)
            }
        }
    }
}

impl std::error::Error for GenerationError {}
