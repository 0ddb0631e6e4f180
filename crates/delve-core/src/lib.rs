//! Delve Core - procedural dungeon generation engine
//!
//! Generates a multi-room dungeon inside a bounded 3D volume:
//! - **Partition tree**: the volume is recursively split into a binary tree
//!   of cells under volume/aspect validity constraints.
//! - **Rooms**: one room is carved per leaf cell and published to a
//!   geometry-query service.
//! - **Bounds aggregation**: internal nodes hold the union AABB of all rooms
//!   beneath them.
//! - **Hallways**: a tick-driven, bottom-up pass joins sibling rooms with
//!   straight corridors, raycasting against already-published geometry to
//!   anchor each corridor on actual room/corridor surfaces. Published volumes
//!   only become visible to raycasts one tick later, so connection advances
//!   one tree level per tick.
//!
//! # Example
//!
//! ```rust,no_run
//! use delve_core::prelude::*;
//! use delve_logic::aabb::{Aabb, Vec3};
//!
//! let volume = Aabb::new(Vec3::ZERO, Vec3::new(80.0, 10.0, 80.0));
//! let mut engine = DungeonEngine::generate(volume, 42, DungeonConfig::default()).unwrap();
//!
//! // Drive generation from the host loop, one tick per scheduling step.
//! while engine.tick() == GenerationStatus::InProgress {}
//! ```

pub mod engine;
pub mod generation;
pub mod persistence;
pub mod query;
pub mod tree;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::engine::{DungeonEngine, GenerationStatus};
    pub use crate::generation::{DungeonConfig, GenerationError};
    pub use crate::query::{GeometryQuery, StagedVolumeIndex, VolumeTag};
    pub use crate::tree::{CellNode, NodeId, PartitionTree};
}
