//! Save/Load functionality for persisting dungeon state
//!
//! Uses bincode for efficient binary serialization. The snapshot carries the
//! RNG stream alongside the tree and published geometry, so a dungeon loaded
//! mid-generation resumes exactly where it left off.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::generation::DungeonConfig;
use crate::query::StagedVolumeIndex;
use crate::tree::PartitionTree;

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of a dungeon
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    /// Seed the dungeon was generated from
    pub seed: u64,
    /// Connection ticks run so far
    pub ticks: u64,
    /// Whether the connection phase has settled
    pub complete: bool,
    /// Generation parameters
    pub config: DungeonConfig,
    /// Partition tree with rooms and connection state
    pub tree: PartitionTree,
    /// Published room and hallway volumes (visible and pending)
    pub geometry: StagedVolumeIndex,
    /// RNG state, mid-stream
    pub rng: ChaCha8Rng,
}

/// Save a complete dungeon to a writer
#[allow(clippy::too_many_arguments)]
pub fn save_dungeon<W: Write>(
    writer: W,
    tree: &PartitionTree,
    geometry: &StagedVolumeIndex,
    rng: &ChaCha8Rng,
    config: &DungeonConfig,
    seed: u64,
    ticks: u64,
    complete: bool,
) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        seed,
        ticks,
        complete,
        config: config.clone(),
        tree: tree.clone(),
        geometry: geometry.clone(),
        rng: rng.clone(),
    };

    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Load a dungeon from a reader
pub fn load_dungeon<R: Read>(reader: R) -> Result<LoadedDungeon, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    Ok(LoadedDungeon {
        seed: save_data.seed,
        ticks: save_data.ticks,
        complete: save_data.complete,
        config: save_data.config,
        tree: save_data.tree,
        geometry: save_data.geometry,
        rng: save_data.rng,
    })
}

/// Result of loading a dungeon
pub struct LoadedDungeon {
    pub seed: u64,
    pub ticks: u64,
    pub complete: bool,
    pub config: DungeonConfig,
    pub tree: PartitionTree,
    pub geometry: StagedVolumeIndex,
    pub rng: ChaCha8Rng,
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for SaveError {}
