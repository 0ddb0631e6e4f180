//! Dungeon engine - main entry point for driving generation
//!
//! `generate` runs the synchronous phases (partition, carve, aggregate) and
//! returns a handle; the host then calls `tick` once per scheduling step
//! until the connection phase settles. The engine never blocks and spawns no
//! threads; concurrent dungeons need independent engines.

use crate::generation::{bounds, hallways, rooms, split, DungeonConfig, GenerationError};
use crate::persistence::{self, SaveError};
use crate::query::{StagedVolumeIndex, VolumeTag};
use crate::tree::{NodeId, PartitionTree};
use delve_logic::aabb::Aabb;
use delve_logic::validation::LeafVolume;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Progress of the tick-driven connection phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationStatus {
    InProgress,
    Complete,
}

/// Which volumes to feed to a debug sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Cells,
    Rooms,
}

/// Diagnostic rendering sink. Colors and any other presentation state live
/// on the sink, keyed by node id, never on the tree.
pub trait DebugDraw {
    fn draw_volume(&mut self, node: NodeId, volume: &Aabb);
}

/// Handle for one dungeon being generated.
pub struct DungeonEngine {
    tree: PartitionTree,
    config: DungeonConfig,
    seed: u64,
    rng: ChaCha8Rng,
    geometry: StagedVolumeIndex,
    complete: bool,
    ticks: u64,
}

impl DungeonEngine {
    /// Build the partition tree, carve and publish rooms, and aggregate room
    /// bounds. Every internal node starts unconnected; drive connection with
    /// [`tick`](Self::tick).
    pub fn generate(
        root_volume: Aabb,
        seed: u64,
        config: DungeonConfig,
    ) -> Result<Self, GenerationError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut tree = split::build_tree(root_volume, &config, &mut rng)?;
        let mut geometry = StagedVolumeIndex::new();
        rooms::carve_rooms(&mut tree, &config, &mut rng, &mut geometry);
        bounds::aggregate_bounds(&mut tree);
        log::info!(
            "generated dungeon (seed {}): {} cells, {} rooms",
            seed,
            tree.len(),
            tree.leaves().len()
        );
        Ok(Self {
            tree,
            config,
            seed,
            rng,
            geometry,
            complete: false,
            ticks: 0,
        })
    }

    /// One connection step. Volumes published during the previous tick become
    /// visible to raycasts first, then a single bottom-up pass runs. Returns
    /// `Complete` once a pass produces no state change; further calls are
    /// no-ops.
    pub fn tick(&mut self) -> GenerationStatus {
        if self.complete {
            return GenerationStatus::Complete;
        }
        self.geometry.commit();
        let changed = hallways::advance_connection(
            &mut self.tree,
            &self.config,
            &mut self.rng,
            &mut self.geometry,
        );
        self.ticks += 1;
        if changed {
            GenerationStatus::InProgress
        } else {
            self.complete = true;
            if self.tree.is_fully_connected() {
                log::info!("dungeon fully connected after {} ticks", self.ticks);
            } else {
                log::warn!(
                    "generation settled after {} ticks with unconnected partitions",
                    self.ticks
                );
            }
            GenerationStatus::Complete
        }
    }

    /// Whether ticking has settled (not necessarily fully connected).
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Whether every internal node has been joined by a corridor. A settled
    /// but unconnected dungeon is the caller's cue to report an incomplete
    /// generation (or retry with another seed).
    pub fn is_fully_connected(&self) -> bool {
        self.tree.is_fully_connected()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    pub fn tree(&self) -> &PartitionTree {
        &self.tree
    }

    /// All leaf node ids, in tree order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.tree.leaves()
    }

    /// The carved room volumes, one per leaf.
    pub fn rooms(&self) -> Vec<Aabb> {
        self.tree
            .leaves()
            .into_iter()
            .map(|id| self.tree.node(id).room)
            .collect()
    }

    /// Leaf cells paired with their rooms, in the shape the validation
    /// checks in `delve-logic` consume.
    pub fn leaf_volumes(&self) -> Vec<LeafVolume> {
        self.tree
            .leaves()
            .into_iter()
            .map(|id| LeafVolume {
                id: id.index() as u32,
                cell: self.tree.node(id).cell,
                room: self.tree.node(id).room,
            })
            .collect()
    }

    /// Node ids at a tree depth (0 = root).
    pub fn nodes_at_level(&self, level: u32) -> Vec<NodeId> {
        self.tree.nodes_at_level(level)
    }

    /// Every corridor volume created so far.
    pub fn hallways(&self) -> Vec<Aabb> {
        self.geometry.volumes(VolumeTag::Hallway)
    }

    /// Feed cell or room volumes to a diagnostic sink.
    pub fn draw_volumes(&self, mode: DrawMode, sink: &mut dyn DebugDraw) {
        for id in self.tree.ids() {
            let node = self.tree.node(id);
            let volume = match mode {
                DrawMode::Cells => node.cell,
                DrawMode::Rooms => node.room,
            };
            if !volume.is_empty() {
                sink.draw_volume(id, &volume);
            }
        }
    }

    /// Save the full generation state (tree, published geometry, RNG) so a
    /// dungeon can be restored, even mid-generation, and resume
    /// deterministically.
    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), SaveError> {
        persistence::save_dungeon(
            writer,
            &self.tree,
            &self.geometry,
            &self.rng,
            &self.config,
            self.seed,
            self.ticks,
            self.complete,
        )
    }

    /// Restore an engine from a snapshot written by [`save`](Self::save).
    pub fn load<R: std::io::Read>(reader: R) -> Result<Self, SaveError> {
        let loaded = persistence::load_dungeon(reader)?;
        Ok(Self {
            tree: loaded.tree,
            config: loaded.config,
            seed: loaded.seed,
            rng: loaded.rng,
            geometry: loaded.geometry,
            complete: loaded.complete,
            ticks: loaded.ticks,
        })
    }
}
