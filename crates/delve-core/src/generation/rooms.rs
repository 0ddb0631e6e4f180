//! Room carver: one randomized room per leaf cell.

use super::DungeonConfig;
use crate::query::{GeometryQuery, VolumeTag};
use crate::tree::PartitionTree;
use delve_logic::aabb::{Aabb, Axis};
use rand::Rng;

/// Carve a room into every leaf cell, in leaf order, and publish each room to
/// the geometry index so later corridor raycasts can hit it.
pub fn carve_rooms(
    tree: &mut PartitionTree,
    config: &DungeonConfig,
    rng: &mut impl Rng,
    geometry: &mut impl GeometryQuery,
) {
    for leaf in tree.leaves() {
        let room = carve_room(&tree.node(leaf).cell, config, rng);
        tree.node_mut(leaf).room = room;
        geometry.publish(room, VolumeTag::Room);
    }
    log::debug!("carved {} rooms", tree.leaves().len());
}

/// Randomly place a room inside `cell`.
///
/// Size per horizontal axis is uniform between the minimum footprint and the
/// cell extent minus twice the border; the corner offset then places the room
/// with at least the border on each side. Vertical extent matches the cell.
/// Containment and the minimum footprint hold by construction.
fn carve_room(cell: &Aabb, config: &DungeonConfig, rng: &mut impl Rng) -> Aabb {
    let size = cell.size();
    let mut min = cell.min;
    let mut max = cell.max;
    for axis in [Axis::X, Axis::Z] {
        let extent = size.get(axis);
        let room_extent = sample_range(
            rng,
            (config.min_room_fraction * extent).min(extent - 2.0 * config.min_room_border),
            extent - 2.0 * config.min_room_border,
        );
        let corner = sample_range(
            rng,
            config.min_room_border,
            extent - room_extent - config.min_room_border,
        );
        min.set(axis, cell.min.get(axis) + corner);
        max.set(axis, cell.min.get(axis) + corner + room_extent);
    }
    Aabb::new(min, max)
}

/// Uniform sample in `[lo, hi)`, collapsing to `lo` when the range is
/// degenerate (possible under adversarial configurations).
fn sample_range(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        lo
    } else {
        rng.gen_range(lo..hi)
    }
}
