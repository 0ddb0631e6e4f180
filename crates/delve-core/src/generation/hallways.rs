//! Hallway connector: tick-driven, bottom-up corridor synthesis.
//!
//! Connection cannot run to completion in one pass: a corridor published for
//! a pair of grandchildren only becomes visible to raycasts one tick later,
//! and the parent's corridor must be able to anchor on it. Each call to
//! [`advance_connection`] therefore performs a single bottom-up step, and a
//! node whose children changed this step waits for the next one.

use super::DungeonConfig;
use crate::query::{GeometryQuery, VolumeTag};
use crate::tree::{NodeId, PartitionTree};
use delve_logic::aabb::{overlap_interval, Aabb, Vec3};
use rand::Rng;

/// One connection step over the whole tree. Returns whether any node changed
/// state; a full pass with no changes means generation has settled.
pub fn advance_connection(
    tree: &mut PartitionTree,
    config: &DungeonConfig,
    rng: &mut impl Rng,
    geometry: &mut impl GeometryQuery,
) -> bool {
    let root = tree.root();
    advance_node(tree, root, config, rng, geometry)
}

fn advance_node(
    tree: &mut PartitionTree,
    id: NodeId,
    config: &DungeonConfig,
    rng: &mut impl Rng,
    geometry: &mut impl GeometryQuery,
) -> bool {
    let node = tree.node(id);
    if node.connected {
        return false;
    }
    let Some((low, high)) = node.children else {
        return false;
    };

    let mut changed = advance_node(tree, low, config, rng, geometry);
    changed |= advance_node(tree, high, config, rng, geometry);

    // A child that changed this step may have published a corridor that is
    // not query-able yet; this node has to wait for the next tick.
    if changed {
        return true;
    }

    // A child stalled on an empty overlap blocks this node for good.
    if !is_settled(tree, low) || !is_settled(tree, high) {
        return false;
    }

    if try_connect(tree, id, low, high, config, rng, geometry) {
        tree.node_mut(id).connected = true;
        return true;
    }
    false
}

fn is_settled(tree: &PartitionTree, id: NodeId) -> bool {
    let node = tree.node(id);
    node.is_leaf() || node.connected
}

/// Attempt to join the two child rooms with a straight corridor across this
/// node's split axis. Returns whether a corridor was created.
fn try_connect(
    tree: &PartitionTree,
    id: NodeId,
    low: NodeId,
    high: NodeId,
    config: &DungeonConfig,
    rng: &mut impl Rng,
    geometry: &mut impl GeometryQuery,
) -> bool {
    let split_axis = tree.node(id).split_axis;
    let overlap_axis = split_axis.perpendicular();
    let room_low = tree.node(low).room;
    let room_high = tree.node(high).room;
    let half_width = config.hallway_half_width;

    // Admissible corridor centers per child, each shrunk so the corridor
    // stays on that child's room. Both intervals come from their own room.
    let range_low = (
        room_low.min.get(overlap_axis) + half_width,
        room_low.max.get(overlap_axis) - half_width,
    );
    let range_high = (
        room_high.min.get(overlap_axis) + half_width,
        room_high.max.get(overlap_axis) - half_width,
    );
    let Some((lo, hi)) = overlap_interval(range_low, range_high) else {
        log::debug!(
            "no straight corridor fits between {:?} and {:?} on {:?}",
            low,
            high,
            overlap_axis
        );
        return false;
    };
    let center = rng.gen_range(lo..hi);

    // Probe between the two rooms: hallway width across the overlap axis, a
    // fixed band around the low room's vertical center, ends resting on the
    // facing room surfaces for now.
    let mut start = room_low.max;
    let mut end = room_high.min;
    start.set(overlap_axis, center - half_width);
    end.set(overlap_axis, center + half_width);
    start.y = room_low.center().y - half_width;
    end.y = room_low.center().y + half_width;

    // Raycast both ways along the split axis to anchor the corridor on the
    // actual published geometry (a room, or a corridor from an earlier tick).
    let origin = Vec3::midpoint(start, end);
    let direction = split_axis.unit();
    let hit_high = geometry.raycast(origin, direction);
    let hit_low = geometry.raycast(origin, direction.scaled(-1.0));
    if hit_low.is_none() || hit_high.is_none() {
        log::warn!(
            "corridor raycast missed at {:?} along {:?}; collapsing to zero length",
            origin,
            split_axis
        );
    }
    let anchor_low = hit_low
        .map(|h| h.point.get(split_axis))
        .unwrap_or_else(|| origin.get(split_axis));
    let anchor_high = hit_high
        .map(|h| h.point.get(split_axis))
        .unwrap_or_else(|| origin.get(split_axis));
    start.set(split_axis, anchor_low);
    end.set(split_axis, anchor_high);

    geometry.publish(Aabb::new(start, end), VolumeTag::Hallway);
    true
}
