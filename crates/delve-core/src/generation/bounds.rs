//! Bounds aggregator: propagate room volumes up the partition tree.

use crate::tree::{NodeId, PartitionTree};
use delve_logic::aabb::Aabb;

/// Single post-order pass setting every internal node's room bounds to the
/// encapsulation of its children's. Leaves keep their carved room exactly;
/// afterwards the root bounds cover every room in the dungeon.
pub fn aggregate_bounds(tree: &mut PartitionTree) {
    aggregate_node(tree, tree.root());
}

fn aggregate_node(tree: &mut PartitionTree, id: NodeId) {
    let Some((low, high)) = tree.node(id).children else {
        return;
    };
    aggregate_node(tree, low);
    aggregate_node(tree, high);

    let mut bounds = Aabb::EMPTY;
    bounds.encapsulate(&tree.node(low).room);
    bounds.encapsulate(&tree.node(high).room);
    tree.node_mut(id).room = bounds;
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_logic::aabb::{Axis, Vec3};

    fn aabb(min: (f32, f32, f32), max: (f32, f32, f32)) -> Aabb {
        Aabb::new(
            Vec3::new(min.0, min.1, min.2),
            Vec3::new(max.0, max.1, max.2),
        )
    }

    #[test]
    fn test_internal_bounds_encapsulate_children_exactly() {
        let mut tree = PartitionTree::with_root(aabb((0.0, 0.0, 0.0), (40.0, 10.0, 40.0)));
        let root = tree.root();
        let (low_cell, high_cell) = tree.node(root).cell.split_at(Axis::X, 20.0);
        let (low, high) = tree.attach_children(root, Axis::X, low_cell, high_cell);
        tree.node_mut(low).room = aabb((2.0, 0.0, 3.0), (18.0, 10.0, 30.0));
        tree.node_mut(high).room = aabb((25.0, 0.0, 8.0), (38.0, 10.0, 36.0));

        aggregate_bounds(&mut tree);

        let expected = aabb((2.0, 0.0, 3.0), (38.0, 10.0, 36.0));
        assert_eq!(
            tree.node(root).room,
            expected,
            "Root bounds must be the exact union AABB, no looser, no tighter"
        );
    }

    #[test]
    fn test_leaves_left_untouched() {
        let mut tree = PartitionTree::with_root(aabb((0.0, 0.0, 0.0), (40.0, 10.0, 40.0)));
        let root = tree.root();
        let room = aabb((5.0, 0.0, 5.0), (30.0, 10.0, 30.0));
        tree.node_mut(root).room = room;
        aggregate_bounds(&mut tree);
        assert_eq!(tree.node(root).room, room);
    }

    #[test]
    fn test_three_levels_propagate_to_root() {
        let mut tree = PartitionTree::with_root(aabb((0.0, 0.0, 0.0), (40.0, 10.0, 40.0)));
        let root = tree.root();
        let (cell_a, cell_b) = tree.node(root).cell.split_at(Axis::X, 20.0);
        let (a, b) = tree.attach_children(root, Axis::X, cell_a, cell_b);
        let (a_low_cell, a_high_cell) = tree.node(a).cell.split_at(Axis::Z, 20.0);
        let (a_low, a_high) = tree.attach_children(a, Axis::Z, a_low_cell, a_high_cell);
        tree.node_mut(a_low).room = aabb((1.0, 0.0, 2.0), (15.0, 10.0, 18.0));
        tree.node_mut(a_high).room = aabb((3.0, 0.0, 22.0), (17.0, 10.0, 39.0));
        tree.node_mut(b).room = aabb((24.0, 0.0, 10.0), (36.0, 10.0, 28.0));

        aggregate_bounds(&mut tree);

        assert_eq!(
            tree.node(a).room,
            aabb((1.0, 0.0, 2.0), (17.0, 10.0, 39.0))
        );
        assert_eq!(
            tree.node(root).room,
            aabb((1.0, 0.0, 2.0), (36.0, 10.0, 39.0))
        );
    }
}
