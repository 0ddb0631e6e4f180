//! The partition tree: an arena of cell nodes with index-based children.
//!
//! Parent/child ownership is strict (no back-pointers, no sharing), so the
//! tree is a flat `Vec` of nodes addressed by `NodeId`. The tree is built
//! once by the splitter and then mutated in place by the room carver, the
//! bounds aggregator, and the hallway connector.

use delve_logic::aabb::{Aabb, Axis};
use serde::{Deserialize, Serialize};

/// Index of a node in the partition tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of the partition tree.
///
/// `room` is the carved room for a leaf, or the encapsulation of every room
/// beneath an internal node once bounds have been aggregated. Internal nodes
/// start out unconnected; leaves are trivially connected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CellNode {
    /// Volume owned by this node.
    pub cell: Aabb,
    /// Axis along which this cell was split. Meaningless for leaves.
    pub split_axis: Axis,
    /// Child pair, in (low side, high side) order along the split axis.
    pub children: Option<(NodeId, NodeId)>,
    /// Room volume (leaf) or aggregated room bounds (internal).
    pub room: Aabb,
    /// Whether a corridor has joined this node's children.
    pub connected: bool,
}

impl CellNode {
    fn new(cell: Aabb) -> Self {
        Self {
            cell,
            split_axis: Axis::X,
            children: None,
            room: Aabb::EMPTY,
            connected: false,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Arena of cell nodes plus the root identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionTree {
    nodes: Vec<CellNode>,
    root: NodeId,
}

impl PartitionTree {
    /// Create a tree holding only a root cell.
    pub fn with_root(cell: Aabb) -> Self {
        Self {
            nodes: vec![CellNode::new(cell)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &CellNode {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut CellNode {
        &mut self.nodes[id.index()]
    }

    /// Attach two freshly split child cells to `parent` and record the split
    /// axis. Returns the child ids in (low, high) order.
    pub fn attach_children(
        &mut self,
        parent: NodeId,
        axis: Axis,
        low_cell: Aabb,
        high_cell: Aabb,
    ) -> (NodeId, NodeId) {
        let low = NodeId(self.nodes.len() as u32);
        self.nodes.push(CellNode::new(low_cell));
        let high = NodeId(self.nodes.len() as u32);
        self.nodes.push(CellNode::new(high_cell));
        let node = self.node_mut(parent);
        node.split_axis = axis;
        node.children = Some((low, high));
        (low, high)
    }

    /// All leaf nodes, in left-to-right tree order.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_leaves(self.root, &mut out);
        out
    }

    fn collect_leaves(&self, id: NodeId, out: &mut Vec<NodeId>) {
        match self.node(id).children {
            None => out.push(id),
            Some((low, high)) => {
                self.collect_leaves(low, out);
                self.collect_leaves(high, out);
            }
        }
    }

    /// All nodes at a given depth (0 = root).
    pub fn nodes_at_level(&self, level: u32) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_at_level(self.root, level, &mut out);
        out
    }

    fn collect_at_level(&self, id: NodeId, level: u32, out: &mut Vec<NodeId>) {
        if level == 0 {
            out.push(id);
        } else if let Some((low, high)) = self.node(id).children {
            self.collect_at_level(low, level - 1, out);
            self.collect_at_level(high, level - 1, out);
        }
    }

    /// Every node id in arena order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Internal (two-child) node count.
    pub fn internal_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.is_leaf()).count()
    }

    /// True once every internal node has been joined by a corridor.
    pub fn is_fully_connected(&self) -> bool {
        self.nodes.iter().all(|n| n.is_leaf() || n.connected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_logic::aabb::Vec3;

    fn cell(max_x: f32, max_z: f32) -> Aabb {
        Aabb::new(Vec3::ZERO, Vec3::new(max_x, 10.0, max_z))
    }

    /// 1 root, 2 internal, 4 leaves.
    fn three_level_tree() -> PartitionTree {
        let mut tree = PartitionTree::with_root(cell(40.0, 40.0));
        let root = tree.root();
        let (cell_a, cell_b) = tree.node(root).cell.split_at(Axis::X, 20.0);
        let (a, b) = tree.attach_children(root, Axis::X, cell_a, cell_b);
        let (a_low, a_high) = tree.node(a).cell.split_at(Axis::Z, 20.0);
        tree.attach_children(a, Axis::Z, a_low, a_high);
        let (b_low, b_high) = tree.node(b).cell.split_at(Axis::Z, 20.0);
        tree.attach_children(b, Axis::Z, b_low, b_high);
        tree
    }

    #[test]
    fn test_root_only_tree_is_single_leaf() {
        let tree = PartitionTree::with_root(cell(10.0, 10.0));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.leaves(), vec![tree.root()]);
        assert!(tree.node(tree.root()).is_leaf());
        assert!(tree.is_fully_connected());
    }

    #[test]
    fn test_three_level_tree_shape() {
        let tree = three_level_tree();
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.leaves().len(), 4);
        assert_eq!(tree.internal_count(), 3);
        assert_eq!(tree.nodes_at_level(0), vec![tree.root()]);
        assert_eq!(tree.nodes_at_level(1).len(), 2);
        assert_eq!(tree.nodes_at_level(2).len(), 4);
        assert!(tree.nodes_at_level(3).is_empty());
    }

    #[test]
    fn test_children_partition_parent_cell() {
        let tree = three_level_tree();
        for id in tree.nodes_at_level(1) {
            let node = tree.node(id);
            assert!(tree.node(tree.root()).cell.contains(&node.cell));
            let (low, high) = node.children.unwrap();
            assert!(node.cell.contains(&tree.node(low).cell));
            assert!(node.cell.contains(&tree.node(high).cell));
        }
    }

    #[test]
    fn test_leaves_in_tree_order() {
        let tree = three_level_tree();
        let leaves = tree.leaves();
        // Low-side subtree leaves come before high-side subtree leaves.
        assert!(tree.node(leaves[0]).cell.max.x <= 20.0);
        assert!(tree.node(leaves[3]).cell.min.x >= 20.0);
    }
}
