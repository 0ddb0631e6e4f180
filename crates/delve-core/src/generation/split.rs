//! Partition tree builder: recursive binary splitting of the root volume.

use super::{DungeonConfig, GenerationError};
use crate::tree::{NodeId, PartitionTree};
use delve_logic::aabb::{Aabb, Axis};
use rand::Rng;

/// Whether a cell may be split further (and may exist at all as a child).
/// Constrains volume and X/Z footprint ratio.
pub fn is_valid_cell(cell: &Aabb, config: &DungeonConfig) -> bool {
    let size = cell.size();
    let volume = size.x * size.y * size.z;
    if volume < config.min_cell_volume {
        return false;
    }
    let ratio = (size.x / size.z).abs();
    if ratio > config.max_cell_aspect || ratio < config.min_cell_aspect {
        return false;
    }
    true
}

/// Recursively partition `root_volume` into a binary tree of cells.
///
/// Each valid cell gets exactly one randomized split attempt: a uniformly
/// random horizontal axis and a split coordinate inside the margin. The split
/// is kept only if BOTH child cells are themselves valid; otherwise the cell
/// stays a leaf. Given the same seeded RNG and configuration the tree shape
/// is reproducible.
pub fn build_tree(
    root_volume: Aabb,
    config: &DungeonConfig,
    rng: &mut impl Rng,
) -> Result<PartitionTree, GenerationError> {
    let size = root_volume.size();
    if size.x <= 0.0 || size.y <= 0.0 || size.z <= 0.0 {
        return Err(GenerationError::DegenerateVolume { size });
    }

    let mut tree = PartitionTree::with_root(root_volume);
    let root = tree.root();
    split_recursive(&mut tree, root, config, rng);
    log::debug!(
        "partition tree built: {} nodes, {} leaves",
        tree.len(),
        tree.leaves().len()
    );
    Ok(tree)
}

fn split_recursive(
    tree: &mut PartitionTree,
    id: NodeId,
    config: &DungeonConfig,
    rng: &mut impl Rng,
) {
    let cell = tree.node(id).cell;
    if !is_valid_cell(&cell, config) {
        return;
    }

    let axis = if rng.gen_bool(0.5) { Axis::X } else { Axis::Z };
    let margin = config.min_split_fraction * cell.extent(axis);
    let split_pos = rng.gen_range(cell.min.get(axis) + margin..cell.max.get(axis) - margin);
    let (low_cell, high_cell) = cell.split_at(axis, split_pos);

    // Single attempt: both halves must be valid or the cell stays a leaf.
    if is_valid_cell(&low_cell, config) && is_valid_cell(&high_cell, config) {
        let (low, high) = tree.attach_children(id, axis, low_cell, high_cell);
        split_recursive(tree, low, config, rng);
        split_recursive(tree, high, config, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_logic::aabb::Vec3;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn volume(x: f32, y: f32, z: f32) -> Aabb {
        Aabb::new(Vec3::ZERO, Vec3::new(x, y, z))
    }

    #[test]
    fn test_half_split_of_40_by_40_is_valid() {
        // Splitting a 40x10x40 root down the middle yields two 20x10x40
        // cells: volume 8000 >= 800 and ratio 0.5 inside [0.2, 5].
        let config = DungeonConfig::default();
        assert!(is_valid_cell(&volume(40.0, 10.0, 40.0), &config));
        assert!(is_valid_cell(&volume(20.0, 10.0, 40.0), &config));
    }

    #[test]
    fn test_cell_below_volume_bound_is_invalid() {
        // 10 x 7 x 10 = 700 < 800
        let config = DungeonConfig::default();
        assert!(!is_valid_cell(&volume(10.0, 7.0, 10.0), &config));
    }

    #[test]
    fn test_extreme_aspect_ratio_is_invalid() {
        let config = DungeonConfig::default();
        assert!(!is_valid_cell(&volume(120.0, 10.0, 10.0), &config));
        assert!(!is_valid_cell(&volume(10.0, 10.0, 120.0), &config));
    }

    #[test]
    fn test_invalid_root_stays_single_leaf() {
        let config = DungeonConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let tree = build_tree(volume(10.0, 7.0, 10.0), &config, &mut rng).unwrap();
        assert_eq!(tree.len(), 1, "Invalid cells must not be split");
    }

    #[test]
    fn test_degenerate_root_rejected() {
        let config = DungeonConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = build_tree(volume(10.0, 0.0, 10.0), &config, &mut rng);
        assert!(matches!(
            result,
            Err(GenerationError::DegenerateVolume { .. })
        ));
    }

    #[test]
    fn test_large_root_always_splits() {
        // 80x10x80: every split coordinate inside the 25% margin leaves both
        // halves valid, so the root can never remain a leaf.
        let config = DungeonConfig::default();
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let tree = build_tree(volume(80.0, 10.0, 80.0), &config, &mut rng).unwrap();
            assert!(tree.len() >= 3, "seed {} produced no split", seed);
        }
    }

    #[test]
    fn test_split_points_respect_margin() {
        let config = DungeonConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let tree = build_tree(volume(120.0, 10.0, 120.0), &config, &mut rng).unwrap();
        for level in 0u32.. {
            let nodes = tree.nodes_at_level(level);
            if nodes.is_empty() {
                break;
            }
            for id in nodes {
                let node = tree.node(id);
                let Some((low, _)) = node.children else {
                    continue;
                };
                let axis = node.split_axis;
                let split_pos = tree.node(low).cell.max.get(axis);
                let margin = config.min_split_fraction * node.cell.extent(axis);
                assert!(split_pos >= node.cell.min.get(axis) + margin - 1e-4);
                assert!(split_pos <= node.cell.max.get(axis) - margin + 1e-4);
            }
        }
    }

    #[test]
    fn test_same_seed_same_tree_shape() {
        let config = DungeonConfig::default();
        let mut rng_a = ChaCha8Rng::seed_from_u64(99);
        let mut rng_b = ChaCha8Rng::seed_from_u64(99);
        let tree_a = build_tree(volume(100.0, 10.0, 100.0), &config, &mut rng_a).unwrap();
        let tree_b = build_tree(volume(100.0, 10.0, 100.0), &config, &mut rng_b).unwrap();
        assert_eq!(tree_a.len(), tree_b.len());
        for level in 0..8 {
            let a = tree_a.nodes_at_level(level);
            let b = tree_b.nodes_at_level(level);
            assert_eq!(a.len(), b.len());
            for (na, nb) in a.iter().zip(&b) {
                assert_eq!(tree_a.node(*na).cell, tree_b.node(*nb).cell);
            }
        }
    }
}
