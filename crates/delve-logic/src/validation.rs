//! Layout validation for generated dungeons.
//!
//! Pure functions that take exported leaf/room/hallway volumes and return
//! validation errors. No engine dependency — works with plain AABBs.

use crate::aabb::{Aabb, Axis};
use std::collections::{HashSet, VecDeque};

/// Tolerance for face-to-face adjacency and float comparisons.
const TOLERANCE: f32 = 1e-3;

/// A leaf partition together with its carved room.
#[derive(Debug, Clone)]
pub struct LeafVolume {
    pub id: u32,
    pub cell: Aabb,
    pub room: Aabb,
}

/// A layout validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Error severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

// ── A. Per-leaf geometry ────────────────────────────────────────────────

/// Check that every carved room sits fully inside its leaf cell.
pub fn check_room_containment(leaves: &[LeafVolume]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for leaf in leaves {
        if leaf.room.is_empty() {
            errors.push(ValidationError {
                category: "room_geometry",
                severity: Severity::Error,
                message: format!("Leaf #{} has no carved room", leaf.id),
            });
            continue;
        }
        if !leaf.cell.contains(&leaf.room) {
            errors.push(ValidationError {
                category: "room_geometry",
                severity: Severity::Error,
                message: format!(
                    "Leaf #{} room ({:?}→{:?}) escapes its cell ({:?}→{:?})",
                    leaf.id, leaf.room.min, leaf.room.max, leaf.cell.min, leaf.cell.max
                ),
            });
        }
    }
    errors
}

/// Check the minimum-footprint invariant: on each horizontal axis the room
/// must cover at least `min_room_fraction` of the cell extent.
pub fn check_room_footprint(
    leaves: &[LeafVolume],
    min_room_fraction: f32,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for leaf in leaves {
        if leaf.room.is_empty() {
            continue; // caught by containment check
        }
        for axis in [Axis::X, Axis::Z] {
            let required = min_room_fraction * leaf.cell.extent(axis);
            let actual = leaf.room.extent(axis);
            if actual + TOLERANCE < required {
                errors.push(ValidationError {
                    category: "room_geometry",
                    severity: Severity::Error,
                    message: format!(
                        "Leaf #{} room covers {:.2} of {:.2} required on {:?}",
                        leaf.id, actual, required, axis
                    ),
                });
            }
        }
    }
    errors
}

// ── B. Hallways ─────────────────────────────────────────────────────────

/// Check that hallway volumes are well formed. Zero extent along a horizontal
/// axis is legal (a raycast miss collapses that side of the corridor) but
/// worth a warning; negative extents are errors.
pub fn check_hallway_volumes(hallways: &[Aabb]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (idx, hall) in hallways.iter().enumerate() {
        let size = hall.size();
        if size.x < 0.0 || size.y < 0.0 || size.z < 0.0 {
            errors.push(ValidationError {
                category: "hallway_geometry",
                severity: Severity::Error,
                message: format!(
                    "Hallway #{} has negative dimensions: {:.2}×{:.2}×{:.2}",
                    idx, size.x, size.y, size.z
                ),
            });
        } else if size.x < TOLERANCE || size.z < TOLERANCE {
            errors.push(ValidationError {
                category: "hallway_geometry",
                severity: Severity::Warning,
                message: format!("Hallway #{} has collapsed to zero length", idx),
            });
        }
    }
    errors
}

// ── C. Connectivity (graph-level) ───────────────────────────────────────

/// Check that every room is reachable from the first via touching rooms and
/// hallways (BFS over the contact graph).
pub fn check_connectivity(rooms: &[Aabb], hallways: &[Aabb]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if rooms.is_empty() {
        return errors;
    }

    // Nodes 0..rooms.len() are rooms, the rest are hallways.
    let volumes: Vec<&Aabb> = rooms.iter().chain(hallways.iter()).collect();
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); volumes.len()];
    for i in 0..volumes.len() {
        for j in (i + 1)..volumes.len() {
            if volumes[i].touches(volumes[j], TOLERANCE) {
                adj[i].push(j);
                adj[j].push(i);
            }
        }
    }

    // BFS from the first room
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(0);
    queue.push_back(0);
    while let Some(current) = queue.pop_front() {
        for &next in &adj[current] {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    let unreached: Vec<usize> = (0..rooms.len()).filter(|i| !visited.contains(i)).collect();
    if !unreached.is_empty() {
        errors.push(ValidationError {
            category: "connectivity",
            severity: Severity::Error,
            message: format!(
                "{} of {} rooms unreachable (e.g. room #{})",
                unreached.len(),
                rooms.len(),
                unreached[0]
            ),
        });
    }
    errors
}

// ── Master validation ───────────────────────────────────────────────────

/// Run all layout validations and return combined results.
pub fn validate_layout(
    leaves: &[LeafVolume],
    hallways: &[Aabb],
    min_room_fraction: f32,
) -> Vec<ValidationError> {
    let mut all = Vec::new();
    all.extend(check_room_containment(leaves));
    all.extend(check_room_footprint(leaves, min_room_fraction));
    all.extend(check_hallway_volumes(hallways));
    let rooms: Vec<Aabb> = leaves.iter().map(|l| l.room).collect();
    all.extend(check_connectivity(&rooms, hallways));
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aabb::Vec3;

    fn make_leaf(id: u32, cell_max: (f32, f32, f32), room: ((f32, f32, f32), (f32, f32, f32))) -> LeafVolume {
        LeafVolume {
            id,
            cell: Aabb::new(Vec3::ZERO, Vec3::new(cell_max.0, cell_max.1, cell_max.2)),
            room: Aabb::new(
                Vec3::new(room.0 .0, room.0 .1, room.0 .2),
                Vec3::new(room.1 .0, room.1 .1, room.1 .2),
            ),
        }
    }

    #[test]
    fn test_contained_room_passes() {
        let leaves = vec![make_leaf(
            1,
            (20.0, 10.0, 20.0),
            ((2.0, 0.0, 2.0), (16.0, 10.0, 16.0)),
        )];
        assert!(check_room_containment(&leaves).is_empty());
    }

    #[test]
    fn test_escaping_room_flagged() {
        let leaves = vec![make_leaf(
            1,
            (20.0, 10.0, 20.0),
            ((2.0, 0.0, 2.0), (25.0, 10.0, 16.0)),
        )];
        let errs = check_room_containment(&leaves);
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("escapes"));
    }

    #[test]
    fn test_footprint_below_fraction_flagged() {
        // Room covers only 4 of 20 on X; fraction 0.5 requires 10.
        let leaves = vec![make_leaf(
            7,
            (20.0, 10.0, 20.0),
            ((2.0, 0.0, 2.0), (6.0, 10.0, 16.0)),
        )];
        let errs = check_room_footprint(&leaves, 0.5);
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("#7"));
    }

    #[test]
    fn test_footprint_at_fraction_passes() {
        let leaves = vec![make_leaf(
            1,
            (20.0, 10.0, 20.0),
            ((2.0, 0.0, 2.0), (12.0, 10.0, 12.0)),
        )];
        assert!(check_room_footprint(&leaves, 0.5).is_empty());
    }

    #[test]
    fn test_zero_length_hallway_is_warning() {
        let halls = vec![Aabb::new(
            Vec3::new(5.0, 1.0, 2.0),
            Vec3::new(5.0, 2.0, 3.0),
        )];
        let errs = check_hallway_volumes(&halls);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].severity, Severity::Warning);
    }

    #[test]
    fn test_negative_hallway_is_error() {
        let halls = vec![Aabb::new(
            Vec3::new(5.0, 1.0, 2.0),
            Vec3::new(4.0, 2.0, 3.0),
        )];
        let errs = check_hallway_volumes(&halls);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].severity, Severity::Error);
    }

    #[test]
    fn test_connected_via_hallway() {
        let rooms = vec![
            Aabb::new(Vec3::ZERO, Vec3::new(10.0, 5.0, 10.0)),
            Aabb::new(Vec3::new(20.0, 0.0, 0.0), Vec3::new(30.0, 5.0, 10.0)),
        ];
        let halls = vec![Aabb::new(
            Vec3::new(10.0, 1.0, 4.0),
            Vec3::new(20.0, 2.0, 5.0),
        )];
        assert!(check_connectivity(&rooms, &halls).is_empty());
    }

    #[test]
    fn test_island_room_flagged() {
        let rooms = vec![
            Aabb::new(Vec3::ZERO, Vec3::new(10.0, 5.0, 10.0)),
            Aabb::new(Vec3::new(50.0, 0.0, 0.0), Vec3::new(60.0, 5.0, 10.0)),
        ];
        let errs = check_connectivity(&rooms, &[]);
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("unreachable"));
    }

    #[test]
    fn test_validate_layout_clean() {
        let leaves = vec![
            make_leaf(0, (20.0, 10.0, 20.0), ((2.0, 0.0, 2.0), (16.0, 10.0, 16.0))),
            LeafVolume {
                id: 1,
                cell: Aabb::new(Vec3::new(20.0, 0.0, 0.0), Vec3::new(40.0, 10.0, 20.0)),
                room: Aabb::new(Vec3::new(22.0, 0.0, 2.0), Vec3::new(36.0, 10.0, 16.0)),
            },
        ];
        let halls = vec![Aabb::new(
            Vec3::new(16.0, 4.0, 8.0),
            Vec3::new(22.0, 5.0, 9.0),
        )];
        let errs = validate_layout(&leaves, &halls, 0.5);
        assert!(errs.is_empty(), "Expected no errors, got: {:?}", errs);
    }
}
