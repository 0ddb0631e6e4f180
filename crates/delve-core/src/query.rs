//! Geometry-query service: publish volumes, raycast against them.
//!
//! The hallway connector anchors corridors by raycasting against the rooms
//! and corridors that already exist. The physics engines this mirrors cannot
//! hit freshly registered geometry in the same step it was created, so the
//! contract here makes that delay explicit: `publish` stages a volume, and it
//! only becomes visible to `raycast` after the next `commit` (one per tick).

use delve_logic::aabb::{Aabb, Vec3};
use serde::{Deserialize, Serialize};

/// What a published volume represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeTag {
    Room,
    Hallway,
}

/// Result of a raycast: nearest surface intersection along the ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
}

/// Boundary contract consumed by the hallway connector.
pub trait GeometryQuery {
    /// Register a volume so later raycasts can hit it. Takes effect with a
    /// one-tick propagation delay.
    fn publish(&mut self, volume: Aabb, tag: VolumeTag);

    /// Nearest surface intersection among published volumes along the ray,
    /// or `None`. Rays starting inside a volume do not hit it.
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<RayHit>;
}

/// In-memory geometry index with staged visibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StagedVolumeIndex {
    visible: Vec<(Aabb, VolumeTag)>,
    pending: Vec<(Aabb, VolumeTag)>,
}

impl StagedVolumeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every volume published since the last commit visible to raycasts.
    /// The engine calls this once at the start of each tick.
    pub fn commit(&mut self) {
        self.visible.append(&mut self.pending);
    }

    /// All volumes with the given tag, visible and pending alike.
    pub fn volumes(&self, tag: VolumeTag) -> Vec<Aabb> {
        self.visible
            .iter()
            .chain(self.pending.iter())
            .filter(|(_, t)| *t == tag)
            .map(|(v, _)| *v)
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl GeometryQuery for StagedVolumeIndex {
    fn publish(&mut self, volume: Aabb, tag: VolumeTag) {
        self.pending.push((volume, tag));
    }

    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        let mut nearest: Option<f32> = None;
        for (volume, _) in &self.visible {
            if let Some(t) = ray_entry_distance(origin, direction, volume) {
                if nearest.map_or(true, |n| t < n) {
                    nearest = Some(t);
                }
            }
        }
        nearest.map(|t| RayHit {
            point: origin + direction.scaled(t),
            distance: t,
        })
    }
}

/// Slab test: distance along the ray to the point where it enters `volume`,
/// or `None` if it misses or starts inside.
fn ray_entry_distance(origin: Vec3, direction: Vec3, volume: &Aabb) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let axes = [
        (origin.x, direction.x, volume.min.x, volume.max.x),
        (origin.y, direction.y, volume.min.y, volume.max.y),
        (origin.z, direction.z, volume.min.z, volume.max.z),
    ];
    for (o, d, lo, hi) in axes {
        if d.abs() < 1e-8 {
            if o < lo || o > hi {
                return None;
            }
        } else {
            let t1 = (lo - o) / d;
            let t2 = (hi - o) / d;
            let (t1, t2) = if t1 > t2 { (t2, t1) } else { (t1, t2) };
            t_near = t_near.max(t1);
            t_far = t_far.min(t2);
            if t_near > t_far {
                return None;
            }
        }
    }
    // Entry must lie ahead of the origin; origin-inside volumes are not hit.
    if t_near > 0.0 {
        Some(t_near)
    } else {
        None
    }
}
