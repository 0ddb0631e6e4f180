//! Axis-aligned bounding box math for dungeon volumes.
//!
//! Hand-rolled on purpose: the generator needs a handful of AABB operations
//! and per-axis indexing, not a full linear algebra crate. Y is up; cells are
//! only ever split on the two horizontal axes.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A point or extent in dungeon space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Component on a horizontal axis.
    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Z => self.z,
        }
    }

    /// Overwrite the component on a horizontal axis.
    pub fn set(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::X => self.x = value,
            Axis::Z => self.z = value,
        }
    }

    pub fn scaled(&self, factor: f32) -> Vec3 {
        Vec3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn midpoint(a: Vec3, b: Vec3) -> Vec3 {
        (a + b).scaled(0.5)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// One of the two horizontal axes. The vertical axis is never split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Z,
}

impl Axis {
    /// The horizontal axis perpendicular to this one.
    pub fn perpendicular(self) -> Axis {
        match self {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
        }
    }

    /// Unit vector along this axis.
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::new(1.0, 0.0, 0.0),
            Axis::Z => Vec3::new(0.0, 0.0, 1.0),
        }
    }
}

/// An axis-aligned box, stored as min/max corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Sentinel that encapsulates nothing; growing it with `encapsulate`
    /// starts from the first real volume.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3 {
            x: f32::INFINITY,
            y: f32::INFINITY,
            z: f32::INFINITY,
        },
        max: Vec3 {
            x: f32::NEG_INFINITY,
            y: f32::NEG_INFINITY,
            z: f32::NEG_INFINITY,
        },
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        Vec3::midpoint(self.min, self.max)
    }

    /// Extent along a horizontal axis.
    pub fn extent(&self, axis: Axis) -> f32 {
        self.max.get(axis) - self.min.get(axis)
    }

    pub fn volume(&self) -> f32 {
        let size = self.size();
        size.x * size.y * size.z
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Full containment of `other` inside `self`.
    pub fn contains(&self, other: &Aabb) -> bool {
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && self.min.z <= other.min.z
            && self.max.x >= other.max.x
            && self.max.y >= other.max.y
            && self.max.z >= other.max.z
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Grow to cover `other` as well. Empty inputs are ignored.
    pub fn encapsulate(&mut self, other: &Aabb) {
        if other.is_empty() {
            return;
        }
        self.min.x = self.min.x.min(other.min.x);
        self.min.y = self.min.y.min(other.min.y);
        self.min.z = self.min.z.min(other.min.z);
        self.max.x = self.max.x.max(other.max.x);
        self.max.y = self.max.y.max(other.max.y);
        self.max.z = self.max.z.max(other.max.z);
    }

    /// Divide at `coordinate` along a horizontal axis into (low side, high side).
    pub fn split_at(&self, axis: Axis, coordinate: f32) -> (Aabb, Aabb) {
        let mut low_max = self.max;
        low_max.set(axis, coordinate);
        let mut high_min = self.min;
        high_min.set(axis, coordinate);
        (Aabb::new(self.min, low_max), Aabb::new(high_min, self.max))
    }

    /// Closed-interval overlap test on all three axes, with a tolerance so
    /// face-to-face volumes (a corridor anchored on a room wall) count as
    /// touching.
    pub fn touches(&self, other: &Aabb, tolerance: f32) -> bool {
        self.min.x <= other.max.x + tolerance
            && other.min.x <= self.max.x + tolerance
            && self.min.y <= other.max.y + tolerance
            && other.min.y <= self.max.y + tolerance
            && self.min.z <= other.max.z + tolerance
            && other.min.z <= self.max.z + tolerance
    }
}

/// Intersection of two 1-D intervals. `None` unless the intersection has
/// strictly positive length.
pub fn overlap_interval(a: (f32, f32), b: (f32, f32)) -> Option<(f32, f32)> {
    let lo = a.0.max(b.0);
    let hi = a.1.min(b.1);
    if lo < hi {
        Some((lo, hi))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aabb(min: (f32, f32, f32), max: (f32, f32, f32)) -> Aabb {
        Aabb::new(
            Vec3::new(min.0, min.1, min.2),
            Vec3::new(max.0, max.1, max.2),
        )
    }

    #[test]
    fn test_empty_sentinel() {
        assert!(Aabb::EMPTY.is_empty());
        assert!(!aabb((0.0, 0.0, 0.0), (1.0, 1.0, 1.0)).is_empty());
    }

    #[test]
    fn test_encapsulate_from_empty_adopts_first_volume() {
        let mut bounds = Aabb::EMPTY;
        let room = aabb((1.0, 0.0, 2.0), (4.0, 3.0, 6.0));
        bounds.encapsulate(&room);
        assert_eq!(bounds, room, "First encapsulation should adopt the volume");
    }

    #[test]
    fn test_encapsulate_covers_both_exactly() {
        let mut bounds = aabb((0.0, 0.0, 0.0), (2.0, 2.0, 2.0));
        bounds.encapsulate(&aabb((1.0, -1.0, 1.0), (5.0, 1.0, 3.0)));
        assert_eq!(bounds, aabb((0.0, -1.0, 0.0), (5.0, 2.0, 3.0)));
    }

    #[test]
    fn test_encapsulate_ignores_empty() {
        let original = aabb((0.0, 0.0, 0.0), (2.0, 2.0, 2.0));
        let mut bounds = original;
        bounds.encapsulate(&Aabb::EMPTY);
        assert_eq!(bounds, original);
    }

    #[test]
    fn test_split_partitions_cell() {
        let cell = aabb((0.0, 0.0, 0.0), (40.0, 10.0, 40.0));
        let (low, high) = cell.split_at(Axis::X, 25.0);
        assert_eq!(low.max.x, 25.0);
        assert_eq!(high.min.x, 25.0);
        assert_eq!(low.min, cell.min);
        assert_eq!(high.max, cell.max);
        // Z and Y untouched
        assert_eq!(low.extent(Axis::Z), 40.0);
        assert_eq!(high.extent(Axis::Z), 40.0);
    }

    #[test]
    fn test_containment() {
        let cell = aabb((0.0, 0.0, 0.0), (10.0, 5.0, 10.0));
        assert!(cell.contains(&aabb((1.0, 0.0, 1.0), (9.0, 5.0, 9.0))));
        assert!(!cell.contains(&aabb((1.0, 0.0, 1.0), (11.0, 5.0, 9.0))));
    }

    #[test]
    fn test_overlap_interval_positive() {
        // Shrunk sibling footprints [3,7] must yield a usable interval.
        assert_eq!(overlap_interval((3.0, 9.0), (1.0, 7.0)), Some((3.0, 7.0)));
    }

    #[test]
    fn test_overlap_interval_inverted_is_none() {
        // A [5,4] "interval" after shrinking means no straight corridor fits.
        assert_eq!(overlap_interval((5.0, 10.0), (0.0, 4.0)), None);
    }

    #[test]
    fn test_overlap_interval_touching_is_none() {
        assert_eq!(overlap_interval((0.0, 5.0), (5.0, 10.0)), None);
    }

    #[test]
    fn test_touching_volumes() {
        let room = aabb((0.0, 0.0, 0.0), (10.0, 5.0, 10.0));
        let corridor = aabb((10.0, 1.0, 4.0), (14.0, 2.0, 5.0));
        let far = aabb((20.0, 0.0, 0.0), (25.0, 5.0, 5.0));
        assert!(room.touches(&corridor, 1e-3));
        assert!(!room.touches(&far, 1e-3));
    }
}
