//! Collision Detection
//!
//! Deterministic axis-aligned box tests for the player, the ground and
//! the obstacle columns.

use serde::{Serialize, Deserialize};

use crate::core::fixed::Fixed;
use crate::core::vec2::FixedVec2;

/// Axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: FixedVec2,
    /// Bottom-right corner
    pub max: FixedVec2,
}

impl Aabb {
    /// Box from two corners.
    #[inline]
    pub const fn new(min: FixedVec2, max: FixedVec2) -> Self {
        Self { min, max }
    }

    /// Box centred on `center` with the given half extents.
    #[inline]
    pub fn from_center(center: FixedVec2, half: FixedVec2) -> Self {
        Self {
            min: center.sub(half),
            max: center.add(half),
        }
    }

    /// Translate by `offset`.
    #[inline]
    pub fn offset(self, offset: FixedVec2) -> Self {
        Self {
            min: self.min.add(offset),
            max: self.max.add(offset),
        }
    }

    /// Strict overlap test. Boxes that only share an edge do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Width of the box.
    #[inline]
    pub fn width(&self) -> Fixed {
        self.max.x.wrapping_sub(self.min.x)
    }

    /// Height of the box.
    #[inline]
    pub fn height(&self) -> Fixed {
        self.max.y.wrapping_sub(self.min.y)
    }
}

/// Does a box reach down to (or through) a horizontal ground line?
#[inline]
pub fn touches_ground(aabb: &Aabb, ground_y: Fixed) -> bool {
    aabb.max.y >= ground_y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::from_int;

    fn square(x: i32, y: i32, half: i32) -> Aabb {
        Aabb::from_center(FixedVec2::from_ints(x, y), FixedVec2::from_ints(half, half))
    }

    #[test]
    fn test_overlap() {
        let a = square(0, 0, 10);
        assert!(a.overlaps(&square(15, 0, 10)));
        assert!(a.overlaps(&square(0, -15, 10)));
        assert!(!a.overlaps(&square(30, 0, 10)));
        assert!(!a.overlaps(&square(0, 25, 10)));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = square(0, 0, 10);
        assert!(!a.overlaps(&square(20, 0, 10)));
    }

    #[test]
    fn test_size_and_offset() {
        let a = square(0, 0, 10);
        assert_eq!(a.width(), from_int(20));
        assert_eq!(a.height(), from_int(20));
        let moved = a.offset(FixedVec2::from_ints(5, 5));
        assert_eq!(moved, square(5, 5, 10));
    }

    #[test]
    fn test_touches_ground() {
        let ground = from_int(536);
        assert!(!touches_ground(&square(200, 500, 20), ground));
        assert!(touches_ground(&square(200, 516, 20), ground));
        assert!(touches_ground(&square(200, 560, 20), ground));
    }
}
