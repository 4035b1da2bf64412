//! Axis-aligned box geometry.
//!
//! Coordinate convention: x spans `width`, y spans `height`, z spans `depth`.
//! Gravity acts along -z, so a volume's base is its footprint in the x-y
//! plane at its minimum z.

use nalgebra::{Point3, Vector3};
use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Dimensions of a box that has not been placed yet.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxSize {
    /// Extent along x.
    pub width: f64,
    /// Extent along y.
    pub height: f64,
    /// Extent along z.
    pub depth: f64,
}

impl BoxSize {
    /// Creates a new box size.
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Returns the same size with width and height swapped.
    ///
    /// This is the only rotation the packers consider; depth is never
    /// rotated out of the vertical axis.
    pub fn flipped(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
            depth: self.depth,
        }
    }

    /// Returns the volume.
    pub fn volume(&self) -> f64 {
        self.width * self.height * self.depth
    }

    /// Returns true if any extent is zero or negative.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0 || self.depth <= 0.0
    }

    /// Validates that all extents are positive.
    pub fn validate(&self) -> Result<()> {
        if self.is_degenerate() {
            return Err(Error::InvalidBoxSize(
                "all dimensions must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// An axis-aligned box volume anchored at its minimum corner.
///
/// Used both for placed boxes and for free volumes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cuboid {
    /// Minimum corner.
    pub position: Point3<f64>,
    /// Extents (width, height, depth).
    pub dimensions: Vector3<f64>,
}

impl Cuboid {
    /// Creates a new cuboid from its minimum corner and extents.
    pub fn new(x: f64, y: f64, z: f64, width: f64, height: f64, depth: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
            dimensions: Vector3::new(width, height, depth),
        }
    }

    /// Creates a cuboid at the given corner with the given size.
    pub fn from_size(position: Point3<f64>, size: BoxSize) -> Self {
        Self {
            position,
            dimensions: Vector3::new(size.width, size.height, size.depth),
        }
    }

    /// Returns the extent along x.
    pub fn width(&self) -> f64 {
        self.dimensions.x
    }

    /// Returns the extent along y.
    pub fn height(&self) -> f64 {
        self.dimensions.y
    }

    /// Returns the extent along z.
    pub fn depth(&self) -> f64 {
        self.dimensions.z
    }

    /// Returns the maximum x coordinate.
    pub fn max_x(&self) -> f64 {
        self.position.x + self.dimensions.x
    }

    /// Returns the maximum y coordinate.
    pub fn max_y(&self) -> f64 {
        self.position.y + self.dimensions.y
    }

    /// Returns the maximum z coordinate (the top surface).
    pub fn max_z(&self) -> f64 {
        self.position.z + self.dimensions.z
    }

    /// Returns the volume.
    pub fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// Returns the area of the x-y footprint.
    pub fn base_area(&self) -> f64 {
        self.dimensions.x * self.dimensions.y
    }

    /// Returns true if any extent is zero or negative.
    pub fn is_degenerate(&self) -> bool {
        self.dimensions.x <= 0.0 || self.dimensions.y <= 0.0 || self.dimensions.z <= 0.0
    }

    /// Separating-axis test: true if the volumes do not overlap.
    ///
    /// Touching faces do not count as overlap. Degenerate volumes are
    /// disjoint from everything.
    pub fn is_disjoint_from(&self, other: &Cuboid) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return true;
        }
        self.max_x() <= other.position.x
            || other.max_x() <= self.position.x
            || self.max_y() <= other.position.y
            || other.max_y() <= self.position.y
            || self.max_z() <= other.position.z
            || other.max_z() <= self.position.z
    }

    /// Returns true if this volume lies fully inside `other` on all axes.
    pub fn is_contained_in(&self, other: &Cuboid) -> bool {
        self.position.x >= other.position.x
            && self.position.y >= other.position.y
            && self.position.z >= other.position.z
            && self.max_x() <= other.max_x()
            && self.max_y() <= other.max_y()
            && self.max_z() <= other.max_z()
    }

    /// Free-volume redundancy test: true if this volume's x-y footprint is
    /// contained in `other`'s and its z-range starts and ends at or above
    /// `other`'s.
    ///
    /// A volume satisfying this is a higher, fully-covered sub-slice of
    /// `other` and carries no placement opportunity of its own.
    pub fn is_contained_above(&self, other: &Cuboid) -> bool {
        self.position.x >= other.position.x
            && self.position.y >= other.position.y
            && self.max_x() <= other.max_x()
            && self.max_y() <= other.max_y()
            && self.position.z >= other.position.z
            && self.max_z() >= other.max_z()
    }
}

/// Lexicographic `(y, z, x)` ordering: lowest, then nearest the back, then
/// leftmost. The max-rects search scans free volumes in this order.
pub fn deep_bottom_left_cmp(a: &Cuboid, b: &Cuboid) -> Ordering {
    let y_cmp = a
        .position
        .y
        .partial_cmp(&b.position.y)
        .unwrap_or(Ordering::Equal);
    if y_cmp != Ordering::Equal {
        return y_cmp;
    }

    let z_cmp = a
        .position
        .z
        .partial_cmp(&b.position.z)
        .unwrap_or(Ordering::Equal);
    if z_cmp != Ordering::Equal {
        return z_cmp;
    }

    a.position
        .x
        .partial_cmp(&b.position.x)
        .unwrap_or(Ordering::Equal)
}

/// Lexicographic `(z, y, x)` ordering: floor level first. The guillotine
/// selection scan visits free volumes in this order.
pub fn floor_first_cmp(a: &Cuboid, b: &Cuboid) -> Ordering {
    let z_cmp = a
        .position
        .z
        .partial_cmp(&b.position.z)
        .unwrap_or(Ordering::Equal);
    if z_cmp != Ordering::Equal {
        return z_cmp;
    }

    let y_cmp = a
        .position
        .y
        .partial_cmp(&b.position.y)
        .unwrap_or(Ordering::Equal);
    if y_cmp != Ordering::Equal {
        return y_cmp;
    }

    a.position
        .x
        .partial_cmp(&b.position.x)
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_box_size_volume_and_flip() {
        let size = BoxSize::new(510.0, 290.0, 210.0);
        assert_relative_eq!(size.volume(), 510.0 * 290.0 * 210.0, epsilon = 1e-9);

        let flipped = size.flipped();
        assert_relative_eq!(flipped.width, 290.0);
        assert_relative_eq!(flipped.height, 510.0);
        assert_relative_eq!(flipped.depth, 210.0);
    }

    #[test]
    fn test_box_size_validation() {
        assert!(BoxSize::new(10.0, 20.0, 30.0).validate().is_ok());
        assert!(BoxSize::new(0.0, 20.0, 30.0).validate().is_err());
        assert!(BoxSize::new(10.0, -20.0, 30.0).validate().is_err());
    }

    #[test]
    fn test_disjoint_basic() {
        let a = Cuboid::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        let b = Cuboid::new(5.0, 5.0, 5.0, 10.0, 10.0, 10.0);
        let c = Cuboid::new(20.0, 0.0, 0.0, 10.0, 10.0, 10.0);

        assert!(!a.is_disjoint_from(&b));
        assert!(a.is_disjoint_from(&c));
    }

    #[test]
    fn test_touching_faces_are_disjoint() {
        let a = Cuboid::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        let b = Cuboid::new(10.0, 0.0, 0.0, 10.0, 10.0, 10.0);
        let c = Cuboid::new(0.0, 0.0, 10.0, 10.0, 10.0, 10.0);

        assert!(a.is_disjoint_from(&b));
        assert!(a.is_disjoint_from(&c));
    }

    #[test]
    fn test_degenerate_is_disjoint_from_everything() {
        let flat = Cuboid::new(0.0, 0.0, 0.0, 10.0, 0.0, 10.0);
        let solid = Cuboid::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0);

        assert!(flat.is_disjoint_from(&solid));
        assert!(solid.is_disjoint_from(&flat));
    }

    #[test]
    fn test_containment() {
        let outer = Cuboid::new(0.0, 0.0, 0.0, 100.0, 100.0, 100.0);
        let inner = Cuboid::new(10.0, 10.0, 10.0, 50.0, 50.0, 50.0);
        let poking = Cuboid::new(60.0, 10.0, 10.0, 50.0, 50.0, 50.0);

        assert!(inner.is_contained_in(&outer));
        assert!(!poking.is_contained_in(&outer));
        assert!(!outer.is_contained_in(&inner));
    }

    #[test]
    fn test_contained_above() {
        let tall = Cuboid::new(0.0, 0.0, 0.0, 100.0, 100.0, 800.0);
        let upper_slice = Cuboid::new(10.0, 10.0, 210.0, 50.0, 50.0, 590.0);
        let lower_slice = Cuboid::new(10.0, 10.0, 0.0, 50.0, 50.0, 100.0);

        // Same footprint, higher z-range ending at the same top.
        assert!(upper_slice.is_contained_above(&tall));
        // Ends below the reference top, so it still covers space of its own.
        assert!(!lower_slice.is_contained_above(&tall));
        assert!(!tall.is_contained_above(&upper_slice));
    }

    #[test]
    fn test_deep_bottom_left_order() {
        let a = Cuboid::new(5.0, 0.0, 10.0, 1.0, 1.0, 1.0);
        let b = Cuboid::new(0.0, 0.0, 20.0, 1.0, 1.0, 1.0);
        let c = Cuboid::new(0.0, 10.0, 0.0, 1.0, 1.0, 1.0);

        let mut volumes = vec![c, b, a];
        volumes.sort_by(deep_bottom_left_cmp);

        // y dominates, then z, then x.
        assert_eq!(volumes[0], a);
        assert_eq!(volumes[1], b);
        assert_eq!(volumes[2], c);
    }

    #[test]
    fn test_floor_first_order() {
        let a = Cuboid::new(0.0, 50.0, 0.0, 1.0, 1.0, 1.0);
        let b = Cuboid::new(0.0, 0.0, 10.0, 1.0, 1.0, 1.0);
        let c = Cuboid::new(10.0, 50.0, 0.0, 1.0, 1.0, 1.0);

        let mut volumes = vec![b, c, a];
        volumes.sort_by(floor_first_cmp);

        // z dominates, then y, then x.
        assert_eq!(volumes[0], a);
        assert_eq!(volumes[1], c);
        assert_eq!(volumes[2], b);
    }
}
