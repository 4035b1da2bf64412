//! Free volumes annotated with a support footprint.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::container::Container;
use u_stow_core::Cuboid;

/// The sub-rectangle of a free volume's base that rests on solid surface.
///
/// A free volume created above a placed box is only solid where that box's
/// top surface is; the rest of its base floats over open space. The support
/// footprint tracks the solid part so the placement search can require a
/// minimum support ratio before resting a box there.
///
/// Invariant: the rectangle is contained in the owning volume's x-y
/// footprint, with `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SupportFootprint {
    /// Start of the supported range along x.
    pub x0: f64,
    /// End of the supported range along x.
    pub x1: f64,
    /// Start of the supported range along y.
    pub y0: f64,
    /// End of the supported range along y.
    pub y1: f64,
}

impl SupportFootprint {
    /// Creates a support footprint from its x and y ranges.
    pub fn new(x0: f64, x1: f64, y0: f64, y1: f64) -> Self {
        Self { x0, x1, y0, y1 }
    }

    /// Returns the supported extent along x.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Returns the supported extent along y.
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Clips the rectangle to a volume's x-y footprint.
    ///
    /// A support rectangle that falls outside the footprint collapses to a
    /// zero-extent rectangle on the nearest edge, i.e. support only ever
    /// shrinks.
    pub fn clipped_to(&self, cuboid: &Cuboid) -> Self {
        let x0 = self.x0.max(cuboid.position.x).min(cuboid.max_x());
        let x1 = self.x1.min(cuboid.max_x()).max(x0);
        let y0 = self.y0.max(cuboid.position.y).min(cuboid.max_y());
        let y1 = self.y1.min(cuboid.max_y()).max(y0);
        Self { x0, x1, y0, y1 }
    }
}

/// A free volume together with its support footprint.
///
/// Free volumes in the max-rects packer may overlap each other; each one is
/// guaranteed to contain no placed box.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FreeVolume {
    /// The unoccupied volume.
    pub cuboid: Cuboid,
    /// The solid part of the volume's base.
    pub support: SupportFootprint,
}

impl FreeVolume {
    /// Creates a free volume with the given support footprint.
    pub fn new(cuboid: Cuboid, support: SupportFootprint) -> Self {
        Self { cuboid, support }
    }

    /// Creates the initial free volume spanning a whole container, fully
    /// supported by the floor.
    pub fn full_container(container: &Container) -> Self {
        Self {
            cuboid: Cuboid::new(
                0.0,
                0.0,
                0.0,
                container.width(),
                container.height(),
                container.depth(),
            ),
            support: SupportFootprint::new(0.0, container.width(), 0.0, container.height()),
        }
    }
}
