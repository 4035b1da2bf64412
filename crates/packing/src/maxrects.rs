//! Max-rects free-space packer with support-aware placement.
//!
//! Unlike the guillotine packer, the free space here is an *overlapping*
//! cover of everything unoccupied: placing a box re-splits every free
//! volume it intersects, and redundant volumes are pruned afterwards. Each
//! free volume carries a [`SupportFootprint`] describing the solid part of
//! its base, and a box may only rest on a volume when enough of its
//! footprint is solid in both axes. A line-of-sight test against the boxes
//! already placed rejects positions that something physically hangs over.
//!
//! # References
//!
//! - Jylänki, J. (2010). A thousand ways to pack the bin - a practical
//!   approach to two-dimensional rectangle bin packing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::container::Container;
use crate::free_volume::{FreeVolume, SupportFootprint};
use u_stow_core::{deep_bottom_left_cmp, BoxSize, Cuboid, DisjointCuboidSet, Result};

/// Default minimum fraction of a box footprint that must rest on solid
/// surface, per axis.
pub const DEFAULT_SUPPORT_THRESHOLD: f64 = 0.8;

/// Placement rule for the max-rects packer.
///
/// Only [`PlacementRule::BottomLeft`] is implemented; the remaining rules
/// were explored historically and fall back to bottom-left with a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlacementRule {
    /// Lowest, rearmost, leftmost supported position (Tetris placement).
    #[default]
    BottomLeft,
    /// Fit against the short side of a free volume.
    BestShortSideFit,
    /// Fit against the long side of a free volume.
    BestLongSideFit,
    /// Fit into the smallest free volume.
    BestAreaFit,
    /// Maximize contact with other boxes.
    ContactPoint,
}

/// Max-rects bin packer for a single 3D container, gated by base support.
#[derive(Debug, Clone)]
pub struct MaxRectsPacker {
    container: Container,
    allow_flip: bool,
    support_threshold: f64,
    free_volumes: Vec<FreeVolume>,
    placed: Vec<Cuboid>,
    oracle: Option<DisjointCuboidSet>,
}

impl MaxRectsPacker {
    /// Creates a packer for the given container.
    ///
    /// `allow_flip` permits placing boxes with width and height swapped.
    pub fn new(container: Container, allow_flip: bool) -> Result<Self> {
        container.validate()?;
        let mut packer = Self {
            container,
            allow_flip,
            support_threshold: DEFAULT_SUPPORT_THRESHOLD,
            free_volumes: Vec::new(),
            placed: Vec::new(),
            oracle: None,
        };
        packer.reset();
        Ok(packer)
    }

    /// Sets the minimum per-axis support ratio (clamped to `0.0..=1.0`).
    pub fn with_support_threshold(mut self, threshold: f64) -> Self {
        self.support_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Enables the disjointness oracle.
    ///
    /// Every committed placement is then asserted to be non-overlapping.
    /// Verification never influences which placement is chosen.
    pub fn with_verification(mut self) -> Self {
        self.oracle = Some(DisjointCuboidSet::new());
        self
    }

    /// Re-initializes the packer for a new container, discarding all state.
    pub fn init(&mut self, container: Container, allow_flip: bool) -> Result<()> {
        container.validate()?;
        self.container = container;
        self.allow_flip = allow_flip;
        self.reset();
        Ok(())
    }

    /// Restarts packing in the current container: the free space becomes a
    /// single volume spanning the whole container, fully supported by the
    /// floor, and the placed list is cleared.
    pub fn reset(&mut self) {
        self.free_volumes.clear();
        self.free_volumes
            .push(FreeVolume::full_container(&self.container));
        self.placed.clear();
        if let Some(oracle) = self.oracle.as_mut() {
            oracle.clear();
        }
    }

    /// Returns the container.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Returns whether flipped placements are allowed.
    pub fn allow_flip(&self) -> bool {
        self.allow_flip
    }

    /// Returns the minimum per-axis support ratio.
    pub fn support_threshold(&self) -> f64 {
        self.support_threshold
    }

    /// Returns the boxes placed so far, in placement order.
    pub fn placed(&self) -> &[Cuboid] {
        &self.placed
    }

    /// Returns the current free volumes.
    pub fn free_volumes(&self) -> &[FreeVolume] {
        &self.free_volumes
    }

    /// Returns the fraction of the container floor area consumed by placed
    /// box footprints. Depth is intentionally excluded: this variant tracks
    /// 2D footprint occupancy, not volumetric occupancy.
    pub fn occupancy(&self) -> f64 {
        let used: f64 = self.placed.iter().map(Cuboid::base_area).sum();
        used / self.container.base_area()
    }

    /// Inserts a single box.
    ///
    /// Free volumes are scanned in `(y, z, x)` order and the first
    /// supported, unblocked position wins (first-fit); upright is tried
    /// before the flipped orientation. Returns `None` and leaves all state
    /// unchanged if no valid position exists.
    pub fn insert(&mut self, size: BoxSize, rule: PlacementRule) -> Option<Cuboid> {
        if size.is_degenerate() {
            return None;
        }
        if rule != PlacementRule::BottomLeft {
            log::warn!("placement rule {rule:?} is not implemented, using bottom-left");
        }

        self.free_volumes
            .sort_by(|a, b| deep_bottom_left_cmp(&a.cuboid, &b.cuboid));

        let placed = self.find_bottom_left(&size)?;

        // Re-split every free volume the new box overlaps. Pieces produced
        // here are disjoint from the box, so they are exempt from the scan.
        let mut pieces = Vec::new();
        self.free_volumes
            .retain(|node| !split_overlapped(node, &placed, &mut pieces));
        self.free_volumes.append(&mut pieces);

        self.prune_free_list();
        self.commit(placed);
        Some(placed)
    }

    /// Scans the sorted free list for the first supported, unblocked
    /// position.
    fn find_bottom_left(&self, size: &BoxSize) -> Option<Cuboid> {
        for (i, node) in self.free_volumes.iter().enumerate() {
            log::trace!(
                "free volume {}: ({}, {}, {}) size {}x{}x{} support x {}..{} y {}..{}",
                i,
                node.cuboid.position.x,
                node.cuboid.position.y,
                node.cuboid.position.z,
                node.cuboid.width(),
                node.cuboid.height(),
                node.cuboid.depth(),
                node.support.x0,
                node.support.x1,
                node.support.y0,
                node.support.y1
            );

            if let Some(candidate) = self.try_orientation(node, size) {
                return Some(candidate);
            }
            if self.allow_flip {
                if let Some(candidate) = self.try_orientation(node, &size.flipped()) {
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// Tests one oriented size against one free volume.
    ///
    /// The candidate anchors at the support corner, so it rests on the
    /// solid part of the volume's base. It is accepted only if the volume
    /// admits the size, the anchored box stays inside the volume, the
    /// support covers the threshold fraction of both footprint axes, and no
    /// placed box hangs over the position.
    fn try_orientation(&self, node: &FreeVolume, oriented: &BoxSize) -> Option<Cuboid> {
        let fits_extent = node.cuboid.width() >= oriented.width
            && node.cuboid.height() >= oriented.height
            && node.cuboid.depth() >= oriented.depth;
        let supported = node.support.width() >= oriented.width * self.support_threshold
            && node.support.height() >= oriented.height * self.support_threshold;
        if !fits_extent || !supported {
            return None;
        }

        let candidate = Cuboid::new(
            node.support.x0,
            node.support.y0,
            node.cuboid.position.z,
            oriented.width,
            oriented.height,
            oriented.depth,
        );
        if candidate.max_x() > node.cuboid.max_x() || candidate.max_y() > node.cuboid.max_y() {
            return None;
        }
        if self.is_blocked(&candidate) {
            return None;
        }
        Some(candidate)
    }

    /// Returns true if some placed box physically obstructs the candidate:
    /// their x-y footprints overlap and the placed box's top surface is
    /// above the candidate's bottom.
    fn is_blocked(&self, candidate: &Cuboid) -> bool {
        self.placed.iter().any(|used| {
            candidate.position.x < used.max_x()
                && used.position.x < candidate.max_x()
                && candidate.position.y < used.max_y()
                && used.position.y < candidate.max_y()
                && candidate.position.z < used.max_z()
        })
    }

    /// Removes every free volume that is a higher, fully-covered sub-slice
    /// of another.
    fn prune_free_list(&mut self) {
        let mut i = 0;
        while i < self.free_volumes.len() {
            let mut removed_i = false;
            let mut j = i + 1;
            while j < self.free_volumes.len() {
                if self.free_volumes[i]
                    .cuboid
                    .is_contained_above(&self.free_volumes[j].cuboid)
                {
                    self.free_volumes.remove(i);
                    removed_i = true;
                    break;
                }
                if self.free_volumes[j]
                    .cuboid
                    .is_contained_above(&self.free_volumes[i].cuboid)
                {
                    self.free_volumes.remove(j);
                } else {
                    j += 1;
                }
            }
            if !removed_i {
                i += 1;
            }
        }
    }

    /// Records a committed placement and keeps the free list in canonical
    /// order so a later failed insert observes no change at all.
    fn commit(&mut self, placed: Cuboid) {
        if let Some(oracle) = self.oracle.as_mut() {
            assert!(
                oracle.add(placed),
                "placement overlaps a previously placed box"
            );
        }
        log::debug!(
            "placed {}x{}x{} at ({}, {}, {})",
            placed.width(),
            placed.height(),
            placed.depth(),
            placed.position.x,
            placed.position.y,
            placed.position.z
        );
        self.placed.push(placed);
        self.free_volumes
            .sort_by(|a, b| deep_bottom_left_cmp(&a.cuboid, &b.cuboid));
    }
}

/// Splits `node` around `used` if they overlap, pushing the surviving
/// pieces into `out`. Returns true if `node` was consumed.
///
/// Each piece inherits the parent's support footprint shrunk to reflect the
/// new obstruction; the piece above the box gets the box's own top surface
/// (clipped to the parent footprint) as its support. Support bounds only
/// ever shrink, so a position is never reported better-supported than it
/// is.
fn split_overlapped(node: &FreeVolume, used: &Cuboid, out: &mut Vec<FreeVolume>) -> bool {
    let free = &node.cuboid;
    if used.position.x >= free.max_x()
        || used.max_x() <= free.position.x
        || used.position.y >= free.max_y()
        || used.max_y() <= free.position.y
        || used.position.z >= free.max_z()
        || used.max_z() <= free.position.z
    {
        return false;
    }

    let mut push = |mut piece: FreeVolume| {
        if !piece.cuboid.is_degenerate() {
            piece.support = piece.support.clipped_to(&piece.cuboid);
            out.push(piece);
        }
    };

    // Leftover before the box in y.
    if used.position.y > free.position.y && used.position.y < free.max_y() {
        let mut piece = *node;
        piece.cuboid.dimensions.y = used.position.y - free.position.y;
        piece.support.y1 = piece.support.y1.min(used.position.y);
        push(piece);
    }

    // Leftover past the box in y.
    if used.max_y() < free.max_y() {
        let mut piece = *node;
        piece.cuboid.position.y = used.max_y();
        piece.cuboid.dimensions.y = free.max_y() - used.max_y();
        piece.support.y0 = piece.support.y0.max(used.max_y());
        push(piece);
    }

    // Leftover before the box in x.
    if used.position.x > free.position.x && used.position.x < free.max_x() {
        let mut piece = *node;
        piece.cuboid.dimensions.x = used.position.x - free.position.x;
        piece.support.x1 = piece.support.x1.min(used.position.x);
        push(piece);
    }

    // Leftover past the box in x.
    if used.max_x() < free.max_x() {
        let mut piece = *node;
        piece.cuboid.position.x = used.max_x();
        piece.cuboid.dimensions.x = free.max_x() - used.max_x();
        piece.support.x0 = piece.support.x0.max(used.max_x());
        push(piece);
    }

    // Leftover under the box in z; the base and its support are unchanged.
    if used.position.z > free.position.z && used.position.z < free.max_z() {
        let mut piece = *node;
        piece.cuboid.dimensions.z = used.position.z - free.position.z;
        push(piece);
    }

    // Leftover above the box in z: its base rests on the box's top surface.
    if used.max_z() < free.max_z() {
        let mut piece = *node;
        piece.cuboid.position.z = used.max_z();
        piece.cuboid.dimensions.z = free.max_z() - used.max_z();
        piece.support =
            SupportFootprint::new(used.position.x, used.max_x(), used.position.y, used.max_y());
        push(piece);
    }

    true
}
