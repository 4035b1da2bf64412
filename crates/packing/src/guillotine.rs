//! Guillotine free-space packer.
//!
//! The free space is kept as a partition of the container into pairwise
//! disjoint volumes. Placing a box carves an L-shaped leftover out of the
//! chosen free volume plus a slab above the box, so one consumed volume is
//! replaced by up to three new disjoint ones.
//!
//! # References
//!
//! - Jylänki, J. (2010). A thousand ways to pack the bin - a practical
//!   approach to two-dimensional rectangle bin packing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::container::Container;
use u_stow_core::{floor_first_cmp, BoxSize, Cuboid, DisjointCuboidSet, Result};

/// Scoring rule for choosing which free volume receives a box.
///
/// Scores are penalties: the minimum-score candidate wins. The `Worst*`
/// rules negate their `Best*` counterpart and select the loosest fit
/// instead, which intentionally spreads boxes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ScoreRule {
    /// Place into the free volume with the least leftover volume.
    #[default]
    BestAreaFit,
    /// Minimize the smallest per-axis leftover.
    BestShortSideFit,
    /// Minimize the largest per-axis leftover.
    BestLongSideFit,
    /// Maximize the leftover volume.
    WorstAreaFit,
    /// Maximize the smallest per-axis leftover.
    WorstShortSideFit,
    /// Maximize the largest per-axis leftover.
    WorstLongSideFit,
}

/// Rule for orienting the guillotine cut that splits the L-shaped leftover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SplitRule {
    /// Cut along the shorter leftover axis.
    #[default]
    ShorterLeftoverAxis,
    /// Cut along the longer leftover axis.
    LongerLeftoverAxis,
    /// Make the single bigger leftover piece as large as possible.
    MinimizeArea,
    /// Make the two leftover pieces as even-sized as possible.
    MaximizeArea,
    /// Cut along the free volume's shorter total axis.
    ShorterAxis,
    /// Cut along the free volume's longer total axis.
    LongerAxis,
}

/// Guillotine bin packer for a single 3D container.
///
/// Boxes may be placed upright or with width and height swapped; depth is
/// never rotated out of the vertical axis.
#[derive(Debug, Clone)]
pub struct GuillotinePacker {
    container: Container,
    free_volumes: Vec<Cuboid>,
    placed: Vec<Cuboid>,
    oracle: Option<DisjointCuboidSet>,
}

impl GuillotinePacker {
    /// Creates a packer for the given container.
    pub fn new(container: Container) -> Result<Self> {
        container.validate()?;
        let mut packer = Self {
            container,
            free_volumes: Vec::new(),
            placed: Vec::new(),
            oracle: None,
        };
        packer.reset();
        Ok(packer)
    }

    /// Enables the disjointness oracle.
    ///
    /// Every committed placement is then asserted to be non-overlapping;
    /// a failed assertion indicates a defect in the splitting or selection
    /// logic. Verification never influences which placement is chosen.
    pub fn with_verification(mut self) -> Self {
        self.oracle = Some(DisjointCuboidSet::new());
        self
    }

    /// Re-initializes the packer for a new container, discarding all state.
    pub fn init(&mut self, container: Container) -> Result<()> {
        container.validate()?;
        self.container = container;
        self.reset();
        Ok(())
    }

    /// Restarts packing in the current container: the free space becomes a
    /// single volume spanning the whole container and the placed list is
    /// cleared.
    pub fn reset(&mut self) {
        self.free_volumes.clear();
        self.free_volumes.push(Cuboid::new(
            0.0,
            0.0,
            0.0,
            self.container.width(),
            self.container.height(),
            self.container.depth(),
        ));
        self.placed.clear();
        if let Some(oracle) = self.oracle.as_mut() {
            oracle.clear();
        }
    }

    /// Returns the container.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Returns the boxes placed so far, in placement order.
    pub fn placed(&self) -> &[Cuboid] {
        &self.placed
    }

    /// Returns the current free volumes.
    pub fn free_volumes(&self) -> &[Cuboid] {
        &self.free_volumes
    }

    /// Returns the fraction of the container volume consumed by placed
    /// boxes.
    pub fn occupancy(&self) -> f64 {
        let used: f64 = self.placed.iter().map(Cuboid::volume).sum();
        used / self.container.volume()
    }

    /// Inserts a single box, possibly flipped.
    ///
    /// Free volumes are scanned lowest-first (`(z, y, x)` order); a perfect
    /// fit is taken immediately, otherwise every fitting volume/orientation
    /// pair is scored by `score_rule` and the minimum wins, ties keeping the
    /// earlier candidate. Returns `None` and leaves all state unchanged if
    /// the box fits nowhere.
    pub fn insert(
        &mut self,
        size: BoxSize,
        merge: bool,
        score_rule: ScoreRule,
        split_rule: SplitRule,
    ) -> Option<Cuboid> {
        if size.is_degenerate() {
            return None;
        }

        self.free_volumes.sort_by(floor_first_cmp);
        log::trace!(
            "searching {} free volumes for {}x{}x{}",
            self.free_volumes.len(),
            size.width,
            size.height,
            size.depth
        );

        let (index, placed) = self.find_position(&size, score_rule)?;

        self.split_free_volume(index, &placed, split_rule);
        if merge {
            self.merge_free_list();
        }
        self.commit(placed);
        Some(placed)
    }

    /// Inserts a batch of boxes.
    ///
    /// Each iteration selects the single best (free volume, size,
    /// orientation) triple over all remaining sizes jointly, until the list
    /// is exhausted or nothing fits anymore. Unplaceable sizes are dropped
    /// silently. Returns the placed boxes in placement order.
    pub fn insert_batch(
        &mut self,
        sizes: &[BoxSize],
        merge: bool,
        score_rule: ScoreRule,
        split_rule: SplitRule,
    ) -> Vec<Cuboid> {
        let mut remaining: Vec<BoxSize> = sizes
            .iter()
            .copied()
            .filter(|s| !s.is_degenerate())
            .collect();
        let mut placed_boxes = Vec::new();

        while !remaining.is_empty() {
            self.free_volumes.sort_by(floor_first_cmp);

            let mut best: Option<(usize, usize, bool, f64)> = None;
            'volumes: for (i, free) in self.free_volumes.iter().enumerate() {
                for (j, size) in remaining.iter().enumerate() {
                    if size.width == free.width()
                        && size.height == free.height()
                        && size.depth == free.depth()
                    {
                        best = Some((i, j, false, f64::NEG_INFINITY));
                        break 'volumes;
                    }
                    if size.height == free.width()
                        && size.width == free.height()
                        && size.depth == free.depth()
                    {
                        best = Some((i, j, true, f64::NEG_INFINITY));
                        break 'volumes;
                    }
                    if size.width <= free.width()
                        && size.height <= free.height()
                        && size.depth <= free.depth()
                    {
                        let score = score_for(size, free, score_rule);
                        if best.is_none_or(|(_, _, _, s)| score < s) {
                            best = Some((i, j, false, score));
                        }
                    }
                    let flipped = size.flipped();
                    if flipped.width <= free.width()
                        && flipped.height <= free.height()
                        && flipped.depth <= free.depth()
                    {
                        let score = score_for(&flipped, free, score_rule);
                        if best.is_none_or(|(_, _, _, s)| score < s) {
                            best = Some((i, j, true, score));
                        }
                    }
                }
            }

            let Some((free_index, size_index, flipped, _)) = best else {
                break;
            };

            let size = remaining.remove(size_index);
            let oriented = if flipped { size.flipped() } else { size };
            let placed = Cuboid::from_size(self.free_volumes[free_index].position, oriented);

            self.split_free_volume(free_index, &placed, split_rule);
            if merge {
                self.merge_free_list();
            }
            self.commit(placed);
            placed_boxes.push(placed);
        }

        placed_boxes
    }

    /// Coalesces adjacent coplanar free volumes.
    ///
    /// Two volumes merge when they stack with zero gap along one axis and
    /// agree on the other two axes' position and extent. A single pass only
    /// catches pairs; call again to coalesce shapes that only become
    /// mergeable after an earlier merge.
    pub fn merge_free_list(&mut self) {
        self.check_free_list_disjoint();

        let mut i = 0;
        while i < self.free_volumes.len() {
            let mut j = i + 1;
            while j < self.free_volumes.len() {
                let a = self.free_volumes[i];
                let b = self.free_volumes[j];

                // Stacking along one axis requires agreement on the other
                // two axes' position and extent.
                let stacks_in_y = a.width() == b.width()
                    && a.position.x == b.position.x
                    && a.position.z == b.position.z
                    && a.depth() == b.depth();
                let stacks_in_x = a.height() == b.height()
                    && a.position.y == b.position.y
                    && a.position.z == b.position.z
                    && a.depth() == b.depth();
                let stacks_in_z = a.width() == b.width()
                    && a.height() == b.height()
                    && a.position.x == b.position.x
                    && a.position.y == b.position.y;

                if stacks_in_y && a.position.y == b.max_y() {
                    self.free_volumes[i].position.y = b.position.y;
                    self.free_volumes[i].dimensions.y += b.height();
                    self.free_volumes.remove(j);
                } else if stacks_in_y && a.max_y() == b.position.y {
                    self.free_volumes[i].dimensions.y += b.height();
                    self.free_volumes.remove(j);
                } else if stacks_in_x && a.position.x == b.max_x() {
                    self.free_volumes[i].position.x = b.position.x;
                    self.free_volumes[i].dimensions.x += b.width();
                    self.free_volumes.remove(j);
                } else if stacks_in_x && a.max_x() == b.position.x {
                    self.free_volumes[i].dimensions.x += b.width();
                    self.free_volumes.remove(j);
                } else if stacks_in_z && a.position.z == b.max_z() {
                    self.free_volumes[i].position.z = b.position.z;
                    self.free_volumes[i].dimensions.z += b.depth();
                    self.free_volumes.remove(j);
                } else if stacks_in_z && a.max_z() == b.position.z {
                    self.free_volumes[i].dimensions.z += b.depth();
                    self.free_volumes.remove(j);
                } else {
                    j += 1;
                }
            }
            i += 1;
        }

        self.free_volumes.sort_by(floor_first_cmp);
        self.check_free_list_disjoint();
    }

    /// Finds the winning (free volume, placement) pair for a single box.
    fn find_position(&self, size: &BoxSize, score_rule: ScoreRule) -> Option<(usize, Cuboid)> {
        let mut best: Option<(usize, Cuboid, f64)> = None;

        for (i, free) in self.free_volumes.iter().enumerate() {
            // A perfect fit, upright or flipped, is taken instantly.
            if size.width == free.width()
                && size.height == free.height()
                && size.depth == free.depth()
            {
                return Some((i, Cuboid::from_size(free.position, *size)));
            }
            let flipped = size.flipped();
            if flipped.width == free.width()
                && flipped.height == free.height()
                && flipped.depth == free.depth()
            {
                return Some((i, Cuboid::from_size(free.position, flipped)));
            }

            if size.width <= free.width()
                && size.height <= free.height()
                && size.depth <= free.depth()
            {
                let score = score_for(size, free, score_rule);
                if best.as_ref().is_none_or(|(_, _, s)| score < *s) {
                    best = Some((i, Cuboid::from_size(free.position, *size), score));
                }
            }
            if flipped.width <= free.width()
                && flipped.height <= free.height()
                && flipped.depth <= free.depth()
            {
                let score = score_for(&flipped, free, score_rule);
                if best.as_ref().is_none_or(|(_, _, s)| score < *s) {
                    best = Some((i, Cuboid::from_size(free.position, flipped), score));
                }
            }
        }

        best.map(|(i, placed, _)| (i, placed))
    }

    /// Replaces the chosen free volume with the guillotine split around the
    /// placed box: a slab above the box plus the two pieces of the L-shaped
    /// leftover in the x-y plane.
    fn split_free_volume(&mut self, index: usize, placed: &Cuboid, rule: SplitRule) {
        let free = self.free_volumes.swap_remove(index);

        let leftover_w = free.width() - placed.width();
        let leftover_h = free.height() - placed.height();

        let split_horizontal = match rule {
            SplitRule::ShorterLeftoverAxis => leftover_w <= leftover_h,
            SplitRule::LongerLeftoverAxis => leftover_w > leftover_h,
            SplitRule::MinimizeArea => placed.width() * leftover_h > leftover_w * placed.height(),
            SplitRule::MaximizeArea => placed.width() * leftover_h <= leftover_w * placed.height(),
            SplitRule::ShorterAxis => free.width() <= free.height(),
            SplitRule::LongerAxis => free.width() > free.height(),
        };

        let above = Cuboid::new(
            free.position.x,
            free.position.y,
            free.position.z + placed.depth(),
            placed.width(),
            placed.height(),
            free.depth() - placed.depth(),
        );
        let along_y = Cuboid::new(
            free.position.x,
            free.position.y + placed.height(),
            free.position.z,
            if split_horizontal {
                free.width()
            } else {
                placed.width()
            },
            leftover_h,
            free.depth(),
        );
        let along_x = Cuboid::new(
            free.position.x + placed.width(),
            free.position.y,
            free.position.z,
            leftover_w,
            if split_horizontal {
                placed.height()
            } else {
                free.height()
            },
            free.depth(),
        );

        for piece in [above, along_y, along_x] {
            if !piece.is_degenerate() {
                log::trace!(
                    "split leftover at ({}, {}, {}) size {}x{}x{}",
                    piece.position.x,
                    piece.position.y,
                    piece.position.z,
                    piece.width(),
                    piece.height(),
                    piece.depth()
                );
                self.free_volumes.push(piece);
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
        self.free_volumes.sort_by(floor_first_cmp);
    }

    /// When verification is enabled, asserts the free list is still a
    /// disjoint partition.
    fn check_free_list_disjoint(&self) {
        if self.oracle.is_none() {
            return;
        }
        let mut check = DisjointCuboidSet::new();
        for free in &self.free_volumes {
            assert!(check.add(*free), "free-volume list lost disjointness");
        }
    }
}

/// Computes the heuristic penalty for placing `size` (already oriented)
/// into `free`.
fn score_for(size: &BoxSize, free: &Cuboid, rule: ScoreRule) -> f64 {
    match rule {
        ScoreRule::BestAreaFit => free.volume() - size.volume(),
        ScoreRule::BestShortSideFit => {
            let leftover_x = (free.width() - size.width).abs();
            let leftover_y = (free.height() - size.height).abs();
            let leftover_z = (free.depth() - size.depth).abs();
            leftover_x.min(leftover_y).min(leftover_z)
        }
        ScoreRule::BestLongSideFit => {
            let leftover_x = (free.width() - size.width).abs();
            let leftover_y = (free.height() - size.height).abs();
            let leftover_z = (free.depth() - size.depth).abs();
            leftover_x.max(leftover_y).max(leftover_z)
        }
        ScoreRule::WorstAreaFit => -score_for(size, free, ScoreRule::BestAreaFit),
        ScoreRule::WorstShortSideFit => -score_for(size, free, ScoreRule::BestShortSideFit),
        ScoreRule::WorstLongSideFit => -score_for(size, free, ScoreRule::BestLongSideFit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn packer(width: f64, height: f64, depth: f64) -> GuillotinePacker {
        GuillotinePacker::new(Container::new(width, height, depth))
            .unwrap()
            .with_verification()
    }

    #[test]
    fn test_places_single_box_at_origin() {
        let mut packer = packer(1500.0, 1500.0, 800.0);

        let placed = packer
            .insert(
                BoxSize::new(510.0, 290.0, 210.0),
                true,
                ScoreRule::WorstLongSideFit,
                SplitRule::ShorterLeftoverAxis,
            )
            .expect("box fits an empty container");

        // Upright, flush against the origin.
        assert_eq!(placed, Cuboid::new(0.0, 0.0, 0.0, 510.0, 290.0, 210.0));
        assert_relative_eq!(
            packer.occupancy(),
            (510.0 * 290.0 * 210.0) / (1500.0 * 1500.0 * 800.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_perfect_fit_consumes_free_volume() {
        let mut packer = packer(100.0, 80.0, 50.0);

        let placed = packer
            .insert(
                BoxSize::new(100.0, 80.0, 50.0),
                false,
                ScoreRule::BestAreaFit,
                SplitRule::ShorterLeftoverAxis,
            )
            .unwrap();

        assert_eq!(placed.position, nalgebra::Point3::new(0.0, 0.0, 0.0));
        assert!(packer.free_volumes().is_empty());
        assert_relative_eq!(packer.occupancy(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_perfect_fit_flipped() {
        let mut packer = packer(80.0, 100.0, 50.0);

        let placed = packer
            .insert(
                BoxSize::new(100.0, 80.0, 50.0),
                false,
                ScoreRule::BestAreaFit,
                SplitRule::ShorterLeftoverAxis,
            )
            .unwrap();

        assert_eq!(placed, Cuboid::new(0.0, 0.0, 0.0, 80.0, 100.0, 50.0));
        assert!(packer.free_volumes().is_empty());
    }

    #[test]
    fn test_no_fit_leaves_state_unchanged() {
        let mut packer = packer(100.0, 100.0, 100.0);
        packer.insert(
            BoxSize::new(60.0, 60.0, 60.0),
            true,
            ScoreRule::BestAreaFit,
            SplitRule::ShorterLeftoverAxis,
        );

        let free_before = packer.free_volumes().to_vec();
        let placed_before = packer.placed().to_vec();

        let result = packer.insert(
            BoxSize::new(90.0, 90.0, 90.0),
            true,
            ScoreRule::BestAreaFit,
            SplitRule::ShorterLeftoverAxis,
        );

        assert!(result.is_none());
        assert_eq!(packer.free_volumes(), free_before.as_slice());
        assert_eq!(packer.placed(), placed_before.as_slice());
    }

    #[test]
    fn test_degenerate_size_is_rejected() {
        let mut packer = packer(100.0, 100.0, 100.0);
        assert!(packer
            .insert(
                BoxSize::new(0.0, 50.0, 50.0),
                false,
                ScoreRule::BestAreaFit,
                SplitRule::ShorterLeftoverAxis,
            )
            .is_none());
        assert!(packer.placed().is_empty());
    }

    #[test]
    fn test_split_tiles_the_leftover() {
        let mut packer = packer(100.0, 60.0, 50.0);

        packer
            .insert(
                BoxSize::new(40.0, 20.0, 10.0),
                false,
                ScoreRule::BestAreaFit,
                SplitRule::ShorterLeftoverAxis,
            )
            .unwrap();

        // Leftover widths: x 60, y 40 -> vertical cut.
        let free = packer.free_volumes();
        assert_eq!(free.len(), 3);
        assert!(free.contains(&Cuboid::new(0.0, 20.0, 0.0, 40.0, 40.0, 50.0)));
        assert!(free.contains(&Cuboid::new(40.0, 0.0, 0.0, 60.0, 60.0, 50.0)));
        assert!(free.contains(&Cuboid::new(0.0, 0.0, 10.0, 40.0, 20.0, 40.0)));
    }

    #[test]
    fn test_free_plus_placed_volume_is_conserved() {
        let mut packer = packer(1500.0, 1500.0, 800.0);
        let sizes = [
            BoxSize::new(510.0, 290.0, 210.0),
            BoxSize::new(480.0, 230.0, 190.0),
            BoxSize::new(510.0, 290.0, 210.0),
            BoxSize::new(300.0, 700.0, 400.0),
        ];

        for size in sizes {
            packer.insert(
                size,
                false,
                ScoreRule::BestShortSideFit,
                SplitRule::MinimizeArea,
            );

            let free: f64 = packer.free_volumes().iter().map(Cuboid::volume).sum();
            let used: f64 = packer.placed().iter().map(Cuboid::volume).sum();
            assert_relative_eq!(
                free + used,
                packer.container().volume(),
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn test_area_fit_rules_pick_opposite_volumes() {
        let tight = Cuboid::new(60.0, 0.0, 0.0, 40.0, 40.0, 40.0);
        let loose = Cuboid::new(0.0, 0.0, 0.0, 60.0, 60.0, 60.0);

        let mut best = packer(200.0, 60.0, 60.0);
        best.free_volumes.clear();
        best.free_volumes.extend([loose, tight]);
        let placed = best
            .insert(
                BoxSize::new(30.0, 30.0, 30.0),
                false,
                ScoreRule::BestAreaFit,
                SplitRule::ShorterLeftoverAxis,
            )
            .unwrap();
        assert_eq!(placed.position, nalgebra::Point3::new(60.0, 0.0, 0.0));

        let mut worst = packer(200.0, 60.0, 60.0);
        worst.free_volumes.clear();
        worst.free_volumes.extend([loose, tight]);
        let placed = worst
            .insert(
                BoxSize::new(30.0, 30.0, 30.0),
                false,
                ScoreRule::WorstAreaFit,
                SplitRule::ShorterLeftoverAxis,
            )
            .unwrap();
        assert_eq!(placed.position, nalgebra::Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_side_fit_rules() {
        // Leftovers against a 30^3 box: a -> (10, 70, 70), b -> (130, 1, 70).
        let a = Cuboid::new(0.0, 0.0, 0.0, 40.0, 100.0, 100.0);
        let b = Cuboid::new(40.0, 0.0, 0.0, 160.0, 31.0, 100.0);

        let mut short = packer(200.0, 100.0, 100.0);
        short.free_volumes.clear();
        short.free_volumes.extend([a, b]);
        let placed = short
            .insert(
                BoxSize::new(30.0, 30.0, 30.0),
                false,
                ScoreRule::BestShortSideFit,
                SplitRule::ShorterLeftoverAxis,
            )
            .unwrap();
        assert_eq!(placed.position, nalgebra::Point3::new(40.0, 0.0, 0.0));

        let mut long = packer(200.0, 100.0, 100.0);
        long.free_volumes.clear();
        long.free_volumes.extend([a, b]);
        let placed = long
            .insert(
                BoxSize::new(30.0, 30.0, 30.0),
                false,
                ScoreRule::BestLongSideFit,
                SplitRule::ShorterLeftoverAxis,
            )
            .unwrap();
        assert_eq!(placed.position, nalgebra::Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_merge_coalesces_adjacent_pairs() {
        let mut packer = packer(100.0, 100.0, 10.0);

        // Two slabs stacked along y.
        packer.free_volumes.clear();
        packer
            .free_volumes
            .push(Cuboid::new(0.0, 0.0, 0.0, 100.0, 40.0, 10.0));
        packer
            .free_volumes
            .push(Cuboid::new(0.0, 40.0, 0.0, 100.0, 60.0, 10.0));
        packer.merge_free_list();
        assert_eq!(
            packer.free_volumes(),
            &[Cuboid::new(0.0, 0.0, 0.0, 100.0, 100.0, 10.0)]
        );

        // Two columns side by side along x.
        packer.free_volumes.clear();
        packer
            .free_volumes
            .push(Cuboid::new(30.0, 0.0, 0.0, 70.0, 100.0, 10.0));
        packer
            .free_volumes
            .push(Cuboid::new(0.0, 0.0, 0.0, 30.0, 100.0, 10.0));
        packer.merge_free_list();
        assert_eq!(
            packer.free_volumes(),
            &[Cuboid::new(0.0, 0.0, 0.0, 100.0, 100.0, 10.0)]
        );

        // Two layers stacked along z.
        packer.free_volumes.clear();
        packer
            .free_volumes
            .push(Cuboid::new(0.0, 0.0, 4.0, 100.0, 100.0, 6.0));
        packer
            .free_volumes
            .push(Cuboid::new(0.0, 0.0, 0.0, 100.0, 100.0, 4.0));
        packer.merge_free_list();
        assert_eq!(
            packer.free_volumes(),
            &[Cuboid::new(0.0, 0.0, 0.0, 100.0, 100.0, 10.0)]
        );
    }

    #[test]
    fn test_merge_is_pairwise_per_pass() {
        let mut packer = packer(100.0, 100.0, 10.0);

        // a cannot merge with b or c directly; b+c merge first, and only a
        // second pass can then absorb a.
        packer.free_volumes.clear();
        packer
            .free_volumes
            .push(Cuboid::new(0.0, 0.0, 0.0, 50.0, 100.0, 10.0));
        packer
            .free_volumes
            .push(Cuboid::new(50.0, 0.0, 0.0, 50.0, 60.0, 10.0));
        packer
            .free_volumes
            .push(Cuboid::new(50.0, 60.0, 0.0, 50.0, 40.0, 10.0));

        packer.merge_free_list();
        assert_eq!(packer.free_volumes().len(), 2);

        packer.merge_free_list();
        assert_eq!(
            packer.free_volumes(),
            &[Cuboid::new(0.0, 0.0, 0.0, 100.0, 100.0, 10.0)]
        );
    }

    #[test]
    fn test_batch_packs_everything_that_fits() {
        let mut packer = packer(100.0, 100.0, 100.0);
        let sizes = vec![
            BoxSize::new(50.0, 50.0, 50.0),
            BoxSize::new(50.0, 50.0, 50.0),
            BoxSize::new(200.0, 10.0, 10.0),
            BoxSize::new(100.0, 50.0, 50.0),
        ];

        let placed = packer.insert_batch(
            &sizes,
            true,
            ScoreRule::BestAreaFit,
            SplitRule::ShorterLeftoverAxis,
        );

        // The oversized box is dropped silently.
        assert_eq!(placed.len(), 3);
        assert_eq!(packer.placed().len(), 3);

        let container_bounds = Cuboid::new(0.0, 0.0, 0.0, 100.0, 100.0, 100.0);
        for cuboid in placed {
            assert!(cuboid.is_contained_in(&container_bounds));
        }
    }

    #[test]
    fn test_batch_takes_perfect_fit_first() {
        let mut packer = packer(100.0, 100.0, 100.0);
        let sizes = vec![
            BoxSize::new(30.0, 30.0, 30.0),
            BoxSize::new(100.0, 100.0, 100.0),
        ];

        let placed = packer.insert_batch(
            &sizes,
            false,
            ScoreRule::BestAreaFit,
            SplitRule::ShorterLeftoverAxis,
        );

        // The perfect fit wins the first round even though it is listed
        // second; nothing is left for the other box afterwards.
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0], Cuboid::new(0.0, 0.0, 0.0, 100.0, 100.0, 100.0));
    }

    #[test]
    fn test_occupancy_is_monotone() {
        let mut packer = packer(1500.0, 1500.0, 800.0);
        let mut last = 0.0;

        for _ in 0..12 {
            packer.insert(
                BoxSize::new(510.0, 290.0, 210.0),
                true,
                ScoreRule::WorstLongSideFit,
                SplitRule::ShorterLeftoverAxis,
            );
            let occupancy = packer.occupancy();
            assert!(occupancy >= last);
            assert!((0.0..=1.0).contains(&occupancy));
            last = occupancy;
        }
    }

    #[test]
    fn test_reinit_discards_state() {
        let mut packer = packer(100.0, 100.0, 100.0);
        packer.insert(
            BoxSize::new(60.0, 60.0, 60.0),
            true,
            ScoreRule::BestAreaFit,
            SplitRule::ShorterLeftoverAxis,
        );
        assert!(packer.occupancy() > 0.0);

        packer.init(Container::new(200.0, 200.0, 200.0)).unwrap();

        assert_relative_eq!(packer.occupancy(), 0.0);
        assert_eq!(
            packer.free_volumes(),
            &[Cuboid::new(0.0, 0.0, 0.0, 200.0, 200.0, 200.0)]
        );
        assert!(packer.placed().is_empty());
    }

    #[test]
    fn test_invalid_container_is_rejected() {
        assert!(GuillotinePacker::new(Container::new(0.0, 100.0, 100.0)).is_err());
    }
}
