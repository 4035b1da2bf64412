//! Incremental pairwise-disjointness checking.

use crate::geometry::Cuboid;

/// A collection of cuboids that is guaranteed to stay pairwise disjoint.
///
/// This is a verification oracle: the packers use it (when enabled) to
/// assert that every committed placement is non-overlapping. It never
/// participates in placement decisions.
#[derive(Debug, Clone, Default)]
pub struct DisjointCuboidSet {
    cuboids: Vec<Cuboid>,
}

impl DisjointCuboidSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to add a cuboid to the set.
    ///
    /// Returns `false` (without inserting) if the cuboid overlaps any
    /// current member. Degenerate cuboids are accepted as a no-op.
    pub fn add(&mut self, cuboid: Cuboid) -> bool {
        if cuboid.is_degenerate() {
            return true;
        }
        if !self.is_disjoint_from_all(&cuboid) {
            return false;
        }
        self.cuboids.push(cuboid);
        true
    }

    /// Returns true if the cuboid overlaps no current member.
    pub fn is_disjoint_from_all(&self, cuboid: &Cuboid) -> bool {
        self.cuboids.iter().all(|c| c.is_disjoint_from(cuboid))
    }

    /// Removes all members.
    pub fn clear(&mut self) {
        self.cuboids.clear();
    }

    /// Returns the accepted cuboids.
    pub fn cuboids(&self) -> &[Cuboid] {
        &self.cuboids
    }

    /// Returns the number of accepted cuboids.
    pub fn len(&self) -> usize {
        self.cuboids.len()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.cuboids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_disjoint_members() {
        let mut set = DisjointCuboidSet::new();

        assert!(set.add(Cuboid::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0)));
        assert!(set.add(Cuboid::new(10.0, 0.0, 0.0, 10.0, 10.0, 10.0)));
        assert!(set.add(Cuboid::new(0.0, 0.0, 10.0, 10.0, 10.0, 10.0)));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_overlap_is_rejected_without_insertion() {
        let mut set = DisjointCuboidSet::new();

        assert!(set.add(Cuboid::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0)));
        assert!(!set.add(Cuboid::new(5.0, 5.0, 5.0, 10.0, 10.0, 10.0)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_degenerate_is_a_noop_success() {
        let mut set = DisjointCuboidSet::new();

        assert!(set.add(Cuboid::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0)));
        assert!(set.add(Cuboid::new(0.0, 0.0, 0.0, 10.0, 0.0, 10.0)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut set = DisjointCuboidSet::new();
        set.add(Cuboid::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0));

        set.clear();
        assert!(set.is_empty());
        assert!(set.add(Cuboid::new(5.0, 5.0, 5.0, 10.0, 10.0, 10.0)));
    }
}
