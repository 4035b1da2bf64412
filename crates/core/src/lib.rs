//! # u-stow Core
//!
//! Core geometry primitives and invariant checking for the u-stow 3D
//! container loading engine.
//!
//! This crate provides the foundational value types shared by the packing
//! strategies in `u-stow-packing`:
//!
//! - **Geometry**: [`BoxSize`], [`Cuboid`] and their pairwise predicates
//!   (disjointness, containment) plus the search orderings
//!   [`deep_bottom_left_cmp`] and [`floor_first_cmp`]
//! - **Verification**: [`DisjointCuboidSet`] - an incremental non-overlap
//!   oracle used to assert packing correctness
//! - **Errors**: [`Error`], [`Result`]
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod disjoint;
pub mod error;
pub mod geometry;

// Re-exports
pub use disjoint::DisjointCuboidSet;
pub use error::{Error, Result};
pub use geometry::{deep_bottom_left_cmp, floor_first_cmp, BoxSize, Cuboid};
