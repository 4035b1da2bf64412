//! # u-stow Packing
//!
//! Free-space management engine for 3D container loading.
//!
//! The crate tracks the unoccupied sub-volumes of a fixed container, places
//! axis-aligned boxes into them without overlap, and re-splits the free
//! space after every placement. Two independent strategies share the same
//! geometric primitives:
//!
//! | Packer | Free space | Selection | Extras |
//! |--------|-----------|-----------|--------|
//! | [`GuillotinePacker`] | Disjoint partition | Scored best-fit | Batch insert, free-list merging |
//! | [`MaxRectsPacker`] | Overlapping cover | Bottom-left first-fit | Support-ratio gate, blocking test |
//!
//! ## Quick Start
//!
//! ```rust
//! use u_stow_core::BoxSize;
//! use u_stow_packing::{Container, GuillotinePacker, ScoreRule, SplitRule};
//!
//! let container = Container::new(1500.0, 1500.0, 800.0);
//! let mut packer = GuillotinePacker::new(container).unwrap();
//!
//! let placed = packer.insert(
//!     BoxSize::new(510.0, 290.0, 210.0),
//!     true,
//!     ScoreRule::BestAreaFit,
//!     SplitRule::ShorterLeftoverAxis,
//! );
//! assert!(placed.is_some());
//! ```
//!
//! "Does not fit" is a normal outcome, not an error: both packers return
//! `None` and leave their state untouched, and the caller decides whether
//! to retry, skip or abort.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod container;
pub mod free_volume;
pub mod guillotine;
pub mod maxrects;

// Re-exports
pub use container::Container;
pub use free_volume::{FreeVolume, SupportFootprint};
pub use guillotine::{GuillotinePacker, ScoreRule, SplitRule};
pub use maxrects::{MaxRectsPacker, PlacementRule, DEFAULT_SUPPORT_THRESHOLD};
