//! Error types for u-stow.

use thiserror::Error;

/// Result type alias for u-stow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when configuring a packer.
///
/// Note that "does not fit" is not an error: placement operations report it
/// as an empty result and leave the packer untouched.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid container configuration.
    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    /// Invalid box size.
    #[error("Invalid box size: {0}")]
    InvalidBoxSize(String),
}
