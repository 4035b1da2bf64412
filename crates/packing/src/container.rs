//! Container (loading space) type.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use u_stow_core::{Error, Result};

/// A fixed-size rectangular loading space.
///
/// All placed and free volumes lie within
/// `[0, width) x [0, height) x [0, depth)` in extent; a volume may touch
/// but not exceed a bound.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Container {
    /// Dimensions (width, height, depth).
    dimensions: Vector3<f64>,
}

impl Container {
    /// Creates a new container with the given dimensions.
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            dimensions: Vector3::new(width, height, depth),
        }
    }

    /// Returns the dimensions (width, height, depth).
    pub fn dimensions(&self) -> &Vector3<f64> {
        &self.dimensions
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

    /// Returns the volume.
    pub fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// Returns the floor area (x-y footprint).
    pub fn base_area(&self) -> f64 {
        self.dimensions.x * self.dimensions.y
    }

    /// Validates the container and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.dimensions.x <= 0.0 || self.dimensions.y <= 0.0 || self.dimensions.z <= 0.0 {
            return Err(Error::InvalidContainer(
                "all dimensions must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_container_measures() {
        let container = Container::new(1500.0, 1500.0, 800.0);
        assert_relative_eq!(container.volume(), 1500.0 * 1500.0 * 800.0, epsilon = 1e-6);
        assert_relative_eq!(container.base_area(), 1500.0 * 1500.0, epsilon = 1e-6);
    }

    #[test]
    fn test_validation() {
        assert!(Container::new(100.0, 80.0, 50.0).validate().is_ok());
        assert!(Container::new(0.0, 80.0, 50.0).validate().is_err());
        assert!(Container::new(100.0, -80.0, 50.0).validate().is_err());
    }
}
