//! Shared precondition checks (§4.5)
//!
//! Every kernel runs the same floor of checks before it allocates anything:
//! size caps, finiteness of voxel size / radius, and finiteness + ordering
//! of the caller-supplied bounds.

use crate::error::{KernelError, Result};

/// Point counts above this are rejected before any allocation happens.
pub const MAX_POINTS: u64 = 100_000_000;

/// Payload byte budget; guards against a header that declares an
/// impossibly large point count together with a plausible-looking N.
pub const MAX_PAYLOAD_BYTES: u64 = 2_000_000_000;

/// Caller-supplied axis-aligned bounds for the voxel grid origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub min_z: f32,
    pub max_x: f32,
    pub max_y: f32,
    pub max_z: f32,
}

impl Bounds {
    /// All six components finite and `max >= min` on each axis.
    pub fn validate(&self) -> Result<()> {
        let comps = [
            self.min_x, self.min_y, self.min_z, self.max_x, self.max_y, self.max_z,
        ];
        if comps.iter().any(|c| !c.is_finite()) {
            return Err(KernelError::InvalidBounds(format!(
                "bounds contain a non-finite component: {:?}",
                comps
            )));
        }
        if self.max_x < self.min_x || self.max_y < self.min_y || self.max_z < self.min_z {
            return Err(KernelError::InvalidBounds(format!(
                "max < min on some axis: min=({}, {}, {}) max=({}, {}, {})",
                self.min_x, self.min_y, self.min_z, self.max_x, self.max_y, self.max_z
            )));
        }
        Ok(())
    }
}

/// `N <= MAX_POINTS` and the implied payload size fits `MAX_PAYLOAD_BYTES`.
/// Returns `Err` (internal failure, non-zero exit) rather than a soft
/// rejection, since an oversized request is a caller bug, not bad data.
pub fn check_point_count(point_count: u64, floats_per_point: u64) -> Result<()> {
    if point_count > MAX_POINTS {
        return Err(KernelError::Oversized(format!(
            "point_count {} exceeds MAX_POINTS {}",
            point_count, MAX_POINTS
        )));
    }
    let bytes = point_count
        .saturating_mul(floats_per_point)
        .saturating_mul(4);
    if bytes > MAX_PAYLOAD_BYTES {
        return Err(KernelError::Oversized(format!(
            "payload of {} bytes exceeds MAX_PAYLOAD_BYTES {}",
            bytes, MAX_PAYLOAD_BYTES
        )));
    }
    Ok(())
}

/// A strictly positive, finite voxel size or smoothing radius.
/// Failure here is a *soft* rejection (§7): caller still gets `u32 0` / exit 0.
pub fn check_positive_finite(value: f32, name: &str) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(KernelError::InvalidParameter(format!(
            "{name} must be positive and finite, got {value}"
        )));
    }
    Ok(())
}

/// A strictly positive iteration count (already cast from the wire f32).
pub fn check_positive_iterations(iterations: i64) -> Result<()> {
    if iterations <= 0 {
        return Err(KernelError::InvalidParameter(format!(
            "iterations must be positive, got {iterations}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_bounds() -> Bounds {
        Bounds {
            min_x: 0.0,
            min_y: 0.0,
            min_z: 0.0,
            max_x: 1.0,
            max_y: 1.0,
            max_z: 1.0,
        }
    }

    #[test]
    fn valid_bounds_pass() {
        assert!(unit_bounds().validate().is_ok());
    }

    #[test]
    fn nan_bounds_are_invalid_bounds_error() {
        let mut b = unit_bounds();
        b.min_x = f32::NAN;
        let err = b.validate().unwrap_err();
        assert!(matches!(err, KernelError::InvalidBounds(_)));
    }

    #[test]
    fn inverted_axis_is_invalid_bounds_error() {
        let mut b = unit_bounds();
        b.max_y = -1.0;
        assert!(b.validate().is_err());
    }

    #[test]
    fn point_count_over_cap_is_oversized() {
        let err = check_point_count(MAX_POINTS + 1, 3).unwrap_err();
        assert!(matches!(err, KernelError::Oversized(_)));
    }

    #[test]
    fn zero_voxel_size_is_invalid_parameter() {
        let err = check_positive_finite(0.0, "voxel_size").unwrap_err();
        assert!(matches!(err, KernelError::InvalidParameter(_)));
    }

    #[test]
    fn infinite_voxel_size_is_invalid_parameter() {
        assert!(check_positive_finite(f32::INFINITY, "voxel_size").is_err());
    }

    #[test]
    fn negative_iterations_is_invalid_parameter() {
        assert!(check_positive_iterations(-1).is_err());
        assert!(check_positive_iterations(0).is_err());
        assert!(check_positive_iterations(1).is_ok());
    }
}
