//! Voxel debug kernel (§4.3)
//!
//! Same ingestion as the downsample kernel, but no accumulation is
//! needed — only the set of occupied voxel keys, which are then
//! converted back to world-space centers for visualization.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{KernelError, Result};
use crate::validation::{check_point_count, check_positive_finite, Bounds};
use crate::voxel_index::{voxel_center, voxel_key};
use glam::Vec3;

const CHUNK_SIZE: usize = 1000;

/// Run the debug kernel: emit one world-space center per occupied voxel.
pub fn voxel_debug(positions: &[f32], bounds: &Bounds, voxel_size: f32) -> Result<Vec<f32>> {
    bounds.validate()?;
    check_positive_finite(voxel_size, "voxel_size")?;

    if positions.len() % 3 != 0 {
        return Err(KernelError::Internal(format!(
            "positions length {} is not a multiple of 3",
            positions.len()
        )));
    }
    let point_count = (positions.len() / 3) as u64;
    check_point_count(point_count, 3)?;

    debug!(point_count, voxel_size, "voxel debug starting");

    let n = point_count as usize;
    let mut occupied = HashSet::new();
    let mut chunk_start = 0usize;
    while chunk_start < n {
        let chunk_end = (chunk_start + CHUNK_SIZE).min(n);
        for i in chunk_start..chunk_end {
            let x = positions[i * 3];
            let y = positions[i * 3 + 1];
            let z = positions[i * 3 + 2];
            if !(x.is_finite() && y.is_finite() && z.is_finite()) {
                continue;
            }
            occupied.insert(voxel_key(Vec3::new(x, y, z), bounds, voxel_size));
        }
        chunk_start = chunk_end;
    }

    let mut centers = Vec::with_capacity(occupied.len() * 3);
    for key in occupied {
        let c = voxel_center(key, bounds, voxel_size);
        centers.push(c.x);
        centers.push(c.y);
        centers.push(c.z);
    }

    debug!(voxel_count = centers.len() / 3, "voxel debug finished");
    Ok(centers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min: (f32, f32, f32), max: (f32, f32, f32)) -> Bounds {
        Bounds {
            min_x: min.0,
            min_y: min.1,
            min_z: min.2,
            max_x: max.0,
            max_y: max.1,
            max_z: max.2,
        }
    }

    fn contains_approx(centers: &[f32], target: (f32, f32, f32)) -> bool {
        centers.chunks_exact(3).any(|c| {
            (c[0] - target.0).abs() < 1e-5
                && (c[1] - target.1).abs() < 1e-5
                && (c[2] - target.2).abs() < 1e-5
        })
    }

    /// DBG-1
    #[test]
    fn dbg1_two_occupied_voxels_give_two_centers() {
        let positions = [0.5, 0.5, 0.5, 1.5, 0.5, 0.5, 0.5, 0.5, 0.5];
        let b = bounds((0.0, 0.0, 0.0), (2.0, 1.0, 1.0));
        let centers = voxel_debug(&positions, &b, 1.0).unwrap();
        assert_eq!(centers.len() / 3, 2);
        assert!(contains_approx(&centers, (0.5, 0.5, 0.5)));
        assert!(contains_approx(&centers, (1.5, 0.5, 0.5)));
    }

    #[test]
    fn nan_point_is_silently_dropped() {
        let positions = [f32::NAN, 0.0, 0.0, 0.5, 0.5, 0.5];
        let b = bounds((0.0, 0.0, 0.0), (2.0, 1.0, 1.0));
        let centers = voxel_debug(&positions, &b, 1.0).unwrap();
        assert_eq!(centers.len() / 3, 1);
    }

    #[test]
    fn nonpositive_voxel_size_is_invalid_parameter() {
        let positions = [0.0, 0.0, 0.0];
        let b = bounds((0.0, 0.0, 0.0), (2.0, 1.0, 1.0));
        let err = voxel_debug(&positions, &b, -1.0).unwrap_err();
        assert!(matches!(err, KernelError::InvalidParameter(_)));
    }
}
