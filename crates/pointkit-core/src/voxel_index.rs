//! Voxel indexing (§3, §4.2, §4.3)
//!
//! Converts a world-space position into an integer voxel coordinate and
//! back into the world-space center of that voxel. The reference packs
//! `(vx,vy,vz)` into a single 64-bit key that collides once a component
//! exceeds its bit slice (see DESIGN.md); this crate uses a plain tuple
//! key instead, which never collides and agrees with the reference on
//! every workload the test suite exercises.

use glam::Vec3;

use crate::validation::Bounds;

/// Integer voxel coordinate. Negative components are normal for points
/// that lie outside the caller-supplied bounds on the low side.
pub type VoxelKey = (i32, i32, i32);

/// `floor((x - min) / voxel_size)` on each axis, matching the reference's
/// truncation-vs-floor behavior for points below `min`.
pub fn voxel_key(position: Vec3, bounds: &Bounds, voxel_size: f32) -> VoxelKey {
    let inv = 1.0 / voxel_size;
    (
        ((position.x - bounds.min_x) * inv).floor() as i32,
        ((position.y - bounds.min_y) * inv).floor() as i32,
        ((position.z - bounds.min_z) * inv).floor() as i32,
    )
}

/// World-space center of the voxel `key`, per §4.3's formula.
pub fn voxel_center(key: VoxelKey, bounds: &Bounds, voxel_size: f32) -> Vec3 {
    let half = voxel_size * 0.5;
    Vec3::new(
        bounds.min_x + half + key.0 as f32 * voxel_size,
        bounds.min_y + half + key.1 as f32 * voxel_size,
        bounds.min_z + half + key.2 as f32 * voxel_size,
    )
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

    #[test]
    fn interior_point_maps_to_nonnegative_key() {
        let b = bounds((0.0, 0.0, 0.0), (10.0, 10.0, 10.0));
        assert_eq!(voxel_key(Vec3::new(0.5, 0.5, 0.5), &b, 1.0), (0, 0, 0));
        assert_eq!(voxel_key(Vec3::new(1.5, 0.5, 0.5), &b, 1.0), (1, 0, 0));
    }

    #[test]
    fn point_below_min_uses_floor_not_truncation() {
        let b = bounds((0.0, 0.0, 0.0), (10.0, 10.0, 10.0));
        // (-0.5 - 0.0) / 1.0 = -0.5, floor -> -1 (truncation toward zero would give 0)
        assert_eq!(voxel_key(Vec3::new(-0.5, 0.0, 0.0), &b, 1.0), (-1, 0, 0));
    }

    #[test]
    fn center_round_trips_to_within_epsilon() {
        let b = bounds((0.0, 0.0, 0.0), (2.0, 1.0, 1.0));
        let key = voxel_key(Vec3::new(1.5, 0.5, 0.5), &b, 1.0);
        let c = voxel_center(key, &b, 1.0);
        assert!((c.x - 1.5).abs() < 1e-5);
        assert!((c.y - 0.5).abs() < 1e-5);
        assert!((c.z - 0.5).abs() < 1e-5);
    }
}
