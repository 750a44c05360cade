//! Point smoothing kernel (§4.4)
//!
//! Iterative Laplacian-style smoothing: each iteration rebuilds a uniform
//! grid over the current point positions, then replaces every point with
//! the mean of itself and all neighbors within `radius`.

use tracing::debug;

use crate::error::Result;
use crate::validation::{check_positive_finite, check_positive_iterations};

/// The 27 neighbor offsets in `[-1,0,1]^3`, including the point's own cell.
#[rustfmt::skip]
const NEIGHBOR_OFFSETS: [(i32, i32, i32); 27] = [
    (-1, -1, -1), (-1, -1, 0), (-1, -1, 1),
    (-1,  0, -1), (-1,  0, 0), (-1,  0, 1),
    (-1,  1, -1), (-1,  1, 0), (-1,  1, 1),
    ( 0, -1, -1), ( 0, -1, 0), ( 0, -1, 1),
    ( 0,  0, -1), ( 0,  0, 0), ( 0,  0, 1),
    ( 0,  1, -1), ( 0,  1, 0), ( 0,  1, 1),
    ( 1, -1, -1), ( 1, -1, 0), ( 1, -1, 1),
    ( 1,  0, -1), ( 1,  0, 0), ( 1,  0, 1),
    ( 1,  1, -1), ( 1,  1, 0), ( 1,  1, 1),
];

struct Grid {
    min_x: f32,
    min_y: f32,
    min_z: f32,
    cell_size: f32,
    gw: i64,
    gh: i64,
    gd: i64,
    cells: Vec<Vec<u32>>,
}

impl Grid {
    fn build(prev: &[f32], cell_size: f32) -> Self {
        let n = prev.len() / 3;
        let mut min_x = prev[0];
        let mut max_x = prev[0];
        let mut min_y = prev[1];
        let mut max_y = prev[1];
        let mut min_z = prev[2];
        let mut max_z = prev[2];
        for i in 1..n {
            let (x, y, z) = (prev[i * 3], prev[i * 3 + 1], prev[i * 3 + 2]);
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
            min_z = min_z.min(z);
            max_z = max_z.max(z);
        }

        let inv = 1.0 / cell_size;
        let gw = (((max_x - min_x) * inv) as i64) + 1;
        let gh = (((max_y - min_y) * inv) as i64) + 1;
        let gd = (((max_z - min_z) * inv) as i64) + 1;

        let mut grid = Grid {
            min_x,
            min_y,
            min_z,
            cell_size,
            gw,
            gh,
            gd,
            cells: vec![Vec::new(); (gw * gh * gd).max(0) as usize],
        };

        for i in 0..n {
            let (x, y, z) = (prev[i * 3], prev[i * 3 + 1], prev[i * 3 + 2]);
            if let Some(idx) = grid.index_of(x, y, z) {
                grid.cells[idx].push(i as u32);
            }
        }
        grid
    }

    /// `floor((coord - min) / cell_size)` per axis, matching §4.4's exact
    /// convention, then flattened to `gx + gy*gw + gz*gw*gh`. Returns
    /// `None` if the cell falls outside the grid's bounds.
    fn index_of(&self, x: f32, y: f32, z: f32) -> Option<usize> {
        let inv = 1.0 / self.cell_size;
        let gx = ((x - self.min_x) * inv).floor() as i64;
        let gy = ((y - self.min_y) * inv).floor() as i64;
        let gz = ((z - self.min_z) * inv).floor() as i64;
        if gx < 0 || gy < 0 || gz < 0 || gx >= self.gw || gy >= self.gh || gz >= self.gd {
            return None;
        }
        Some((gx + gy * self.gw + gz * self.gw * self.gh) as usize)
    }

    fn cell(&self, x: f32, y: f32, z: f32) -> Option<&[u32]> {
        self.index_of(x, y, z).map(|idx| self.cells[idx].as_slice())
    }
}

/// Run the smoothing kernel for exactly `iterations` passes.
///
/// `N=0` or a length not a multiple of 3 is an empty, successful result
/// (§4.4); a non-positive `radius` or `iterations` is a soft validation
/// rejection the caller turns into `u32 0` / exit 0.
pub fn smooth(positions: &[f32], radius: f32, iterations: i64) -> Result<Vec<f32>> {
    if positions.is_empty() || positions.len() % 3 != 0 {
        return Ok(Vec::new());
    }
    check_positive_finite(radius, "smoothing_radius")?;
    check_positive_iterations(iterations)?;

    let n = positions.len() / 3;
    debug!(point_count = n, radius, iterations, "point smooth starting");

    let radius_sq = radius * radius;
    let mut prev = positions.to_vec();
    let mut next = vec![0.0f32; positions.len()];

    for _ in 0..iterations {
        let grid = Grid::build(&prev, radius);

        for i in 0..n {
            let x = prev[i * 3];
            let y = prev[i * 3 + 1];
            let z = prev[i * 3 + 2];

            let mut sum_x = 0.0f32;
            let mut sum_y = 0.0f32;
            let mut sum_z = 0.0f32;
            let mut count = 0u32;

            for (dx, dy, dz) in NEIGHBOR_OFFSETS {
                let shifted_x = x + dx as f32 * radius;
                let shifted_y = y + dy as f32 * radius;
                let shifted_z = z + dz as f32 * radius;
                let Some(cell) = grid.cell(shifted_x, shifted_y, shifted_z) else {
                    continue;
                };
                for &j in cell {
                    let j = j as usize;
                    if j == i {
                        continue;
                    }
                    let jx = prev[j * 3];
                    let jy = prev[j * 3 + 1];
                    let jz = prev[j * 3 + 2];
                    let ddx = jx - x;
                    let ddy = jy - y;
                    let ddz = jz - z;
                    let dist_sq = ddx * ddx + ddy * ddy + ddz * ddz;
                    if dist_sq <= radius_sq {
                        sum_x += jx;
                        sum_y += jy;
                        sum_z += jz;
                        count += 1;
                    }
                }
            }

            if count > 0 {
                let denom = count as f32 + 1.0;
                next[i * 3] = (x + sum_x) / denom;
                next[i * 3 + 1] = (y + sum_y) / denom;
                next[i * 3 + 2] = (z + sum_z) / denom;
            } else {
                next[i * 3] = x;
                next[i * 3 + 1] = y;
                next[i * 3 + 2] = z;
            }
        }

        std::mem::swap(&mut prev, &mut next);
    }

    debug!(point_count = n, "point smooth finished");
    Ok(prev)
}
