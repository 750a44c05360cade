//! Voxel downsample kernel (§4.2)
//!
//! Reduces a point cloud to one averaged representative per occupied
//! voxel, optionally carrying parallel color / intensity / classification
//! attributes through the reduction.

use std::collections::HashMap;

use glam::Vec3;
use tracing::debug;

use crate::error::{KernelError, Result};
use crate::validation::{check_point_count, check_positive_finite, Bounds};
use crate::voxel_index::{voxel_key, VoxelKey};

/// Points are processed in chunks of this size for cache locality (§4.2 step 1).
const CHUNK_SIZE: usize = 1024;

/// Optional per-point attribute arrays carried alongside positions.
#[derive(Debug, Clone, Default)]
pub struct Attributes<'a> {
    pub colors: Option<&'a [f32]>,
    pub intensity: Option<&'a [f32]>,
    pub classification: Option<&'a [u8]>,
}

/// The averaged (or majority-voted) result of the reduction.
#[derive(Debug, Clone, Default)]
pub struct DownsampleOutput {
    pub positions: Vec<f32>,
    pub colors: Option<Vec<f32>>,
    pub intensity: Option<Vec<f32>>,
    pub classification: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy)]
struct Accumulator {
    sum: Vec3,
    count: u32,
    sum_color: Vec3,
    sum_intensity: f32,
}

impl Accumulator {
    fn new(position: Vec3, color: Option<Vec3>, intensity: Option<f32>) -> Self {
        Self {
            sum: position,
            count: 1,
            sum_color: color.unwrap_or(Vec3::ZERO),
            sum_intensity: intensity.unwrap_or(0.0),
        }
    }

    fn add(&mut self, position: Vec3, color: Option<Vec3>, intensity: Option<f32>) {
        self.sum += position;
        self.count += 1;
        if let Some(c) = color {
            self.sum_color += c;
        }
        if let Some(v) = intensity {
            self.sum_intensity += v;
        }
    }
}

/// Majority class within a voxel; ties resolve to the smallest class ID (§3, §8.5).
fn majority_class(histogram: &HashMap<u8, u32>) -> u8 {
    let mut best_class = u8::MAX;
    let mut best_count = 0u32;
    for (&class, &count) in histogram {
        if count > best_count || (count == best_count && class < best_class) {
            best_class = class;
            best_count = count;
        }
    }
    best_class
}

/// Run the downsample kernel. `positions` is `3*N` interleaved floats;
/// `attrs` supplies any of the optional parallel arrays, each of length
/// `N` (or `3*N` for colors).
pub fn downsample(
    positions: &[f32],
    bounds: &Bounds,
    voxel_size: f32,
    attrs: Attributes<'_>,
) -> Result<DownsampleOutput> {
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

    debug!(point_count, voxel_size, "voxel downsample starting");

    let mut class_histograms: HashMap<VoxelKey, HashMap<u8, u32>> = HashMap::new();
    let mut voxels: HashMap<VoxelKey, Accumulator> = HashMap::new();

    let n = point_count as usize;
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
            let position = Vec3::new(x, y, z);
            let key = voxel_key(position, bounds, voxel_size);

            let color = attrs
                .colors
                .map(|c| Vec3::new(c[i * 3], c[i * 3 + 1], c[i * 3 + 2]));
            let intensity = attrs.intensity.map(|v| v[i]);

            match voxels.get_mut(&key) {
                Some(acc) => acc.add(position, color, intensity),
                None => {
                    voxels.insert(key, Accumulator::new(position, color, intensity));
                }
            }

            if let Some(classification) = attrs.classification {
                *class_histograms
                    .entry(key)
                    .or_default()
                    .entry(classification[i])
                    .or_insert(0) += 1;
            }
        }
        chunk_start = chunk_end;
    }

    let output_count = voxels.len();
    let mut positions_out = Vec::with_capacity(output_count * 3);
    let mut colors_out = attrs.colors.map(|_| Vec::with_capacity(output_count * 3));
    let mut intensity_out = attrs.intensity.map(|_| Vec::with_capacity(output_count));
    let mut classification_out = attrs
        .classification
        .map(|_| Vec::with_capacity(output_count));

    for (key, acc) in voxels.into_iter() {
        let mean = acc.sum / acc.count as f32;
        positions_out.push(mean.x);
        positions_out.push(mean.y);
        positions_out.push(mean.z);

        if let Some(colors) = colors_out.as_mut() {
            let mean_color = acc.sum_color / acc.count as f32;
            colors.push(mean_color.x);
            colors.push(mean_color.y);
            colors.push(mean_color.z);
        }
        if let Some(intensity) = intensity_out.as_mut() {
            intensity.push(acc.sum_intensity / acc.count as f32);
        }
        if let Some(classification) = classification_out.as_mut() {
            let histogram = class_histograms.get(&key).expect("histogram tracked per occupied voxel");
            classification.push(majority_class(histogram));
        }
    }

    debug!(output_count, "voxel downsample finished");

    Ok(DownsampleOutput {
        positions: positions_out,
        colors: colors_out,
        intensity: intensity_out,
        classification: classification_out,
    })
}
