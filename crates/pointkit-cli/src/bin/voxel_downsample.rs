//! `voxel-downsample`: reduce a point cloud to one averaged representative
//! per occupied voxel, optionally carrying color / intensity / classification.
//! See `pointkit_core::downsample` and spec §4.2.

use std::io::{self, Write};

use pointkit_core::downsample::{downsample, Attributes};
use pointkit_core::framing::{
    read_downsample_header, read_f32_array, read_u8_array, write_positions, write_u8_slice,
};
use pointkit_core::validation::{check_point_count, check_positive_finite};

fn run() -> Result<(), pointkit_core::KernelError> {
    let mut stdin = io::stdin().lock();
    let header = read_downsample_header(&mut stdin)?;
    check_point_count(header.point_count as u64, 3)?;
    header.bounds.validate()?;
    check_positive_finite(header.voxel_size, "voxel_size")?;

    let positions = read_f32_array(&mut stdin, header.point_count as usize * 3, "positions")?;
    let colors = if header.attribute_flags.colors {
        Some(read_f32_array(
            &mut stdin,
            header.point_count as usize * 3,
            "colors",
        )?)
    } else {
        None
    };
    let intensity = if header.attribute_flags.intensity {
        Some(read_f32_array(
            &mut stdin,
            header.point_count as usize,
            "intensity",
        )?)
    } else {
        None
    };
    let classification = if header.attribute_flags.classification {
        Some(read_u8_array(
            &mut stdin,
            header.point_count as usize,
            "classification",
        )?)
    } else {
        None
    };

    let output = downsample(
        &positions,
        &header.bounds,
        header.voxel_size,
        Attributes {
            colors: colors.as_deref(),
            intensity: intensity.as_deref(),
            classification: classification.as_deref(),
        },
    )?;

    let mut stdout = io::stdout().lock();
    write_positions(&mut stdout, &output.positions)?;
    if let Some(colors) = &output.colors {
        pointkit_core::framing::write_f32_slice(&mut stdout, colors)?;
    }
    if let Some(intensity) = &output.intensity {
        pointkit_core::framing::write_f32_slice(&mut stdout, intensity)?;
    }
    if let Some(classification) = &output.classification {
        write_u8_slice(&mut stdout, classification)?;
    }
    stdout.flush()?;
    Ok(())
}

fn main() {
    pointkit_cli::init_logging();
    std::process::exit(pointkit_cli::run(run));
}
