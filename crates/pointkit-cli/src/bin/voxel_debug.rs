//! `voxel-debug`: emit the world-space centers of all occupied voxels, with
//! no averaging — used to visualize the voxelization itself. See
//! `pointkit_core::debug` and spec §4.3.

use std::io::{self, Write};

use pointkit_core::debug::voxel_debug;
use pointkit_core::framing::{read_debug_header, read_f32_array, write_positions};
use pointkit_core::validation::{check_point_count, check_positive_finite};

fn run() -> Result<(), pointkit_core::KernelError> {
    let mut stdin = io::stdin().lock();
    let (point_count, voxel_size, bounds) = read_debug_header(&mut stdin)?;
    check_point_count(point_count as u64, 3)?;
    bounds.validate()?;
    check_positive_finite(voxel_size, "voxel_size")?;

    let positions = read_f32_array(&mut stdin, point_count as usize * 3, "positions")?;
    let centers = voxel_debug(&positions, &bounds, voxel_size)?;

    let mut stdout = io::stdout().lock();
    write_positions(&mut stdout, &centers)?;
    stdout.flush()?;
    Ok(())
}

fn main() {
    pointkit_cli::init_logging();
    std::process::exit(pointkit_cli::run(run));
}
