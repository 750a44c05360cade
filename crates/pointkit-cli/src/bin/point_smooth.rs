//! `point-smooth`: iterative uniform-grid Laplacian smoothing. See
//! `pointkit_core::smooth` and spec §4.4.

use std::io::{self, Write};

use pointkit_core::framing::{read_f32_array, read_smooth_header, write_positions};
use pointkit_core::smooth::smooth;
use pointkit_core::validation::{check_point_count, check_positive_finite, check_positive_iterations};

fn run() -> Result<(), pointkit_core::KernelError> {
    let mut stdin = io::stdin().lock();
    let header = read_smooth_header(&mut stdin)?;
    check_point_count(header.point_count as u64, 3)?;
    check_positive_finite(header.smoothing_radius, "smoothing_radius")?;
    check_positive_iterations(header.iterations)?;

    let positions = read_f32_array(&mut stdin, header.point_count as usize * 3, "positions")?;
    let smoothed = smooth(&positions, header.smoothing_radius, header.iterations)?;

    let mut stdout = io::stdout().lock();
    write_positions(&mut stdout, &smoothed)?;
    stdout.flush()?;
    Ok(())
}

fn main() {
    pointkit_cli::init_logging();
    std::process::exit(pointkit_cli::run(run));
}
