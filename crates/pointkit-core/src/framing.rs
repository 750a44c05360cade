//! Binary framing (§4.1)
//!
//! All multi-byte values are little-endian; floats are IEEE-754 binary32.
//! Reading fails closed: a short header or a payload shorter than the
//! header declared is a [`KernelError::Truncated`], which callers must
//! turn into "non-zero exit, no output" rather than the `u32 0` marker
//! used for validation rejections.

use std::io::{Read, Write};

use crate::error::{KernelError, Result};
use crate::validation::Bounds;

/// Which optional attribute arrays follow the position payload (downsample only).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeFlags {
    pub colors: bool,
    pub intensity: bool,
    pub classification: bool,
}

impl AttributeFlags {
    const COLORS_BIT: u32 = 0x1;
    const INTENSITY_BIT: u32 = 0x2;
    const CLASSIFICATION_BIT: u32 = 0x4;

    fn from_bits(bits: u32) -> Self {
        Self {
            colors: bits & Self::COLORS_BIT != 0,
            intensity: bits & Self::INTENSITY_BIT != 0,
            classification: bits & Self::CLASSIFICATION_BIT != 0,
        }
    }

    pub fn to_bits(self) -> u32 {
        let mut bits = 0;
        if self.colors {
            bits |= Self::COLORS_BIT;
        }
        if self.intensity {
            bits |= Self::INTENSITY_BIT;
        }
        if self.classification {
            bits |= Self::CLASSIFICATION_BIT;
        }
        bits
    }
}

/// The 36-byte downsample header (debug reads the same 32 bytes and ignores the flag word).
#[derive(Debug, Clone, Copy)]
pub struct DownsampleHeader {
    pub point_count: u32,
    pub voxel_size: f32,
    pub bounds: Bounds,
    pub attribute_flags: AttributeFlags,
}

/// The 12-byte smooth header.
#[derive(Debug, Clone, Copy)]
pub struct SmoothHeader {
    pub point_count: u32,
    pub smoothing_radius: f32,
    pub iterations: i64,
}

fn read_exact_or_truncated<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    reader
        .read_exact(buf)
        .map_err(|_| KernelError::Truncated(format!("{what}: stdin closed before enough bytes arrived")))
}

fn read_u32<R: Read>(reader: &mut R, what: &str) -> Result<u32> {
    let mut buf = [0u8; 4];
    read_exact_or_truncated(reader, &mut buf, what)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_f32<R: Read>(reader: &mut R, what: &str) -> Result<f32> {
    let mut buf = [0u8; 4];
    read_exact_or_truncated(reader, &mut buf, what)?;
    Ok(f32::from_le_bytes(buf))
}

/// Read `count` little-endian f32s. Fails closed if fewer bytes arrive than declared.
pub fn read_f32_array<R: Read>(reader: &mut R, count: usize, what: &str) -> Result<Vec<f32>> {
    let mut bytes = vec![0u8; count * 4];
    read_exact_or_truncated(reader, &mut bytes, what)?;
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Read `count` raw bytes (classification IDs).
pub fn read_u8_array<R: Read>(reader: &mut R, count: usize, what: &str) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; count];
    read_exact_or_truncated(reader, &mut bytes, what)?;
    Ok(bytes)
}

fn read_bounds<R: Read>(reader: &mut R) -> Result<Bounds> {
    Ok(Bounds {
        min_x: read_f32(reader, "min_x")?,
        min_y: read_f32(reader, "min_y")?,
        min_z: read_f32(reader, "min_z")?,
        max_x: read_f32(reader, "max_x")?,
        max_y: read_f32(reader, "max_y")?,
        max_z: read_f32(reader, "max_z")?,
    })
}

/// Read the 36-byte downsample header.
pub fn read_downsample_header<R: Read>(reader: &mut R) -> Result<DownsampleHeader> {
    let point_count = read_u32(reader, "point_count")?;
    let voxel_size = read_f32(reader, "voxel_size")?;
    let bounds = read_bounds(reader)?;
    let attribute_flags = AttributeFlags::from_bits(read_u32(reader, "attribute_flags")?);
    Ok(DownsampleHeader {
        point_count,
        voxel_size,
        bounds,
        attribute_flags,
    })
}

/// Read the 32-byte debug header (identical layout, no flag word).
pub fn read_debug_header<R: Read>(reader: &mut R) -> Result<(u32, f32, Bounds)> {
    let point_count = read_u32(reader, "point_count")?;
    let voxel_size = read_f32(reader, "voxel_size")?;
    let bounds = read_bounds(reader)?;
    Ok((point_count, voxel_size, bounds))
}

/// Read the 12-byte smooth header; the on-wire iteration count is an f32, cast to integer per §4.1.
pub fn read_smooth_header<R: Read>(reader: &mut R) -> Result<SmoothHeader> {
    let point_count = read_u32(reader, "point_count")?;
    let smoothing_radius = read_f32(reader, "smoothing_radius")?;
    let iterations_as_float = read_f32(reader, "iterations_as_float")?;
    Ok(SmoothHeader {
        point_count,
        smoothing_radius,
        iterations: iterations_as_float as i64,
    })
}

/// Write the `u32 0` marker used for both "validation rejected" and
/// "best-effort empty result after a fatal error" (§4.1, §7).
pub fn write_empty_result<W: Write>(writer: &mut W) -> Result<()> {
    writer.write_all(&0u32.to_le_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Write `[u32 count][count*3 f32 positions]`.
pub fn write_positions<W: Write>(writer: &mut W, positions: &[f32]) -> Result<()> {
    debug_assert_eq!(positions.len() % 3, 0);
    let count = (positions.len() / 3) as u32;
    writer.write_all(&count.to_le_bytes())?;
    write_f32_slice(writer, positions)
}

/// Write a raw f32 slice, little-endian, with no length prefix.
pub fn write_f32_slice<W: Write>(writer: &mut W, values: &[f32]) -> Result<()> {
    for v in values {
        writer.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

/// Write a raw u8 slice with no length prefix.
pub fn write_u8_slice<W: Write>(writer: &mut W, values: &[u8]) -> Result<()> {
    writer.write_all(values)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn attribute_flags_round_trip_through_bits() {
        let flags = AttributeFlags {
            colors: true,
            intensity: false,
            classification: true,
        };
        assert_eq!(AttributeFlags::from_bits(flags.to_bits()), flags);
    }

    #[test]
    fn downsample_header_reads_36_bytes() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&4u32.to_le_bytes());
        buf.extend_from_slice(&1.0f32.to_le_bytes());
        for v in [0.0f32, 0.0, 0.0, 11.0, 1.0, 1.0] {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf.extend_from_slice(&0x5u32.to_le_bytes()); // colors + classification
        let mut cursor = Cursor::new(buf);
        let header = read_downsample_header(&mut cursor).unwrap();
        assert_eq!(header.point_count, 4);
        assert_eq!(header.voxel_size, 1.0);
        assert!(header.attribute_flags.colors);
        assert!(!header.attribute_flags.intensity);
        assert!(header.attribute_flags.classification);
    }

    #[test]
    fn truncated_header_is_truncated_error() {
        let buf = vec![0u8; 10];
        let mut cursor = Cursor::new(buf);
        let err = read_downsample_header(&mut cursor).unwrap_err();
        assert!(matches!(err, KernelError::Truncated(_)));
    }

    #[test]
    fn truncated_payload_is_truncated_error() {
        let buf = vec![0u8; 8]; // declares more than it provides
        let mut cursor = Cursor::new(buf);
        let err = read_f32_array(&mut cursor, 10, "positions").unwrap_err();
        assert!(matches!(err, KernelError::Truncated(_)));
    }

    #[test]
    fn write_positions_round_trips_bitwise() {
        let mut out = Vec::new();
        write_positions(&mut out, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let mut cursor = Cursor::new(out);
        let count = {
            let mut b = [0u8; 4];
            cursor.read_exact(&mut b).unwrap();
            u32::from_le_bytes(b)
        };
        assert_eq!(count, 2);
        let positions = read_f32_array(&mut cursor, 6, "positions").unwrap();
        assert_eq!(positions, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn empty_result_is_four_zero_bytes() {
        let mut out = Vec::new();
        write_empty_result(&mut out).unwrap();
        assert_eq!(out, vec![0u8, 0, 0, 0]);
    }
}
