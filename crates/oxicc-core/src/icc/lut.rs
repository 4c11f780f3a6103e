//! LUT-based Tag Types
//!
//! `mft1` (lut8Type) and `mft2` (lut16Type) share a 48-byte header: type
//! signature, reserved, channel counts, grid points and a 3x3 matrix. The
//! tables follow as input curves, then the color grid, then output curves.
//!
//! See ICC.1:2022 Sections 10.10 and 10.11

use super::curve::{CurveTable, TableWidth};
use super::error::LutError;
use super::reader::{read_s15fixed16, read_u16};
use super::tag::Tag;
use super::types::TypeSignature;
use crate::math::Matrix3x3;

const MFT_COMMON_SIZE: usize = 48;
const MFT1_HEADER_SIZE: usize = MFT_COMMON_SIZE;
const MFT2_HEADER_SIZE: usize = MFT_COMMON_SIZE + 4;

const OFFSET_INPUT_CHANNELS: usize = 8;
const OFFSET_OUTPUT_CHANNELS: usize = 9;
const OFFSET_GRID_POINTS: usize = 10;
const OFFSET_MATRIX: usize = 12;

const MAX_INPUT_CHANNELS: u8 = 4;
const OUTPUT_CHANNELS: u8 = 3;
const MFT1_TABLE_SIZE: u16 = 256;
const MFT2_TABLE_SIZE_RANGE: std::ops::RangeInclusive<u16> = 2..=4096;

/// A decoded `mft1`/`mft2` tag, borrowing its tables from the profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiFunctionTable<'a> {
    pub input_channels: u8,
    pub output_channels: u8,
    pub grid_points: u8,
    pub matrix: Matrix3x3,
    pub width: TableWidth,
    /// One per input channel; entries past `input_channels` are empty
    pub input_tables: [CurveTable<'a>; 4],
    pub grid: &'a [u8],
    pub output_tables: [CurveTable<'a>; 3],
}

impl<'a> MultiFunctionTable<'a> {
    /// Decode an `A2B0` tag body
    pub fn parse(tag: &Tag<'a>) -> Result<Self, LutError> {
        let bytes = tag.data;
        let (header_size, width, input_size, output_size) = match tag.type_signature {
            TypeSignature::LUT8 => {
                ensure_header(bytes, MFT1_HEADER_SIZE)?;
                (MFT1_HEADER_SIZE, TableWidth::U8, MFT1_TABLE_SIZE, MFT1_TABLE_SIZE)
            }
            TypeSignature::LUT16 => {
                ensure_header(bytes, MFT2_HEADER_SIZE)?;
                let input_size = read_u16(bytes, MFT_COMMON_SIZE);
                let output_size = read_u16(bytes, MFT_COMMON_SIZE + 2);
                (MFT2_HEADER_SIZE, TableWidth::U16, input_size, output_size)
            }
            other => return Err(LutError::UnknownType(other)),
        };

        let input_channels = bytes[OFFSET_INPUT_CHANNELS];
        let output_channels = bytes[OFFSET_OUTPUT_CHANNELS];
        let grid_points = bytes[OFFSET_GRID_POINTS];

        if output_channels != OUTPUT_CHANNELS {
            return Err(LutError::OutputChannels(output_channels));
        }
        if !(1..=MAX_INPUT_CHANNELS).contains(&input_channels) {
            return Err(LutError::InputChannels(input_channels));
        }
        if grid_points < 2 {
            return Err(LutError::GridPoints(grid_points));
        }
        for size in [input_size, output_size] {
            if width == TableWidth::U16 && !MFT2_TABLE_SIZE_RANGE.contains(&size) {
                return Err(LutError::TableSize(size));
            }
        }

        let mut matrix = Matrix3x3::identity();
        for (r, row) in matrix.vals.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = read_s15fixed16(bytes, OFFSET_MATRIX + (r * 3 + c) * 4);
            }
        }

        // Region sizes in u64 so hostile counts cannot wrap
        let w = width.bytes() as u64;
        let input_table_len = input_size as u64 * w;
        let output_table_len = output_size as u64 * w;
        let all_inputs = input_channels as u64 * input_table_len;
        let grid_len = (grid_points as u64).pow(input_channels as u32) * output_channels as u64 * w;
        let all_outputs = output_channels as u64 * output_table_len;

        let tables = &bytes[header_size..];
        let needed = all_inputs + grid_len + all_outputs;
        if needed > tables.len() as u64 {
            return Err(LutError::TablesTruncated {
                needed,
                available: tables.len() as u64,
            });
        }

        // Everything below fits in `tables.len()`, so the casts are lossless
        let (input_table_len, output_table_len) = (input_table_len as usize, output_table_len as usize);
        let (all_inputs, grid_len) = (all_inputs as usize, grid_len as usize);

        let mut input_tables = [CurveTable::default(); 4];
        for (i, table) in input_tables.iter_mut().take(input_channels as usize).enumerate() {
            let start = i * input_table_len;
            *table = CurveTable {
                entries: input_size as u32,
                width,
                data: &tables[start..start + input_table_len],
            };
        }

        let grid = &tables[all_inputs..all_inputs + grid_len];

        let mut output_tables = [CurveTable::default(); 3];
        for (i, table) in output_tables.iter_mut().enumerate() {
            let start = all_inputs + grid_len + i * output_table_len;
            *table = CurveTable {
                entries: output_size as u32,
                width,
                data: &tables[start..start + output_table_len],
            };
        }

        Ok(Self {
            input_channels,
            output_channels,
            grid_points,
            matrix,
            width,
            input_tables,
            grid,
            output_tables,
        })
    }

    /// The input curves that are in use
    pub fn inputs(&self) -> &[CurveTable<'a>] {
        &self.input_tables[..self.input_channels as usize]
    }

    #[inline]
    fn grid_value(&self, index: usize) -> f32 {
        match self.width {
            TableWidth::U8 => self.grid.get(index).map_or(0.0, |&v| v as f32 * (1.0 / 255.0)),
            TableWidth::U16 => self
                .grid
                .get(index * 2..index * 2 + 2)
                .map_or(0.0, |_| read_u16(self.grid, index * 2) as f32 * (1.0 / 65535.0)),
        }
    }

    /// Run `input` through the whole table
    ///
    /// Missing input channels read as 0. The matrix only applies to
    /// three-channel input.
    pub fn eval(&self, input: &[f32]) -> [f32; 3] {
        let n = self.input_channels as usize;
        let mut values = [0.0f32; 4];
        for (v, &x) in values.iter_mut().zip(input).take(n) {
            *v = x;
        }

        if n == 3 {
            let m = self.matrix.multiply_vec([values[0], values[1], values[2]]);
            values[..3].copy_from_slice(&m);
        }

        for (v, table) in values.iter_mut().zip(self.inputs()) {
            *v = table.eval(*v);
        }

        // Multilinear interpolation over the 2^n surrounding grid points.
        // The first channel varies slowest.
        let last = (self.grid_points - 1) as f32;
        let mut lo = [0usize; 4];
        let mut frac = [0.0f32; 4];
        let mut strides = [0usize; 4];
        let mut stride = self.output_channels as usize;
        for i in (0..n).rev() {
            strides[i] = stride;
            stride *= self.grid_points as usize;

            let pos = if values[i] > 0.0 { values[i].min(1.0) * last } else { 0.0 };
            let base = (pos as usize).min(self.grid_points as usize - 2);
            lo[i] = base;
            frac[i] = pos - base as f32;
        }

        let mut color = [0.0f32; 3];
        for corner in 0..(1usize << n) {
            let mut weight = 1.0;
            let mut offset = 0;
            for i in 0..n {
                let step = (corner >> i) & 1;
                weight *= if step == 1 { frac[i] } else { 1.0 - frac[i] };
                offset += (lo[i] + step) * strides[i];
            }
            if weight == 0.0 {
                continue;
            }
            for (c, out) in color.iter_mut().enumerate() {
                *out += weight * self.grid_value(offset + c);
            }
        }

        for (c, table) in color.iter_mut().zip(self.output_tables.iter()) {
            *c = table.eval(*c);
        }
        color
    }
}

#[inline]
fn ensure_header(bytes: &[u8], needed: usize) -> Result<(), LutError> {
    if bytes.len() < needed {
        return Err(LutError::HeaderTruncated {
            needed,
            available: bytes.len(),
        });
    }
    Ok(())
}
