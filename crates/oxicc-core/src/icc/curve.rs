//! Curve Tag Types
//!
//! Tone reproduction curves come in two encodings:
//! - `curv`: identity, a single gamma, or a table of 16-bit samples
//! - `para`: one of five parametric function types
//!
//! Both decode into [`Curve`]. Tables stay borrowed from the profile buffer.
//!
//! See ICC.1:2022 Sections 10.6 (curv) and 10.18 (para)

use super::error::CurveError;
use super::reader::{read_s15fixed16, read_u16, read_u32};
use super::types::TypeSignature;
use crate::math::TransferFunction;

/// Type signature, reserved, entry count / function type
const CURVE_HEADER_SIZE: usize = 12;

/// Parameter bytes for `para` function types 0 through 4
const PARA_PARAM_BYTES: [usize; 5] = [4, 12, 16, 20, 28];

/// Sample width of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableWidth {
    U8,
    #[default]
    U16,
}

impl TableWidth {
    #[inline]
    pub const fn bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
        }
    }
}

/// A borrowed table of big-endian samples spanning x in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CurveTable<'a> {
    pub entries: u32,
    pub width: TableWidth,
    pub data: &'a [u8],
}

impl<'a> CurveTable<'a> {
    /// Sample `i` normalized to [0, 1]
    #[inline]
    pub fn sample(&self, i: u32) -> Option<f32> {
        if i >= self.entries {
            return None;
        }
        let i = i as usize;
        match self.width {
            TableWidth::U8 => self.data.get(i).map(|&v| v as f32 * (1.0 / 255.0)),
            TableWidth::U16 => self
                .data
                .get(i * 2..i * 2 + 2)
                .map(|_| read_u16(self.data, i * 2) as f32 * (1.0 / 65535.0)),
        }
    }

    /// Linear interpolation between samples; `x` is clamped to [0, 1]
    pub fn eval(&self, x: f32) -> f32 {
        if self.entries == 0 {
            return x;
        }
        let last = self.entries - 1;
        // NaN clamps to 0
        let x = if x > 0.0 { x.min(1.0) } else { 0.0 };
        let pos = x * last as f32;
        let lo = (pos as u32).min(last);
        let hi = (lo + 1).min(last);
        let t = pos - lo as f32;
        let a = self.sample(lo).unwrap_or(0.0);
        let b = self.sample(hi).unwrap_or(a);
        a + (b - a) * t
    }

    /// Iterate `(x, y)` sample pairs with `x = i / (n - 1)`
    pub fn points(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        let denom = (self.entries.max(2) - 1) as f32;
        (0..self.entries).filter_map(move |i| Some((i as f32 / denom, self.sample(i)?)))
    }
}

/// A decoded tone curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve<'a> {
    Parametric(TransferFunction),
    Table(CurveTable<'a>),
}

impl<'a> Curve<'a> {
    #[inline]
    pub fn eval(&self, x: f32) -> f32 {
        match self {
            Curve::Parametric(tf) => tf.eval(x),
            Curve::Table(table) => table.eval(x),
        }
    }

    pub fn as_parametric(&self) -> Option<&TransferFunction> {
        match self {
            Curve::Parametric(tf) => Some(tf),
            Curve::Table(_) => None,
        }
    }

    pub fn as_table(&self) -> Option<&CurveTable<'a>> {
        match self {
            Curve::Parametric(_) => None,
            Curve::Table(table) => Some(table),
        }
    }
}

/// Decode a `curv` or `para` tag body
pub fn read_curve(bytes: &[u8]) -> Result<Curve<'_>, CurveError> {
    if bytes.len() < 4 {
        return Err(CurveError::Truncated {
            needed: 4,
            available: bytes.len(),
        });
    }

    match TypeSignature(read_u32(bytes, 0)) {
        TypeSignature::PARA => read_para(bytes),
        TypeSignature::CURVE => read_curv(bytes),
        other => Err(CurveError::UnknownType(other)),
    }
}

fn read_para(bytes: &[u8]) -> Result<Curve<'_>, CurveError> {
    ensure_len(bytes, CURVE_HEADER_SIZE as u64)?;

    let function_type = read_u16(bytes, 8);
    let param_bytes = *PARA_PARAM_BYTES
        .get(function_type as usize)
        .ok_or(CurveError::FunctionType(function_type))?;
    ensure_len(bytes, (CURVE_HEADER_SIZE + param_bytes) as u64)?;

    let param = |i: usize| read_s15fixed16(bytes, CURVE_HEADER_SIZE + i * 4);
    let mut tf = TransferFunction {
        g: param(0),
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 0.0,
        e: 0.0,
        f: 0.0,
    };

    match function_type {
        // Y = (aX + b)^g for X >= -b/a, else 0
        1 => {
            tf.a = param(1);
            tf.b = param(2);
            tf.d = breakpoint(tf.a, tf.b)?;
        }
        // Y = (aX + b)^g + c for X >= -b/a, else c
        2 => {
            tf.a = param(1);
            tf.b = param(2);
            tf.e = param(3);
            tf.d = breakpoint(tf.a, tf.b)?;
            tf.f = tf.e;
        }
        3 => {
            tf.a = param(1);
            tf.b = param(2);
            tf.c = param(3);
            tf.d = param(4);
        }
        4 => {
            tf.a = param(1);
            tf.b = param(2);
            tf.c = param(3);
            tf.d = param(4);
            tf.e = param(5);
            tf.f = param(6);
        }
        _ => {}
    }

    Ok(Curve::Parametric(tf))
}

#[inline]
fn breakpoint(a: f32, b: f32) -> Result<f32, CurveError> {
    if a == 0.0 {
        return Err(CurveError::ZeroSlope);
    }
    Ok(-b / a)
}

fn read_curv(bytes: &[u8]) -> Result<Curve<'_>, CurveError> {
    ensure_len(bytes, CURVE_HEADER_SIZE as u64)?;
    let entries = read_u32(bytes, 8);
    ensure_len(bytes, CURVE_HEADER_SIZE as u64 + entries as u64 * 2)?;

    let gamma = match entries {
        0 => 1.0,
        // u8Fixed8Number
        1 => read_u16(bytes, CURVE_HEADER_SIZE) as f32 * (1.0 / 256.0),
        _ => {
            let end = CURVE_HEADER_SIZE + entries as usize * 2;
            return Ok(Curve::Table(CurveTable {
                entries,
                width: TableWidth::U16,
                data: &bytes[CURVE_HEADER_SIZE..end],
            }));
        }
    };

    Ok(Curve::Parametric(TransferFunction {
        g: gamma,
        ..TransferFunction::LINEAR
    }))
}

#[inline]
fn ensure_len(bytes: &[u8], needed: u64) -> Result<(), CurveError> {
    if (bytes.len() as u64) < needed {
        return Err(CurveError::Truncated {
            needed,
            available: bytes.len(),
        });
    }
    Ok(())
}
