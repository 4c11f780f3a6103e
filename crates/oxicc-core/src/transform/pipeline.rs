//! Transform pipeline
//!
//! A pipeline is the list of stages between a load and a store. Stages run
//! over fixed-size batches of `[r, g, b, a]` pixels using the kernels in
//! [`crate::simd`].
//!
//! Color stages are skipped entirely when the two profiles are
//! approximately equal and the alpha conventions allow it, so converting
//! between formats under one profile is exact.

use tracing::trace;

use super::format::{AlphaFormat, PixelFormat};
use super::pack::{load, store};
use super::{TransformError, TransformOptions};
use crate::icc::{Curve, Profile};
use crate::math::{Matrix3x3, TransferFunction};
use crate::simd;

/// Pixels per batch
pub(crate) const CHUNK_PIXELS: usize = 256;

/// One step of a pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Stage<'a> {
    ForceOpaque,
    Premultiply,
    Unpremultiply,
    /// One function on all three channels
    Parametric(TransferFunction),
    /// A curve per channel
    Curves([Curve<'a>; 3]),
    Matrix(Matrix3x3),
}

impl Stage<'_> {
    fn apply(&self, pixels: &mut [[f32; 4]]) {
        match self {
            Stage::ForceOpaque => simd::force_opaque_batch(pixels),
            Stage::Premultiply => simd::premultiply_batch(pixels),
            Stage::Unpremultiply => simd::unpremultiply_batch(pixels),
            Stage::Parametric(tf) => simd::apply_transfer_batch(tf, pixels),
            Stage::Curves(curves) => simd::apply_curves_batch(curves, pixels),
            Stage::Matrix(m) => simd::apply_matrix_batch(m, pixels),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Stage::ForceOpaque => "force_opaque",
            Stage::Premultiply => "premul",
            Stage::Unpremultiply => "unpremul",
            Stage::Parametric(_) => "parametric",
            Stage::Curves(_) => "curves",
            Stage::Matrix(_) => "matrix",
        }
    }
}

/// A validated load → stages → store program
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Pipeline<'a> {
    src_format: PixelFormat,
    dst_format: PixelFormat,
    stages: Vec<Stage<'a>>,
}

impl<'a> Pipeline<'a> {
    /// Compose the stages converting `src` pixels into `dst` pixels
    ///
    /// Every facet the conversion needs is checked here, so running the
    /// result cannot fail.
    pub(crate) fn build(
        dst_format: PixelFormat,
        dst_profile: &Profile<'_>,
        src_format: PixelFormat,
        src_profile: &Profile<'a>,
        options: &TransformOptions,
    ) -> Result<Self, TransformError> {
        let TransformOptions {
            src_alpha,
            dst_alpha,
            ..
        } = *options;
        let mut stages = Vec::new();

        if src_alpha == AlphaFormat::Opaque {
            stages.push(Stage::ForceOpaque);
        }

        let linear_alpha = src_alpha == AlphaFormat::PremulLinear || dst_alpha == AlphaFormat::PremulLinear;
        let color = !src_profile.approximately_equal(dst_profile) || (src_alpha != dst_alpha && linear_alpha);

        if color {
            if src_alpha == AlphaFormat::PremulAsEncoded {
                stages.push(Stage::Unpremultiply);
            }
            stages.extend(linearize(src_profile)?);
            if src_alpha == AlphaFormat::PremulLinear {
                stages.push(Stage::Unpremultiply);
            }
            stages.extend(gamut(src_profile, dst_profile)?.map(Stage::Matrix));
            if dst_alpha == AlphaFormat::PremulLinear {
                stages.push(Stage::Premultiply);
            }
            stages.extend(encode(dst_profile)?);
            if dst_alpha == AlphaFormat::PremulAsEncoded {
                stages.push(Stage::Premultiply);
            }
        } else if src_alpha != dst_alpha {
            if src_alpha == AlphaFormat::PremulAsEncoded {
                stages.push(Stage::Unpremultiply);
            }
            if dst_alpha == AlphaFormat::PremulAsEncoded {
                stages.push(Stage::Premultiply);
            }
        }

        if dst_alpha == AlphaFormat::Opaque {
            stages.push(Stage::ForceOpaque);
        }

        trace!(
            ?src_format,
            ?dst_format,
            stages = ?stages.iter().map(Stage::name).collect::<Vec<_>>(),
            simd = simd::active_features(),
            "built transform pipeline"
        );

        Ok(Self {
            src_format,
            dst_format,
            stages,
        })
    }

    #[cfg(test)]
    pub(crate) fn stages(&self) -> &[Stage<'a>] {
        &self.stages
    }

    /// Bytes of source per batch
    pub(crate) fn src_chunk_len(&self) -> usize {
        CHUNK_PIXELS * self.src_format.bytes_per_pixel()
    }

    /// Bytes of destination per batch
    pub(crate) fn dst_chunk_len(&self) -> usize {
        CHUNK_PIXELS * self.dst_format.bytes_per_pixel()
    }

    /// Convert one batch of at most [`CHUNK_PIXELS`] pixels
    pub(crate) fn run_chunk(&self, src: &[u8], dst: &mut [u8]) {
        let n = src.len() / self.src_format.bytes_per_pixel();
        let mut scratch = [[0.0f32; 4]; CHUNK_PIXELS];
        let pixels = &mut scratch[..n];

        load(self.src_format, src, pixels);
        self.apply(pixels);
        store(self.dst_format, pixels, dst);
    }

    /// Convert one batch in place; both formats have the same width
    pub(crate) fn run_chunk_in_place(&self, buf: &mut [u8]) {
        let n = buf.len() / self.src_format.bytes_per_pixel();
        let mut scratch = [[0.0f32; 4]; CHUNK_PIXELS];
        let pixels = &mut scratch[..n];

        load(self.src_format, buf, pixels);
        self.apply(pixels);
        store(self.dst_format, pixels, buf);
    }

    #[inline]
    fn apply(&self, pixels: &mut [[f32; 4]]) {
        for stage in &self.stages {
            stage.apply(pixels);
        }
    }
}

/// Encoded → linear for the source
fn linearize<'a>(src: &Profile<'a>) -> Result<Option<Stage<'a>>, TransformError> {
    if let Some(tf) = src.transfer_function() {
        return Ok((!tf.is_linear(0.0)).then_some(Stage::Parametric(*tf)));
    }
    src.trc()
        .map(|curves| Some(Stage::Curves(*curves)))
        .ok_or(TransformError::MissingTransferFunction)
}

/// Linear → encoded for the destination
fn encode(dst: &Profile<'_>) -> Result<Option<Stage<'static>>, TransformError> {
    let tf = dst
        .transfer_function()
        .ok_or(TransformError::MissingTransferFunction)?;
    let inverse = tf
        .invert()
        .ok_or(TransformError::NonInvertibleTransferFunction)?;
    Ok((!inverse.is_linear(0.0)).then_some(Stage::Parametric(inverse)))
}

/// `dst⁻¹ · src`, or `None` when the gamuts match or neither profile has one
fn gamut(src: &Profile<'_>, dst: &Profile<'_>) -> Result<Option<Matrix3x3>, TransformError> {
    match (src.to_xyzd50(), dst.to_xyzd50()) {
        (Some(src_m), Some(dst_m)) => {
            let dst_inv = dst_m.invert().ok_or(TransformError::SingularMatrix)?;
            if src_m == dst_m {
                return Ok(None);
            }
            Ok(Some(dst_inv.multiply(src_m)))
        }
        (None, None) => Ok(None),
        _ => Err(TransformError::MissingGamut),
    }
}
