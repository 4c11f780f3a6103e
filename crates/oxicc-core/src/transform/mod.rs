//! Pixel transforms
//!
//! Converts `n` pixels from one pixel format and profile to another. Every
//! call validates buffers and profiles before writing anything, then runs a
//! pipeline of stages over batches of pixels.
//!
//! # Example
//!
//! ```
//! use oxicc_core::{transform, PixelFormat, Profile};
//!
//! let src = [0x10u8, 0x20, 0x30, 0xff];
//! let mut dst = [0u8; 3];
//! transform(
//!     &mut dst,
//!     PixelFormat::Bgr888,
//!     Profile::srgb(),
//!     &src,
//!     PixelFormat::Rgba8888,
//!     Profile::srgb(),
//!     1,
//! )?;
//! assert_eq!(dst, [0x30, 0x20, 0x10]);
//! # Ok::<(), oxicc_core::Error>(())
//! ```

mod format;
mod pack;
mod pipeline;

use thiserror::Error;
use tracing::debug;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

pub use format::{AlphaFormat, PixelFormat};

use crate::error::Result;
use crate::icc::Profile;
use pipeline::Pipeline;

/// Why a transform was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("source buffer is {len} bytes, {needed} needed")]
    SourceTooSmall { needed: usize, len: usize },

    #[error("destination buffer is {len} bytes, {needed} needed")]
    DestinationTooSmall { needed: usize, len: usize },

    #[error("pixel count overflows the buffer size")]
    Overflow,

    #[error("in-place transform needs equal pixel widths, got {src} and {dst} bytes")]
    InPlaceWidthMismatch { src: usize, dst: usize },

    #[error("profile has no usable transfer function")]
    MissingTransferFunction,

    #[error("only one profile has a to-XYZD50 matrix")]
    MissingGamut,

    #[error("destination matrix is singular")]
    SingularMatrix,

    #[error("destination transfer function has no inverse")]
    NonInvertibleTransferFunction,
}

/// Transform options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransformOptions {
    pub src_alpha: AlphaFormat,
    pub dst_alpha: AlphaFormat,
    /// Split the work across the rayon thread pool; needs the `rayon`
    /// feature and is ignored without it
    pub parallel: bool,
}

/// Convert `n_pixels` pixels from `src` into `dst`
///
/// Both buffers may be longer than `n_pixels` pixels; the rest is left
/// untouched. Uses unpremultiplied alpha on both sides.
pub fn transform(
    dst: &mut [u8],
    dst_format: PixelFormat,
    dst_profile: &Profile<'_>,
    src: &[u8],
    src_format: PixelFormat,
    src_profile: &Profile<'_>,
    n_pixels: usize,
) -> Result<()> {
    transform_with_options(
        dst,
        dst_format,
        dst_profile,
        src,
        src_format,
        src_profile,
        n_pixels,
        &TransformOptions::default(),
    )
}

/// [`transform`] with explicit alpha conventions and threading
#[allow(clippy::too_many_arguments)]
pub fn transform_with_options(
    dst: &mut [u8],
    dst_format: PixelFormat,
    dst_profile: &Profile<'_>,
    src: &[u8],
    src_format: PixelFormat,
    src_profile: &Profile<'_>,
    n_pixels: usize,
    options: &TransformOptions,
) -> Result<()> {
    let (pipeline, src_len, dst_len) =
        prepare(dst.len(), dst_format, dst_profile, src.len(), src_format, src_profile, n_pixels, options)
            .inspect_err(|e| debug!("rejecting transform: {e}"))?;

    let src = &src[..src_len];
    let dst = &mut dst[..dst_len];

    #[cfg(feature = "rayon")]
    if options.parallel {
        src.par_chunks(pipeline.src_chunk_len())
            .zip(dst.par_chunks_mut(pipeline.dst_chunk_len()))
            .for_each(|(s, d)| pipeline.run_chunk(s, d));
        return Ok(());
    }

    for (s, d) in src
        .chunks(pipeline.src_chunk_len())
        .zip(dst.chunks_mut(pipeline.dst_chunk_len()))
    {
        pipeline.run_chunk(s, d);
    }
    Ok(())
}

/// Convert `n_pixels` pixels of `buf` in place
///
/// Fails with [`TransformError::InPlaceWidthMismatch`] unless both formats
/// have the same bytes per pixel.
pub fn transform_in_place(
    buf: &mut [u8],
    dst_format: PixelFormat,
    dst_profile: &Profile<'_>,
    src_format: PixelFormat,
    src_profile: &Profile<'_>,
    n_pixels: usize,
) -> Result<()> {
    transform_in_place_with_options(
        buf,
        dst_format,
        dst_profile,
        src_format,
        src_profile,
        n_pixels,
        &TransformOptions::default(),
    )
}

/// [`transform_in_place`] with explicit alpha conventions and threading
pub fn transform_in_place_with_options(
    buf: &mut [u8],
    dst_format: PixelFormat,
    dst_profile: &Profile<'_>,
    src_format: PixelFormat,
    src_profile: &Profile<'_>,
    n_pixels: usize,
    options: &TransformOptions,
) -> Result<()> {
    let (src_bpp, dst_bpp) = (src_format.bytes_per_pixel(), dst_format.bytes_per_pixel());
    if src_bpp != dst_bpp {
        let err = TransformError::InPlaceWidthMismatch {
            src: src_bpp,
            dst: dst_bpp,
        };
        debug!("rejecting in-place transform: {err}");
        return Err(err.into());
    }
    let (pipeline, len, _) =
        prepare(buf.len(), dst_format, dst_profile, buf.len(), src_format, src_profile, n_pixels, options)
            .inspect_err(|e| debug!("rejecting in-place transform: {e}"))?;

    let buf = &mut buf[..len];

    #[cfg(feature = "rayon")]
    if options.parallel {
        buf.par_chunks_mut(pipeline.src_chunk_len())
            .for_each(|chunk| pipeline.run_chunk_in_place(chunk));
        return Ok(());
    }

    for chunk in buf.chunks_mut(pipeline.src_chunk_len()) {
        pipeline.run_chunk_in_place(chunk);
    }
    Ok(())
}

/// [`transform`] over typed pixel buffers such as `&[u32]` or `&[u16]`
///
/// The buffers are reinterpreted as bytes in native order, so a `u32`
/// holding `0xAABBGGRR` is one `Rgba8888` pixel on a little-endian target.
pub fn transform_slices<S: bytemuck::Pod, D: bytemuck::Pod>(
    dst: &mut [D],
    dst_format: PixelFormat,
    dst_profile: &Profile<'_>,
    src: &[S],
    src_format: PixelFormat,
    src_profile: &Profile<'_>,
    n_pixels: usize,
) -> Result<()> {
    transform(
        bytemuck::cast_slice_mut(dst),
        dst_format,
        dst_profile,
        bytemuck::cast_slice(src),
        src_format,
        src_profile,
        n_pixels,
    )
}

/// Check buffer sizes and build the pipeline, returning the byte lengths
/// of the source and destination pixels
#[allow(clippy::too_many_arguments)]
fn prepare<'a>(
    dst_len: usize,
    dst_format: PixelFormat,
    dst_profile: &Profile<'_>,
    src_len: usize,
    src_format: PixelFormat,
    src_profile: &Profile<'a>,
    n_pixels: usize,
    options: &TransformOptions,
) -> std::result::Result<(Pipeline<'a>, usize, usize), TransformError> {
    let src_needed = byte_len(src_format, n_pixels)?;
    let dst_needed = byte_len(dst_format, n_pixels)?;
    if src_len < src_needed {
        return Err(TransformError::SourceTooSmall {
            needed: src_needed,
            len: src_len,
        });
    }
    if dst_len < dst_needed {
        return Err(TransformError::DestinationTooSmall {
            needed: dst_needed,
            len: dst_len,
        });
    }
    let pipeline = Pipeline::build(dst_format, dst_profile, src_format, src_profile, options)?;
    Ok((pipeline, src_needed, dst_needed))
}

fn byte_len(format: PixelFormat, n_pixels: usize) -> std::result::Result<usize, TransformError> {
    n_pixels
        .checked_mul(format.bytes_per_pixel())
        .ok_or(TransformError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_buffer_checks() {
        let srgb = Profile::srgb();
        let src = [0u8; 8];
        let mut dst = [0u8; 8];

        let err = transform(&mut dst, PixelFormat::Rgba8888, srgb, &src, PixelFormat::Rgba8888, srgb, 3);
        assert_eq!(
            err,
            Err(Error::IncompatibleTransform(TransformError::SourceTooSmall { needed: 12, len: 8 }))
        );

        let err = transform(&mut dst, PixelFormat::RgbaFfff, srgb, &src, PixelFormat::Rgba8888, srgb, 2);
        assert_eq!(
            err,
            Err(Error::IncompatibleTransform(TransformError::DestinationTooSmall { needed: 32, len: 8 }))
        );

        let err = transform(&mut dst, PixelFormat::Rgb565, srgb, &src, PixelFormat::Rgba8888, srgb, usize::MAX);
        assert_eq!(err, Err(Error::IncompatibleTransform(TransformError::Overflow)));
    }

    #[test]
    fn test_rejected_transform_writes_nothing() {
        let srgb = Profile::srgb();
        let no_matrix = Profile::synthetic(Some(crate::math::TransferFunction::SRGB), None);
        let src = [0x55u8; 16];
        let mut dst = [0xaau8; 16];
        let err = transform(&mut dst, PixelFormat::Rgba8888, &no_matrix, &src, PixelFormat::Rgba8888, srgb, 4);
        assert_eq!(err, Err(Error::IncompatibleTransform(TransformError::MissingGamut)));
        assert_eq!(dst, [0xaa; 16]);
    }

    #[test]
    fn test_tail_is_untouched() {
        let srgb = Profile::srgb();
        let src = [1u8, 2, 3, 4, 5, 6];
        let mut dst = [0xffu8; 12];
        transform(&mut dst, PixelFormat::Rgba8888, srgb, &src, PixelFormat::Rgb888, srgb, 1).unwrap();
        assert_eq!(dst, [1, 2, 3, 255, 255, 255, 255, 255, 255, 255, 255, 255]);
    }

    #[test]
    fn test_zero_pixels() {
        let srgb = Profile::srgb();
        let mut dst: [u8; 0] = [];
        transform(&mut dst, PixelFormat::RgbaFfff, srgb, &[], PixelFormat::Rgb565, srgb, 0).unwrap();
    }

    #[test]
    fn test_in_place_width_mismatch() {
        let srgb = Profile::srgb();
        let mut buf = [0u8; 12];
        let err = transform_in_place(&mut buf, PixelFormat::Rgba8888, srgb, PixelFormat::Rgb888, srgb, 3);
        assert_eq!(
            err,
            Err(Error::IncompatibleTransform(TransformError::InPlaceWidthMismatch { src: 3, dst: 4 }))
        );
    }

    #[test]
    fn test_in_place_swap_spans_chunks() {
        let srgb = Profile::srgb();
        let n = pipeline::CHUNK_PIXELS * 2 + 7;
        let original: Vec<u8> = (0..n * 4).map(|i| (i * 7) as u8).collect();
        let mut buf = original.clone();

        transform_in_place(&mut buf, PixelFormat::Bgra8888, srgb, PixelFormat::Rgba8888, srgb, n).unwrap();
        for (a, b) in original.chunks_exact(4).zip(buf.chunks_exact(4)) {
            assert_eq!([a[2], a[1], a[0], a[3]], [b[0], b[1], b[2], b[3]]);
        }

        transform_in_place(&mut buf, PixelFormat::Rgba8888, srgb, PixelFormat::Bgra8888, srgb, n).unwrap();
        assert_eq!(buf, original);
    }

    #[test]
    fn test_transform_slices() {
        let srgb = Profile::srgb();
        let src: [u32; 3] = [0x03020100, 0x07060504, 0x0b0a0908];
        let mut dst = [0u8; 9];
        transform_slices(&mut dst, PixelFormat::Rgb888, srgb, &src, PixelFormat::Rgba8888, srgb, 3).unwrap();
        if cfg!(target_endian = "little") {
            assert_eq!(dst, [0, 1, 2, 4, 5, 6, 8, 9, 10]);
        }
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_parallel_matches_serial() {
        let n = pipeline::CHUNK_PIXELS * 5 + 3;
        let src: Vec<u8> = (0..n * 4).map(|i| (i * 13) as u8).collect();
        let mut serial = vec![0u8; n * 16];
        let mut parallel = vec![0u8; n * 16];
        let options = TransformOptions {
            parallel: true,
            ..Default::default()
        };

        transform(&mut serial, PixelFormat::RgbaFfff, Profile::xyzd50(), &src, PixelFormat::Rgba8888, Profile::srgb(), n).unwrap();
        transform_with_options(
            &mut parallel,
            PixelFormat::RgbaFfff,
            Profile::xyzd50(),
            &src,
            PixelFormat::Rgba8888,
            Profile::srgb(),
            n,
            &options,
        )
        .unwrap();
        assert_eq!(serial, parallel);
    }
}
