//! # oxicc - ICC profiles and pixel transforms
//!
//! Parses ICC color profiles into validated, zero-copy views and converts
//! batches of pixels between pixel formats and between the color spaces two
//! profiles describe.
//!
//! ## Goals
//!
//! - **Safe**: untrusted profile bytes never panic, every offset is checked
//! - **Zero-copy**: a [`Profile`] borrows its buffer; curves and LUTs point into it
//! - **Fast**: batched kernels with `multiversion` dispatch (AVX2, SSE4.1, NEON)
//! - **Tested**: parity tested against qcms and lcms2
//!
//! ## Quick Start
//!
//! ```
//! use oxicc_core::{transform, PixelFormat, Profile};
//!
//! # fn convert(icc: &[u8]) -> oxicc_core::Result<()> {
//! let display = Profile::parse(icc)?.usable_as_destination()?;
//!
//! let src = [255u8, 128, 64, 255];
//! let mut dst = [0u8; 4];
//! transform(
//!     &mut dst,
//!     PixelFormat::Rgba8888,
//!     &display,
//!     &src,
//!     PixelFormat::Rgba8888,
//!     Profile::srgb(),
//!     1,
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `rayon`: split large transforms across the rayon thread pool
//! - `serde`: serialize pixel formats, options, transfer functions and matrices

pub mod error;
pub mod icc;
pub mod math;
pub mod simd;
pub mod transform;

pub use error::{Error, Result};
pub use icc::{Curve, Profile, Tag, TagSignature};
pub use math::{Matrix3x3, TransferFunction};
pub use transform::{
    AlphaFormat, PixelFormat, TransformError, TransformOptions, transform, transform_in_place,
    transform_in_place_with_options, transform_slices, transform_with_options,
};

/// Version of oxicc
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
