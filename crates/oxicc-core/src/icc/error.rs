//! ICC Profile Error Types
//!
//! One enum per stage of parsing. The crate-level [`crate::Error`] wraps each
//! of them in its taxonomy variant.

use thiserror::Error;

use super::types::{TagSignature, TypeSignature};

/// Header-level failures; any of these rejects the whole profile
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum HeaderError {
    #[error("profile too small: expected at least {expected} bytes, got {actual}")]
    TooSmall { expected: usize, actual: usize },

    #[error("invalid profile signature 0x{0:08X} (expected 'acsp')")]
    InvalidSignature(u32),

    #[error("header declares {declared} bytes but only {actual} were provided")]
    SizeExceedsBuffer { declared: u32, actual: usize },

    #[error("declared size {declared} cannot hold the header and {tag_count} tag entries")]
    TagTableOverflow { declared: u32, tag_count: u32 },

    #[error("unsupported major version {0}")]
    UnsupportedVersion(u8),

    #[error("illuminant ({x}, {y}, {z}) is not D50")]
    NonD50Illuminant { x: f32, y: f32, z: f32 },
}

/// Tag directory failures; any of these rejects the whole profile
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TagError {
    #[error("tag {tag} has size {size}, smaller than its type signature")]
    Undersized { tag: TagSignature, size: u32 },

    #[error("tag {tag} at offset {offset} + size {size} exceeds profile size {profile_size}")]
    OutOfBounds {
        tag: TagSignature,
        offset: u32,
        size: u32,
        profile_size: u32,
    },
}

/// `curv` / `para` decoding failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CurveError {
    #[error("curve needs {needed} bytes, tag has {available}")]
    Truncated { needed: u64, available: usize },

    #[error("unsupported curve type {0}")]
    UnknownType(TypeSignature),

    #[error("parametric function type {0} is out of range")]
    FunctionType(u16),

    #[error("parametric curve has a zero slope, breakpoint is undefined")]
    ZeroSlope,

    #[error("curve is a table, a parametric curve is required")]
    NotParametric,

    #[error("curve is parametric, a table is required")]
    NotTable,

    #[error("per-channel transfer curves differ")]
    ChannelMismatch,

    #[error("tag {0} is missing")]
    MissingTag(TagSignature),

    #[error("curve fitting did not converge")]
    FitFailed,
}

/// `mft1` / `mft2` decoding failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LutError {
    #[error("unsupported LUT type {0}")]
    UnknownType(TypeSignature),

    #[error("LUT tag needs at least {needed} bytes, has {available}")]
    HeaderTruncated { needed: usize, available: usize },

    #[error("LUT must have exactly 3 output channels, has {0}")]
    OutputChannels(u8),

    #[error("LUT must have 1 to 4 input channels, has {0}")]
    InputChannels(u8),

    #[error("LUT grid needs at least 2 points per axis, has {0}")]
    GridPoints(u8),

    #[error("LUT table size {0} outside [2, 4096]")]
    TableSize(u16),

    #[error("LUT tables need {needed} bytes, tag has {available}")]
    TablesTruncated { needed: u64, available: u64 },
}
