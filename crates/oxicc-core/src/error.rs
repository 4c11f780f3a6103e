//! Error types for oxicc

use thiserror::Error;

pub use crate::icc::{CurveError, HeaderError, LutError, TagError};
pub use crate::transform::TransformError;

/// Result type for oxicc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in oxicc operations
///
/// Parsing only fails with [`Error::MalformedHeader`] or
/// [`Error::InvalidTagDirectory`]; curve and LUT problems make the matching
/// profile facet absent instead.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Bad signature, truncated buffer, unsupported version or illuminant
    #[error("Malformed header: {0}")]
    MalformedHeader(#[from] HeaderError),

    /// Directory entry out of bounds or undersized
    #[error("Invalid tag directory: {0}")]
    InvalidTagDirectory(#[from] TagError),

    /// Unknown curve type, bad function selector, degenerate parameters
    #[error("Unsupported curve encoding: {0}")]
    UnsupportedCurveEncoding(#[from] CurveError),

    /// Bad channel counts, grid or table sizes, truncated tables
    #[error("Unsupported LUT encoding: {0}")]
    UnsupportedLutEncoding(#[from] LutError),

    /// Buffer/format mismatch or a missing profile facet
    #[error("Incompatible transform: {0}")]
    IncompatibleTransform(#[from] TransformError),
}
