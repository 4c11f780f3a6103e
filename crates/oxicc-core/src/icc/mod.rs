//! ICC Profile Parsing
//!
//! An ICC profile consists of:
//! 1. A 128-byte header followed by the tag count
//! 2. A tag directory of 12-byte entries
//! 3. Tag data (may overlap)
//!
//! Parsing never copies tag data. A [`Profile`] borrows the input buffer and
//! every curve table and LUT it exposes points back into it.
//!
//! # Example
//!
//! ```
//! use oxicc_core::icc::{Profile, TagSignature};
//!
//! # fn check(bytes: &[u8]) -> oxicc_core::Result<()> {
//! let profile = Profile::parse(bytes)?;
//! if let Some(tag) = profile.tag_by_signature(TagSignature::RED_TRC) {
//!     println!("rTRC is {} bytes of {}", tag.size, tag.type_signature);
//! }
//! # Ok(())
//! # }
//! ```

pub mod curve;
pub mod header;
pub mod lut;

mod error;
mod profile;
mod reader;
mod tag;
mod types;

pub use curve::{read_curve, Curve, CurveTable, TableWidth};
pub use error::{CurveError, HeaderError, LutError, TagError};
pub use header::Header;
pub use lut::MultiFunctionTable;
pub use profile::Profile;
pub use tag::Tag;
pub use types::{ColorSpaceSignature, DateTime, TagSignature, TypeSignature};
