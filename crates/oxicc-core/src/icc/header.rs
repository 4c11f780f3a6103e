//! ICC Profile Header
//!
//! The header is 128 bytes of fixed fields followed by the 4-byte tag count,
//! so a profile is at least 132 bytes long. See ICC.1:2022 Section 7.2.

use super::error::HeaderError;
use super::reader::{read_date_time, read_s15fixed16, read_u32, read_u64};
use super::types::{ColorSpaceSignature, DateTime};
use crate::math::D50_XYZ;

/// Profile file signature - must be 'acsp' (0x61637370)
pub const PROFILE_SIGNATURE: u32 = 0x6163_7370;

/// Header plus tag count
pub const HEADER_SIZE: usize = 132;

/// One tag directory entry: signature, offset, size
pub const TAG_ENTRY_SIZE: usize = 12;

/// Highest supported major version
pub const MAX_MAJOR_VERSION: u8 = 4;

/// Per-channel tolerance for the D50 illuminant check
pub const ILLUMINANT_TOLERANCE: f32 = 0.01;

// Field offsets
const OFFSET_SIZE: usize = 0;
const OFFSET_CMM_TYPE: usize = 4;
const OFFSET_VERSION: usize = 8;
const OFFSET_CLASS: usize = 12;
const OFFSET_DATA_COLOR_SPACE: usize = 16;
const OFFSET_PCS: usize = 20;
const OFFSET_CREATION_DATE: usize = 24;
const OFFSET_SIGNATURE: usize = 36;
const OFFSET_PLATFORM: usize = 40;
const OFFSET_FLAGS: usize = 44;
const OFFSET_MANUFACTURER: usize = 48;
const OFFSET_MODEL: usize = 52;
const OFFSET_ATTRIBUTES: usize = 56;
const OFFSET_RENDERING_INTENT: usize = 64;
const OFFSET_ILLUMINANT: usize = 68;
const OFFSET_CREATOR: usize = 80;
const OFFSET_PROFILE_ID: usize = 84;
const OFFSET_TAG_COUNT: usize = 128;

/// Decoded ICC header
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Header {
    /// Declared profile size in bytes
    pub size: u32,
    pub cmm_type: u32,
    /// Raw version field; the major version is the top byte
    pub version: u32,
    pub profile_class: u32,
    pub data_color_space: ColorSpaceSignature,
    pub pcs: ColorSpaceSignature,
    pub creation_date: DateTime,
    pub signature: u32,
    pub platform: u32,
    pub flags: u32,
    pub manufacturer: u32,
    pub model: u32,
    pub attributes: u64,
    pub rendering_intent: u32,
    /// PCS illuminant XYZ
    pub illuminant: [f32; 3],
    pub creator: u32,
    /// Profile ID (MD5 hash, or zero), copied verbatim
    pub profile_id: [u8; 16],
    pub tag_count: u32,
}

impl Header {
    /// Decode and validate the header of `bytes`
    ///
    /// Checks, in order: minimum length, `acsp` signature, declared size
    /// against the buffer and the tag directory, major version, D50
    /// illuminant.
    pub fn parse(bytes: &[u8]) -> Result<Self, HeaderError> {
        if bytes.len() < HEADER_SIZE {
            return Err(HeaderError::TooSmall {
                expected: HEADER_SIZE,
                actual: bytes.len(),
            });
        }

        let mut profile_id = [0u8; 16];
        profile_id.copy_from_slice(&bytes[OFFSET_PROFILE_ID..OFFSET_PROFILE_ID + 16]);

        let header = Self {
            size: read_u32(bytes, OFFSET_SIZE),
            cmm_type: read_u32(bytes, OFFSET_CMM_TYPE),
            version: read_u32(bytes, OFFSET_VERSION),
            profile_class: read_u32(bytes, OFFSET_CLASS),
            data_color_space: ColorSpaceSignature(read_u32(bytes, OFFSET_DATA_COLOR_SPACE)),
            pcs: ColorSpaceSignature(read_u32(bytes, OFFSET_PCS)),
            creation_date: read_date_time(bytes, OFFSET_CREATION_DATE),
            signature: read_u32(bytes, OFFSET_SIGNATURE),
            platform: read_u32(bytes, OFFSET_PLATFORM),
            flags: read_u32(bytes, OFFSET_FLAGS),
            manufacturer: read_u32(bytes, OFFSET_MANUFACTURER),
            model: read_u32(bytes, OFFSET_MODEL),
            attributes: read_u64(bytes, OFFSET_ATTRIBUTES),
            rendering_intent: read_u32(bytes, OFFSET_RENDERING_INTENT),
            illuminant: [
                read_s15fixed16(bytes, OFFSET_ILLUMINANT),
                read_s15fixed16(bytes, OFFSET_ILLUMINANT + 4),
                read_s15fixed16(bytes, OFFSET_ILLUMINANT + 8),
            ],
            creator: read_u32(bytes, OFFSET_CREATOR),
            profile_id,
            tag_count: read_u32(bytes, OFFSET_TAG_COUNT),
        };

        header.validate(bytes.len())?;
        Ok(header)
    }

    fn validate(&self, buffer_len: usize) -> Result<(), HeaderError> {
        if self.signature != PROFILE_SIGNATURE {
            return Err(HeaderError::InvalidSignature(self.signature));
        }

        if self.size as u64 > buffer_len as u64 {
            return Err(HeaderError::SizeExceedsBuffer {
                declared: self.size,
                actual: buffer_len,
            });
        }

        let directory_end = HEADER_SIZE as u64 + self.tag_count as u64 * TAG_ENTRY_SIZE as u64;
        if (self.size as u64) < directory_end {
            return Err(HeaderError::TagTableOverflow {
                declared: self.size,
                tag_count: self.tag_count,
            });
        }

        if self.major_version() > MAX_MAJOR_VERSION {
            return Err(HeaderError::UnsupportedVersion(self.major_version()));
        }

        let [x, y, z] = self.illuminant;
        let is_d50 = self
            .illuminant
            .iter()
            .zip(D50_XYZ.iter())
            .all(|(v, d50)| (v - d50).abs() <= ILLUMINANT_TOLERANCE);
        if !is_d50 {
            return Err(HeaderError::NonD50Illuminant { x, y, z });
        }

        Ok(())
    }

    #[inline]
    pub fn major_version(&self) -> u8 {
        (self.version >> 24) as u8
    }

    #[inline]
    pub fn minor_version(&self) -> u8 {
        ((self.version >> 20) & 0x0F) as u8
    }
}
