//! Reference implementation wrappers
//!
//! The same RGB8 transform through oxicc, lcms2 and qcms, each parsing the
//! profiles from the same ICC bytes.

use std::fmt;

/// Reference CMS implementation for comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceCms {
    /// lcms2 - industry standard
    Lcms2,
    /// qcms - Firefox's CMS
    Qcms,
}

impl fmt::Display for ReferenceCms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceCms::Lcms2 => write!(f, "lcms2"),
            ReferenceCms::Qcms => write!(f, "qcms"),
        }
    }
}

/// Per-channel differences between two RGB8 buffers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelDiff {
    pub max: u8,
    pub mean: f64,
    /// Channels that differ at all
    pub mismatched: usize,
}

impl ChannelDiff {
    pub fn between(expected: &[u8], actual: &[u8]) -> Self {
        assert_eq!(expected.len(), actual.len(), "buffer lengths differ");
        let mut sum = 0u64;
        let mut max = 0u8;
        let mut mismatched = 0;
        for (&e, &a) in expected.iter().zip(actual) {
            let d = e.abs_diff(a);
            sum += d as u64;
            max = max.max(d);
            mismatched += (d != 0) as usize;
        }
        Self {
            max,
            mean: sum as f64 / expected.len().max(1) as f64,
            mismatched,
        }
    }
}

impl fmt::Display for ChannelDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "max {} mean {:.4} ({} channels differ)", self.max, self.mean, self.mismatched)
    }
}

/// Transform RGB8 pixels with oxicc
///
/// Destinations with table TRCs are fitted first.
pub fn transform_oxicc(src_profile_data: &[u8], dst_profile_data: &[u8], src_pixels: &[u8]) -> Result<Vec<u8>, String> {
    use oxicc_core::{PixelFormat, Profile, transform};

    let src_profile = Profile::parse(src_profile_data).map_err(|e| format!("oxicc src profile: {}", e))?;
    let dst_profile = Profile::parse(dst_profile_data)
        .and_then(|p| p.usable_as_destination())
        .map_err(|e| format!("oxicc dst profile: {}", e))?;

    let mut dst_pixels = vec![0u8; src_pixels.len()];
    transform(
        &mut dst_pixels,
        PixelFormat::Rgb888,
        &dst_profile,
        src_pixels,
        PixelFormat::Rgb888,
        &src_profile,
        src_pixels.len() / 3,
    )
    .map_err(|e| format!("oxicc transform: {}", e))?;

    Ok(dst_pixels)
}

/// Transform using lcms2 reference implementation
pub fn transform_lcms2(src_profile_data: &[u8], dst_profile_data: &[u8], src_pixels: &[u8]) -> Result<Vec<u8>, String> {
    use lcms2::{Intent, PixelFormat, Profile, Transform};

    let src_profile = Profile::new_icc(src_profile_data).map_err(|e| format!("lcms2 src profile: {}", e))?;
    let dst_profile = Profile::new_icc(dst_profile_data).map_err(|e| format!("lcms2 dst profile: {}", e))?;

    let transform = Transform::new(
        &src_profile,
        PixelFormat::RGB_8,
        &dst_profile,
        PixelFormat::RGB_8,
        Intent::Perceptual,
    )
    .map_err(|e| format!("lcms2 transform: {}", e))?;

    let mut dst_pixels = vec![0u8; src_pixels.len()];
    transform.transform_pixels(src_pixels, &mut dst_pixels);

    Ok(dst_pixels)
}

/// Transform using qcms reference implementation
pub fn transform_qcms(src_profile_data: &[u8], dst_profile_data: &[u8], src_pixels: &[u8]) -> Result<Vec<u8>, String> {
    let src_profile =
        qcms::Profile::new_from_slice(src_profile_data, false).ok_or("qcms src profile: rejected")?;
    let dst_profile =
        qcms::Profile::new_from_slice(dst_profile_data, false).ok_or("qcms dst profile: rejected")?;

    let transform = qcms::Transform::new(&src_profile, &dst_profile, qcms::DataType::RGB8, qcms::Intent::Perceptual)
        .ok_or("qcms transform: rejected")?;

    let mut pixels = src_pixels.to_vec();
    transform.apply(&mut pixels);
    Ok(pixels)
}

/// Run one reference implementation
pub fn transform_reference(
    reference: ReferenceCms,
    src_profile_data: &[u8],
    dst_profile_data: &[u8],
    src_pixels: &[u8],
) -> Result<Vec<u8>, String> {
    match reference {
        ReferenceCms::Lcms2 => transform_lcms2(src_profile_data, dst_profile_data, src_pixels),
        ReferenceCms::Qcms => transform_qcms(src_profile_data, dst_profile_data, src_pixels),
    }
}

// ============================================================================
// Profiles authored by lcms2
// ============================================================================

/// D65 white point
pub const D65: (f64, f64) = (0.3127, 0.3290);

/// sRGB / Rec. 709 primaries as xy chromaticities
pub const SRGB_PRIMARIES: [(f64, f64); 3] = [(0.64, 0.33), (0.30, 0.60), (0.15, 0.06)];

/// Display P3 primaries
pub const P3_PRIMARIES: [(f64, f64); 3] = [(0.680, 0.320), (0.265, 0.690), (0.150, 0.060)];

/// lcms2's built-in sRGB, serialized
pub fn lcms2_srgb_icc() -> Result<Vec<u8>, String> {
    lcms2::Profile::new_srgb()
        .icc()
        .map_err(|e| format!("lcms2 serialize: {}", e))
}

/// An RGB profile with D65 white and the same curve on every channel
pub fn lcms2_rgb_icc(primaries: [(f64, f64); 3], curve: &lcms2::ToneCurve) -> Result<Vec<u8>, String> {
    use lcms2::{CIExyY, CIExyYTRIPLE, Profile};

    let xy = |(x, y): (f64, f64)| CIExyY { x, y, Y: 1.0 };
    let triple = CIExyYTRIPLE {
        Red: xy(primaries[0]),
        Green: xy(primaries[1]),
        Blue: xy(primaries[2]),
    };

    Profile::new_rgb(&xy(D65), &triple, &[curve, curve, curve])
        .and_then(|p| p.icc())
        .map_err(|e| format!("lcms2 rgb profile: {}", e))
}
