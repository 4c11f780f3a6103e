//! Parsed ICC profile
//!
//! [`Profile::parse`] validates the header and tag directory and then
//! derives the facets the transform engine needs. Facets are independent:
//! a profile whose A2B0 table is malformed still parses and still carries
//! its matrix and curves.

use std::ptr;

use tracing::debug;

use super::curve::{read_curve, Curve};
use super::error::CurveError;
use super::header::{Header, PROFILE_SIGNATURE};
use super::lut::MultiFunctionTable;
use super::reader::read_s15fixed16;
use super::tag::{Tag, TagDirectory};
use super::types::{ColorSpaceSignature, DateTime, TagSignature, TypeSignature};
use crate::error::{Result, TransformError};
use crate::math::{CurveFitter, GaussNewtonFitter, Matrix3x3, TransferFunction, D50_XYZ, SRGB_TO_XYZD50};

const TRC_TAGS: [TagSignature; 3] = [
    TagSignature::RED_TRC,
    TagSignature::GREEN_TRC,
    TagSignature::BLUE_TRC,
];

const COLORANT_TAGS: [TagSignature; 3] = [
    TagSignature::RED_COLORANT,
    TagSignature::GREEN_COLORANT,
    TagSignature::BLUE_COLORANT,
];

/// Type signature, reserved, one XYZNumber
const XYZ_TAG_SIZE: usize = 20;

/// Curve sample tolerance for [`Profile::approximately_equal`]
const EQUALITY_TOLERANCE: f32 = 1.0 / 512.0;

/// A validated, read-only view over an ICC profile buffer
#[derive(Debug, Clone, PartialEq)]
pub struct Profile<'a> {
    buffer: &'a [u8],
    header: Header,
    tags: TagDirectory<'a>,
    transfer_function: Option<TransferFunction>,
    trc: Option<[Curve<'a>; 3]>,
    to_xyzd50: Option<Matrix3x3>,
    a2b: Option<MultiFunctionTable<'a>>,
}

static SRGB_PROFILE: Profile<'static> = Profile::canonical(
    ColorSpaceSignature::RGB,
    TransferFunction::SRGB,
    SRGB_TO_XYZD50,
);

static XYZD50_PROFILE: Profile<'static> = Profile::canonical(
    ColorSpaceSignature::XYZ,
    TransferFunction::LINEAR,
    Matrix3x3::identity(),
);

impl Profile<'static> {
    /// The canonical sRGB profile
    pub fn srgb() -> &'static Self {
        &SRGB_PROFILE
    }

    /// The canonical XYZ D50 profile, linear with an identity matrix
    pub fn xyzd50() -> &'static Self {
        &XYZD50_PROFILE
    }

    const fn canonical(
        data_color_space: ColorSpaceSignature,
        transfer_function: TransferFunction,
        to_xyzd50: Matrix3x3,
    ) -> Self {
        let header = Header {
            size: 0,
            cmm_type: 0,
            version: 0x0430_0000,
            profile_class: u32::from_be_bytes(*b"mntr"),
            data_color_space,
            pcs: ColorSpaceSignature::XYZ,
            creation_date: DateTime {
                year: 0,
                month: 0,
                day: 0,
                hour: 0,
                minute: 0,
                second: 0,
            },
            signature: PROFILE_SIGNATURE,
            platform: 0,
            flags: 0,
            manufacturer: 0,
            model: 0,
            attributes: 0,
            rendering_intent: 0,
            illuminant: D50_XYZ,
            creator: 0,
            profile_id: [0; 16],
            tag_count: 0,
        };
        let curve = Curve::Parametric(transfer_function);
        Self {
            buffer: &[],
            header,
            tags: TagDirectory::EMPTY,
            transfer_function: Some(transfer_function),
            trc: Some([curve, curve, curve]),
            to_xyzd50: Some(to_xyzd50),
            a2b: None,
        }
    }
}

#[cfg(test)]
impl Profile<'static> {
    /// An RGB profile carrying only the given facets
    pub(crate) fn synthetic(
        transfer_function: Option<TransferFunction>,
        to_xyzd50: Option<Matrix3x3>,
    ) -> Self {
        Self {
            transfer_function,
            trc: transfer_function.map(|tf| [Curve::Parametric(tf); 3]),
            to_xyzd50,
            ..Self::canonical(ColorSpaceSignature::RGB, TransferFunction::LINEAR, Matrix3x3::identity())
        }
    }
}

impl<'a> Profile<'a> {
    /// Parse and validate `bytes`
    ///
    /// Fails only on header or tag directory problems. A profile that
    /// parses may still lack any of the optional facets.
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        let header = Header::parse(bytes).inspect_err(|e| debug!("rejecting profile header: {e}"))?;
        let tags = TagDirectory::parse(bytes, &header)
            .inspect_err(|e| debug!("rejecting tag directory: {e}"))?;

        let mut profile = Self {
            buffer: bytes,
            header,
            tags,
            transfer_function: None,
            trc: None,
            to_xyzd50: None,
            a2b: None,
        };

        profile.trc = profile
            .read_trc()
            .inspect_err(|e| debug!("no TRC curves: {e}"))
            .ok();
        profile.transfer_function = profile.trc.as_ref().and_then(common_transfer_function);
        profile.to_xyzd50 = profile.read_to_xyzd50();
        profile.a2b = profile.tag_by_signature(TagSignature::A2B0).and_then(|tag| {
            MultiFunctionTable::parse(&tag)
                .inspect_err(|e| debug!("ignoring A2B0: {e}"))
                .ok()
        });

        Ok(profile)
    }

    fn trc_curve(&self, signature: TagSignature) -> std::result::Result<Curve<'a>, CurveError> {
        let tag = self
            .tag_by_signature(signature)
            .ok_or(CurveError::MissingTag(signature))?;
        read_curve(tag.data)
    }

    fn read_trc(&self) -> std::result::Result<[Curve<'a>; 3], CurveError> {
        Ok([
            self.trc_curve(TRC_TAGS[0])?,
            self.trc_curve(TRC_TAGS[1])?,
            self.trc_curve(TRC_TAGS[2])?,
        ])
    }

    /// Colorant tags as matrix columns
    fn read_to_xyzd50(&self) -> Option<Matrix3x3> {
        let mut m = Matrix3x3::new([[0.0; 3]; 3]);
        for (col, signature) in COLORANT_TAGS.into_iter().enumerate() {
            let xyz = read_xyz(&self.tag_by_signature(signature)?)?;
            for (row, v) in xyz.into_iter().enumerate() {
                m.vals[row][col] = v;
            }
        }
        Some(m)
    }

    #[inline]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The buffer this profile was parsed from; empty for canonical profiles
    #[inline]
    pub fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    /// Declared size in bytes
    #[inline]
    pub fn size(&self) -> u32 {
        self.header.size
    }

    #[inline]
    pub fn data_color_space(&self) -> ColorSpaceSignature {
        self.header.data_color_space
    }

    #[inline]
    pub fn pcs(&self) -> ColorSpaceSignature {
        self.header.pcs
    }

    #[inline]
    pub fn tag_count(&self) -> u32 {
        self.tags.len()
    }

    /// Tag at position `idx` in the directory
    pub fn tag_by_index(&self, idx: u32) -> Option<Tag<'a>> {
        self.tags.get(idx)
    }

    /// First tag with `signature`
    pub fn tag_by_signature(&self, signature: TagSignature) -> Option<Tag<'a>> {
        self.tags.find(signature)
    }

    pub fn tags(&self) -> impl Iterator<Item = Tag<'a>> + '_ {
        self.tags.iter()
    }

    /// The transfer function shared by all three TRC tags, when they are
    /// parametric and bit-identical
    #[inline]
    pub fn transfer_function(&self) -> Option<&TransferFunction> {
        self.transfer_function.as_ref()
    }

    /// Per-channel TRC curves
    #[inline]
    pub fn trc(&self) -> Option<&[Curve<'a>; 3]> {
        self.trc.as_ref()
    }

    /// RGB → XYZD50 matrix built from the colorant tags
    #[inline]
    pub fn to_xyzd50(&self) -> Option<&Matrix3x3> {
        self.to_xyzd50.as_ref()
    }

    #[inline]
    pub fn a2b(&self) -> Option<&MultiFunctionTable<'a>> {
        self.a2b.as_ref()
    }

    /// Fit one transfer function to the three table-based TRC curves
    ///
    /// Returns the function and its worst error over all samples.
    pub fn approximate_transfer_function(&self) -> Result<(TransferFunction, f32)> {
        self.approximate_transfer_function_with(&GaussNewtonFitter::default())
    }

    /// [`Profile::approximate_transfer_function`] with a caller-supplied fitter
    pub fn approximate_transfer_function_with(
        &self,
        fitter: &impl CurveFitter,
    ) -> Result<(TransferFunction, f32)> {
        let curves = self.read_trc()?;
        let mut tables = [None; 3];
        for (slot, curve) in tables.iter_mut().zip(curves.iter()) {
            *slot = Some(*curve.as_table().ok_or(CurveError::NotTable)?);
        }

        let n: usize = tables.iter().flatten().map(|t| t.entries as usize).sum();
        let mut xs = Vec::with_capacity(n);
        let mut ys = Vec::with_capacity(n);
        for table in tables.iter().flatten() {
            for (x, y) in table.points() {
                xs.push(x);
                ys.push(y);
            }
        }

        let fitted = fitter.fit(&xs, &ys);
        match fitted {
            Some((tf, err)) => {
                debug!(samples = n, max_error = err, "fitted transfer function");
                Ok((tf, err))
            }
            None => {
                debug!(samples = n, "transfer function fit failed");
                Err(CurveError::FitFailed.into())
            }
        }
    }

    /// A copy of this profile that can be a transform destination
    ///
    /// Destinations need an invertible matrix and a single invertible
    /// transfer function. When the TRC curves are tables, the function is
    /// fitted and replaces the curves in the returned copy.
    pub fn usable_as_destination(&self) -> Result<Profile<'a>> {
        let matrix = self.to_xyzd50.ok_or(TransformError::MissingGamut)?;
        if matrix.invert().is_none() {
            return Err(TransformError::SingularMatrix.into());
        }

        let tf = match self.transfer_function {
            Some(tf) => tf,
            None => self.approximate_transfer_function()?.0,
        };
        if tf.invert().is_none() {
            return Err(TransformError::NonInvertibleTransferFunction.into());
        }

        let curve = Curve::Parametric(tf);
        Ok(Profile {
            transfer_function: Some(tf),
            trc: Some([curve, curve, curve]),
            ..self.clone()
        })
    }

    /// Whether converting between the two profiles can be skipped
    ///
    /// True for the same profile, byte-identical buffers, or matching
    /// color spaces whose matrices and curves agree within 1/512.
    pub fn approximately_equal(&self, other: &Profile<'_>) -> bool {
        if ptr::addr_eq(self as *const Self, other as *const Profile<'_>) {
            return true;
        }
        if !self.buffer.is_empty() && self.buffer == other.buffer {
            return true;
        }
        if self.data_color_space() != other.data_color_space() {
            return false;
        }

        let (Some(m1), Some(m2)) = (self.to_xyzd50, other.to_xyzd50) else {
            return false;
        };
        if !m1.approx_eq(&m2, EQUALITY_TOLERANCE) {
            return false;
        }

        let (Some(c1), Some(c2)) = (self.trc.as_ref(), other.trc.as_ref()) else {
            return false;
        };
        c1.iter().zip(c2.iter()).all(|(a, b)| {
            (0..=32).all(|i| {
                let x = i as f32 / 32.0;
                (a.eval(x) - b.eval(x)).abs() <= EQUALITY_TOLERANCE
            })
        })
    }

    /// Whether the profile carries what a matrix/TRC transform needs
    pub fn is_matrix_shaper(&self) -> bool {
        self.to_xyzd50.is_some() && self.trc.is_some()
    }
}

/// The single parametric function shared by all three curves
fn common_transfer_function(curves: &[Curve<'_>; 3]) -> Option<TransferFunction> {
    let first = *curves[0].as_parametric()?;
    curves[1..]
        .iter()
        .all(|c| c.as_parametric().is_some_and(|tf| tf.bit_eq(&first)))
        .then_some(first)
}

/// One XYZ triple from an `XYZ ` tag
fn read_xyz(tag: &Tag<'_>) -> Option<[f32; 3]> {
    if tag.type_signature != TypeSignature::XYZ || tag.data.len() < XYZ_TAG_SIZE {
        return None;
    }
    Some([
        read_s15fixed16(tag.data, 8),
        read_s15fixed16(tag.data, 12),
        read_s15fixed16(tag.data, 16),
    ])
}

impl std::fmt::Display for Profile<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} profile v{}.{}, {} tags",
            self.data_color_space(),
            self.header.major_version(),
            self.header.minor_version(),
            self.tag_count()
        )
    }
}
