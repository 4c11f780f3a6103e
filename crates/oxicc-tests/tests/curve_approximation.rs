//! Transfer function fitting for table TRCs

use oxicc_core::error::{CurveError, TransformError};
use oxicc_core::math::{CurveFitter, GaussNewtonFitter, SRGB_TO_XYZD50, srgb_to_linear};
use oxicc_core::{Error, PixelFormat, Profile, TransferFunction, transform};
use oxicc_tests::builder::{ProfileBuilder, gamma_curv, sampled_curv};
use oxicc_tests::patterns::{TestPattern, generate_pattern};

fn table_profile(n: usize, f: impl Fn(f32) -> f32) -> Vec<u8> {
    ProfileBuilder::matrix_shaper(&SRGB_TO_XYZD50, sampled_curv(n, f)).build()
}

#[test]
fn test_fit_gamma_table() {
    oxicc_tests::init_logging();
    let bytes = table_profile(256, |x| x.powf(2.2));
    let profile = Profile::parse(&bytes).unwrap();
    assert!(profile.transfer_function().is_none());

    let (tf, err) = profile.approximate_transfer_function().unwrap();
    assert!(err < 1e-3, "err {} for {:?}", err, tf);
    for x in [0.0f32, 0.1, 0.5, 0.9, 1.0] {
        assert!((tf.eval(x) - x.powf(2.2)).abs() < 2e-3, "at {}", x);
    }
}

#[test]
fn test_fit_srgb_table() {
    let bytes = table_profile(1024, srgb_to_linear);
    let profile = Profile::parse(&bytes).unwrap();
    let (tf, err) = profile.approximate_transfer_function().unwrap();
    assert!(err < 1e-2, "err {} for {:?}", err, tf);
    assert!(tf.is_valid());
    assert!(tf.invert().is_some());
}

#[test]
fn test_fit_pools_all_channels() {
    let bytes = ProfileBuilder::matrix_shaper(&SRGB_TO_XYZD50, sampled_curv(128, |x| x.powf(2.0)))
        .replace_tag(b"gTRC", sampled_curv(128, |x| x.powf(2.4)))
        .build();
    let profile = Profile::parse(&bytes).unwrap();
    let (tf, err) = profile.approximate_transfer_function().unwrap();
    // One function cannot match both curves
    assert!(err > 1e-2, "err {} for {:?}", err, tf);
    assert!(tf.eval(0.5) < 0.5f32.powf(2.0) && tf.eval(0.5) > 0.5f32.powf(2.4));
}

#[test]
fn test_fit_requires_tables() {
    let bytes = ProfileBuilder::matrix_shaper(&SRGB_TO_XYZD50, gamma_curv(2.2)).build();
    let profile = Profile::parse(&bytes).unwrap();
    assert_eq!(
        profile.approximate_transfer_function(),
        Err(Error::UnsupportedCurveEncoding(CurveError::NotTable))
    );

    let empty = ProfileBuilder::new().build();
    let profile = Profile::parse(&empty).unwrap();
    assert!(matches!(
        profile.approximate_transfer_function(),
        Err(Error::UnsupportedCurveEncoding(CurveError::MissingTag(_)))
    ));
}

struct FixedFitter(Option<(TransferFunction, f32)>);

impl CurveFitter for FixedFitter {
    fn fit(&self, _xs: &[f32], _ys: &[f32]) -> Option<(TransferFunction, f32)> {
        self.0
    }
}

#[test]
fn test_custom_fitter() {
    let bytes = table_profile(64, |x| x);
    let profile = Profile::parse(&bytes).unwrap();

    let fixed = FixedFitter(Some((TransferFunction::SRGB, 0.5)));
    assert_eq!(profile.approximate_transfer_function_with(&fixed), Ok((TransferFunction::SRGB, 0.5)));
    assert_eq!(
        profile.approximate_transfer_function_with(&FixedFitter(None)),
        Err(Error::UnsupportedCurveEncoding(CurveError::FitFailed))
    );

    let coarse = GaussNewtonFitter {
        breakpoints: 1,
        iterations: 4,
        ..Default::default()
    };
    let (_, err) = profile.approximate_transfer_function_with(&coarse).unwrap();
    assert!(err < 1e-3);
}

// ============================================================================
// Destinations
// ============================================================================

#[test]
fn test_table_destination_needs_fitting() {
    let bytes = table_profile(256, |x| x.powf(2.2));
    let table = Profile::parse(&bytes).unwrap();
    let src = generate_pattern(TestPattern::CubeLattice, 512);
    let mut dst = vec![0u8; src.len()];

    let err = transform(&mut dst, PixelFormat::Rgb888, &table, &src, PixelFormat::Rgb888, Profile::xyzd50(), 512);
    assert_eq!(err, Err(Error::IncompatibleTransform(TransformError::MissingTransferFunction)));

    let fitted = table.usable_as_destination().unwrap();
    assert!(fitted.transfer_function().is_some());
    assert!(fitted.trc().unwrap().iter().all(|c| c.as_parametric().is_some()));
    assert_eq!(fitted.to_xyzd50(), table.to_xyzd50());
    // Tags still come from the original buffer
    assert_eq!(fitted.tag_count(), table.tag_count());
    assert!(std::ptr::eq(fitted.buffer(), table.buffer()));
}

#[test]
fn test_fitted_destination_matches_parametric() {
    let table_bytes = table_profile(1024, |x| x.powf(2.2));
    let table = Profile::parse(&table_bytes).unwrap().usable_as_destination().unwrap();
    let gamma_bytes = ProfileBuilder::matrix_shaper(&SRGB_TO_XYZD50, gamma_curv(2.2)).build();
    let gamma = Profile::parse(&gamma_bytes).unwrap();

    let src = generate_pattern(TestPattern::Random(3), 4096);
    let mut via_table = vec![0u8; src.len()];
    let mut via_gamma = vec![0u8; src.len()];
    transform(&mut via_table, PixelFormat::Rgb888, &table, &src, PixelFormat::Rgb888, Profile::srgb(), 4096).unwrap();
    transform(&mut via_gamma, PixelFormat::Rgb888, &gamma, &src, PixelFormat::Rgb888, Profile::srgb(), 4096).unwrap();
    assert!(oxicc_tests::max_channel_diff(&via_table, &via_gamma) <= 2);
}

#[test]
fn test_parametric_destination_is_unchanged() {
    let bytes = ProfileBuilder::matrix_shaper(&SRGB_TO_XYZD50, gamma_curv(1.8)).build();
    let profile = Profile::parse(&bytes).unwrap();
    let dst = profile.usable_as_destination().unwrap();
    assert_eq!(dst.transfer_function(), profile.transfer_function());
    assert!(dst.approximately_equal(&profile));
}

#[test]
fn test_unusable_destinations() {
    // No colorants
    let no_matrix = ProfileBuilder::new()
        .tag(b"rTRC", gamma_curv(2.2))
        .tag(b"gTRC", gamma_curv(2.2))
        .tag(b"bTRC", gamma_curv(2.2))
        .build();
    let profile = Profile::parse(&no_matrix).unwrap();
    assert_eq!(
        profile.usable_as_destination().err(),
        Some(Error::IncompatibleTransform(TransformError::MissingGamut))
    );

    // Colorants that do not span a space
    let flat = oxicc_core::Matrix3x3::new([[0.5, 0.5, 0.0], [0.5, 0.5, 0.0], [0.0, 0.0, 1.0]]);
    let singular = ProfileBuilder::matrix_shaper(&flat, gamma_curv(2.2)).build();
    let profile = Profile::parse(&singular).unwrap();
    assert_eq!(
        profile.usable_as_destination().err(),
        Some(Error::IncompatibleTransform(TransformError::SingularMatrix))
    );
}
