//! qcms parity tests
//!
//! qcms is Firefox's pure-Rust CMS. Its 8-bit paths run through lookup
//! tables, so differences of a couple of levels are expected.

use lcms2::ToneCurve;
use oxicc_core::{PixelFormat, Profile, transform};
use oxicc_tests::patterns::{TestPattern, generate_pattern, sizes};
use oxicc_tests::reference::{
    P3_PRIMARIES, ReferenceCms, lcms2_rgb_icc, lcms2_srgb_icc, transform_oxicc, transform_reference,
};
use oxicc_tests::{ChannelDiff, max_channel_diff};
use tracing::info;

fn compare(reference: ReferenceCms, src_icc: &[u8], dst_icc: &[u8], pattern: TestPattern, max: u8) {
    let src = generate_pattern(pattern, sizes::SMALL);
    let ours = transform_oxicc(src_icc, dst_icc, &src).unwrap();
    let theirs = transform_reference(reference, src_icc, dst_icc, &src).unwrap();
    let diff = ChannelDiff::between(&theirs, &ours);
    info!(?pattern, "oxicc vs {reference}: {diff}");
    assert!(diff.max <= max, "{:?} vs {}: {}", pattern, reference, diff);
    assert!(diff.mean < 1.0, "{:?} vs {}: {}", pattern, reference, diff);
}

#[test]
fn test_qcms_accepts_authored_profiles() {
    oxicc_tests::init_logging();
    let srgb = lcms2_srgb_icc().unwrap();
    let p3 = lcms2_rgb_icc(P3_PRIMARIES, &ToneCurve::new(2.2)).unwrap();
    assert!(qcms::Profile::new_from_slice(&srgb, false).is_some());
    assert!(qcms::Profile::new_from_slice(&p3, false).is_some());
}

#[test]
fn test_srgb_to_p3_parity() {
    oxicc_tests::init_logging();
    let srgb = lcms2_srgb_icc().unwrap();
    let p3 = lcms2_rgb_icc(P3_PRIMARIES, &ToneCurve::new(2.2)).unwrap();
    for pattern in [TestPattern::CubeLattice, TestPattern::Random(5), TestPattern::GamutBoundary] {
        compare(ReferenceCms::Qcms, &srgb, &p3, pattern, 3);
    }
}

#[test]
fn test_p3_to_srgb_parity() {
    oxicc_tests::init_logging();
    let srgb = lcms2_srgb_icc().unwrap();
    let p3 = lcms2_rgb_icc(P3_PRIMARIES, &ToneCurve::new(2.2)).unwrap();
    for pattern in [TestPattern::CubeLattice, TestPattern::Grayscale] {
        compare(ReferenceCms::Qcms, &p3, &srgb, pattern, 3);
    }
}

#[test]
fn test_three_way_agreement() {
    oxicc_tests::init_logging();
    let srgb = lcms2_srgb_icc().unwrap();
    let p3 = lcms2_rgb_icc(P3_PRIMARIES, &ToneCurve::new(1.8)).unwrap();
    let src = generate_pattern(TestPattern::Random(99), sizes::SMALL);

    let ours = transform_oxicc(&srgb, &p3, &src).unwrap();
    let lcms = transform_reference(ReferenceCms::Lcms2, &srgb, &p3, &src).unwrap();
    let qcms = transform_reference(ReferenceCms::Qcms, &srgb, &p3, &src).unwrap();

    // Within the references' own spread, plus rounding
    let spread = max_channel_diff(&lcms, &qcms);
    assert!(max_channel_diff(&ours, &lcms) <= spread.max(1) + 2);
    assert!(max_channel_diff(&ours, &qcms) <= spread.max(1) + 2);
}

#[test]
fn test_builtin_srgb_against_qcms() {
    oxicc_tests::init_logging();
    let p3_icc = lcms2_rgb_icc(P3_PRIMARIES, &ToneCurve::new(2.2)).unwrap();
    let src = generate_pattern(TestPattern::CubeLattice, sizes::SMALL);

    let q_src = qcms::Profile::new_sRGB();
    let q_dst = qcms::Profile::new_from_slice(&p3_icc, false).unwrap();
    let q = qcms::Transform::new(&q_src, &q_dst, qcms::DataType::RGB8, qcms::Intent::Perceptual).unwrap();
    let mut theirs = src.clone();
    q.apply(&mut theirs);

    let dst_profile = Profile::parse(&p3_icc).unwrap();
    let mut ours = vec![0u8; src.len()];
    transform(&mut ours, PixelFormat::Rgb888, &dst_profile, &src, PixelFormat::Rgb888, Profile::srgb(), src.len() / 3)
        .unwrap();

    let diff = ChannelDiff::between(&theirs, &ours);
    info!("built-in sRGB vs qcms: {diff}");
    assert!(diff.max <= 3, "{}", diff);
}
