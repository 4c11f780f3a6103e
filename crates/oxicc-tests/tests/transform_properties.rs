//! Transform properties
//!
//! Identity and swap laws over every pixel format, color round trips, and
//! alpha conventions.

use oxicc_core::math::{D50_XYZ, SRGB_TO_XYZD50};
use oxicc_core::{
    AlphaFormat, Error, PixelFormat, Profile, TransformError, TransformOptions, transform, transform_in_place,
    transform_slices, transform_with_options,
};
use oxicc_tests::builder::{ProfileBuilder, gamma_curv};
use oxicc_tests::patterns::{TestPattern, generate_pattern, random_pixels, sizes};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

fn options(src_alpha: AlphaFormat, dst_alpha: AlphaFormat) -> TransformOptions {
    TransformOptions {
        src_alpha,
        dst_alpha,
        ..Default::default()
    }
}

fn convert_f32(
    dst_profile: &Profile<'_>,
    src_profile: &Profile<'_>,
    src: &[f32],
    options: &TransformOptions,
) -> Vec<f32> {
    let mut dst = vec![0f32; src.len()];
    let mut bytes = vec![0u8; src.len() * 4];
    let src: Vec<u8> = src.iter().flat_map(|v| v.to_le_bytes()).collect();
    transform_with_options(
        &mut bytes,
        PixelFormat::RgbaFfff,
        dst_profile,
        &src,
        PixelFormat::RgbaFfff,
        src_profile,
        src.len() / 16,
        options,
    )
    .unwrap();
    for (v, b) in dst.iter_mut().zip(bytes.chunks_exact(4)) {
        *v = f32::from_le_bytes([b[0], b[1], b[2], b[3]]);
    }
    dst
}

fn assert_close(actual: &[f32], expected: &[f32], tolerance: f32) {
    assert_eq!(actual.len(), expected.len());
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).abs() <= tolerance, "channel {}: {} vs {}", i, a, e);
    }
}

// ============================================================================
// Format laws
// ============================================================================

#[test]
fn test_identity_every_format() {
    oxicc_tests::init_logging();
    let profile = Profile::srgb();
    for (seed, format) in PixelFormat::ALL.into_iter().enumerate() {
        let src = random_pixels(format, sizes::SMALL + 3, seed as u64);
        let mut dst = vec![0u8; src.len()];
        transform(&mut dst, format, profile, &src, format, profile, sizes::SMALL + 3).unwrap();

        assert_eq!(dst, src, "{:?}", format);
    }
}

#[test]
fn test_identity_between_parsed_copies() {
    let bytes = ProfileBuilder::matrix_shaper(&SRGB_TO_XYZD50, gamma_curv(2.2)).build();
    let copy = bytes.clone();
    let src_profile = Profile::parse(&bytes).unwrap();
    let dst_profile = Profile::parse(&copy).unwrap();
    assert!(!std::ptr::eq(src_profile.buffer(), dst_profile.buffer()));

    // Float channels in [-2, 2] would not survive the curves unchanged
    for (seed, format) in PixelFormat::ALL.into_iter().enumerate() {
        let src = random_pixels(format, sizes::SMALL + 3, 100 + seed as u64);
        let mut dst = vec![0u8; src.len()];
        transform(&mut dst, format, &dst_profile, &src, format, &src_profile, sizes::SMALL + 3).unwrap();
        assert_eq!(dst, src, "{:?}", format);
    }
}

#[test]
fn test_swap_is_an_involution() {
    let profile = Profile::srgb();
    for pair in PixelFormat::ALL.chunks_exact(2) {
        let (rgb, bgr) = (pair[0], pair[1]);
        let src = random_pixels(rgb, sizes::TINY, 7);
        let mut swapped = vec![0u8; src.len()];
        let mut back = vec![0u8; src.len()];

        transform(&mut swapped, bgr, profile, &src, rgb, profile, sizes::TINY).unwrap();
        transform(&mut back, rgb, profile, &swapped, bgr, profile, sizes::TINY).unwrap();
        assert_eq!(back, src, "{:?} <-> {:?}", rgb, bgr);

        let mut in_place = src.clone();
        transform_in_place(&mut in_place, bgr, profile, rgb, profile, sizes::TINY).unwrap();
        assert_eq!(in_place, swapped, "in place {:?}", bgr);
    }
}

#[test]
fn test_in_place_needs_equal_widths() {
    let profile = Profile::srgb();
    for src_format in PixelFormat::ALL {
        for dst_format in PixelFormat::ALL {
            let mut buf = vec![0u8; 16 * 16];
            let result = transform_in_place(&mut buf, dst_format, profile, src_format, profile, 16);
            if src_format.bytes_per_pixel() == dst_format.bytes_per_pixel() {
                assert!(result.is_ok(), "{:?} <- {:?}", dst_format, src_format);
            } else {
                assert_eq!(
                    result,
                    Err(Error::IncompatibleTransform(TransformError::InPlaceWidthMismatch {
                        src: src_format.bytes_per_pixel(),
                        dst: dst_format.bytes_per_pixel(),
                    }))
                );
            }
        }
    }
}

#[test]
fn test_8bit_through_16bit_and_float_is_lossless() {
    let profile = Profile::srgb();
    let src = generate_pattern(TestPattern::CubeLattice, sizes::SMALL);
    let n = src.len() / 3;

    for wide in [PixelFormat::Rgb161616, PixelFormat::BgrHhh, PixelFormat::RgbaFfff, PixelFormat::Bgra16161616] {
        let mut mid = vec![0u8; n * wide.bytes_per_pixel()];
        let mut back = vec![0u8; src.len()];
        transform(&mut mid, wide, profile, &src, PixelFormat::Rgb888, profile, n).unwrap();
        transform(&mut back, PixelFormat::Rgb888, profile, &mid, wide, profile, n).unwrap();
        assert_eq!(back, src, "via {:?}", wide);
    }
}

// ============================================================================
// Color round trips
// ============================================================================

#[test]
fn test_srgb_white_maps_to_d50() {
    let xyz = convert_f32(Profile::xyzd50(), Profile::srgb(), &[1.0, 1.0, 1.0, 1.0], &TransformOptions::default());
    assert_close(&xyz[..3], &D50_XYZ, 1e-3);
    assert_eq!(xyz[3], 1.0);
}

#[test]
fn test_srgb_xyz_roundtrip() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x1cc);
    let src: Vec<f32> = (0..sizes::SMALL * 4)
        .map(|i| if i % 4 == 3 { 1.0 } else { rng.gen_range(0.0f32..=1.0) })
        .collect();

    let xyz = convert_f32(Profile::xyzd50(), Profile::srgb(), &src, &TransformOptions::default());
    let back = convert_f32(Profile::srgb(), Profile::xyzd50(), &xyz, &TransformOptions::default());
    assert_close(&back, &src, 2e-3);
}

#[test]
fn test_gamma_profile_roundtrip_8bit() {
    let bytes = ProfileBuilder::matrix_shaper(&SRGB_TO_XYZD50, gamma_curv(2.2)).build();
    let gamma = Profile::parse(&bytes).unwrap();
    let src = generate_pattern(TestPattern::Random(11), sizes::SMALL);
    let n = src.len() / 3;

    let mut mid = vec![0f32; n * 3];
    let mut back = vec![0u8; src.len()];
    transform_slices(&mut mid, PixelFormat::RgbFff, &gamma, &src, PixelFormat::Rgb888, Profile::srgb(), n).unwrap();
    transform_slices(&mut back, PixelFormat::Rgb888, Profile::srgb(), &mid, PixelFormat::RgbFff, &gamma, n).unwrap();
    assert!(oxicc_tests::max_channel_diff(&back, &src) <= 1);
}

#[test]
fn test_gray_stays_gray_between_shared_primaries() {
    let bytes = ProfileBuilder::matrix_shaper(&SRGB_TO_XYZD50, gamma_curv(1.8)).build();
    let gamma = Profile::parse(&bytes).unwrap();
    let src = generate_pattern(TestPattern::Grayscale, 256);

    let mut dst = vec![0u8; src.len()];
    transform(&mut dst, PixelFormat::Rgb888, &gamma, &src, PixelFormat::Rgb888, Profile::srgb(), 256).unwrap();
    for px in dst.chunks_exact(3) {
        assert!(px[0].abs_diff(px[1]) <= 1 && px[1].abs_diff(px[2]) <= 1, "{:?}", px);
    }
    assert_eq!(&dst[..3], &[0, 0, 0]);
    assert_eq!(&dst[dst.len() - 3..], &[255, 255, 255]);
}

#[test]
fn test_color_transforms_keep_alpha() {
    let src = [0.2f32, 0.4, 0.6, 0.3, 0.9, 0.1, 0.5, 0.0];
    let xyz = convert_f32(Profile::xyzd50(), Profile::srgb(), &src, &TransformOptions::default());
    assert_eq!(xyz[3], 0.3);
    assert_eq!(xyz[7], 0.0);
}

// ============================================================================
// Alpha conventions
// ============================================================================

#[test]
fn test_opaque_source_ignores_stored_alpha() {
    let src = [0.5f32, 0.5, 0.5, 0.25];
    let out = convert_f32(
        Profile::srgb(),
        Profile::srgb(),
        &src,
        &options(AlphaFormat::Opaque, AlphaFormat::Unpremul),
    );
    assert_eq!(out, [0.5, 0.5, 0.5, 1.0]);
}

#[test]
fn test_opaque_destination() {
    let src = [0.5f32, 0.25, 0.125, 0.5];
    let out = convert_f32(
        Profile::srgb(),
        Profile::srgb(),
        &src,
        &options(AlphaFormat::Unpremul, AlphaFormat::Opaque),
    );
    assert_eq!(out, [0.5, 0.25, 0.125, 1.0]);
}

#[test]
fn test_premul_as_encoded_roundtrip() {
    let src = [1.0f32, 0.5, 0.25, 0.5, 0.3, 0.2, 0.1, 0.0];
    let premul = convert_f32(
        Profile::srgb(),
        Profile::srgb(),
        &src,
        &options(AlphaFormat::Unpremul, AlphaFormat::PremulAsEncoded),
    );
    assert_eq!(premul, [0.5, 0.25, 0.125, 0.5, 0.0, 0.0, 0.0, 0.0]);

    let unpremul = convert_f32(
        Profile::srgb(),
        Profile::srgb(),
        &premul,
        &options(AlphaFormat::PremulAsEncoded, AlphaFormat::Unpremul),
    );
    // Transparent pixels come back black
    assert_eq!(unpremul, [1.0, 0.5, 0.25, 0.5, 0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn test_premul_linear_runs_in_linear_light() {
    let src = [1.0f32, 1.0, 1.0, 0.5];
    let out = convert_f32(
        Profile::srgb(),
        Profile::srgb(),
        &src,
        &options(AlphaFormat::Unpremul, AlphaFormat::PremulLinear),
    );
    // Half of linear white, encoded again
    let expected = oxicc_core::math::linear_to_srgb(0.5);
    assert_close(&out, &[expected, expected, expected, 0.5], 1e-3);

    let back = convert_f32(
        Profile::srgb(),
        Profile::srgb(),
        &out,
        &options(AlphaFormat::PremulLinear, AlphaFormat::Unpremul),
    );
    assert_close(&back, &src, 1e-3);
}

#[test]
fn test_premul_through_color_transform() {
    let src = [0.6f32, 0.4, 0.2, 0.5];
    let opts = options(AlphaFormat::PremulAsEncoded, AlphaFormat::PremulAsEncoded);
    let xyz = convert_f32(Profile::xyzd50(), Profile::srgb(), &src, &opts);
    let back = convert_f32(Profile::srgb(), Profile::xyzd50(), &xyz, &opts);
    assert_close(&back, &src, 1e-3);
    assert_eq!(back[3], 0.5);
}
