//! Test pattern generation
//!
//! RGB8 patterns for color comparisons and seeded raw buffers for every
//! pixel format.

use core::num::FpCategory;

use half::f16;
use oxicc_core::PixelFormat;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Test pattern types
#[derive(Debug, Clone, Copy)]
pub enum TestPattern {
    /// Every 17th value on each axis of the RGB cube
    CubeLattice,
    /// Grayscale ramp 0-255
    Grayscale,
    /// Random pixels with seed
    Random(u64),
    /// Saturated colors near gamut boundary
    GamutBoundary,
    /// All zeros (black)
    Black,
    /// All 255 (white)
    White,
}

/// Generate `pixel_count` RGB8 pixels
pub fn generate_pattern(pattern: TestPattern, pixel_count: usize) -> Vec<u8> {
    let mut data = vec![0u8; pixel_count * 3];

    match pattern {
        TestPattern::CubeLattice => {
            let steps: Vec<u8> = (0..=255).step_by(17).collect();
            let n = steps.len();
            for (i, chunk) in data.chunks_exact_mut(3).enumerate() {
                let cell = i % (n * n * n);
                chunk[0] = steps[cell / (n * n)];
                chunk[1] = steps[(cell / n) % n];
                chunk[2] = steps[cell % n];
            }
        }
        TestPattern::Grayscale => {
            for (i, chunk) in data.chunks_exact_mut(3).enumerate() {
                chunk.fill((i % 256) as u8);
            }
        }
        TestPattern::Random(seed) => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.fill_bytes(&mut data);
        }
        TestPattern::GamutBoundary => {
            let colors: [[u8; 3]; 8] = [
                [255, 0, 0],
                [0, 255, 0],
                [0, 0, 255],
                [255, 255, 0],
                [255, 0, 255],
                [0, 255, 255],
                [255, 128, 0],
                [128, 0, 255],
            ];
            for (i, chunk) in data.chunks_exact_mut(3).enumerate() {
                chunk.copy_from_slice(&colors[i % 8]);
            }
        }
        TestPattern::Black => {
            // Already zeros
        }
        TestPattern::White => {
            data.fill(255);
        }
    }

    data
}

/// `pixel_count` random pixels of `format` that it represents exactly
///
/// Integer formats get arbitrary bytes. Half channels are zero or normal
/// numbers, float channels are finite values in [-2, 2].
pub fn random_pixels(format: PixelFormat, pixel_count: usize, seed: u64) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let len = pixel_count * format.bytes_per_pixel();
    let mut data = vec![0u8; len];

    match format {
        PixelFormat::RgbHhh | PixelFormat::BgrHhh | PixelFormat::RgbaHhhh | PixelFormat::BgraHhhh => {
            for word in data.chunks_exact_mut(2) {
                let v = loop {
                    let h = f16::from_f32(rng.gen_range(-4.0f32..4.0));
                    if h.classify() != FpCategory::Subnormal {
                        break h;
                    }
                };
                word.copy_from_slice(&v.to_le_bytes());
            }
        }
        PixelFormat::RgbFff | PixelFormat::BgrFff | PixelFormat::RgbaFfff | PixelFormat::BgraFfff => {
            for word in data.chunks_exact_mut(4) {
                word.copy_from_slice(&rng.gen_range(-2.0f32..=2.0).to_le_bytes());
            }
        }
        _ => rng.fill_bytes(&mut data),
    }

    data
}

/// Standard pixel counts
pub mod sizes {
    pub const TINY: usize = 64;
    pub const SMALL: usize = 4096;
    pub const MEDIUM: usize = 65536;
}
