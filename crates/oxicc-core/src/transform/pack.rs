//! Pixel load and store
//!
//! Every format decodes to `[r, g, b, a]` in `f32`. Formats without alpha
//! load as opaque and drop alpha on store. Integer stores clamp to [0, 1]
//! and round to nearest; half and float stores keep the value as is.

use core::num::FpCategory;

use half::f16;

use super::format::{PixelFormat, Storage};

const INV_3: f32 = 1.0 / 3.0;
const INV_31: f32 = 1.0 / 31.0;
const INV_63: f32 = 1.0 / 63.0;
const INV_255: f32 = 1.0 / 255.0;
const INV_1023: f32 = 1.0 / 1023.0;
const INV_65535: f32 = 1.0 / 65535.0;

/// Decode `out.len()` pixels from `src`
///
/// `src` holds exactly `out.len()` pixels of `format`.
pub(crate) fn load(format: PixelFormat, src: &[u8], out: &mut [[f32; 4]]) {
    let bpp = format.bytes_per_pixel();
    debug_assert_eq!(src.len(), out.len() * bpp);
    let pixels = src.chunks_exact(bpp).zip(out.iter_mut());

    match format.storage() {
        Storage::Packed565 => {
            for (p, px) in pixels {
                let v = u16::from_le_bytes([p[0], p[1]]);
                *px = [
                    (v & 0x1f) as f32 * INV_31,
                    ((v >> 5) & 0x3f) as f32 * INV_63,
                    (v >> 11) as f32 * INV_31,
                    1.0,
                ];
            }
        }
        Storage::U8x3 => {
            for (p, px) in pixels {
                *px = [p[0] as f32 * INV_255, p[1] as f32 * INV_255, p[2] as f32 * INV_255, 1.0];
            }
        }
        Storage::U8x4 => {
            for (p, px) in pixels {
                *px = [
                    p[0] as f32 * INV_255,
                    p[1] as f32 * INV_255,
                    p[2] as f32 * INV_255,
                    p[3] as f32 * INV_255,
                ];
            }
        }
        Storage::Packed1010102 => {
            for (p, px) in pixels {
                let v = u32::from_le_bytes([p[0], p[1], p[2], p[3]]);
                *px = [
                    (v & 0x3ff) as f32 * INV_1023,
                    ((v >> 10) & 0x3ff) as f32 * INV_1023,
                    ((v >> 20) & 0x3ff) as f32 * INV_1023,
                    (v >> 30) as f32 * INV_3,
                ];
            }
        }
        Storage::U16x3 => {
            for (p, px) in pixels {
                *px = [be16(p, 0), be16(p, 2), be16(p, 4), 1.0];
            }
        }
        Storage::U16x4 => {
            for (p, px) in pixels {
                *px = [be16(p, 0), be16(p, 2), be16(p, 4), be16(p, 6)];
            }
        }
        Storage::F16x3 => {
            for (p, px) in pixels {
                *px = [le_half(p, 0), le_half(p, 2), le_half(p, 4), 1.0];
            }
        }
        Storage::F16x4 => {
            for (p, px) in pixels {
                *px = [le_half(p, 0), le_half(p, 2), le_half(p, 4), le_half(p, 6)];
            }
        }
        Storage::F32x3 => {
            for (p, px) in pixels {
                *px = [le_f32(p, 0), le_f32(p, 4), le_f32(p, 8), 1.0];
            }
        }
        Storage::F32x4 => {
            for (p, px) in pixels {
                *px = [le_f32(p, 0), le_f32(p, 4), le_f32(p, 8), le_f32(p, 12)];
            }
        }
    }

    if format.is_bgr() {
        swap_red_blue(out);
    }
}

/// Encode `pixels` into `dst`
///
/// `dst` holds exactly `pixels.len()` pixels of `format`. `pixels` is
/// scratch and may be modified.
pub(crate) fn store(format: PixelFormat, pixels: &mut [[f32; 4]], dst: &mut [u8]) {
    let bpp = format.bytes_per_pixel();
    debug_assert_eq!(dst.len(), pixels.len() * bpp);

    if format.is_bgr() {
        swap_red_blue(pixels);
    }
    let pixels = dst.chunks_exact_mut(bpp).zip(pixels.iter());

    match format.storage() {
        Storage::Packed565 => {
            for (p, px) in pixels {
                let v = to_unorm(px[0], 31.0) | to_unorm(px[1], 63.0) << 5 | to_unorm(px[2], 31.0) << 11;
                p.copy_from_slice(&(v as u16).to_le_bytes());
            }
        }
        Storage::U8x3 => {
            for (p, px) in pixels {
                for (byte, &v) in p.iter_mut().zip(&px[..3]) {
                    *byte = to_unorm(v, 255.0) as u8;
                }
            }
        }
        Storage::U8x4 => {
            for (p, px) in pixels {
                for (byte, &v) in p.iter_mut().zip(px) {
                    *byte = to_unorm(v, 255.0) as u8;
                }
            }
        }
        Storage::Packed1010102 => {
            for (p, px) in pixels {
                let v = to_unorm(px[0], 1023.0)
                    | to_unorm(px[1], 1023.0) << 10
                    | to_unorm(px[2], 1023.0) << 20
                    | to_unorm(px[3], 3.0) << 30;
                p.copy_from_slice(&v.to_le_bytes());
            }
        }
        Storage::U16x3 | Storage::U16x4 => {
            for (p, px) in pixels {
                for (word, &v) in p.chunks_exact_mut(2).zip(px) {
                    word.copy_from_slice(&(to_unorm(v, 65535.0) as u16).to_be_bytes());
                }
            }
        }
        Storage::F16x3 | Storage::F16x4 => {
            for (p, px) in pixels {
                for (word, &v) in p.chunks_exact_mut(2).zip(px) {
                    word.copy_from_slice(&to_half(v).to_le_bytes());
                }
            }
        }
        Storage::F32x3 | Storage::F32x4 => {
            for (p, px) in pixels {
                for (word, &v) in p.chunks_exact_mut(4).zip(px) {
                    word.copy_from_slice(&v.to_le_bytes());
                }
            }
        }
    }
}

#[inline]
fn swap_red_blue(pixels: &mut [[f32; 4]]) {
    for px in pixels.iter_mut() {
        px.swap(0, 2);
    }
}

/// Clamp to [0, 1], scale and round to nearest
#[inline]
fn to_unorm(v: f32, scale: f32) -> u32 {
    // NaN clamps to 0 through the saturating cast
    (v.clamp(0.0, 1.0) * scale + 0.5) as u32
}

#[inline]
fn be16(p: &[u8], at: usize) -> f32 {
    u16::from_be_bytes([p[at], p[at + 1]]) as f32 * INV_65535
}

#[inline]
fn le_f32(p: &[u8], at: usize) -> f32 {
    f32::from_le_bytes([p[at], p[at + 1], p[at + 2], p[at + 3]])
}

#[inline]
fn le_half(p: &[u8], at: usize) -> f32 {
    let h = f16::from_le_bytes([p[at], p[at + 1]]);
    if is_subnormal(h) {
        0.0
    } else {
        h.to_f32()
    }
}

#[inline]
fn to_half(v: f32) -> u16 {
    let h = f16::from_f32(v);
    if is_subnormal(h) {
        0
    } else {
        h.to_bits()
    }
}

#[inline]
fn is_subnormal(h: f16) -> bool {
    h.classify() == FpCategory::Subnormal
}
