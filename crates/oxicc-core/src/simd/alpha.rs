//! SIMD-optimized alpha operations

use multiversion::multiversion;

/// Set alpha to 1
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn force_opaque_batch(pixels: &mut [[f32; 4]]) {
    for px in pixels.iter_mut() {
        px[3] = 1.0;
    }
}

/// Multiply RGB by alpha
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn premultiply_batch(pixels: &mut [[f32; 4]]) {
    for px in pixels.iter_mut() {
        let a = px[3];
        px[0] *= a;
        px[1] *= a;
        px[2] *= a;
    }
}

/// Divide RGB by alpha; transparent pixels become black
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn unpremultiply_batch(pixels: &mut [[f32; 4]]) {
    for px in pixels.iter_mut() {
        let a = px[3];
        let scale = if a == 0.0 { 0.0 } else { 1.0 / a };
        px[0] *= scale;
        px[1] *= scale;
        px[2] *= scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premul_roundtrip() {
        let mut pixels = [[1.0, 0.5, 0.25, 0.5], [0.4, 0.6, 0.8, 1.0]];
        premultiply_batch(&mut pixels);
        assert_eq!(pixels[0], [0.5, 0.25, 0.125, 0.5]);
        unpremultiply_batch(&mut pixels);
        assert_eq!(pixels[0], [1.0, 0.5, 0.25, 0.5]);
        assert_eq!(pixels[1], [0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn test_unpremul_transparent() {
        let mut pixels = [[0.3, 0.2, 0.1, 0.0]];
        unpremultiply_batch(&mut pixels);
        assert_eq!(pixels[0], [0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_force_opaque() {
        let mut pixels = [[0.3, 0.2, 0.1, 0.0]; 3];
        force_opaque_batch(&mut pixels);
        assert!(pixels.iter().all(|px| px[3] == 1.0));
    }
}
