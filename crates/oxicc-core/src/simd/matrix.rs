//! SIMD-optimized matrix operations
//!
//! Gamut mapping multiplies every pixel's RGB by a 3x3 matrix. Alpha in
//! lane 3 passes through.

use multiversion::multiversion;

use crate::math::Matrix3x3;

/// Multiply the RGB lanes of a batch of pixels by `matrix`
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn apply_matrix_batch(matrix: &Matrix3x3, pixels: &mut [[f32; 4]]) {
    // Extract matrix elements for better register allocation
    let [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]] = matrix.vals;

    for px in pixels.iter_mut() {
        let [r, g, b, _] = *px;
        px[0] = m00 * r + m01 * g + m02 * b;
        px[1] = m10 * r + m11 * g + m12 * b;
        px[2] = m20 * r + m21 * g + m22 * b;
    }
}
