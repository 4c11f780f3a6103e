//! SIMD-optimized transfer function operations
//!
//! Curves are applied to the three color lanes of every pixel.

use multiversion::multiversion;

use crate::icc::Curve;
use crate::math::TransferFunction;

/// Apply one transfer function to the RGB lanes of a batch
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn apply_transfer_batch(tf: &TransferFunction, pixels: &mut [[f32; 4]]) {
    for px in pixels.iter_mut() {
        px[0] = tf.eval(px[0]);
        px[1] = tf.eval(px[1]);
        px[2] = tf.eval(px[2]);
    }
}

/// Apply a separate curve to each RGB lane of a batch
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn apply_curves_batch<'c>(curves: &[Curve<'c>; 3], pixels: &mut [[f32; 4]]) {
    let [r, g, b] = curves;
    for px in pixels.iter_mut() {
        px[0] = r.eval(px[0]);
        px[1] = g.eval(px[1]);
        px[2] = b.eval(px[2]);
    }
}
