//! SIMD-Optimized Pixel Kernels
//!
//! Batch kernels over `[f32; 4]` pixels, compiled with the `multiversion`
//! crate for automatic CPU dispatch.
//!
//! Supported instruction sets:
//! - x86-64: SSE4.1, AVX2
//! - ARM64: NEON
//!
//! All functions automatically dispatch to the best available implementation
//! at runtime. The scalar fallback is always available.

mod alpha;
mod matrix;
mod transfer;

pub use alpha::{force_opaque_batch, premultiply_batch, unpremultiply_batch};
pub use matrix::apply_matrix_batch;
pub use transfer::{apply_curves_batch, apply_transfer_batch};

/// Get a description of the active SIMD features
pub fn active_features() -> &'static str {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            "AVX2"
        } else if is_x86_feature_detected!("sse4.1") {
            "SSE4.1"
        } else {
            "scalar"
        }
    }
    #[cfg(target_arch = "aarch64")]
    {
        "NEON"
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        "scalar"
    }
}
