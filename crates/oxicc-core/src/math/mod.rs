//! Mathematical operations for color management
//!
//! - 3x3 matrix operations for RGB↔XYZ transforms
//! - Seven-parameter transfer functions and their inverses
//! - Fitting transfer functions to sampled tone curves
//! - Chromatic adaptation (Bradford)

pub mod chromatic_adaptation;
pub mod fit;
pub mod matrix;
pub mod transfer;

pub use chromatic_adaptation::{bradford_adaptation, D50_XYZ};
pub use fit::{CurveFitter, GaussNewtonFitter};
pub use matrix::{Matrix3x3, Matrix3x4, SRGB_TO_XYZD50};
pub use transfer::{linear_to_srgb, srgb_to_linear, TransferFunction};
