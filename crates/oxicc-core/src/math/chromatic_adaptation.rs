//! Bradford chromatic adaptation
//!
//! Moves primaries given under an arbitrary white point onto the D50
//! connection space.

use super::matrix::Matrix3x3;

/// The D50 illuminant as encoded in ICC headers
pub const D50_XYZ: [f32; 3] = [0.9642, 1.0, 0.8249];

/// XYZ to Bradford cone response
const BRADFORD: Matrix3x3 = Matrix3x3::new([
    [0.8951, 0.2664, -0.1614],
    [-0.7502, 1.7135, 0.0367],
    [0.0389, -0.0685, 1.0296],
]);

/// `M` with `XYZ_dst = M × XYZ_src` for two white points given as XYZ
///
/// `None` when the source white has a zero cone response.
pub fn bradford_adaptation(src_white: [f32; 3], dst_white: [f32; 3]) -> Option<Matrix3x3> {
    let src = BRADFORD.multiply_vec(src_white);
    let dst = BRADFORD.multiply_vec(dst_white);
    if src.contains(&0.0) {
        return None;
    }

    let mut gain = Matrix3x3::identity();
    for i in 0..3 {
        gain.vals[i][i] = dst[i] / src[i];
    }
    Some(BRADFORD.invert()?.multiply(&gain.multiply(&BRADFORD)))
}
