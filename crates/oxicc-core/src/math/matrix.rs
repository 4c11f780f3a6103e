//! 3x3 and 3x4 matrices for gamut transforms
//!
//! Values are `f32` to match the precision ICC s15Fixed16 numbers carry.
//! Inversion and products are computed in `f64` and rounded back.

use std::ops::Mul;

use super::chromatic_adaptation::{bradford_adaptation, D50_XYZ};

/// A row-major 3x3 matrix (`vals[row][col]`)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix3x3 {
    pub vals: [[f32; 3]; 3],
}

/// A row-major 3x4 matrix: a 3x3 matrix plus a translation column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3x4 {
    pub vals: [[f32; 4]; 3],
}

impl Matrix3x3 {
    #[inline]
    pub const fn new(vals: [[f32; 3]; 3]) -> Self {
        Self { vals }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self {
            vals: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Returns M × v
    #[inline]
    pub fn multiply_vec(&self, v: [f32; 3]) -> [f32; 3] {
        let m = &self.vals;
        [
            m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
            m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
            m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
        ]
    }

    /// Returns self × other
    pub fn multiply(&self, other: &Self) -> Self {
        let mut out = [[0.0f32; 3]; 3];
        for (r, row) in out.iter_mut().enumerate() {
            for (c, val) in row.iter_mut().enumerate() {
                *val = (0..3)
                    .map(|k| self.vals[r][k] as f64 * other.vals[k][c] as f64)
                    .sum::<f64>() as f32;
            }
        }
        Self { vals: out }
    }

    /// Inverse of this matrix, or `None` when it is singular or the inverse
    /// does not fit in `f32`
    pub fn invert(&self) -> Option<Self> {
        let m = self.vals.map(|row| row.map(f64::from));

        let a00 = m[1][1] * m[2][2] - m[1][2] * m[2][1];
        let a01 = m[0][2] * m[2][1] - m[0][1] * m[2][2];
        let a02 = m[0][1] * m[1][2] - m[0][2] * m[1][1];
        let a10 = m[1][2] * m[2][0] - m[1][0] * m[2][2];
        let a11 = m[0][0] * m[2][2] - m[0][2] * m[2][0];
        let a12 = m[0][2] * m[1][0] - m[0][0] * m[1][2];
        let a20 = m[1][0] * m[2][1] - m[1][1] * m[2][0];
        let a21 = m[0][1] * m[2][0] - m[0][0] * m[2][1];
        let a22 = m[0][0] * m[1][1] - m[0][1] * m[1][0];

        let det = m[0][0] * a00 + m[0][1] * a10 + m[0][2] * a20;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv_det = 1.0 / det;

        let inv = [
            [a00 * inv_det, a01 * inv_det, a02 * inv_det],
            [a10 * inv_det, a11 * inv_det, a12 * inv_det],
            [a20 * inv_det, a21 * inv_det, a22 * inv_det],
        ];

        let mut out = [[0.0f32; 3]; 3];
        for (r, row) in inv.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                let v = v as f32;
                if !v.is_finite() {
                    return None;
                }
                out[r][c] = v;
            }
        }
        Some(Self { vals: out })
    }

    /// Check if this matrix is approximately equal to another
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.vals
            .iter()
            .flatten()
            .zip(other.vals.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    /// Build an RGB → XYZD50 matrix from primaries and white point
    /// chromaticities (xy), Bradford-adapting the white point to D50.
    pub fn from_primaries(
        rx: f32,
        ry: f32,
        gx: f32,
        gy: f32,
        bx: f32,
        by: f32,
        wx: f32,
        wy: f32,
    ) -> Option<Self> {
        let coords = [rx, ry, gx, gy, bx, by, wx, wy];
        if coords.iter().any(|v| !(0.0..=1.0).contains(v)) || wy == 0.0 {
            return None;
        }

        let primaries = Self::new([
            [rx, gx, bx],
            [ry, gy, by],
            [1.0 - rx - ry, 1.0 - gx - gy, 1.0 - bx - by],
        ]);
        let white = [wx / wy, 1.0, (1.0 - wx - wy) / wy];

        // Scale each primary so that (1, 1, 1) lands on the white point
        let scale = primaries.invert()?.multiply_vec(white);
        let mut to_xyz = primaries;
        for row in to_xyz.vals.iter_mut() {
            for (c, v) in row.iter_mut().enumerate() {
                *v *= scale[c];
            }
        }

        let adapt = bradford_adaptation(white, D50_XYZ)?;
        Some(adapt.multiply(&to_xyz))
    }
}

impl Default for Matrix3x3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Matrix3x3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(&rhs)
    }
}

impl Mul<[f32; 3]> for Matrix3x3 {
    type Output = [f32; 3];

    fn mul(self, rhs: [f32; 3]) -> Self::Output {
        self.multiply_vec(rhs)
    }
}

impl Matrix3x4 {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            vals: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
            ],
        }
    }

    /// Returns M × (v, 1)
    #[inline]
    pub fn multiply_vec(&self, v: [f32; 3]) -> [f32; 3] {
        let m = &self.vals;
        [
            m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2] + m[0][3],
            m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2] + m[1][3],
            m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2] + m[2][3],
        ]
    }
}

impl From<Matrix3x3> for Matrix3x4 {
    fn from(m: Matrix3x3) -> Self {
        let v = m.vals;
        Self {
            vals: [
                [v[0][0], v[0][1], v[0][2], 0.0],
                [v[1][0], v[1][1], v[1][2], 0.0],
                [v[2][0], v[2][1], v[2][2], 0.0],
            ],
        }
    }
}

/// sRGB primaries adapted to D50, as stored in the common sRGB ICC profiles
pub const SRGB_TO_XYZD50: Matrix3x3 = Matrix3x3::new([
    [0.436_065_7, 0.385_147_1, 0.143_066_9],
    [0.222_488_4, 0.716_873_9, 0.060_607_3],
    [0.013_916_1, 0.097_080_9, 0.714_169_3],
]);
