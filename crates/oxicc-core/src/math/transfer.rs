//! Seven-parameter transfer functions
//!
//! The ICC parametric curve family, generalized so that every `para`
//! function type maps onto one shape:
//!
//! ```text
//! f(x) = sign(x) * (c*|x| + f)           for |x| < d
//! f(x) = sign(x) * ((a*|x| + b)^g + e)   for |x| >= d
//! ```

/// A transfer function `{g, a, b, c, d, e, f}`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransferFunction {
    pub g: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl TransferFunction {
    /// sRGB decoding curve (encoded → linear)
    pub const SRGB: Self = Self {
        g: 2.4,
        a: 0.947_867_3,
        b: 0.052_132_7,
        c: 0.077_399_38,
        d: 0.040_45,
        e: 0.0,
        f: 0.0,
    };

    /// sRGB encoding curve (linear → encoded)
    pub const SRGB_INVERSE: Self = Self {
        g: 0.416_666_66,
        a: 1.137_283_3,
        b: -0.0,
        c: 12.92,
        d: 0.003_130_805,
        e: -0.054_969_79,
        f: -0.0,
    };

    /// The identity
    pub const LINEAR: Self = Self {
        g: 1.0,
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 0.0,
        e: 0.0,
        f: 0.0,
    };

    /// Evaluate the function at `x`
    #[inline]
    pub fn eval(&self, x: f32) -> f32 {
        let sign = if x < 0.0 { -1.0 } else { 1.0 };
        let x = x.abs();
        let y = if x < self.d {
            self.c * x + self.f
        } else {
            // A negative base has no real power; clamp it so the result stays finite
            (self.a * x + self.b).max(0.0).powf(self.g) + self.e
        };
        sign * y
    }

    /// True when every parameter is finite and the power segment is
    /// well-formed on its domain.
    pub fn is_valid(&self) -> bool {
        let params = [self.g, self.a, self.b, self.c, self.d, self.e, self.f];
        params.iter().all(|p| p.is_finite())
            && self.g > 0.0
            && self.a >= 0.0
            && self.d >= 0.0
            && self.a * self.d + self.b >= 0.0
    }

    /// True when the function is the identity on `[0, 1]` within `tolerance`
    pub fn is_linear(&self, tolerance: f32) -> bool {
        (0..=16).all(|i| {
            let x = i as f32 / 16.0;
            (self.eval(x) - x).abs() <= tolerance
        })
    }

    /// Closed-form inverse, or `None` when the function is invalid,
    /// discontinuous at `d`, or otherwise has no inverse of the same shape.
    ///
    /// The result maps `self.eval(1.0)` back to exactly `1.0`.
    pub fn invert(&self) -> Option<Self> {
        if !self.is_valid() || self.a == 0.0 {
            return None;
        }

        // Both segments must meet at d
        let d_linear = self.c * self.d + self.f;
        let d_power = (self.a * self.d + self.b).max(0.0).powf(self.g) + self.e;
        if (d_linear - d_power).abs() > 1.0 / 512.0 {
            return None;
        }

        let mut inv = Self {
            g: 0.0,
            a: 0.0,
            b: 0.0,
            c: 0.0,
            d: d_linear,
            e: 0.0,
            f: 0.0,
        };

        // y = c*x + f  =>  x = y/c - f/c; a zero-width linear segment stays zero
        if inv.d > 0.0 {
            if self.c == 0.0 {
                return None;
            }
            inv.c = 1.0 / self.c;
            inv.f = -self.f / self.c;
        }

        // y = (a*x + b)^g + e  =>  x = (k*y - k*e)^(1/g) - b/a with k = a^-g
        let k = self.a.powf(-self.g);
        inv.g = 1.0 / self.g;
        inv.a = k;
        inv.b = -k * self.e;
        inv.e = -self.b / self.a;

        if inv.a < 0.0 {
            return None;
        }
        if inv.a * inv.d + inv.b < 0.0 {
            inv.b = -inv.a * inv.d;
        }
        if !inv.is_valid() {
            return None;
        }

        // Pin the endpoint so inv(self(1)) == 1
        let s = self.eval(1.0);
        if !s.is_finite() {
            return None;
        }
        let sign = if s < 0.0 { -1.0 } else { 1.0 };
        let s = s * sign;
        if s < inv.d {
            inv.f = 1.0 - sign * inv.c * s;
        } else {
            inv.e = 1.0 - sign * (inv.a * s + inv.b).max(0.0).powf(inv.g);
        }

        inv.is_valid().then_some(inv)
    }

    /// Bitwise parameter equality
    ///
    /// Distinguishes `0.0` from `-0.0`, which `PartialEq` does not.
    pub fn bit_eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }

    fn to_bits(self) -> [u32; 7] {
        [self.g, self.a, self.b, self.c, self.d, self.e, self.f].map(f32::to_bits)
    }

    /// Largest parameter difference against another function
    pub fn max_param_diff(&self, other: &Self) -> f32 {
        let lhs = [self.g, self.a, self.b, self.c, self.d, self.e, self.f];
        let rhs = [other.g, other.a, other.b, other.c, other.d, other.e, other.f];
        lhs.iter()
            .zip(rhs.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max)
    }
}

impl Default for TransferFunction {
    fn default() -> Self {
        Self::LINEAR
    }
}

/// Reference sRGB decode, for tests and comparisons
#[inline]
pub fn srgb_to_linear(v: f32) -> f32 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Reference sRGB encode, for tests and comparisons
#[inline]
pub fn linear_to_srgb(v: f32) -> f32 {
    if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}
