//! Fitting transfer functions to sampled curves
//!
//! Profiles that describe their tone curves as tables can still be used
//! where a closed-form [`TransferFunction`] is needed (inversion for a
//! destination, fast evaluation) once a function has been fitted to the
//! samples. The fitter is a trait so callers can swap in their own.

use super::transfer::TransferFunction;

/// Fits a [`TransferFunction`] to `(x, y)` samples
pub trait CurveFitter {
    /// Returns the fitted function and its worst absolute error over the
    /// samples, or `None` when no valid function was found.
    fn fit(&self, xs: &[f32], ys: &[f32]) -> Option<(TransferFunction, f32)>;
}

/// Gauss-Newton fit over a sweep of linear-segment breakpoints
///
/// For each candidate breakpoint `d`, the samples below `d` get a least
/// squares line `c*x + f` and the rest get `(a*x + b)^g` refined with
/// damped Gauss-Newton steps. The candidate with the smallest maximum error
/// wins.
#[derive(Debug, Clone, Copy)]
pub struct GaussNewtonFitter {
    /// Number of breakpoint candidates in `(0, max_breakpoint]`, plus `d = 0`
    pub breakpoints: usize,
    pub max_breakpoint: f32,
    pub iterations: usize,
}

impl Default for GaussNewtonFitter {
    fn default() -> Self {
        Self {
            breakpoints: 16,
            max_breakpoint: 0.25,
            iterations: 16,
        }
    }
}

impl CurveFitter for GaussNewtonFitter {
    fn fit(&self, xs: &[f32], ys: &[f32]) -> Option<(TransferFunction, f32)> {
        if xs.len() != ys.len() || xs.len() < 2 {
            return None;
        }

        let mut best: Option<(TransferFunction, f32)> = None;
        for k in 0..=self.breakpoints {
            let d = self.max_breakpoint * k as f32 / self.breakpoints.max(1) as f32;
            let Some(tf) = self.fit_with_breakpoint(xs, ys, d) else {
                continue;
            };
            let err = max_error(&tf, xs, ys);
            if !err.is_finite() {
                continue;
            }
            if best.is_none_or(|(_, best_err)| err < best_err) {
                best = Some((tf, err));
            }
        }
        best
    }
}

impl GaussNewtonFitter {
    fn fit_with_breakpoint(&self, xs: &[f32], ys: &[f32], d: f32) -> Option<TransferFunction> {
        let (c, f) = fit_line(xs, ys, d);

        let power: Vec<(f64, f64)> = xs
            .iter()
            .zip(ys)
            .filter(|&(&x, _)| x >= d)
            .map(|(&x, &y)| (x as f64, y as f64))
            .collect();
        if power.len() < 3 {
            return None;
        }

        let mut params = [initial_gamma(&power), 1.0, 0.0];
        let mut sse = sum_squared_error(&power, params);
        for _ in 0..self.iterations {
            let Some(delta) = gauss_newton_step(&power, params) else {
                break;
            };

            // Halve the step until it improves the fit
            let mut step = 1.0;
            let mut improved = false;
            for _ in 0..8 {
                let candidate = [
                    params[0] + step * delta[0],
                    (params[1] + step * delta[1]).max(0.0),
                    params[2] + step * delta[2],
                ];
                let candidate_sse = sum_squared_error(&power, candidate);
                if candidate_sse.is_finite() && candidate_sse < sse {
                    params = candidate;
                    sse = candidate_sse;
                    improved = true;
                    break;
                }
                step *= 0.5;
            }
            if !improved {
                break;
            }
        }

        let [g, a, mut b] = params.map(|p| p as f32);
        // Keep the power base non-negative over the whole segment
        if a * d + b < 0.0 {
            b = -a * d;
        }
        // Join the segments at d so the result stays invertible
        let f = if d > 0.0 {
            (a * d + b).max(0.0).powf(g) - c * d
        } else {
            f
        };
        let tf = TransferFunction {
            g,
            a,
            b,
            c,
            d,
            e: 0.0,
            f,
        };
        tf.is_valid().then_some(tf)
    }
}

/// Least squares `c*x + f` through the samples with `x < d`
fn fit_line(xs: &[f32], ys: &[f32], d: f32) -> (f32, f32) {
    let (mut n, mut sx, mut sy, mut sxx, mut sxy) = (0.0f64, 0.0, 0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys) {
        if x < d {
            let (x, y) = (x as f64, y as f64);
            n += 1.0;
            sx += x;
            sy += y;
            sxx += x * x;
            sxy += x * y;
        }
    }
    if n == 0.0 {
        return (0.0, 0.0);
    }
    let denom = n * sxx - sx * sx;
    if denom.abs() < 1e-12 {
        // A single point: a line through the origin
        return if sx > 0.0 { ((sy / sx) as f32, 0.0) } else { (0.0, (sy / n) as f32) };
    }
    let c = (n * sxy - sx * sy) / denom;
    let f = (sy - c * sx) / n;
    (c as f32, f as f32)
}

/// Log-log slope through the origin as a starting gamma
fn initial_gamma(points: &[(f64, f64)]) -> f64 {
    let (mut num, mut den) = (0.0, 0.0);
    for &(x, y) in points {
        if x > 0.0 && x < 1.0 && y > 0.0 {
            let (lx, ly) = (x.ln(), y.ln());
            num += lx * ly;
            den += lx * lx;
        }
    }
    let g = num / den;
    if g.is_finite() && g > 0.0 { g } else { 1.0 }
}

#[inline]
fn model(x: f64, [g, a, b]: [f64; 3]) -> f64 {
    (a * x + b).max(0.0).powf(g)
}

fn sum_squared_error(points: &[(f64, f64)], params: [f64; 3]) -> f64 {
    points
        .iter()
        .map(|&(x, y)| {
            let r = y - model(x, params);
            r * r
        })
        .sum()
}

/// Solves `JᵀJ δ = Jᵀr` for the parameters `[g, a, b]`
fn gauss_newton_step(points: &[(f64, f64)], params: [f64; 3]) -> Option<[f64; 3]> {
    let [g, a, b] = params;
    let mut jtj = [[0.0f64; 3]; 3];
    let mut jtr = [0.0f64; 3];

    for &(x, y) in points {
        let u = a * x + b;
        if u <= 1e-7 {
            continue;
        }
        let m = u.powf(g);
        let dm_du = g * u.powf(g - 1.0);
        let jac = [m * u.ln(), dm_du * x, dm_du];
        let r = y - m;
        for i in 0..3 {
            jtr[i] += jac[i] * r;
            for j in 0..3 {
                jtj[i][j] += jac[i] * jac[j];
            }
        }
    }

    solve3(jtj, jtr)
}

/// Cramer's rule on a 3x3 system
fn solve3(m: [[f64; 3]; 3], v: [f64; 3]) -> Option<[f64; 3]> {
    let det3 = |m: &[[f64; 3]; 3]| {
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    };
    let det = det3(&m);
    if det.abs() < 1e-18 || !det.is_finite() {
        return None;
    }
    let mut out = [0.0; 3];
    for (col, slot) in out.iter_mut().enumerate() {
        let mut mc = m;
        for row in 0..3 {
            mc[row][col] = v[row];
        }
        *slot = det3(&mc) / det;
    }
    out.iter().all(|v| v.is_finite()).then_some(out)
}

fn max_error(tf: &TransferFunction, xs: &[f32], ys: &[f32]) -> f32 {
    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| (tf.eval(x) - y).abs())
        .fold(0.0, f32::max)
}
