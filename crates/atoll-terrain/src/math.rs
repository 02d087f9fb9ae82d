//! Deterministic scalar helpers.
//!
//! Transcendental functions go through `libm` rather than the platform libc
//! so generated terrain is bit-identical across targets.

/// Deterministic cosine.
#[inline]
pub fn det_cos(x: f64) -> f64 {
    libm::cos(x)
}

/// Deterministic sine.
#[inline]
pub fn det_sin(x: f64) -> f64 {
    libm::sin(x)
}

/// Deterministic power.
#[inline]
pub fn det_pow(base: f64, exponent: f64) -> f64 {
    libm::pow(base, exponent)
}

/// Deterministic square root.
#[inline]
pub fn det_sqrt(x: f64) -> f64 {
    libm::sqrt(x)
}

/// Hermite smoothstep between `edge0` and `edge1`, clamped to `[0, 1]`.
#[inline]
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Catmull-Rom interpolation between `b` and `c`, with `a` and `d` as the
/// outer control points. `x = 0` yields `b`, `x = 1` yields `c`.
#[inline]
pub fn cubic(a: f64, b: f64, c: f64, d: f64, x: f64) -> f64 {
    0.5 * (2.0 * b
        + (c - a) * x
        + (2.0 * a - 5.0 * b + 4.0 * c - d) * x * x
        + (3.0 * (b - c) + d - a) * x * x * x)
}
