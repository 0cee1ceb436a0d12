//! Core constants, math helpers, and shared primitives for the ullage workspace.

/// Geometry constants for the normalized tank volume.
pub mod constants {
    /// Rest position of the lower axial bound.
    pub const REST_HEIGHT_MIN: f64 = 0.05;
    /// Rest position of the upper axial bound.
    pub const REST_HEIGHT_MAX: f64 = 0.95;
    /// Rest position of the inner radial bound.
    pub const REST_RADIAL_MIN: f64 = 0.0;
    /// Rest position of the outer radial bound.
    pub const REST_RADIAL_MAX: f64 = 0.95;

    /// Legal interval for either lower bound.
    pub const MIN_BOUND_RANGE: (f64, f64) = (0.0, 0.9);
    /// Legal interval for either upper bound.
    pub const MAX_BOUND_RANGE: (f64, f64) = (0.1, 1.0);

    /// Axial midpoint that splits the yaw/pitch policy for the lower height bound.
    pub const HEIGHT_MIN_MIDPOINT: f64 = 0.45;
    /// Axial midpoint that splits the yaw/pitch policy for the upper height bound.
    pub const HEIGHT_MAX_MIDPOINT: f64 = 0.55;

    /// Fill-ratio scaling denominator: `(0.5 + ratio) / 1.4`.
    pub const FUEL_FACTOR_DIVISOR: f64 = 1.4;
}

/// Scalar helpers shared by the deformation and scoring code.
pub mod math {
    /// Linear interpolation without clamping `t`, so `t > 1` overshoots the target.
    #[inline]
    pub fn lerp_unclamped(from: f64, to: f64, t: f64) -> f64 {
        from + (to - from) * t
    }

    /// Clamp into `[0, 1]`.
    #[inline]
    pub fn clamp01(v: f64) -> f64 {
        v.clamp(0.0, 1.0)
    }

    /// Clamp into an inclusive `(lo, hi)` pair.
    #[inline]
    pub fn clamp_to(v: f64, range: (f64, f64)) -> f64 {
        v.clamp(range.0, range.1)
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector in the tank's local frame (y is the thrust axis).
    pub type Vector3 = [f64; 3];

    /// Zero vector.
    pub const ZERO: Vector3 = [0.0, 0.0, 0.0];

    /// Squared Euclidean norm.
    #[inline]
    pub fn norm_squared(v: &Vector3) -> f64 {
        dot(v, v)
    }

    /// Norm of the component perpendicular to the tank axis (x/z plane).
    #[inline]
    pub fn planar_norm(v: &Vector3) -> f64 {
        (v[0] * v[0] + v[2] * v[2]).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }
}
