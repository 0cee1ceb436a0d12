//! Per-tick deformation of the ullage bounding region.
//!
//! Every step operates on an explicit [`UllageBounds`] value and clamps each
//! field to its legal interval before returning. Natural diffusion is the one
//! exception: it extrapolates without clamping and relies on the next step.

use ullage_config::UllageSettings;
use ullage_core::constants::{
    FUEL_FACTOR_DIVISOR, HEIGHT_MAX_MIDPOINT, HEIGHT_MIN_MIDPOINT, MAX_BOUND_RANGE,
    MIN_BOUND_RANGE, REST_HEIGHT_MAX, REST_HEIGHT_MIN, REST_RADIAL_MAX, REST_RADIAL_MIN,
};
use ullage_core::math::{clamp_to, lerp_unclamped};
use ullage_core::vector::{self, Vector3};

/// Normalized axis-aligned region occupied by ullage gas (height × radial).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UllageBounds {
    pub height_min: f64,
    pub height_max: f64,
    pub radial_min: f64,
    pub radial_max: f64,
}

impl UllageBounds {
    /// Region the pool relaxes toward when undisturbed.
    pub const REST: Self = Self {
        height_min: REST_HEIGHT_MIN,
        height_max: REST_HEIGHT_MAX,
        radial_min: REST_RADIAL_MIN,
        radial_max: REST_RADIAL_MAX,
    };

    pub fn height_span(&self) -> f64 {
        self.height_max - self.height_min
    }

    pub fn radial_span(&self) -> f64 {
        self.radial_max - self.radial_min
    }

    /// True when every field sits inside its interval and both pairs are ordered.
    pub fn is_legal(&self) -> bool {
        let within = |v: f64, range: (f64, f64)| v >= range.0 && v <= range.1;
        within(self.height_min, MIN_BOUND_RANGE)
            && within(self.height_max, MAX_BOUND_RANGE)
            && within(self.radial_min, MIN_BOUND_RANGE)
            && within(self.radial_max, MAX_BOUND_RANGE)
            && self.height_min <= self.height_max
            && self.radial_min <= self.radial_max
    }

    /// Shift each field by the given deltas, then clamp to the legal intervals.
    fn shift_clamped(
        &mut self,
        d_height_min: f64,
        d_height_max: f64,
        d_radial_min: f64,
        d_radial_max: f64,
    ) {
        self.height_min = clamp_to(self.height_min + d_height_min, MIN_BOUND_RANGE);
        self.height_max = clamp_to(self.height_max + d_height_max, MAX_BOUND_RANGE);
        self.radial_min = clamp_to(self.radial_min + d_radial_min, MIN_BOUND_RANGE);
        self.radial_max = clamp_to(self.radial_max + d_radial_max, MAX_BOUND_RANGE);
    }
}

impl Default for UllageBounds {
    fn default() -> Self {
        Self::REST
    }
}

/// Physical inputs for a single simulation tick, in the tank's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Local acceleration (m/s²); `y` is the tank axis.
    pub local_acceleration: Vector3,
    /// Angular rate (rad/s); `y` is roll about the tank axis.
    pub rotation_rate: Vector3,
    /// Caller-supplied step length in seconds.
    pub delta_time: f64,
    /// Pseudo-acceleration from boil-off venting.
    pub venting_acceleration: f64,
    /// Fraction of tank volume filled with liquid, in `[0, 1]`.
    pub fuel_ratio: f64,
}

impl TickInput {
    /// A tick with no acceleration, rotation, or venting.
    pub fn coasting(delta_time: f64, fuel_ratio: f64) -> Self {
        Self {
            local_acceleration: vector::ZERO,
            rotation_rate: vector::ZERO,
            delta_time,
            venting_acceleration: 0.0,
            fuel_ratio,
        }
    }
}

/// Scale applied to disturbances; emptier tanks slosh more.
#[inline]
pub fn fuel_factor(fuel_ratio: f64) -> f64 {
    (0.5 + fuel_ratio) / FUEL_FACTOR_DIVISOR
}

/// Relax toward [`UllageBounds::REST`]. `venting_const` scales both rates and may
/// push the interpolation factor past one.
pub fn relax_toward_rest(
    bounds: &mut UllageBounds,
    settings: &UllageSettings,
    venting_const: f64,
) {
    let ty = settings.natural_diffusion_rate_y * venting_const;
    let tx = settings.natural_diffusion_rate_x * venting_const;
    bounds.height_min = lerp_unclamped(bounds.height_min, REST_HEIGHT_MIN, ty);
    bounds.height_max = lerp_unclamped(bounds.height_max, REST_HEIGHT_MAX, ty);
    bounds.radial_min = lerp_unclamped(bounds.radial_min, REST_RADIAL_MIN, tx);
    bounds.radial_max = lerp_unclamped(bounds.radial_max, REST_RADIAL_MAX, tx);
}

/// Forward/back acceleration shifts the whole pool along the axis and widens it radially.
pub fn translate_axial(
    bounds: &mut UllageBounds,
    settings: &UllageSettings,
    axial_amount: f64,
    fuel_factor: f64,
) {
    let radial = axial_amount.abs() * settings.translate_axial_coefficient_x * fuel_factor;
    let height = axial_amount * settings.translate_axial_coefficient_y * fuel_factor;
    bounds.shift_clamped(height, height, -radial, radial);
}

/// Sideways acceleration stretches the height range and pushes the radial range outward.
pub fn translate_sideways(
    bounds: &mut UllageBounds,
    settings: &UllageSettings,
    amount: &Vector3,
    fuel_factor: f64,
) {
    let side = vector::planar_norm(amount) * fuel_factor;
    let height = side * settings.translate_sideway_coefficient_y;
    let radial = side * settings.translate_sideway_coefficient_x;
    bounds.shift_clamped(-height, height, radial, radial);
}

/// Yaw/pitch rate acts on each height bound depending on which side of the
/// tank midpoint it sits, and widens the radial range.
pub fn rotate_yaw_pitch(
    bounds: &mut UllageBounds,
    settings: &UllageSettings,
    rotation_rate: &Vector3,
) {
    let magnitude = vector::planar_norm(rotation_rate);
    let height = magnitude * settings.rotate_yaw_pitch_coefficient_y;
    let radial = magnitude * settings.rotate_yaw_pitch_coefficient_x;

    bounds.height_min = if bounds.height_min < HEIGHT_MIN_MIDPOINT {
        (bounds.height_min + height).clamp(MIN_BOUND_RANGE.0, HEIGHT_MIN_MIDPOINT)
    } else {
        (bounds.height_min - height).clamp(HEIGHT_MIN_MIDPOINT, MIN_BOUND_RANGE.1)
    };
    bounds.height_max = if bounds.height_max < HEIGHT_MAX_MIDPOINT {
        (bounds.height_max + height).clamp(MAX_BOUND_RANGE.0, HEIGHT_MAX_MIDPOINT)
    } else {
        (bounds.height_max - height).clamp(HEIGHT_MAX_MIDPOINT, MAX_BOUND_RANGE.1)
    };
    bounds.shift_clamped(0.0, 0.0, -radial, radial);
}

/// Roll stretches the height range and draws both radial bounds inward.
pub fn rotate_roll(
    bounds: &mut UllageBounds,
    settings: &UllageSettings,
    roll_amount: f64,
    fuel_factor: f64,
) {
    let roll = roll_amount.abs() * fuel_factor;
    let height = roll * settings.rotate_roll_coefficient_y;
    let radial = roll * settings.rotate_roll_coefficient_x;
    bounds.shift_clamped(-height, height, -radial, -radial);
}

/// Apply one full tick of deformation. `elapsed` is the reconciled clock delta
/// and only drives natural diffusion; translation and roll use `input.delta_time`.
pub fn deform(
    bounds: &mut UllageBounds,
    settings: &UllageSettings,
    input: &TickInput,
    elapsed: f64,
) {
    let fuel_factor = fuel_factor(input.fuel_ratio);
    let fuel_factor_recip = 1.0 / fuel_factor;

    let threshold = settings.natural_diffusion_acc_thresh;
    if input.venting_acceleration <= settings.venting_acc_threshold
        && vector::norm_squared(&input.local_acceleration) < threshold * threshold
    {
        let venting_const = ((1.0 - input.venting_acceleration / settings.venting_acc_threshold)
            * fuel_factor_recip
            * elapsed)
            .min(1.0);
        relax_toward_rest(bounds, settings, venting_const);
    }

    let acceleration_amount = vector::scale(&input.local_acceleration, input.delta_time);
    translate_axial(bounds, settings, acceleration_amount[1], fuel_factor);
    translate_sideways(bounds, settings, &acceleration_amount, fuel_factor);
    rotate_yaw_pitch(bounds, settings, &input.rotation_rate);
    rotate_roll(bounds, settings, input.rotation_rate[1] * input.delta_time, fuel_factor);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(height_min: f64, height_max: f64, radial_min: f64, radial_max: f64) -> UllageBounds {
        UllageBounds {
            height_min,
            height_max,
            radial_min,
            radial_max,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn rest_region_is_legal() {
        assert!(UllageBounds::REST.is_legal());
        assert_eq!(UllageBounds::default(), UllageBounds::REST);
        assert!(!bounds(0.6, 0.5, 0.0, 0.9).is_legal());
        assert!(!bounds(0.05, 0.95, 0.0, 0.05).is_legal());
    }

    #[test]
    fn fuel_factor_amplifies_emptier_tanks() {
        assert!(fuel_factor(0.0) < fuel_factor(1.0));
        assert!(close(fuel_factor(0.9), 1.0));
    }

    #[test]
    fn axial_push_shifts_both_height_bounds_together() {
        let settings = UllageSettings::default();
        let mut b = bounds(0.2, 0.6, 0.3, 0.6);
        translate_axial(&mut b, &settings, 2.0, 1.0);
        assert!(close(b.height_min, 0.32));
        assert!(close(b.height_max, 0.72));
        assert!(close(b.radial_min, 0.18));
        assert!(close(b.radial_max, 0.72));

        translate_axial(&mut b, &settings, -20.0, 1.0);
        assert_eq!(b.height_min, 0.0);
        assert_eq!(b.height_max, 0.1);
        assert_eq!(b.radial_min, 0.0);
        assert_eq!(b.radial_max, 1.0);
    }

    #[test]
    fn sideways_push_ignores_axial_component() {
        let settings = UllageSettings::default();
        let mut b = bounds(0.3, 0.7, 0.1, 0.5);
        translate_sideways(&mut b, &settings, &[3.0, 50.0, 4.0], 1.0);
        assert!(close(b.height_min, 0.2));
        assert!(close(b.height_max, 0.8));
        assert!(close(b.radial_min, 0.3));
        assert!(close(b.radial_max, 0.7));
    }

    #[test]
    fn yaw_pitch_respects_midpoints() {
        let settings = UllageSettings {
            rotate_yaw_pitch_coefficient_x: 0.0,
            rotate_yaw_pitch_coefficient_y: 0.1,
            ..UllageSettings::default()
        };
        let rate = [1.0, 0.0, 0.0];
        let mut b = bounds(0.3, 0.7, 0.2, 0.8);

        rotate_yaw_pitch(&mut b, &settings, &rate);
        assert!(close(b.height_min, 0.4));
        assert!(close(b.height_max, 0.6));

        rotate_yaw_pitch(&mut b, &settings, &rate);
        assert_eq!(b.height_min, HEIGHT_MIN_MIDPOINT);
        assert_eq!(b.height_max, HEIGHT_MAX_MIDPOINT);

        // Once at the midpoint the other branch applies and holds it there.
        rotate_yaw_pitch(&mut b, &settings, &rate);
        assert_eq!(b.height_min, HEIGHT_MIN_MIDPOINT);
        assert_eq!(b.height_max, HEIGHT_MAX_MIDPOINT);
        assert_eq!(b.radial_min, 0.2);
        assert_eq!(b.radial_max, 0.8);
    }

    #[test]
    fn yaw_pitch_uses_rate_not_roll_axis() {
        let settings = UllageSettings::default();
        let mut b = bounds(0.3, 0.7, 0.2, 0.8);
        rotate_yaw_pitch(&mut b, &settings, &[0.0, 25.0, 0.0]);
        assert_eq!(b, bounds(0.3, 0.7, 0.2, 0.8));
    }

    #[test]
    fn roll_draws_radial_bounds_inward() {
        let settings = UllageSettings {
            rotate_roll_coefficient_x: 0.1,
            rotate_roll_coefficient_y: 0.05,
            ..UllageSettings::default()
        };
        let mut b = bounds(0.3, 0.7, 0.4, 0.8);
        rotate_roll(&mut b, &settings, -2.0, 1.0);
        assert!(close(b.height_min, 0.2));
        assert!(close(b.height_max, 0.8));
        assert!(close(b.radial_min, 0.2));
        assert!(close(b.radial_max, 0.6));
    }

    #[test]
    fn diffusion_can_overshoot_before_clamping() {
        let settings = UllageSettings {
            natural_diffusion_rate_x: 3.0,
            natural_diffusion_rate_y: 3.0,
            ..UllageSettings::default()
        };
        let mut b = bounds(0.25, 0.75, 0.1, 0.75);
        relax_toward_rest(&mut b, &settings, 1.0);
        assert!(close(b.height_min, -0.35));
        assert!(close(b.radial_min, -0.2));

        translate_axial(&mut b, &settings, 0.0, 1.0);
        assert_eq!(b.height_min, 0.0);
        assert_eq!(b.radial_min, 0.0);
    }

    #[test]
    fn strong_acceleration_suppresses_diffusion() {
        let settings = UllageSettings {
            translate_axial_coefficient_x: 0.0,
            translate_axial_coefficient_y: 0.0,
            translate_sideway_coefficient_x: 0.0,
            translate_sideway_coefficient_y: 0.0,
            ..UllageSettings::default()
        };
        let start = bounds(0.4, 0.8, 0.3, 0.7);
        let mut b = start;
        let input = TickInput {
            local_acceleration: [0.0, 1.0, 0.0],
            ..TickInput::coasting(1.0, 0.5)
        };
        deform(&mut b, &settings, &input, 1.0);
        assert_eq!(b, start);

        let venting = TickInput {
            venting_acceleration: 1.0,
            ..TickInput::coasting(1.0, 0.5)
        };
        deform(&mut b, &settings, &venting, 1.0);
        assert_eq!(b, start);
    }
}
