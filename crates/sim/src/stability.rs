//! Stability score and ignition probability derived from ullage geometry.

use ullage_core::math::clamp01;

use crate::deformation::UllageBounds;
use crate::status::StabilityTier;

/// Composite instability potential of the region; larger and emptier is worse.
pub fn box_level(bounds: &UllageBounds, fuel_ratio: f64) -> f64 {
    let fill_weight = (8.2 - 8.0 * fuel_ratio).clamp(0.0, 8.2);
    (bounds.height_span() * bounds.radial_span() * 10.0 * fill_weight - 1.0).clamp(0.0, 15.0)
}

/// Stability in `[0, 1]`; 1 means the feed inlet is reliably covered.
pub fn stability_score(bounds: &UllageBounds, fuel_ratio: f64) -> f64 {
    let p_vertical = clamp01(1.0 - (bounds.height_min - 0.1) * 5.0);
    let p_horizontal = clamp01(1.0 - (bounds.radial_min - 0.1) * 5.0);
    let level = box_level(bounds, fuel_ratio);
    (1.0 - p_vertical * p_horizontal * (0.75 + level.sqrt())).max(0.0)
}

/// Ignition probability for a stability value. Anything in the top tier counts
/// as certain before the power curve is applied.
pub fn ignition_probability(stability: f64, stability_power: f64) -> f64 {
    let s = if stability >= StabilityTier::VeryStable.lower_bound() {
        1.0
    } else {
        stability
    };
    s.powf(stability_power)
}
