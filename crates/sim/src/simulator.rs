//! The per-tank propellant distribution tracker.

use std::fmt;
use std::sync::Arc;

use ullage_config::UllageSettings;

use crate::clock::UniversalClock;
use crate::deformation::{self, TickInput, UllageBounds};
use crate::persistence::{
    KEY_HEIGHT_MAX, KEY_HEIGHT_MIN, KEY_RADIAL_MAX, KEY_RADIAL_MIN, KEY_UNIVERSAL_TIME, Snapshot,
};
use crate::stability;
use crate::status::{EnglishLabels, StabilityTier, StatusCache, StatusColor, StatusLabels};

/// Sentinel for "no clock reading recorded yet".
pub const UNSET_TIME: f64 = f64::MIN;

/// Stability below which each tick is logged with its full geometry.
const LOW_STABILITY_LOG_THRESHOLD: f64 = 0.5;

/// Tracks where propellant pools inside one tank and how safe ignition is.
///
/// One instance belongs to exactly one tank; ticks must be applied in order
/// through `&mut self`. Settings, clock, and label providers are shared
/// read-only across instances.
pub struct UllageSimulator {
    name: String,
    settings: Arc<UllageSettings>,
    clock: Option<Arc<dyn UniversalClock>>,
    labels: Arc<dyn StatusLabels>,
    bounds: UllageBounds,
    last_update_time: f64,
    stability: f64,
    status: StatusCache,
}

impl UllageSimulator {
    /// Fresh simulator at the rest region, fully stable, with no clock.
    pub fn new(settings: Arc<UllageSettings>) -> Self {
        let labels: Arc<dyn StatusLabels> = Arc::new(EnglishLabels);
        let status = StatusCache::new(labels.as_ref());
        Self {
            name: "Unknown".to_string(),
            settings,
            clock: None,
            labels,
            bounds: UllageBounds::REST,
            last_update_time: UNSET_TIME,
            stability: 1.0,
            status,
        }
    }

    /// Attach a part or tank name used in diagnostics.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Reconcile elapsed time against `clock` instead of the caller's delta.
    pub fn with_clock(mut self, clock: Arc<dyn UniversalClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Resolve tier text through `labels`.
    pub fn with_labels(mut self, labels: Arc<dyn StatusLabels>) -> Self {
        self.status = StatusCache::new(labels.as_ref());
        self.labels = labels;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> UllageBounds {
        self.bounds
    }

    pub fn last_update_time(&self) -> f64 {
        self.last_update_time
    }

    /// Return the region to rest. Stability and the cached label are kept.
    pub fn reset(&mut self) {
        self.bounds = UllageBounds::REST;
    }

    /// Persist the four bounds and the last clock reading.
    pub fn save(&self) -> Snapshot {
        let mut snapshot = Snapshot::new();
        self.save_into(&mut snapshot);
        snapshot
    }

    /// Append the persisted fields to an existing snapshot.
    pub fn save_into(&self, snapshot: &mut Snapshot) {
        snapshot.set_f64(KEY_HEIGHT_MIN, self.bounds.height_min);
        snapshot.set_f64(KEY_HEIGHT_MAX, self.bounds.height_max);
        snapshot.set_f64(KEY_RADIAL_MIN, self.bounds.radial_min);
        snapshot.set_f64(KEY_RADIAL_MAX, self.bounds.radial_max);
        snapshot.set_f64(KEY_UNIVERSAL_TIME, self.last_update_time);
    }

    /// Restore whichever persisted fields are present; a missing snapshot is a no-op.
    pub fn load(&mut self, snapshot: Option<&Snapshot>) {
        let Some(snapshot) = snapshot else {
            return;
        };
        snapshot.read_f64_into(KEY_HEIGHT_MIN, &mut self.bounds.height_min);
        snapshot.read_f64_into(KEY_HEIGHT_MAX, &mut self.bounds.height_max);
        snapshot.read_f64_into(KEY_RADIAL_MIN, &mut self.bounds.radial_min);
        snapshot.read_f64_into(KEY_RADIAL_MAX, &mut self.bounds.radial_max);
        snapshot.read_f64_into(KEY_UNIVERSAL_TIME, &mut self.last_update_time);
        tracing::debug!(
            name = %self.name,
            bounds = ?self.bounds,
            last_update_time = self.last_update_time,
            "ullage state loaded"
        );
    }

    /// Advance one tick: deform the region and recompute stability.
    pub fn update(&mut self, input: &TickInput) {
        let elapsed = self.reconcile_elapsed(input.delta_time);
        deformation::deform(&mut self.bounds, &self.settings, input, elapsed);
        self.stability = stability::stability_score(&self.bounds, input.fuel_ratio);

        if self.stability < LOW_STABILITY_LOG_THRESHOLD {
            tracing::debug!(
                name = %self.name,
                stability = self.stability,
                bounds = ?self.bounds,
                box_level = stability::box_level(&self.bounds, input.fuel_ratio),
                delta_time = input.delta_time,
                elapsed,
                acceleration = ?input.local_acceleration,
                rotation = ?input.rotation_rate,
                fuel_ratio = input.fuel_ratio,
                "low propellant stability"
            );
        }
    }

    /// Clock delta since the previous reading when a clock is attached, else
    /// the caller's delta. A clock that moved backwards yields zero.
    fn reconcile_elapsed(&mut self, delta_time: f64) -> f64 {
        let Some(clock) = &self.clock else {
            return delta_time;
        };
        let now = clock.universal_time();
        let elapsed = now - self.last_update_time;
        self.last_update_time = now;
        elapsed.max(0.0)
    }

    pub fn stability(&self) -> f64 {
        self.stability
    }

    /// Override stability directly, bypassing deformation.
    pub fn set_stability(&mut self, stability: f64) {
        self.stability = stability;
    }

    pub fn probability(&self) -> f64 {
        stability::ignition_probability(self.stability, self.settings.stability_power)
    }

    /// Tier for the current stability, without hysteresis.
    pub fn tier(&self) -> StabilityTier {
        StabilityTier::classify(self.stability)
    }

    pub fn color(&self) -> StatusColor {
        StatusColor::for_stability(self.stability)
    }

    /// Display label and color. The label is rebuilt only once stability has
    /// moved at least [`crate::status::MIN_STABILITY_DIFF_FOR_UPDATE`] since
    /// the last rebuild.
    pub fn status(&mut self) -> (&str, StatusColor) {
        let color = self.color();
        let probability = self.probability();
        let label = self
            .status
            .refresh(self.stability, probability, self.labels.as_ref());
        (label, color)
    }
}

impl fmt::Debug for UllageSimulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UllageSimulator")
            .field("name", &self.name)
            .field("bounds", &self.bounds)
            .field("last_update_time", &self.last_update_time)
            .field("stability", &self.stability)
            .field("status", &self.status.label())
            .field("has_clock", &self.clock.is_some())
            .finish_non_exhaustive()
    }
}
