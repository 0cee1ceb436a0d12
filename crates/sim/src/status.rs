//! Stability tiers, display colors, and the hysteresis-guarded status label.

use std::borrow::Cow;

use ullage_config::LabelCatalog;

/// Minimum change in stability before the cached label is rebuilt.
pub const MIN_STABILITY_DIFF_FOR_UPDATE: f64 = 0.0005;

/// Ordered stability tiers, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StabilityTier {
    VeryStable,
    Stable,
    Risky,
    VeryRisky,
    Unstable,
    VeryUnstable,
}

impl StabilityTier {
    pub const ALL: [StabilityTier; 6] = [
        StabilityTier::VeryStable,
        StabilityTier::Stable,
        StabilityTier::Risky,
        StabilityTier::VeryRisky,
        StabilityTier::Unstable,
        StabilityTier::VeryUnstable,
    ];

    /// Inclusive lower bound of the tier.
    pub fn lower_bound(self) -> f64 {
        match self {
            StabilityTier::VeryStable => 0.996,
            StabilityTier::Stable => 0.95,
            StabilityTier::Risky => 0.75,
            StabilityTier::VeryRisky => 0.3,
            StabilityTier::Unstable => 0.15,
            StabilityTier::VeryUnstable => f64::NEG_INFINITY,
        }
    }

    /// Highest tier whose lower bound the stability meets.
    pub fn classify(stability: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|tier| stability >= tier.lower_bound())
            .unwrap_or(StabilityTier::VeryUnstable)
    }

    /// Lookup key for localized display text.
    pub fn key(self) -> &'static str {
        match self {
            StabilityTier::VeryStable => "ullage.status.very_stable",
            StabilityTier::Stable => "ullage.status.stable",
            StabilityTier::Risky => "ullage.status.risky",
            StabilityTier::VeryRisky => "ullage.status.very_risky",
            StabilityTier::Unstable => "ullage.status.unstable",
            StabilityTier::VeryUnstable => "ullage.status.very_unstable",
        }
    }

    pub fn english(self) -> &'static str {
        match self {
            StabilityTier::VeryStable => "Very Stable",
            StabilityTier::Stable => "Stable",
            StabilityTier::Risky => "Risky",
            StabilityTier::VeryRisky => "Very Risky",
            StabilityTier::Unstable => "Unstable",
            StabilityTier::VeryUnstable => "Very Unstable",
        }
    }
}

/// Three-level display color, always derived from the current stability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusColor {
    /// White.
    Neutral,
    /// Orange.
    Warning,
    /// Red.
    Danger,
}

impl StatusColor {
    pub fn for_stability(stability: f64) -> Self {
        if stability >= StabilityTier::Stable.lower_bound() {
            StatusColor::Neutral
        } else if stability >= StabilityTier::Risky.lower_bound() {
            StatusColor::Warning
        } else {
            StatusColor::Danger
        }
    }

    /// sRGB hex code suitable for terminal or UI rendering.
    pub fn hex(self) -> &'static str {
        match self {
            StatusColor::Neutral => "#FFFFFF",
            StatusColor::Warning => "#E07A00",
            StatusColor::Danger => "#E50000",
        }
    }
}

/// Resolves tier keys to display text.
pub trait StatusLabels: Send + Sync {
    fn label(&self, tier: StabilityTier) -> Cow<'_, str>;
}

/// Built-in English text.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishLabels;

impl StatusLabels for EnglishLabels {
    fn label(&self, tier: StabilityTier) -> Cow<'_, str> {
        Cow::Borrowed(tier.english())
    }
}

/// Catalog entries win; missing keys fall back to English.
impl StatusLabels for LabelCatalog {
    fn label(&self, tier: StabilityTier) -> Cow<'_, str> {
        Cow::Borrowed(self.get(tier.key()).unwrap_or(tier.english()))
    }
}

/// Cached label plus the stability it was built from.
#[derive(Debug, Clone)]
pub(crate) struct StatusCache {
    label: String,
    computed_at: f64,
}

impl StatusCache {
    /// `computed_at` starts out of range so the first query always rebuilds.
    pub(crate) fn new(labels: &dyn StatusLabels) -> Self {
        Self {
            label: labels.label(StabilityTier::VeryStable).into_owned(),
            computed_at: -1.0,
        }
    }

    pub(crate) fn is_stale(&self, stability: f64) -> bool {
        (stability - self.computed_at).abs() >= MIN_STABILITY_DIFF_FOR_UPDATE
    }

    /// Rebuild the label if stability drifted far enough; returns the cached text.
    pub(crate) fn refresh(
        &mut self,
        stability: f64,
        probability: f64,
        labels: &dyn StatusLabels,
    ) -> &str {
        if self.is_stale(stability) {
            let tier = StabilityTier::classify(stability);
            self.computed_at = stability;
            self.label = format!("{} ({:.1}%)", labels.label(tier), probability * 100.0);
            tracing::trace!(stability, ?tier, label = %self.label, "ullage status label rebuilt");
        }
        &self.label
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn tiers_classify_at_inclusive_bounds() {
        assert_eq!(StabilityTier::classify(1.0), StabilityTier::VeryStable);
        assert_eq!(StabilityTier::classify(0.996), StabilityTier::VeryStable);
        assert_eq!(StabilityTier::classify(0.9959), StabilityTier::Stable);
        assert_eq!(StabilityTier::classify(0.95), StabilityTier::Stable);
        assert_eq!(StabilityTier::classify(0.75), StabilityTier::Risky);
        assert_eq!(StabilityTier::classify(0.3), StabilityTier::VeryRisky);
        assert_eq!(StabilityTier::classify(0.15), StabilityTier::Unstable);
        assert_eq!(StabilityTier::classify(0.1499), StabilityTier::VeryUnstable);
        assert_eq!(StabilityTier::classify(0.0), StabilityTier::VeryUnstable);
    }

    #[test]
    fn colors_follow_stable_and_risky_bounds() {
        assert_eq!(StatusColor::for_stability(0.95), StatusColor::Neutral);
        assert_eq!(StatusColor::for_stability(0.9499), StatusColor::Warning);
        assert_eq!(StatusColor::for_stability(0.75), StatusColor::Warning);
        assert_eq!(StatusColor::for_stability(0.7), StatusColor::Danger);
    }

    #[test]
    fn catalog_falls_back_to_english() {
        let mut labels = BTreeMap::new();
        labels.insert("ullage.status.risky".to_string(), "Riskant".to_string());
        let catalog = LabelCatalog {
            locale: "de".to_string(),
            labels,
        };
        assert_eq!(catalog.label(StabilityTier::Risky), "Riskant");
        assert_eq!(catalog.label(StabilityTier::Stable), "Stable");
    }

    #[test]
    fn cache_holds_label_inside_hysteresis_band() {
        let mut cache = StatusCache::new(&EnglishLabels);
        assert_eq!(cache.label(), "Very Stable");

        assert_eq!(cache.refresh(0.9502, 0.9502, &EnglishLabels), "Stable (95.0%)");
        assert_eq!(cache.refresh(0.9498, 0.9498, &EnglishLabels), "Stable (95.0%)");
        assert_eq!(cache.refresh(0.9490, 0.9490, &EnglishLabels), "Risky (94.9%)");
    }

    #[test]
    fn change_of_exactly_the_threshold_rebuilds_the_label() {
        let mut cache = StatusCache::new(&EnglishLabels);
        assert_eq!(cache.refresh(0.25, 0.25, &EnglishLabels), "Very Risky (25.0%)");
        assert_eq!(cache.refresh(0.2504, 0.2504, &EnglishLabels), "Very Risky (25.0%)");
        assert_eq!(cache.refresh(0.2505, 0.2505, &EnglishLabels), "Very Risky (25.1%)");

        let mut cache = StatusCache::new(&EnglishLabels);
        let power = 0.03;
        let p = |s: f64| crate::stability::ignition_probability(s, power);
        assert_eq!(cache.refresh(0.0, p(0.0), &EnglishLabels), "Very Unstable (0.0%)");
        let nudged = MIN_STABILITY_DIFF_FOR_UPDATE;
        assert_eq!(
            cache.refresh(nudged, p(nudged), &EnglishLabels),
            "Very Unstable (79.6%)"
        );
    }
}
