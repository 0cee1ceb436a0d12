//! Settings, label catalogs, and tick profiles for the propellant ullage simulator.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tunable coefficients consumed read-only by every simulator instance.
///
/// Field names accept both snake_case and the camelCase keys used by existing
/// part configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UllageSettings {
    /// Acceleration magnitude below which the pool relaxes toward rest.
    #[serde(alias = "naturalDiffusionAccThresh")]
    pub natural_diffusion_acc_thresh: f64,
    /// Venting acceleration above which natural diffusion is suppressed.
    #[serde(alias = "ventingAccThreshold")]
    pub venting_acc_threshold: f64,
    #[serde(alias = "naturalDiffusionRateX")]
    pub natural_diffusion_rate_x: f64,
    #[serde(alias = "naturalDiffusionRateY")]
    pub natural_diffusion_rate_y: f64,
    #[serde(alias = "translateAxialCoefficientX")]
    pub translate_axial_coefficient_x: f64,
    #[serde(alias = "translateAxialCoefficientY")]
    pub translate_axial_coefficient_y: f64,
    #[serde(alias = "translateSidewayCoefficientX")]
    pub translate_sideway_coefficient_x: f64,
    #[serde(alias = "translateSidewayCoefficientY")]
    pub translate_sideway_coefficient_y: f64,
    #[serde(alias = "rotateYawPitchCoefficientX")]
    pub rotate_yaw_pitch_coefficient_x: f64,
    #[serde(alias = "rotateYawPitchCoefficientY")]
    pub rotate_yaw_pitch_coefficient_y: f64,
    #[serde(alias = "rotateRollCoefficientX")]
    pub rotate_roll_coefficient_x: f64,
    #[serde(alias = "rotateRollCoefficientY")]
    pub rotate_roll_coefficient_y: f64,
    /// Exponent applied to stability when deriving ignition probability.
    #[serde(alias = "stabilityPower")]
    pub stability_power: f64,
}

impl Default for UllageSettings {
    fn default() -> Self {
        Self {
            natural_diffusion_acc_thresh: 0.01,
            venting_acc_threshold: 4.0e-8,
            natural_diffusion_rate_x: 0.02,
            natural_diffusion_rate_y: 0.03,
            translate_axial_coefficient_x: 0.06,
            translate_axial_coefficient_y: 0.06,
            translate_sideway_coefficient_x: 0.04,
            translate_sideway_coefficient_y: 0.02,
            rotate_yaw_pitch_coefficient_x: 0.003,
            rotate_yaw_pitch_coefficient_y: 0.004,
            rotate_roll_coefficient_x: 0.005,
            rotate_roll_coefficient_y: 0.006,
            stability_power: 0.03,
        }
    }
}

impl UllageSettings {
    /// Reject values the simulator cannot work with.
    ///
    /// The venting threshold is a divisor, so it must be strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.venting_acc_threshold > 0.0) || !self.venting_acc_threshold.is_finite() {
            return Err(ConfigError::Invalid {
                field: "venting_acc_threshold",
                reason: "must be finite and greater than zero",
            });
        }
        if !(self.natural_diffusion_acc_thresh >= 0.0)
            || !self.natural_diffusion_acc_thresh.is_finite()
        {
            return Err(ConfigError::Invalid {
                field: "natural_diffusion_acc_thresh",
                reason: "must be finite and non-negative",
            });
        }
        if !(self.stability_power >= 0.0) || !self.stability_power.is_finite() {
            return Err(ConfigError::Invalid {
                field: "stability_power",
                reason: "must be finite and non-negative",
            });
        }
        let coefficients = [
            ("natural_diffusion_rate_x", self.natural_diffusion_rate_x),
            ("natural_diffusion_rate_y", self.natural_diffusion_rate_y),
            ("translate_axial_coefficient_x", self.translate_axial_coefficient_x),
            ("translate_axial_coefficient_y", self.translate_axial_coefficient_y),
            ("translate_sideway_coefficient_x", self.translate_sideway_coefficient_x),
            ("translate_sideway_coefficient_y", self.translate_sideway_coefficient_y),
            ("rotate_yaw_pitch_coefficient_x", self.rotate_yaw_pitch_coefficient_x),
            ("rotate_yaw_pitch_coefficient_y", self.rotate_yaw_pitch_coefficient_y),
            ("rotate_roll_coefficient_x", self.rotate_roll_coefficient_x),
            ("rotate_roll_coefficient_y", self.rotate_roll_coefficient_y),
        ];
        for (field, value) in coefficients {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be finite",
                });
            }
        }
        Ok(())
    }
}

/// Localized display text for the six stability tiers, keyed by tier key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelCatalog {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

fn default_locale() -> String {
    "en".to_string()
}

impl LabelCatalog {
    /// Look up display text for a tier key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

/// A scripted sequence of constant-input segments used to drive replays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickProfile {
    #[serde(default)]
    pub name: Option<String>,
    pub segments: Vec<TickSegment>,
}

/// Inputs held constant for `duration_s`, sampled every `step_s`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSegment {
    pub label: String,
    pub duration_s: f64,
    #[serde(default = "default_step")]
    pub step_s: f64,
    #[serde(default)]
    pub acceleration_m_s2: [f64; 3],
    #[serde(default)]
    pub rotation_rad_s: [f64; 3],
    #[serde(default)]
    pub venting_acceleration_m_s2: f64,
    #[serde(default = "default_fuel_ratio")]
    pub fuel_ratio: f64,
}

fn default_step() -> f64 {
    0.02
}

fn default_fuel_ratio() -> f64 {
    1.0
}

impl TickSegment {
    /// Number of whole ticks the segment expands to (at least one for a non-empty duration).
    pub fn tick_count(&self) -> usize {
        if self.duration_s <= 0.0 {
            return 0;
        }
        // Tolerate step sizes that don't divide the duration exactly in binary.
        (self.duration_s / self.step_s - 1e-9).ceil().max(1.0) as usize
    }
}

impl TickProfile {
    /// Check every segment for usable timing and fill ratio.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segments.is_empty() {
            return Err(ConfigError::Invalid {
                field: "segments",
                reason: "profile must contain at least one segment",
            });
        }
        for segment in &self.segments {
            if !(segment.step_s > 0.0) || !segment.step_s.is_finite() {
                return Err(ConfigError::Invalid {
                    field: "step_s",
                    reason: "must be finite and greater than zero",
                });
            }
            if !(segment.duration_s >= 0.0) || !segment.duration_s.is_finite() {
                return Err(ConfigError::Invalid {
                    field: "duration_s",
                    reason: "must be finite and non-negative",
                });
            }
            if !(0.0..=1.0).contains(&segment.fuel_ratio) {
                return Err(ConfigError::Invalid {
                    field: "fuel_ratio",
                    reason: "must lie in [0, 1]",
                });
            }
        }
        Ok(())
    }

    /// Total simulated time covered by the profile.
    pub fn total_duration_s(&self) -> f64 {
        self.segments.iter().map(|s| s.duration_s.max(0.0)).sum()
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Load simulator settings from a TOML or YAML file and validate them.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<UllageSettings, ConfigError> {
    let settings: UllageSettings = load_record(path)?;
    settings.validate()?;
    Ok(settings)
}

/// Load a localized label catalog from a TOML or YAML file.
pub fn load_label_catalog<P: AsRef<Path>>(path: P) -> Result<LabelCatalog, ConfigError> {
    load_record(path)
}

/// Load and validate a replay profile from a TOML or YAML file.
pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<TickProfile, ConfigError> {
    let profile: TickProfile = load_record(path)?;
    profile.validate()?;
    Ok(profile)
}

fn load_record<T, P>(path: P) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    fn defaults_are_valid() {
        UllageSettings::default().validate().expect("defaults");
    }

    #[test]
    fn toml_accepts_camel_case_keys_and_fills_defaults() {
        let file = write_temp(
            ".toml",
            "stabilityPower = 0.5\nventingAccThreshold = 1e-6\nnatural_diffusion_rate_x = 0.1\n",
        );
        let settings = load_settings(file.path()).expect("settings");
        assert_eq!(settings.stability_power, 0.5);
        assert_eq!(settings.venting_acc_threshold, 1e-6);
        assert_eq!(settings.natural_diffusion_rate_x, 0.1);
        assert_eq!(settings.rotate_roll_coefficient_y, 0.006);
    }

    #[test]
    fn zero_venting_threshold_is_rejected() {
        let file = write_temp(".yaml", "venting_acc_threshold: 0.0\n");
        match load_settings(file.path()) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "venting_acc_threshold"),
            other => panic!("expected invalid venting threshold, got {other:?}"),
        }
    }

    #[test]
    fn yaml_profile_loads_with_segment_defaults() {
        let file = write_temp(
            ".yaml",
            "name: coast\nsegments:\n  - label: drift\n    duration_s: 1.0\n    step_s: 0.25\n",
        );
        let profile = load_profile(file.path()).expect("profile");
        let segment = &profile.segments[0];
        assert_eq!(segment.fuel_ratio, 1.0);
        assert_eq!(segment.acceleration_m_s2, [0.0; 3]);
        assert_eq!(segment.tick_count(), 4);
        assert_eq!(profile.total_duration_s(), 1.0);
    }

    #[test]
    fn profile_with_bad_fuel_ratio_is_rejected() {
        let file = write_temp(
            ".toml",
            "[[segments]]\nlabel = \"burn\"\nduration_s = 2.0\nfuel_ratio = 1.5\n",
        );
        assert!(matches!(
            load_profile(file.path()),
            Err(ConfigError::Invalid {
                field: "fuel_ratio",
                ..
            })
        ));
    }

    #[test]
    fn label_catalog_reads_locale_and_entries() {
        let file = write_temp(
            ".toml",
            "locale = \"de\"\n[labels]\n\"ullage.status.stable\" = \"Stabil\"\n",
        );
        let catalog = load_label_catalog(file.path()).expect("catalog");
        assert_eq!(catalog.locale, "de");
        assert_eq!(catalog.get("ullage.status.stable"), Some("Stabil"));
        assert_eq!(catalog.get("ullage.status.risky"), None);
    }
}
