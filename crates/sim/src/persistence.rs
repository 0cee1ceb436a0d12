//! Key/value snapshot of the persisted simulator fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const KEY_HEIGHT_MIN: &str = "ullageHeightMin";
pub const KEY_HEIGHT_MAX: &str = "ullageHeightMax";
pub const KEY_RADIAL_MIN: &str = "ullageRadialMin";
pub const KEY_RADIAL_MAX: &str = "ullageRadialMax";
pub const KEY_UNIVERSAL_TIME: &str = "UT";

/// Flat string map, compatible with config-node style save files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    values: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Store `value` as its shortest text form that parses back to the same bits.
    pub(crate) fn set_f64(&mut self, key: &str, value: f64) {
        self.set(key, format!("{value:?}"));
    }

    /// Overwrite `target` when the key exists and parses; otherwise leave it alone.
    pub(crate) fn read_f64_into(&self, key: &str, target: &mut f64) -> bool {
        let Some(raw) = self.get(key) else {
            return false;
        };
        match raw.trim().parse::<f64>() {
            Ok(value) => {
                *target = value;
                true
            }
            Err(err) => {
                tracing::warn!(key, raw, %err, "ignoring unparseable snapshot value");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_text_round_trips_bit_for_bit() {
        let mut snapshot = Snapshot::new();
        for value in [0.05, 0.1 + 0.2, 1.0 / 3.0, f64::MIN, 1e-300, 0.95] {
            snapshot.set_f64("v", value);
            let mut parsed = 0.0;
            assert!(snapshot.read_f64_into("v", &mut parsed));
            assert_eq!(parsed.to_bits(), value.to_bits());
        }
    }

    #[test]
    fn seventeen_digit_text_parses_to_the_same_value() {
        let mut snapshot = Snapshot::new();
        snapshot.set("v", "0.050000000000000003");
        let mut parsed = 0.0;
        assert!(snapshot.read_f64_into("v", &mut parsed));
        assert_eq!(parsed, 0.05);
    }

    #[test]
    fn missing_or_garbled_values_leave_target_alone() {
        let mut snapshot = Snapshot::new();
        snapshot.set("bad", "not-a-number");
        let mut target = 0.42;
        assert!(!snapshot.read_f64_into("absent", &mut target));
        assert!(!snapshot.read_f64_into("bad", &mut target));
        assert_eq!(target, 0.42);
    }
}
