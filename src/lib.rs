//! Propellant ullage simulation for engine ignition checks.
//!
//! The tracker itself lives in `ullage_sim`; this crate re-exports the
//! workspace crates so front-ends (the replay CLI, host integrations) depend
//! on a single library, and adds profile replay on top.

pub mod replay;

pub use ullage_config as config;
pub use ullage_core as common;
pub use ullage_export as export;
pub use ullage_sim as sim;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
