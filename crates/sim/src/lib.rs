//! Propellant distribution tracking for ignition stability.
//!
//! An [`UllageSimulator`] follows an abstract bounding region of ullage gas
//! inside one tank. Each tick deforms the region under acceleration and
//! rotation; the region's geometry and the fill ratio then yield a stability
//! score and an ignition probability.

pub mod clock;
pub mod deformation;
pub mod persistence;
pub mod simulator;
pub mod stability;
pub mod status;

pub use clock::{FixedClock, ManualClock, UniversalClock, WallClock};
pub use deformation::{TickInput, UllageBounds};
pub use persistence::Snapshot;
pub use simulator::{UNSET_TIME, UllageSimulator};
pub use status::{EnglishLabels, StabilityTier, StatusColor, StatusLabels};
