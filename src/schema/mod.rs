//! Schema module - Scenario, settings and control types.

mod controls;
mod scenario;
mod settings;
mod units;

pub use controls::*;
pub use scenario::*;
pub use settings::*;
pub use units::*;
