//! vehicle-telemetry: an in-world diagnostic overlay for raycast-wheel
//! vehicles, plus a small rapier scene that feeds it.

pub mod overlay;
pub mod debug_builders;
pub mod config;
pub mod vehicle;
pub mod suspension_contact;
pub mod physics;
