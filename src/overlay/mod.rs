//! overlay - engine-agnostic vehicle telemetry overlay (snapshot -> text + gizmos)

pub mod types;
pub mod input;
pub mod source;
pub mod draw;
pub mod vector_math;
pub mod format;
pub mod gizmos;
pub mod controller;

pub use types::*;
pub use controller::{OverlayController, OverlayState};
pub use format::format_telemetry;
pub use gizmos::draw_gizmos;
