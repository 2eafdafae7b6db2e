//! Collaborator seams: where snapshots and ground raycasts come from.

use rapier3d::na::{Point3, Vector3};

use crate::overlay::types::VehicleSnapshot;

/// Read-only provider of per-frame vehicle readings.
///
/// Optional subsystems (audio, damage) are filled in by the implementor only
/// when they exist; the overlay never probes for them itself.
pub trait TelemetrySource {
    /// Identifies one vehicle inside the source (a body handle, an id...).
    type Handle: Copy;

    /// `None` when the handle no longer resolves to a live vehicle.
    fn sample(&self, vehicle: Self::Handle) -> Option<VehicleSnapshot>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    pub point: Point3<f32>,
    pub normal: Vector3<f32>,
}

/// World raycast used by the gizmo pass to recompute wheel contacts.
pub trait GroundQuery {
    fn raycast(&self, origin: Point3<f32>, dir: Vector3<f32>, max_dist: f32) -> Option<GroundHit>;
}
