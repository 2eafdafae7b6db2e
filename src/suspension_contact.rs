// ==============================================================================
// suspension_contact.rs — RAYCAST SUSPENSION + CONTACT PATCH KINEMATICS
// ------------------------------------------------------------------------------
// This module performs one wheel raycast against the scene and produces a
// SuspensionContact that includes:
// - geometry: hit_point, ground_normal, collider that was hit
// - suspension state: compression, compression_ratio, suspension velocity,
//   normal force from spring+damper
// - kinematics: point velocity at the contact (linvel + ω×r)
// - wheel basis (forward/side) on the contact plane, including steering
// - slip components (v_long, v_lat) used by the tire pass in physics.rs
//
// Main entry:
// - build_suspension_contact(...)
//     Casts a ray from the suspension top along chassis -Y (length = travel +
//     radius), computes compression and spring/damper force, then projects
//     the steered wheel axes onto the ground plane.
//
// Notes:
// - This file does NOT apply impulses. It only measures/constructs contact data.
// - The ground normal comes from the ray intersection, so slopes work.
// ==============================================================================

use rapier3d::na::UnitQuaternion;
use rapier3d::prelude::*;

use crate::vehicle::WheelConfig;

#[derive(Clone, Debug)]
pub struct SuspensionContact {
    pub wheel_id: String,

    // geometry
    pub hit_point: Point<Real>,
    pub ground_normal: Vector<Real>,
    pub collider: ColliderHandle,

    // suspension state
    pub compression: f32,        // m
    pub compression_ratio: f32,  // 0..1
    pub suspension_vel: f32,
    pub normal_force: f32,

    // kinematics
    pub point_vel: Vector<Real>,

    // wheel basis (world, on the contact plane)
    pub forward: Vector<Real>,
    pub side: Vector<Real>,

    // slip
    pub v_long: f32,
    pub v_lat: f32,
}

pub(crate) fn compute_suspension_force(
    compression: f32,
    suspension_vel: f32,
    k: f32,
    c: f32,
) -> f32 {
    // Deadzone
    let v = if suspension_vel.abs() < 0.05 { 0.0 } else { suspension_vel };

    // One-way damper (kills rebound)
    let v = if v > 0.0 { v * 0.4 } else { v };

    let spring = k * compression;
    let damper = (-c * v).clamp(-spring * 0.6, spring * 0.6);

    (spring + damper).max(0.0)
}

/// World-space velocity of a point rigidly attached to the body:
/// v(p) = v_com + ω × (p - com)
#[inline]
pub fn point_velocity(linvel: Vector<Real>, angvel: Vector<Real>, com: Point<Real>, p: Point<Real>) -> Vector<Real> {
    let r = p.coords - com.coords;
    linvel + angvel.cross(&r)
}

/// Project `v` onto the plane with normal `n`; `fallback` when degenerate.
#[inline]
fn on_plane(v: Vector<Real>, n: Vector<Real>, fallback: Vector<Real>) -> Vector<Real> {
    let p = v - n * v.dot(&n);
    let len = p.norm();
    if len > 1e-6 { p / len } else { fallback }
}

pub fn build_suspension_contact(
    wheel: &WheelConfig,
    steer_angle: f32,
    body: &RigidBody,
    handle: RigidBodyHandle,
    query: &QueryPipeline,
    bodies: &RigidBodySet,
    colliders: &ColliderSet,
) -> Option<SuspensionContact> {

    let pos = body.position();
    let rot = pos.rotation;
    let linvel = *body.linvel();
    let angvel = *body.angvel();
    let com = *body.center_of_mass();

    let up = rot * Vector::y();
    let origin = pos * wheel.offset;
    let ray = Ray::new(origin, -up);
    let max_dist = wheel.travel + wheel.radius;

    let filter = QueryFilter::default().exclude_rigid_body(handle);

    let (collider, hit) = query.cast_ray_and_get_normal(
        bodies,
        colliders,
        &ray,
        max_dist,
        true,
        filter,
    )?;

    let toi = hit.time_of_impact;
    let hit_point = ray.point_at(toi);
    let ground_n = hit.normal;

    let suspension_length = (toi - wheel.radius).max(0.0);
    let compression = (wheel.travel - suspension_length).clamp(0.0, wheel.travel);
    let compression_ratio = compression / wheel.travel;

    let point_vel = point_velocity(linvel, angvel, com, hit_point);
    // positive when the contact moves away from the ground
    let suspension_vel = point_vel.dot(&ground_n);

    let normal_force = compute_suspension_force(
        compression,
        suspension_vel,
        wheel.stiffness,
        wheel.damping,
    );

    // steered wheel axes: +Z forward, +X right
    let steer_rot = UnitQuaternion::from_axis_angle(&Vector::y_axis(), steer_angle);
    let wheel_rot = rot * steer_rot;
    let forward = on_plane(wheel_rot * Vector::z(), ground_n, rot * Vector::z());
    let side = on_plane(wheel_rot * Vector::x(), ground_n, rot * Vector::x());

    Some(SuspensionContact {
        wheel_id: wheel.debug_id.clone(),
        hit_point,
        ground_normal: ground_n,
        collider,
        compression,
        compression_ratio,
        suspension_vel,
        normal_force,
        point_vel,
        forward,
        side,
        v_long: point_vel.dot(&forward),
        v_lat: point_vel.dot(&side),
    })
}
