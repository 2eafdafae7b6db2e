// ==============================================================================
// gizmos.rs — WORLD-SPACE DEBUG ANNOTATIONS
// ------------------------------------------------------------------------------
// draw_gizmos(snapshot, painter, ground):
// - white cross at the center of mass
// - per grounded wheel, after a fresh raycast along the wheel's down axis:
//     downforce bar (magenta when bottomed out), wheel cross, force-application
//     cross, tire force vector (green) and tire slip vector (cyan)
// - cyan cross at the aero application point
//
// Notes:
// - The wheel contact is re-raycast here instead of reusing the snapshot's
//   basis point. The panel and the gizmos can therefore disagree for a frame
//   (panel says grounded, ray misses); a miss just skips that wheel.
// - Only draws. Never writes the snapshot.
// ==============================================================================

use rapier3d::na::{Isometry3, Point3, Vector3};

use crate::overlay::draw::{Color, GizmoPainter};
use crate::overlay::source::GroundQuery;
use crate::overlay::types::{VehicleSnapshot, WheelContact, WheelSnapshot};
use crate::overlay::vector_math::{lin_to_log_vec, sign};

pub const DOWNFORCE_BAR_SCALE: f32 = 1.0 / 10_000.0;   // m per N
pub const BOTTOMED_OUT: f32 = 0.99;
pub const TIRE_FORCE_SCALE: f32 = 0.1;
pub const TIRE_SLIP_SCALE: f32 = 0.5;

pub fn draw_gizmos(snapshot: &VehicleSnapshot, painter: &mut impl GizmoPainter, ground: &impl GroundQuery) {
    let pose = &snapshot.pose;
    let frame = &pose.rotation;

    painter.draw_cross_mark(pose * snapshot.center_of_mass, frame, Color::WHITE);

    for wheel in &snapshot.wheels {
        draw_wheel_gizmos(snapshot, wheel, painter, ground);
    }

    let aero_local = snapshot.center_of_mass + Vector3::z() * snapshot.aero_offset;
    painter.draw_cross_mark(pose * aero_local, frame, Color::CYAN);
}

fn draw_wheel_gizmos(
    vehicle: &VehicleSnapshot,
    wheel: &WheelSnapshot,
    painter: &mut impl GizmoPainter,
    ground: &impl GroundQuery,
) {
    let Some(contact) = &wheel.contact else { return };

    let mount = &wheel.mount;
    let wheel_pose: Isometry3<f32> = vehicle.pose * mount.local_pose;
    let up = wheel_pose.rotation * Vector3::y();

    let origin = wheel_pose * mount.center;
    let Some(hit) = ground.raycast(origin, -up, mount.suspension_distance + mount.radius) else {
        return;
    };

    let bar_color = if bottomed_out(contact.compression) { Color::MAGENTA } else { Color::WHITE };
    painter.draw_line(hit.point, hit.point + up * (contact.downforce * DOWNFORCE_BAR_SCALE), bar_color);

    let wheel_frame = &wheel_pose.rotation;
    let wheel_pos = Point3::from(wheel_pose.translation.vector);
    painter.draw_cross_mark(wheel_pos, wheel_frame, Color::GREEN.lerp(Color::GRAY, 0.5));

    let force_point = force_application_point(vehicle, wheel, contact, hit.point, up);
    painter.draw_cross_mark(force_point, wheel_frame, Color::YELLOW.lerp(Color::GRAY, 0.5));

    let basis = &contact.basis;
    let tire_force = basis.forward * contact.tire_force.y + basis.sideways * contact.tire_force.x;
    painter.draw_line(force_point, force_point + lin_to_log_vec(tire_force) * TIRE_FORCE_SCALE, Color::GREEN);

    let tire_slip = basis.forward * contact.tire_slip.y + basis.sideways * contact.tire_slip.x;
    painter.draw_line(hit.point, hit.point + lin_to_log_vec(tire_slip) * TIRE_SLIP_SCALE, Color::CYAN);
}

/// Suspension compression ratio at or past the end of travel.
pub fn bottomed_out(compression: f32) -> bool {
    compression >= BOTTOMED_OUT
}

/// Contact point lifted along the wheel's up axis by anti-roll × force
/// distance, pushed forward by the steering overdrive when the wheel is
/// steered against its lateral slip.
pub fn force_application_point(
    vehicle: &VehicleSnapshot,
    wheel: &WheelSnapshot,
    contact: &WheelContact,
    hit_point: Point3<f32>,
    up: Vector3<f32>,
) -> Point3<f32> {
    let mut p = hit_point + up * (vehicle.anti_roll * wheel.mount.force_distance);

    if wheel.steer
        && wheel.steer_angle != 0.0
        && sign(wheel.steer_angle) != sign(contact.tire_slip.x)
    {
        p += contact.basis.forward * vehicle.steering_overdrive;
    }

    p
}
