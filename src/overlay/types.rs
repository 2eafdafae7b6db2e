//! Snapshot types the overlay reads each frame (engine-agnostic).
// overlay/types.rs
use rapier3d::na::{Isometry3, Point3, Vector2, Vector3};
use serde::Deserialize;

/// rad/s -> rpm
pub const W_TO_RPM: f32 = 60.0 / std::f32::consts::TAU;

// ============================================
// Data mode
// ============================================

/// Which per-wheel columns the text panel shows for grounded wheels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum DataMode {
    #[default]
    TireSlipAndForce,
    GroundMaterial,
}

impl DataMode {
    /// Cycle order used by the modifier+toggle key.
    pub const ALL: [DataMode; 2] = [DataMode::TireSlipAndForce, DataMode::GroundMaterial];

    /// Next mode in `ALL`, wrapping to the first after the last.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

// ============================================
// ----- vehicle ------------------------------
// ============================================

/// One frame of vehicle state. Built by a `TelemetrySource`, never mutated
/// after capture.
#[derive(Debug, Clone)]
pub struct VehicleSnapshot {
    pub speed: f32,                     // m/s, signed along chassis forward
    pub mass: f32,                      // kg
    pub center_of_mass: Point3<f32>,    // chassis local space
    pub gravity: f32,                   // magnitude, m/s^2
    pub pose: Isometry3<f32>,           // chassis world transform

    // gizmo geometry parameters
    pub anti_roll: f32,
    pub steering_overdrive: f32,        // m along contact forward
    pub aero_offset: f32,               // m along chassis forward

    pub debug_text: String,
    pub wheels: Vec<WheelSnapshot>,     // stable physical order
    pub audio: Option<AudioSnapshot>,
    pub damage: Option<DamageSnapshot>,
}

// ============================================
// ----- wheels -------------------------------
// ============================================

#[derive(Debug, Clone)]
pub struct WheelSnapshot {
    pub name: String,
    pub angular_velocity: f32,  // rad/s
    pub motor_torque: f32,      // N*m, only its sign matters to the panel
    pub steer: bool,
    pub steer_angle: f32,       // radians
    pub mount: WheelMount,

    /// Present iff the wheel is grounded.
    pub contact: Option<WheelContact>,
}

impl WheelSnapshot {
    pub fn is_grounded(&self) -> bool {
        self.contact.is_some()
    }

    /// Driven iff motor torque is strictly positive.
    pub fn is_driven(&self) -> bool {
        self.motor_torque > 0.0
    }

    pub fn rpm(&self) -> f32 {
        self.angular_velocity * W_TO_RPM
    }
}

/// Static mounting of a wheel on the chassis.
#[derive(Debug, Clone, Copy)]
pub struct WheelMount {
    pub local_pose: Isometry3<f32>,     // relative to the chassis
    pub center: Point3<f32>,            // suspension origin, wheel local space
    pub suspension_distance: f32,       // m of travel
    pub radius: f32,                    // m
    pub force_distance: f32,            // m, force application offset along wheel up
}

/// Grounded-only wheel readings.
#[derive(Debug, Clone)]
pub struct WheelContact {
    pub compression: f32,       // 0..1
    pub downforce: f32,         // N
    pub downforce_ratio: f32,   // % of the static per-wheel load
    pub normal_force: f32,      // N, contact normal force fed into ΣF

    /// x = lateral, y = longitudinal (m/s)
    pub tire_slip: Vector2<f32>,
    /// x = lateral, y = longitudinal (N)
    pub tire_force: Vector2<f32>,
    pub combined_slip: f32,

    pub basis: ContactBasis,
    pub ground_material: Option<GroundMaterial>,
}

/// Ground contact point and the contact-plane directions (world space).
#[derive(Debug, Clone, Copy)]
pub struct ContactBasis {
    pub point: Point3<f32>,
    pub normal: Vector3<f32>,
    pub forward: Vector3<f32>,
    pub sideways: Vector3<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroundMaterial {
    pub grip: f32,
    pub drag: f32,
    pub physic_material: Option<String>,
}

// ============================================
// ----- optional subsystems ------------------
// ============================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioSnapshot {
    pub gear: i32,
    pub engine_rpm: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageSnapshot {
    pub mesh: f32,      // 0..1
    pub collider: f32,  // 0..1
    pub node: f32,      // 0..1
    pub repairing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_mode_cycles_through_both_variants() {
        let m = DataMode::TireSlipAndForce;
        assert_eq!(m.next(), DataMode::GroundMaterial);
        assert_eq!(m.next().next(), DataMode::TireSlipAndForce);
    }

    #[test]
    fn rpm_conversion() {
        let w = WheelSnapshot {
            name: "RL".into(),
            angular_velocity: std::f32::consts::TAU,
            motor_torque: 0.0,
            steer: false,
            steer_angle: 0.0,
            mount: WheelMount {
                local_pose: Isometry3::identity(),
                center: Point3::origin(),
                suspension_distance: 0.2,
                radius: 0.3,
                force_distance: 0.1,
            },
            contact: None,
        };
        assert!((w.rpm() - 60.0).abs() < 1e-3);
        assert!(!w.is_driven());
        assert!(!w.is_grounded());
    }
}
