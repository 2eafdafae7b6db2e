use rapier3d::na::Vector2;
use rapier3d::prelude::*;

pub struct VehicleConfig {
    pub mass: f32,              // kg
    pub engine_force: f32,      // N at the contact patch, split across driven wheels
    pub brake_force: f32,       // N per wheel
    pub linear_damping: f32,    // drag
    pub angular_damping: f32,   // rotational drag
    pub mu_base: f32,           // base friction coefficient
    pub lateral_grip: f32,      // 0..1 share of lateral velocity cancelled per step

    // --- Steering ---
    pub max_steer_angle: f32,   // radians
    pub max_steer_rate: f32,    // radians / sec

    // --- Chassis geometry ---
    pub chassis_half_extents: [f32; 3], // [hx, hy, hz] meters
    pub chassis_com_offset: [f32; 3],   // local offset from collider center

    // --- Force application ---
    pub anti_roll: f32,          // scales each wheel's force_distance
    pub steering_overdrive: f32, // m, forward shift when steering against slip
    pub aero_offset: f32,        // m along chassis forward from COM
}

pub const COUPE: VehicleConfig = VehicleConfig {
    mass: 1350.0,             // kg
    engine_force: 6400.0,     // N
    brake_force: 4000.0,      // N
    linear_damping: 0.08,     // coasting comes back
    angular_damping: 0.6,     // drag
    mu_base: 1.0,
    lateral_grip: 0.5,

    max_steer_angle: 0.6,     // radians (~34 degrees)
    max_steer_rate: 2.5,      // rad/sec

    chassis_half_extents: [0.9, 0.3, 2.1],
    chassis_com_offset: [0.0, -0.15, 0.0],   // slightly below visual center

    anti_roll: 0.2,
    steering_overdrive: 0.25,
    aero_offset: -1.0,
};

#[derive(Clone)]
pub struct WheelConfig {
    pub debug_id: String,        // "FL", "FR", "RL", "RR"
    pub offset: Point<Real>,     // suspension top, chassis local space
    pub travel: Real,            // suspension travel
    pub radius: Real,            // wheel radius

    pub stiffness: Real,         // spring constant
    pub damping: Real,           // damper constant

    pub drive: bool,             // is this a driven wheel?
    pub steer: bool,             // is this a steering wheel?
    pub force_distance: Real,    // m above the contact where tire forces act
}

/// Per-wheel runtime state, rewritten every step.
#[derive(Clone)]
pub struct Wheel {
    pub config: WheelConfig,
    pub angular_velocity: f32,   // rad/s
    pub motor_torque: f32,       // N*m
    pub steer_angle: f32,        // radians
    pub tire: Option<TireReading>,
}

/// Grounded-only output of the last step.
#[derive(Clone)]
pub struct TireReading {
    pub contact: crate::suspension_contact::SuspensionContact,
    pub slip: Vector2<Real>,     // x lateral, y longitudinal (m/s)
    pub force: Vector2<Real>,    // x lateral, y longitudinal (N)
}

/// Rough engine model that only exists to feed sound.
#[derive(Clone, Copy, Debug)]
pub struct EngineAudio {
    pub gear: i32,
    pub rpm: f32,
}

const GEAR_TOP_SPEED: [f32; 5] = [9.0, 17.0, 26.0, 36.0, 50.0]; // m/s
const IDLE_RPM: f32 = 900.0;
const REDLINE_RPM: f32 = 6800.0;

impl EngineAudio {
    pub fn new() -> Self {
        Self { gear: 0, rpm: IDLE_RPM }
    }

    pub fn update(&mut self, speed: f32, throttle: f32) {
        let v = speed.abs();

        if speed < -0.5 {
            self.gear = -1;
            self.rpm = IDLE_RPM + (v / GEAR_TOP_SPEED[0]).min(1.0) * (REDLINE_RPM - IDLE_RPM);
            return;
        }

        if v < 0.5 && throttle <= 0.0 {
            self.gear = 0;
            self.rpm = IDLE_RPM;
            return;
        }

        let idx = GEAR_TOP_SPEED
            .iter()
            .position(|&top| v < top)
            .unwrap_or(GEAR_TOP_SPEED.len() - 1);
        let low = if idx == 0 { 0.0 } else { GEAR_TOP_SPEED[idx - 1] };
        let high = GEAR_TOP_SPEED[idx];
        let t = ((v - low) / (high - low)).clamp(0.0, 1.0);

        self.gear = idx as i32 + 1;
        self.rpm = IDLE_RPM + (0.35 + 0.65 * t) * (REDLINE_RPM - IDLE_RPM);
    }
}

impl Default for EngineAudio {
    fn default() -> Self { Self::new() }
}

/// Accumulated wear; bottoming the suspension out is what hurts.
#[derive(Clone, Copy, Debug, Default)]
pub struct DamageState {
    pub mesh: f32,      // 0..1
    pub collider: f32,  // 0..1
    pub node: f32,      // 0..1
    pub repairing: bool,
}

impl DamageState {
    pub fn register_bottom_out(&mut self) {
        if self.repairing {
            return;
        }
        self.node = (self.node + 0.002).min(1.0);
        self.mesh = (self.mesh + 0.001).min(1.0);
        self.collider = self.mesh;
    }

    /// Heal towards zero; stops repairing once clean.
    pub fn repair_step(&mut self, dt: f32) {
        if !self.repairing {
            return;
        }
        let k = 0.5 * dt;
        self.mesh = (self.mesh - k).max(0.0);
        self.collider = (self.collider - k).max(0.0);
        self.node = (self.node - k).max(0.0);
        if self.mesh == 0.0 && self.collider == 0.0 && self.node == 0.0 {
            self.repairing = false;
        }
    }
}

pub struct Vehicle {
    pub body: RigidBodyHandle,  // the chassis body
    pub config: VehicleConfig,  // vehicle parameters
    pub wheels: Vec<Wheel>,     // FL, FR, RL, RR
    pub throttle: f32,          // -1.0 (full reverse) .. 1.0 (full forward)
    pub steer: f32,             // -1.0 (full left) .. 1.0 (full right)
    pub brake: f32,             // 0.0 (no brake) .. 1.0 (full brake)
    pub steer_angle: f32,       // current steering angle (radians)
    pub audio: Option<EngineAudio>,
    pub damage: Option<DamageState>,
    pub debug_text: String,
}

fn suspension_from_sag(vehicle_mass: f32, wheels: usize, sag_m: f32, zeta: f32) -> (f32, f32) {
    let m = vehicle_mass / wheels as f32;
    let g = 9.81_f32;
    let f_static = m * g;               // per wheel
    let k = f_static / sag_m.max(1e-3); // N/m

    // damping: c = 2*zeta*sqrt(k*m)
    let c = 2.0 * zeta * (k * m).sqrt();
    (k, c)
}

/// Four-wheel layout: front steered, rear driven.
pub fn coupe_wheels(config: &VehicleConfig) -> Vec<WheelConfig> {
    let travel = 0.3;
    let radius = 0.35;
    let (k, c) = suspension_from_sag(config.mass, 4, travel * 0.4, 0.6);

    let wheel = |id: &str, offset: Point<Real>, front: bool| WheelConfig {
        debug_id: id.to_string(),
        offset,
        travel,
        radius,
        stiffness: k,
        damping: c,
        drive: !front,
        steer: front,
        force_distance: if front { 0.25 } else { 0.35 },
    };

    vec![
        wheel("FL", point![-0.8, -0.1,  1.4], true),
        wheel("FR", point![ 0.8, -0.1,  1.4], true),
        wheel("RL", point![-0.8, -0.1, -1.4], false),
        wheel("RR", point![ 0.8, -0.1, -1.4], false),
    ]
}
