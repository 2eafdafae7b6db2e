// ==============================================================================
// physics.rs — DEMO WORLD: RAPIER SCENE + RAYCAST-SUSPENSION CARS
// ------------------------------------------------------------------------------
// PhysicsWorld owns the rapier pipeline and every vehicle in the scene.
//
// step(dt):
//   1) controls  -> rate-limited steering angle
//   2) wheels    -> suspension raycast, simple friction-circle tire, impulses
//   3) extras    -> engine audio, bottom-out damage
//   4) rapier    -> pipeline.step, then reset runaway bodies
//
// It is also the overlay's data provider:
// - TelemetrySource: one VehicleSnapshot per chassis handle
// - GroundQuery:     raycasts against fixed (static) colliders only
// ==============================================================================

use std::collections::HashMap;

use rapier3d::na::{Isometry3, Translation3, UnitQuaternion, Vector2, Vector3, Point3};
use rapier3d::prelude::*;
use tracing::{debug, info, warn};

use crate::overlay::gizmos;
use crate::overlay::source::{GroundHit, GroundQuery, TelemetrySource};
use crate::overlay::types::{
    AudioSnapshot, ContactBasis, DamageSnapshot, GroundMaterial, VehicleSnapshot, WheelContact,
    WheelMount, WheelSnapshot,
};
use crate::suspension_contact::build_suspension_contact;
use crate::vehicle::{coupe_wheels, DamageState, EngineAudio, TireReading, Vehicle, VehicleConfig, Wheel};

const GROUP_GROUND: Group  = Group::GROUP_1;
const GROUP_CHASSIS: Group = Group::GROUP_2;

const ROLLING_DRAG: f32 = 20.0;     // N per m/s, scaled by the material drag
const WORLD_LIMIT: f32 = 1_000.0;   // m

type Impulse = (RigidBodyHandle, Vector<Real>, Point<Real>);

pub struct PhysicsWorld {
    pub gravity: Vector<Real>, // gravity vector
    pub pipeline: PhysicsPipeline, // physics pipeline
    pub island_manager: IslandManager, // manages islands of bodies
    pub broad_phase: DefaultBroadPhase, // broad-phase collision detection
    pub narrow_phase: NarrowPhase, // collision detection
    pub bodies: RigidBodySet, // for rigid bodies
    pub colliders: ColliderSet, // for collision shapes
    pub joints: ImpulseJointSet, // for constraints
    pub multibody_joints: MultibodyJointSet,// for articulated bodies
    pub ccd: CCDSolver, // continuous collision detection
    pub query_pipeline: QueryPipeline, // for raycasting
    pub vehicles: HashMap<RigidBodyHandle, Vehicle>, // chassis handle → vehicle
    pub ground_materials: HashMap<ColliderHandle, GroundMaterial>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        let gravity = vector![0.0, -9.81, 0.0];

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let mut ground_materials = HashMap::new();

        // === 1. Big static ground box, top surface at y = 0 ===
        let ground_rb = RigidBodyBuilder::fixed()
            .translation(vector![0.0, -0.1, 0.0])
            .build();
        let ground_handle = bodies.insert(ground_rb);

        let ground_collider = ColliderBuilder::cuboid(500.0, 0.1, 500.0)
            .collision_groups(InteractionGroups::new(GROUP_GROUND, GROUP_CHASSIS))
            .friction(1.2)
            .restitution(0.0)
            .build();
        let asphalt = colliders.insert_with_parent(ground_collider, ground_handle, &mut bodies);
        ground_materials.insert(asphalt, GroundMaterial {
            grip: 1.0,
            drag: 0.1,
            physic_material: Some("Asphalt".to_string()),
        });

        // === 2. Gravel patch ahead of the spawn, 2 cm proud of the asphalt ===
        let gravel_collider = ColliderBuilder::cuboid(10.0, 0.01, 15.0)
            .translation(vector![0.0, 0.11, 45.0])
            .collision_groups(InteractionGroups::new(GROUP_GROUND, GROUP_CHASSIS))
            .friction(0.8)
            .restitution(0.0)
            .build();
        let gravel = colliders.insert_with_parent(gravel_collider, ground_handle, &mut bodies);
        ground_materials.insert(gravel, GroundMaterial {
            grip: 0.7,
            drag: 1.5,
            physic_material: Some("Gravel".to_string()),
        });

        debug!(bodies = bodies.len(), colliders = colliders.len(), "ground inserted");

        Self {
            gravity,
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            vehicles: HashMap::new(),
            ground_materials,
        }
    }

    /// Spawn a car:
    /// - Dynamic rigid body with a box collider (COM offset applied).
    /// - Four raycast wheels; engine audio always, damage when requested.
    pub fn spawn_vehicle(&mut self, config: VehicleConfig, position: [f32; 3], with_damage: bool) -> RigidBodyHandle {
        let [hx, hy, hz] = config.chassis_half_extents;
        let [cx, cy, cz] = config.chassis_com_offset;
        let volume = 8.0 * hx * hy * hz;
        let density = config.mass / volume; // ρ = m / V

        let rb = RigidBodyBuilder::dynamic()
            .translation(vector![position[0], position[1], position[2]])
            .linear_damping(config.linear_damping)
            .angular_damping(config.angular_damping)
            .ccd_enabled(true)
            .build();

        let collider = ColliderBuilder::cuboid(hx, hy, hz)
            .translation(vector![cx, cy, cz]) // COM offset
            .collision_groups(InteractionGroups::new(GROUP_CHASSIS, GROUP_GROUND))
            .density(density)
            .friction(0.0)
            .restitution(0.0)
            .build();

        let handle = self.bodies.insert(rb);
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);

        let wheels = coupe_wheels(&config)
            .into_iter()
            .map(|config| Wheel {
                config,
                angular_velocity: 0.0,
                motor_torque: 0.0,
                steer_angle: 0.0,
                tire: None,
            })
            .collect();

        self.vehicles.insert(handle, Vehicle {
            body: handle,
            config,
            wheels,
            throttle: 0.0,
            steer: 0.0,
            brake: 0.0,
            steer_angle: 0.0,
            audio: Some(EngineAudio::new()),
            damage: with_damage.then(DamageState::default),
            debug_text: String::new(),
        });

        info!(?handle, ?position, "vehicle spawned");
        handle
    }

    /// Store driver input; forces are applied in `step`.
    pub fn set_input(&mut self, handle: RigidBodyHandle, throttle: f32, steer: f32, brake: f32) {
        if let Some(v) = self.vehicles.get_mut(&handle) {
            v.throttle = throttle.clamp(-1.0, 1.0);
            v.steer = steer.clamp(-1.0, 1.0);
            v.brake = brake.clamp(0.0, 1.0);
        }
    }

    pub fn set_debug_text(&mut self, handle: RigidBodyHandle, text: impl Into<String>) {
        if let Some(v) = self.vehicles.get_mut(&handle) {
            v.debug_text = text.into();
        }
    }

    pub fn start_repair(&mut self, handle: RigidBodyHandle) {
        if let Some(damage) = self.vehicles.get_mut(&handle).and_then(|v| v.damage.as_mut()) {
            damage.repairing = true;
        }
    }

    pub fn despawn_vehicle(&mut self, handle: RigidBodyHandle) {
        if self.vehicles.remove(&handle).is_none() {
            return;
        }
        self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.joints,
            &mut self.multibody_joints,
            true,
        );
        info!(?handle, "vehicle removed");
    }

    /// Speed-sensitive, rate-limited steering.
    fn apply_vehicle_controls(&mut self, dt: Real) {
        for v in self.vehicles.values_mut() {
            let speed = self.bodies.get(v.body).map(|b| b.linvel().magnitude()).unwrap_or(0.0);
            let steer_scale = (1.0 - (speed / 30.0)).clamp(0.35, 1.0);
            let target = v.steer * v.config.max_steer_angle * steer_scale;

            let max_step = v.config.max_steer_rate * dt;
            v.steer_angle += (target - v.steer_angle).clamp(-max_step, max_step);
        }
    }

    fn apply_wheels(&mut self, dt: Real) {
        self.query_pipeline.update(&self.colliders);

        let mut impulses: Vec<Impulse> = Vec::new();

        for (&handle, vehicle) in self.vehicles.iter_mut() {
            let Some(body) = self.bodies.get(handle) else { continue };

            let rot = body.position().rotation;
            let up = rot * Vector::y();
            let mass = body.mass();
            let share = (mass / vehicle.wheels.len().max(1) as f32).max(1.0); // kg per wheel
            let driven = vehicle.wheels.iter().filter(|w| w.config.drive).count().max(1) as f32;
            let cfg = &vehicle.config;

            let mut bottomed_out = false;

            for wheel in vehicle.wheels.iter_mut() {
                wheel.steer_angle = if wheel.config.steer { vehicle.steer_angle } else { 0.0 };

                let drive = if wheel.config.drive { vehicle.throttle * cfg.engine_force / driven } else { 0.0 };
                wheel.motor_torque = drive * wheel.config.radius;

                let Some(contact) = build_suspension_contact(
                    &wheel.config,
                    wheel.steer_angle,
                    body,
                    handle,
                    &self.query_pipeline,
                    &self.bodies,
                    &self.colliders,
                ) else {
                    // airborne: free spin decays
                    wheel.angular_velocity *= 0.98;
                    wheel.tire = None;
                    continue;
                };

                let (grip, drag) = self
                    .ground_materials
                    .get(&contact.collider)
                    .map(|m| (m.grip, m.drag))
                    .unwrap_or((1.0, 0.0));

                // ----------------------------------------------------
                // Tire: demands, then clamp to the friction circle
                // ----------------------------------------------------
                let fz = contact.normal_force;
                let capacity = cfg.mu_base * grip * fz;

                let lat_demand = -contact.v_lat * share * cfg.lateral_grip / dt;

                let stop = contact.v_long * share / dt;
                let brake_limit = vehicle.brake * cfg.brake_force;
                let braking = -stop.clamp(-brake_limit, brake_limit);
                let rolling = -drag * ROLLING_DRAG * contact.v_long;
                let long_demand = drive + braking + rolling;

                let demand = (lat_demand * lat_demand + long_demand * long_demand).sqrt();
                let scale = if demand > capacity && demand > 0.0 { capacity / demand } else { 1.0 };
                let force = Vector2::new(lat_demand * scale, long_demand * scale);

                // unabsorbed longitudinal demand shows up as wheel spin / lock
                let slip_long = (long_demand - force.y) * dt / share;
                let slip = Vector2::new(contact.v_lat, slip_long);
                wheel.angular_velocity = (contact.v_long + slip_long) / wheel.config.radius;

                // ----------------------------------------------------
                // Impulses: suspension at the contact, tire at the force point
                // ----------------------------------------------------
                impulses.push((handle, contact.ground_normal * (fz * dt), contact.hit_point));

                let force_point = contact.hit_point + up * (cfg.anti_roll * wheel.config.force_distance);
                let tire_force = contact.forward * force.y + contact.side * force.x;
                impulses.push((handle, tire_force * dt, force_point));

                bottomed_out |= gizmos::bottomed_out(contact.compression_ratio);
                wheel.tire = Some(TireReading { contact, slip, force });
            }

            let speed = body.linvel().dot(&(rot * Vector::z()));
            if let Some(audio) = vehicle.audio.as_mut() {
                audio.update(speed, vehicle.throttle);
            }
            if let Some(damage) = vehicle.damage.as_mut() {
                if bottomed_out {
                    damage.register_bottom_out();
                }
                damage.repair_step(dt);
            }
        }

        for (handle, impulse, point) in impulses {
            if let Some(body) = self.bodies.get_mut(handle) {
                body.apply_impulse_at_point(impulse, point, true);
            }
        }
    }

    pub fn step(&mut self, dt: Real) {
        let hooks = ();
        let events = ();

        // 1) Convert inputs → intent (NO PHYSICS)
        self.apply_vehicle_controls(dt);

        // 2) Suspension + tire forces
        self.apply_wheels(dt);

        // 3) Step physics.
        self.pipeline.step(
            &self.gravity,
            &IntegrationParameters {
                dt,
                ..IntegrationParameters::default()
            },
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            Some(&mut self.query_pipeline),
            &hooks,
            &events,
        );

        // 4) Safety: prevent bodies from exploding to insane coordinates
        for (handle, body) in self.bodies.iter_mut() {
            let pos = *body.translation();
            let bad = !pos.iter().all(|c| c.is_finite()) || pos.iter().any(|c| c.abs() > WORLD_LIMIT);

            if bad {
                let reset = vector![0.0, 1.0, 0.0];
                body.set_translation(reset, true);
                body.set_linvel(Vector::zeros(), true);
                body.set_angvel(Vector::zeros(), true);
                warn!(?handle, "reset runaway body");
            }
        }
    }

    fn snapshot_wheel(&self, wheel: &Wheel, static_load: f32) -> WheelSnapshot {
        let cfg = &wheel.config;
        let steer_rot = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), wheel.steer_angle);

        let contact = wheel.tire.as_ref().map(|tire| {
            let c = &tire.contact;
            WheelContact {
                compression: c.compression_ratio,
                downforce: c.normal_force,
                downforce_ratio: if static_load > 0.0 { c.normal_force / static_load * 100.0 } else { 0.0 },
                normal_force: c.normal_force,
                tire_slip: tire.slip,
                tire_force: tire.force,
                combined_slip: tire.slip.norm(),
                basis: ContactBasis {
                    point: c.hit_point,
                    normal: c.ground_normal,
                    forward: c.forward,
                    sideways: c.side,
                },
                ground_material: self.ground_materials.get(&c.collider).cloned(),
            }
        });

        WheelSnapshot {
            name: cfg.debug_id.clone(),
            angular_velocity: wheel.angular_velocity,
            motor_torque: wheel.motor_torque,
            steer: cfg.steer,
            steer_angle: wheel.steer_angle,
            mount: WheelMount {
                local_pose: Isometry3::from_parts(Translation3::from(cfg.offset.coords), steer_rot),
                center: Point3::origin(),
                suspension_distance: cfg.travel,
                radius: cfg.radius,
                force_distance: cfg.force_distance,
            },
            contact,
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetrySource for PhysicsWorld {
    type Handle = RigidBodyHandle;

    fn sample(&self, handle: RigidBodyHandle) -> Option<VehicleSnapshot> {
        let vehicle = self.vehicles.get(&handle)?;
        let body = self.bodies.get(handle)?;

        let pose = *body.position();
        let mass = body.mass();
        let gravity = self.gravity.norm();
        let static_load = mass * gravity / vehicle.wheels.len().max(1) as f32;

        Some(VehicleSnapshot {
            speed: body.linvel().dot(&(pose.rotation * Vector::z())),
            mass,
            center_of_mass: body.mass_properties().local_mprops.local_com,
            gravity,
            pose,
            anti_roll: vehicle.config.anti_roll,
            steering_overdrive: vehicle.config.steering_overdrive,
            aero_offset: vehicle.config.aero_offset,
            debug_text: vehicle.debug_text.clone(),
            wheels: vehicle.wheels.iter().map(|w| self.snapshot_wheel(w, static_load)).collect(),
            audio: vehicle.audio.map(|a| AudioSnapshot { gear: a.gear, engine_rpm: a.rpm }),
            damage: vehicle.damage.map(|d| DamageSnapshot {
                mesh: d.mesh,
                collider: d.collider,
                node: d.node,
                repairing: d.repairing,
            }),
        })
    }
}

impl GroundQuery for PhysicsWorld {
    fn raycast(&self, origin: Point3<f32>, dir: Vector3<f32>, max_dist: f32) -> Option<GroundHit> {
        let ray = Ray::new(origin, dir);
        let (_, hit) = self.query_pipeline.cast_ray_and_get_normal(
            &self.bodies,
            &self.colliders,
            &ray,
            max_dist,
            true,
            QueryFilter::only_fixed(),
        )?;

        Some(GroundHit { point: ray.point_at(hit.time_of_impact), normal: hit.normal })
    }
}
