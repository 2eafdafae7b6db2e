//! Demo host: one car on a fixed tick, a scripted driver and scripted key
//! presses, with the overlay panel dumped to the log.

use rapier3d::prelude::RigidBodyHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vehicle_telemetry::config::{ConfigError, HostConfig};
use vehicle_telemetry::debug_builders::DrawList;
use vehicle_telemetry::overlay::input::Key;
use vehicle_telemetry::overlay::OverlayController;
use vehicle_telemetry::physics::PhysicsWorld;
use vehicle_telemetry::vehicle::COUPE;

#[tokio::main]
async fn main() -> Result<(), ConfigError> {
    let config = HostConfig::from_env()?;

    init_tracing(&config.log_level);

    info!("Starting vehicle telemetry demo");
    info!(tick_hz = config.tick_hz, duration_secs = config.duration_secs, "host settings");

    let tick_hz = config.tick_hz.max(1);
    let dt = 1.0 / tick_hz as f32;
    let total_ticks = tick_hz * config.duration_secs;
    let report_every = config.report_every.max(1);
    let toggle_key = config.overlay.toggle_key;

    let mut world = PhysicsWorld::new();
    let car = world.spawn_vehicle(COUPE, [0.0, 0.9, 0.0], true);

    let mut overlay: OverlayController<RigidBodyHandle> = OverlayController::new(config.overlay);
    overlay.activate(Some(car));

    let mut frame = DrawList::default();

    // Fixed timestep
    let mut ticker = interval(Duration::from_secs_f32(dt));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    for tick in 0..total_ticks {
        ticker.tick().await;

        let t = tick as f32 * dt;
        drive_script(&mut world, car, t);

        let keys = key_script(t, toggle_key);

        world.step(dt);
        overlay.on_fixed_step(&world);

        frame.clear();
        overlay.on_frame(&keys[..], &world, &mut frame, &world);
        overlay.render(&mut frame);

        if tick % report_every == 0 {
            let state = overlay.state();
            info!(tick, visible = state.visible, mode = ?state.mode, "\n{}", state.text());

            match frame.to_json() {
                Ok(json) => debug!(tick, frame = %json, "draw list"),
                Err(e) => warn!(tick, error = %e, "failed to serialize draw list"),
            }
        }
    }

    info!("Demo finished after {} ticks", total_ticks);
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Scripted driver: settle, accelerate onto the gravel, turn, brake, repair.
fn drive_script(world: &mut PhysicsWorld, car: RigidBodyHandle, t: f32) {
    let (throttle, steer, brake, label) = match t {
        t if t < 1.0 => (0.0, 0.0, 0.0, "settling"),
        t if t < 5.0 => (1.0, 0.0, 0.0, "full throttle"),
        t if t < 7.0 => (0.6, 0.8, 0.0, "turning"),
        t if t < 9.0 => (0.0, 0.0, 1.0, "braking"),
        _ => (0.0, 0.0, 0.0, "coasting"),
    };

    world.set_input(car, throttle, steer, brake);
    world.set_debug_text(car, format!("Script: {label}"));

    if t >= 9.0 {
        world.start_repair(car);
    }
}

/// Keys held at time `t`. Each press lasts a few ticks so the edge is seen.
fn key_script(t: f32, toggle: Key) -> Vec<Key> {
    const HOLD: f32 = 0.1;

    let presses: [(f32, bool); 4] = [
        (2.0, true),   // shift: next data mode
        (4.0, false),  // hide
        (4.5, false),  // show
        (6.0, true),   // back to slip/force
    ];

    presses
        .iter()
        .find(|(at, _)| t >= *at && t < at + HOLD)
        .map(|&(_, shift)| if shift { vec![Key::LeftShift, toggle] } else { vec![toggle] })
        .unwrap_or_default()
}
