// ==============================================================================
// format.rs — TELEMETRY TEXT PANEL
// ------------------------------------------------------------------------------
// Pure: snapshot + mode -> text. Same input, same bytes.
//
// Layout (top to bottom):
//   V: <m/s> m/s  <km/h> km/h <mph> mph
//   <blank>
//   one line per wheel (snapshot order)
//   ΣF / perceived mass / rigidbody mass
//   audio gear/rpm       (if an audio subsystem reported)
//   damage ratios        (if a damage subsystem reported)
//   free-form debug text (if non-empty)
//
// Every numeric column has a fixed width + precision so wheels line up across
// rows and frames. Tests pin the exact widths.
// ==============================================================================

use crate::overlay::types::{DataMode, DamageSnapshot, VehicleSnapshot, WheelSnapshot};

pub const MS_TO_KMH: f32 = 3.6;
pub const MS_TO_MPH: f32 = 2.237;

const DRIVEN_MARK: &str = ":";
const COASTING_MARK: &str = "×";

pub fn format_telemetry(snapshot: &VehicleSnapshot, mode: DataMode) -> String {
    let s = snapshot.speed;
    let mut text = format!(
        "V: {:5.1} m/s  {:5.1} km/h {:5.1} mph\n\n",
        half_up(s, 1),
        half_up(s * MS_TO_KMH, 1),
        half_up(s * MS_TO_MPH, 1),
    );

    let mut downforce = 0.0;
    for wheel in &snapshot.wheels {
        text.push_str(&format_wheel(wheel, mode, &mut downforce));
    }

    text.push_str(&format!(
        "\n     ΣF:{:6.0}  Perceived mass:{:7.1}\n               Rigidbody mass:{:7.1}\n",
        half_up(downforce, 0),
        half_up(perceived_mass(downforce, snapshot.gravity), 1),
        half_up(snapshot.mass, 1),
    ));

    if let Some(audio) = &snapshot.audio {
        text.push_str(&format!("\nAudio gear/rpm:{:2} {:5.0}", audio.gear, half_up(audio.engine_rpm, 0)));
    }

    if let Some(damage) = &snapshot.damage {
        text.push_str(&format_damage(damage));
    }

    if !snapshot.debug_text.is_empty() {
        text.push_str("\n\n");
        text.push_str(&snapshot.debug_text);
    }

    text
}

/// One wheel row. Grounded wheels add their contact normal force to
/// `downforce`; airborne wheels never touch it.
pub fn format_wheel(wheel: &WheelSnapshot, mode: DataMode, downforce: &mut f32) -> String {
    let mark = if wheel.is_driven() { DRIVEN_MARK } else { COASTING_MARK };
    let mut text = format!("{:<10}{}{:5.0} rpm  ", wheel.name, mark, half_up(wheel.rpm(), 0));

    let Some(contact) = &wheel.contact else {
        text.push_str("C: 0.--  \n");
        return text;
    };

    text.push_str(&format!("C:{:5.2}  ", half_up(contact.compression, 2)));

    match mode {
        DataMode::TireSlipAndForce => {
            text.push_str(&format!("F:{:5.0}  ", half_up(contact.downforce, 0)));
            text.push_str(&format!(
                "Sx:{:6.2} Sy:{:6.2} ",
                half_up(contact.tire_slip.x, 2),
                half_up(contact.tire_slip.y, 2),
            ));
            text.push_str(&format!(
                "Fx:{:5.0} Fy:{:5.0}  ",
                half_up(contact.tire_force.x, 0),
                half_up(contact.tire_force.y, 0),
            ));
        }
        DataMode::GroundMaterial => {
            text.push_str(&format!("F:{:4.1} %  ", half_up(contact.downforce_ratio, 1)));
            text.push_str(&format!("Slip:{:4.1}  ", half_up(contact.combined_slip, 1)));

            if let Some(mat) = &contact.ground_material {
                text.push_str(&format!(
                    "Grip:{:4.1} Drag:{:4.1}  [{}]",
                    half_up(mat.grip, 1),
                    half_up(mat.drag, 1),
                    mat.physic_material.as_deref().unwrap_or("no mat"),
                ));
            }
        }
    }

    *downforce += contact.normal_force;

    text.push('\n');
    text
}

fn format_damage(damage: &DamageSnapshot) -> String {
    format!(
        "\nDamage mesh/collider/node:{:5.2} {:4.2} {:4.2}  {}",
        half_up(damage.mesh, 2),
        half_up(damage.collider, 2),
        half_up(damage.node, 2),
        if damage.repairing { "REPAIRING" } else { "" },
    )
}

/// Round exact halves away from zero before the precision formatter sees the
/// value; `{:.N}` alone would round them to even (2.5 -> "2", 0.125 -> "0.12").
fn half_up(x: f32, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (f64::from(x) * scale).round() / scale
}

/// Mass the suspension is currently holding up.
fn perceived_mass(downforce: f32, gravity: f32) -> f32 {
    if gravity > 0.0 { downforce / gravity } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::types::{
        AudioSnapshot, ContactBasis, GroundMaterial, WheelContact, WheelMount, W_TO_RPM,
    };
    use rapier3d::na::{Isometry3, Point3, Vector2, Vector3};

    fn mount() -> WheelMount {
        WheelMount {
            local_pose: Isometry3::identity(),
            center: Point3::origin(),
            suspension_distance: 0.2,
            radius: 0.35,
            force_distance: 0.1,
        }
    }

    fn contact() -> WheelContact {
        WheelContact {
            compression: 0.45,
            downforce: 3300.0,
            downforce_ratio: 99.5,
            normal_force: 3250.0,
            tire_slip: Vector2::new(-0.13, 1.5),
            tire_force: Vector2::new(-420.0, 1800.0),
            combined_slip: 1.51,
            basis: ContactBasis {
                point: Point3::origin(),
                normal: Vector3::y(),
                forward: Vector3::z(),
                sideways: Vector3::x(),
            },
            ground_material: None,
        }
    }

    fn wheel(name: &str, rpm: f32, torque: f32, contact: Option<WheelContact>) -> WheelSnapshot {
        WheelSnapshot {
            name: name.into(),
            angular_velocity: rpm / W_TO_RPM,
            motor_torque: torque,
            steer: false,
            steer_angle: 0.0,
            mount: mount(),
            contact,
        }
    }

    fn vehicle(speed: f32, wheels: Vec<WheelSnapshot>) -> VehicleSnapshot {
        VehicleSnapshot {
            speed,
            mass: 1350.0,
            center_of_mass: Point3::origin(),
            gravity: 10.0,
            pose: Isometry3::identity(),
            anti_roll: 0.2,
            steering_overdrive: 0.4,
            aero_offset: -1.0,
            debug_text: String::new(),
            wheels,
            audio: None,
            damage: None,
        }
    }

    #[test]
    fn header_converts_each_unit_from_raw_speed() {
        let text = format_telemetry(&vehicle(10.0, vec![]), DataMode::TireSlipAndForce);
        assert!(text.starts_with("V:  10.0 m/s   36.0 km/h  22.4 mph\n\n"), "{text}");
    }

    #[test]
    fn header_rounds_each_unit_independently() {
        // 0.04 shows 0.0 m/s but 0.1 km/h; 0.97 shows 1.0 m/s but 3.5 km/h (not 3.6)
        let cases = [
            (0.0, "V:   0.0 m/s    0.0 km/h   0.0 mph\n\n"),
            (0.04, "V:   0.0 m/s    0.1 km/h   0.1 mph\n\n"),
            (0.97, "V:   1.0 m/s    3.5 km/h   2.2 mph\n\n"),
            (27.3, "V:  27.3 m/s   98.3 km/h  61.1 mph\n\n"),
            (99.99, "V: 100.0 m/s  360.0 km/h 223.7 mph\n\n"),
            (240.0, "V: 240.0 m/s  864.0 km/h 536.9 mph\n\n"),
        ];

        for (speed, expected) in cases {
            let text = format_telemetry(&vehicle(speed, vec![]), DataMode::TireSlipAndForce);
            let header = &text[..expected.len()];
            assert_eq!(header, expected, "speed {speed}");
            assert_eq!(&header[3..8], format!("{:5.1}", speed).as_str());
            assert_eq!(&header[14..19], format!("{:5.1}", speed * MS_TO_KMH).as_str());
            assert_eq!(&header[25..30], format!("{:5.1}", speed * MS_TO_MPH).as_str());
        }
    }

    #[test]
    fn exact_halves_round_away_from_zero() {
        let mut c = contact();
        c.compression = 0.125;
        c.downforce = 2.5;
        c.tire_slip = Vector2::new(-0.125, 0.375);
        c.tire_force = Vector2::new(-1234.5, 0.5);
        let mut f = 0.0;
        let line = format_wheel(&wheel("RL", 0.0, 0.0, Some(c.clone())), DataMode::TireSlipAndForce, &mut f);
        assert_eq!(
            line,
            "RL        ×    0 rpm  C: 0.13  F:    3  Sx: -0.13 Sy:  0.38 Fx:-1235 Fy:    1  \n"
        );

        c.downforce_ratio = 0.25;
        c.combined_slip = 1.25;
        let line = format_wheel(&wheel("RL", 0.0, 0.0, Some(c)), DataMode::GroundMaterial, &mut f);
        assert!(line.contains("F: 0.3 %  Slip: 1.3  "), "{line:?}");

        let d = DamageSnapshot { mesh: 0.125, collider: 0.375, node: 0.625, repairing: false };
        assert_eq!(format_damage(&d), "\nDamage mesh/collider/node: 0.13 0.38 0.63  ");
    }

    #[test]
    fn airborne_coasting_wheel_has_no_grounded_columns() {
        let mut f = 0.0;
        let line = format_wheel(&wheel("FL", 1500.0, 0.0, None), DataMode::TireSlipAndForce, &mut f);
        assert_eq!(line, "FL        × 1500 rpm  C: 0.--  \n");
        assert_eq!(f, 0.0);

        for mode in DataMode::ALL {
            let line = format_wheel(&wheel("FL", 1500.0, 0.0, None), mode, &mut f);
            for tag in ["C:  ", "F:", "Sx:", "Fx:", "Slip:", "Grip:", "["] {
                assert!(!line.contains(tag), "{tag} in {line:?}");
            }
        }
    }

    #[test]
    fn grounded_driven_wheel_in_slip_mode() {
        let mut f = 0.0;
        let line = format_wheel(&wheel("RL", 812.0, 150.0, Some(contact())), DataMode::TireSlipAndForce, &mut f);
        assert_eq!(
            line,
            "RL        :  812 rpm  C: 0.45  F: 3300  Sx: -0.13 Sy:  1.50 Fx: -420 Fy: 1800  \n"
        );
        assert_eq!(f, 3250.0);
    }

    #[test]
    fn ground_material_mode_without_descriptor() {
        let mut f = 0.0;
        let line = format_wheel(&wheel("FR", 0.0, 0.0, Some(contact())), DataMode::GroundMaterial, &mut f);
        assert_eq!(line, "FR        ×    0 rpm  C: 0.45  F:99.5 %  Slip: 1.5  \n");
        assert!(!line.contains("Grip:"));
        assert!(!line.contains('['));
    }

    #[test]
    fn ground_material_mode_with_descriptor() {
        let mut c = contact();
        c.ground_material = Some(GroundMaterial { grip: 1.0, drag: 0.2, physic_material: None });
        let mut f = 0.0;
        let line = format_wheel(&wheel("FR", 0.0, 0.0, Some(c.clone())), DataMode::GroundMaterial, &mut f);
        assert!(line.ends_with("Slip: 1.5  Grip: 1.0 Drag: 0.2  [no mat]\n"), "{line:?}");

        c.ground_material = Some(GroundMaterial {
            grip: 0.7,
            drag: 1.5,
            physic_material: Some("Gravel".into()),
        });
        let line = format_wheel(&wheel("FR", 0.0, 0.0, Some(c)), DataMode::GroundMaterial, &mut f);
        assert!(line.ends_with("Grip: 0.7 Drag: 1.5  [Gravel]\n"), "{line:?}");
    }

    #[test]
    fn one_line_per_wheel_in_order() {
        let names = ["FL", "FR", "RL", "RR", "ML"];
        let wheels = names
            .iter()
            .enumerate()
            .map(|(i, n)| wheel(n, 0.0, 0.0, if i % 2 == 0 { Some(contact()) } else { None }))
            .collect();
        let text = format_telemetry(&vehicle(0.0, wheels), DataMode::GroundMaterial);

        let rows: Vec<&str> = text
            .lines()
            .filter(|l| l.contains(" rpm  "))
            .collect();
        assert_eq!(rows.len(), names.len());
        for (row, name) in rows.iter().zip(names) {
            assert!(row.starts_with(&format!("{name:<10}")), "{row}");
        }
    }

    #[test]
    fn summary_sums_grounded_wheels_only() {
        let wheels = vec![
            wheel("FL", 0.0, 0.0, Some(contact())),
            wheel("FR", 0.0, 0.0, None),
            wheel("RL", 0.0, 0.0, Some(contact())),
        ];
        let text = format_telemetry(&vehicle(0.0, wheels), DataMode::TireSlipAndForce);
        assert!(
            text.contains("\n     ΣF:  6500  Perceived mass:  650.0\n               Rigidbody mass: 1350.0\n"),
            "{text}"
        );
    }

    #[test]
    fn zero_gravity_does_not_blow_up() {
        let mut v = vehicle(0.0, vec![wheel("FL", 0.0, 0.0, Some(contact()))]);
        v.gravity = 0.0;
        let text = format_telemetry(&v, DataMode::TireSlipAndForce);
        assert!(text.contains("Perceived mass:    0.0"), "{text}");
    }

    #[test]
    fn optional_sections() {
        let mut v = vehicle(0.0, vec![]);
        let bare = format_telemetry(&v, DataMode::TireSlipAndForce);
        assert!(!bare.contains("Audio"));
        assert!(!bare.contains("Damage"));
        assert!(bare.ends_with("Rigidbody mass: 1350.0\n"));

        v.audio = Some(AudioSnapshot { gear: 3, engine_rpm: 4321.6 });
        v.damage = Some(DamageSnapshot { mesh: 0.5, collider: 0.25, node: 0.0, repairing: true });
        v.debug_text = "abs: on".into();
        let text = format_telemetry(&v, DataMode::TireSlipAndForce);
        assert!(text.contains("\nAudio gear/rpm: 3  4322"), "{text}");
        assert!(text.contains("\nDamage mesh/collider/node: 0.50 0.25 0.00  REPAIRING"), "{text}");
        assert!(text.ends_with("REPAIRING\n\nabs: on"), "{text}");
    }

    #[test]
    fn damage_not_repairing_appends_nothing() {
        let d = DamageSnapshot { mesh: 1.0, collider: 0.0, node: 0.124, repairing: false };
        assert_eq!(format_damage(&d), "\nDamage mesh/collider/node: 1.00 0.00 0.12  ");
    }

    #[test]
    fn formatting_is_idempotent() {
        let mut v = vehicle(27.3, vec![
            wheel("FL", 400.0, 0.0, Some(contact())),
            wheel("RR", 420.0, 90.0, None),
        ]);
        v.audio = Some(AudioSnapshot { gear: 2, engine_rpm: 3100.0 });
        for mode in DataMode::ALL {
            assert_eq!(format_telemetry(&v, mode), format_telemetry(&v, mode));
        }
    }
}
