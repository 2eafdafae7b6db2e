//! Small geometry helpers for the gizmo pass.

use rapier3d::na::{Point3, UnitQuaternion, Vector3};

/// Half-length of each cross-mark arm (m).
pub const CROSS_MARK_SIZE: f32 = 0.1;

/// sign with sign(0) = +1
#[inline]
pub fn sign(x: f32) -> f32 {
    if x >= 0.0 { 1.0 } else { -1.0 }
}

/// ln(|x| + 1), keeping the sign of x.
#[inline]
pub fn lin_to_log(x: f32) -> f32 {
    (x.abs() + 1.0).ln() * sign(x)
}

/// Same direction, magnitude remapped through `lin_to_log`.
#[inline]
pub fn lin_to_log_vec(v: Vector3<f32>) -> Vector3<f32> {
    let m = v.norm();
    if m > 1e-6 { v * (lin_to_log(m) / m) } else { Vector3::zeros() }
}

/// Segments along the frame's right, up and forward axes, centered on `point`.
pub fn cross_mark_segments(
    point: Point3<f32>,
    frame: &UnitQuaternion<f32>,
    half: f32,
) -> [(Point3<f32>, Point3<f32>); 3] {
    let axes = [Vector3::x(), Vector3::y(), Vector3::z()];
    axes.map(|axis| {
        let d = frame * axis * half;
        (point - d, point + d)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_compression_keeps_sign() {
        assert_eq!(lin_to_log(0.0), 0.0);
        assert!((lin_to_log(std::f32::consts::E - 1.0) - 1.0).abs() < 1e-5);
        assert!((lin_to_log(-(std::f32::consts::E - 1.0)) + 1.0).abs() < 1e-5);
    }

    #[test]
    fn log_vector_keeps_direction() {
        let v = Vector3::new(0.0, 0.0, -1000.0);
        let l = lin_to_log_vec(v);
        assert!(l.x.abs() < 1e-6 && l.y.abs() < 1e-6);
        assert!((l.z + 1001.0_f32.ln()).abs() < 1e-4);
        assert_eq!(lin_to_log_vec(Vector3::zeros()), Vector3::zeros());
    }

    #[test]
    fn cross_mark_follows_frame() {
        let frame = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), std::f32::consts::FRAC_PI_2);
        let segs = cross_mark_segments(Point3::new(1.0, 2.0, 3.0), &frame, 0.5);
        // local +X rotated 90° about Y points along world -Z
        let (a, b) = segs[0];
        assert!((b.z - 2.5).abs() < 1e-5, "{b:?}");
        assert!((a.z - 3.5).abs() < 1e-5, "{a:?}");
        assert!((segs[1].1.y - 2.5).abs() < 1e-5);
    }
}
