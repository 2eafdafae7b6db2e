// ==============================================================================
// debug_builders.rs — RECORDED DEBUG PRIMITIVES
// ------------------------------------------------------------------------------
// DrawList records every panel/gizmo call as a plain serializable primitive:
// - DebugBox / DebugLabel: the screen-space telemetry panel
// - DebugCross: cross-marks (COM, wheels, force points, aero point)
// - DebugLine: downforce bars, tire force / slip vectors
//
// A host can ship a frame as JSON (to_json) or replay it into its own renderer.
// Tests use it as the painter double.
//
// This file is purely visualization scaffolding and has no simulation side
// effects.
// ==============================================================================

use rapier3d::na::{Point3, UnitQuaternion};
use serde::Serialize;

use crate::overlay::draw::{Color, GizmoPainter, PanelPainter, Rect, TextStyle};

#[derive(Clone, Debug, Default, Serialize)]
pub struct DrawList {
    pub boxes: Vec<DebugBox>,
    pub labels: Vec<DebugLabel>,
    pub cross_marks: Vec<DebugCross>,
    pub lines: Vec<DebugLine>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DebugBox {
    pub rect: Rect,
    pub title: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct DebugLabel {
    pub rect: Rect,
    pub text: String,
    pub style: TextStyle,
}

#[derive(Clone, Debug, Serialize)]
pub struct DebugCross {
    pub point: [f32; 3],
    pub rotation: [f32; 4], // quaternion (i, j, k, w)
    pub color: Color,
}

#[derive(Clone, Debug, Serialize)]
pub struct DebugLine {
    pub from: [f32; 3],
    pub to: [f32; 3],
    pub color: Color,
}

#[inline] fn p3(p: Point3<f32>) -> [f32; 3] { [p.x, p.y, p.z] }

impl DrawList {
    pub fn clear(&mut self) {
        self.boxes.clear();
        self.labels.clear();
        self.cross_marks.clear();
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
            && self.labels.is_empty()
            && self.cross_marks.is_empty()
            && self.lines.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl PanelPainter for DrawList {
    fn draw_box(&mut self, rect: Rect, title: &str) {
        self.boxes.push(DebugBox { rect, title: title.to_string() });
    }

    fn draw_label(&mut self, rect: Rect, text: &str, style: &TextStyle) {
        self.labels.push(DebugLabel {
            rect,
            text: text.to_string(),
            style: style.clone(),
        });
    }
}

impl GizmoPainter for DrawList {
    fn draw_line(&mut self, a: Point3<f32>, b: Point3<f32>, color: Color) {
        self.lines.push(DebugLine { from: p3(a), to: p3(b), color });
    }

    fn draw_cross_mark(&mut self, point: Point3<f32>, frame: &UnitQuaternion<f32>, color: Color) {
        let q = frame.quaternion();
        self.cross_marks.push(DebugCross {
            point: p3(point),
            rotation: [q.i, q.j, q.k, q.w],
            color,
        });
    }
}
