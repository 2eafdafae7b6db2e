// ==============================================================================
// draw.rs — DRAWING SURFACE (PANEL + WORLD GIZMOS)
// ------------------------------------------------------------------------------
// PanelPainter: screen-space box + label (the text panel).
// GizmoPainter: world-space lines and cross-marks.
//
// Both are implemented by the host backend. debug_builders::DrawList records
// the calls so they can be serialized or inspected.
// ==============================================================================

use rapier3d::na::{Point3, UnitQuaternion};
use serde::{Deserialize, Serialize};

use crate::overlay::vector_math::{cross_mark_segments, CROSS_MARK_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 { 1.0 }

impl Color {
    pub const WHITE: Color   = Color::rgb(1.0, 1.0, 1.0);
    pub const GRAY: Color    = Color::rgb(0.5, 0.5, 0.5);
    pub const GREEN: Color   = Color::rgb(0.0, 1.0, 0.0);
    pub const YELLOW: Color  = Color::rgb(1.0, 1.0, 0.0);
    pub const CYAN: Color    = Color::rgb(0.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Linear blend, t clamped to 0..1.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

impl Default for Color {
    fn default() -> Self { Color::WHITE }
}

/// Screen rectangle in pixels (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font: Option<String>,
    pub color: Color,
}

pub trait PanelPainter {
    fn draw_box(&mut self, rect: Rect, title: &str);
    fn draw_label(&mut self, rect: Rect, text: &str, style: &TextStyle);
}

pub trait GizmoPainter {
    fn draw_line(&mut self, a: Point3<f32>, b: Point3<f32>, color: Color);

    /// Three short segments through `point` along the frame's axes.
    fn draw_cross_mark(&mut self, point: Point3<f32>, frame: &UnitQuaternion<f32>, color: Color) {
        for (a, b) in cross_mark_segments(point, frame, CROSS_MARK_SIZE) {
            self.draw_line(a, b, color);
        }
    }
}
