// ==============================================================================
// controller.rs — OVERLAY STATE MACHINE + CADENCE DRIVER
// ------------------------------------------------------------------------------
// The host calls three entry points:
// - on_fixed_step(source):            once per simulation step
//     sample + format into the cached panel text (only while visible)
// - on_frame(keys, source, gizmos, ground):   once per render frame
//     gizmos (independent of visibility), then toggle-key transitions
// - render(panel):                    once per render frame
//     box + cached text (only while visible)
//
// States: {Hidden, Visible} x {TireSlipAndForce, GroundMaterial}.
// Toggle key edge:
//   with shift    -> next data mode (wraps), visibility untouched
//   without shift -> flip visibility, mode untouched
//
// Without a bound target every entry point is a no-op.
// ==============================================================================

use tracing::{debug, trace};

use crate::config::OverlayConfig;
use crate::overlay::draw::{Color, GizmoPainter, PanelPainter};
use crate::overlay::format::format_telemetry;
use crate::overlay::gizmos::draw_gizmos;
use crate::overlay::input::{KeyEdge, KeyInput};
use crate::overlay::source::{GroundQuery, TelemetrySource};
use crate::overlay::types::DataMode;

/// Mutable overlay state; written only by `OverlayController`.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayState {
    pub visible: bool,
    pub mode: DataMode,
    text: String,
}

impl OverlayState {
    /// Last formatted panel text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

pub struct OverlayController<H> {
    config: OverlayConfig,
    target: Option<H>,
    state: OverlayState,
    toggle: KeyEdge,
}

impl<H: Copy> OverlayController<H> {
    pub fn new(config: OverlayConfig) -> Self {
        let state = OverlayState {
            visible: config.show,
            mode: config.data_mode,
            text: String::new(),
        };

        Self {
            config,
            target: None,
            state,
            toggle: KeyEdge::default(),
        }
    }

    /// Explicitly configured target; `activate` will not override it.
    pub fn with_target(mut self, target: H) -> Self {
        self.target = Some(target);
        self
    }

    /// Resolve font defaults and, if no target was configured, bind to the
    /// vehicle this overlay is attached to. No candidate leaves the overlay
    /// inert.
    pub fn activate(&mut self, attached: Option<H>) {
        if self.config.style.font.is_none() {
            self.config.style.font = self.config.default_font.clone();
            self.config.style.color = Color::WHITE;
        }

        if self.target.is_none() {
            self.target = attached;
        }

        debug!(bound = self.target.is_some(), "telemetry overlay activated");
    }

    pub fn target(&self) -> Option<H> {
        self.target
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn set_gizmos(&mut self, enabled: bool) {
        self.config.gizmos = enabled;
    }

    pub fn on_fixed_step<S>(&mut self, source: &S)
    where
        S: TelemetrySource<Handle = H>,
    {
        let Some(target) = self.target else { return };
        if !self.state.visible {
            return;
        }

        let Some(snapshot) = source.sample(target) else {
            trace!("telemetry target did not resolve this step");
            return;
        };

        self.state.text = format_telemetry(&snapshot, self.state.mode);
    }

    pub fn on_frame<K, S, P, G>(&mut self, keys: &K, source: &S, gizmos: &mut P, ground: &G)
    where
        K: KeyInput + ?Sized,
        S: TelemetrySource<Handle = H>,
        P: GizmoPainter,
        G: GroundQuery,
    {
        if self.config.gizmos {
            if let Some(snapshot) = self.target.and_then(|t| source.sample(t)) {
                draw_gizmos(&snapshot, gizmos, ground);
            }
        }

        self.handle_input(keys);
    }

    pub fn render(&self, panel: &mut impl PanelPainter) {
        if self.target.is_none() || !self.state.visible {
            return;
        }

        let layout = &self.config.panel;
        panel.draw_box(layout.frame, &layout.title);
        panel.draw_label(layout.text, &self.state.text, &self.config.style);
    }

    fn handle_input<K: KeyInput + ?Sized>(&mut self, keys: &K) {
        // modifier is sampled on the same frame as the edge
        let held = keys.is_held(self.config.toggle_key);
        let shift = keys.shift_held();

        if !self.toggle.pressed(held) {
            return;
        }

        if shift {
            self.state.mode = self.state.mode.next();
            debug!(mode = ?self.state.mode, "telemetry data mode");
        } else {
            self.state.visible = !self.state.visible;
            debug!(visible = self.state.visible, "telemetry panel toggled");
        }
    }
}
