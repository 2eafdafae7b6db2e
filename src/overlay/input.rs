// ==============================================================================
// input.rs — KEYBOARD SURFACE FOR THE OVERLAY
// ------------------------------------------------------------------------------
// The host only reports which keys are held this frame. Press edges are derived
// here (KeyEdge) so a key held across many frames fires once.
// ==============================================================================

use std::collections::HashSet;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Key {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    Tab,
    Space,
    LeftShift,
    RightShift,
}

pub trait KeyInput {
    fn is_held(&self, key: Key) -> bool;

    /// Either shift key.
    fn shift_held(&self) -> bool {
        self.is_held(Key::LeftShift) || self.is_held(Key::RightShift)
    }
}

impl KeyInput for [Key] {
    fn is_held(&self, key: Key) -> bool {
        self.contains(&key)
    }
}

impl<const N: usize> KeyInput for [Key; N] {
    fn is_held(&self, key: Key) -> bool {
        self.contains(&key)
    }
}

impl KeyInput for HashSet<Key> {
    fn is_held(&self, key: Key) -> bool {
        self.contains(&key)
    }
}

/// Rising-edge detector for a single key.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyEdge {
    was_held: bool,
}

impl KeyEdge {
    /// True only on the frame the key goes from released to held.
    pub fn pressed(&mut self, held: bool) -> bool {
        let edge = held && !self.was_held;
        self.was_held = held;
        edge
    }
}
