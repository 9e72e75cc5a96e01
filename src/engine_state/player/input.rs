//! # Player Input
//!
//! Key and mouse bindings of the player, and the held-key state the movement step reads.
//!
//! | Input | Action |
//! |-------|--------|
//! | W / S / A / D | walk forward, backwards, strafe left, strafe right (held) |
//! | Left Shift | run while on the ground (held) |
//! | Space | jump |
//! | E / left mouse button | place the selected block type |
//! | Q / right mouse button | remove the targeted block |
//! | Up / Down | cycle the selected block type |
//!
//! Held keys are sampled once per tick. Discrete actions fire on the press itself, and
//! key repeats are ignored.

use std::collections::HashMap;

use log::trace;
use winit::{event::MouseButton, keyboard::KeyCode};

use super::Player;
use crate::engine_state::voxels::world::BlockAccess;

/// Keys whose held state drives continuous movement.
pub const MOVEMENT_KEYS: [KeyCode; 5] = [
    KeyCode::KeyW,
    KeyCode::KeyS,
    KeyCode::KeyA,
    KeyCode::KeyD,
    KeyCode::ShiftLeft,
];

/// Represents the state of a key across ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawInputState {
    /// Key is not pressed
    #[default]
    NotPressed,
    /// Key went down since the last tick
    Pressed,
    /// Key has been down for at least one tick
    Held,
    /// Key went up since the last tick
    Released,
}

impl RawInputState {
    /// Determines if the key is down (either pressed or held)
    pub fn is_active(&self) -> bool {
        matches!(self, RawInputState::Pressed | RawInputState::Held)
    }

    /// Derives the state from whether the key was down before and is down now
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => RawInputState::Pressed,
            (true, true) => RawInputState::Held,
            (true, false) => RawInputState::Released,
            (false, false) => RawInputState::NotPressed,
        }
    }

    /// The state this one settles into once a tick has observed it
    pub fn advanced(self) -> Self {
        match self {
            RawInputState::Pressed | RawInputState::Held => RawInputState::Held,
            RawInputState::Released | RawInputState::NotPressed => RawInputState::NotPressed,
        }
    }
}

/// Input accumulated between two ticks.
#[derive(Debug, Default)]
pub struct PlayerInput {
    key_states: HashMap<KeyCode, RawInputState>,
    /// Mouse movement since the last tick, already in look units (x, y)
    mouse_delta: (f32, f32),
}

impl PlayerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key going down or up. Only movement keys are tracked.
    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        if !MOVEMENT_KEYS.contains(&key) {
            return;
        }
        let state = self.key_states.entry(key).or_default();
        *state = RawInputState::from_raw_states(state.is_active(), pressed);
    }

    /// True if the key is down.
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.key_states
            .get(&key)
            .is_some_and(|state| state.is_active())
    }

    pub fn key_state(&self, key: KeyCode) -> RawInputState {
        self.key_states.get(&key).copied().unwrap_or_default()
    }

    pub fn add_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.mouse_delta.0 += dx;
        self.mouse_delta.1 += dy;
    }

    /// Returns and clears the accumulated mouse movement.
    pub fn take_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Settles every key transition once a tick has consumed it.
    pub fn advance(&mut self) {
        for state in self.key_states.values_mut() {
            *state = state.advanced();
        }
    }

    /// Forgets every key and pending mouse movement.
    pub fn reset(&mut self) {
        self.key_states.clear();
        self.mouse_delta = (0.0, 0.0);
    }
}

impl Player {
    /// Handles a keyboard event.
    ///
    /// # Arguments
    ///
    /// * `world` - The grid edited by the place/remove bindings
    /// * `key` - The physical key
    /// * `pressed` - True on key down, false on key up
    /// * `is_repeat` - True for auto-repeated key downs
    pub fn on_key<W: BlockAccess>(&mut self, world: &mut W, key: KeyCode, pressed: bool, is_repeat: bool) {
        self.input.set_key(key, pressed);

        if !pressed || is_repeat {
            return;
        }

        trace!("Key {:?} pressed", key);
        match key {
            KeyCode::Space => self.request_jump(),
            KeyCode::KeyE => {
                self.place_block(world, self.selected_block_type);
            }
            KeyCode::KeyQ => {
                self.remove_block(world);
            }
            KeyCode::ArrowUp => self.cycle_block_types(1),
            KeyCode::ArrowDown => self.cycle_block_types(-1),
            _ => {}
        }
    }

    /// Handles a mouse button event. Buttons act on press only.
    pub fn on_mouse_button<W: BlockAccess>(&mut self, world: &mut W, button: MouseButton, pressed: bool) {
        if !pressed {
            return;
        }

        match button {
            MouseButton::Left => {
                self.place_block(world, self.selected_block_type);
            }
            MouseButton::Right => {
                self.remove_block(world);
            }
            _ => {}
        }
    }

    /// Queues raw mouse movement; it turns the view on the next tick.
    ///
    /// Positive `dx` turns right, positive `dy` looks up. Window systems usually report
    /// y growing downwards, so callers negate it.
    pub fn on_mouse_move(&mut self, dx: f64, dy: f64) {
        self.input.add_mouse_delta(dx as f32, dy as f32);
    }

    /// Current held-key state.
    pub fn input(&self) -> &PlayerInput {
        &self.input
    }
}
