//! Input aggregation: keyboard plus on-screen virtual controller.
//!
//! Two independent sources feed three intents:
//!
//! - the keyboard, through rebindable [`KeyBindings`]
//! - a [`VirtualController`] of three pressable zones fixed to the viewport
//!
//! Both are level-triggered and combined with inclusive OR. Holding a key and
//! its matching button at the same time is the same as holding either.
//!
//! Input state is written by host events between frames and only read by the
//! frame update, so no synchronization is involved.

use std::collections::BTreeSet;

use arcade::Aabb;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::host::Viewport;

/// Side length of the virtual button texture.
pub const BUTTON_SIZE: f32 = 68.0;

/// Horizontal stretch of the left/right buttons.
pub const DIRECTION_BUTTON_SCALE: f32 = 1.5;

/// Left edge of the right-direction button.
pub const RIGHT_BUTTON_X: f32 = 100.0;

/// Per-frame movement intents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Intents {
    /// Move left
    pub move_left: bool,
    /// Move right
    pub move_right: bool,
    /// Jump
    pub jump: bool,
}

impl Intents {
    /// No input.
    pub const NONE: Self = Self {
        move_left: false,
        move_right: false,
        jump: false,
    };

    /// Only moving right.
    pub const RIGHT: Self = Self {
        move_left: false,
        move_right: true,
        jump: false,
    };

    /// Only moving left.
    pub const LEFT: Self = Self {
        move_left: true,
        move_right: false,
        jump: false,
    };

    /// Only jumping.
    pub const JUMP: Self = Self {
        move_left: false,
        move_right: false,
        jump: true,
    };

    /// Inclusive OR of two intent sets.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        Self {
            move_left: self.move_left || other.move_left,
            move_right: self.move_right || other.move_right,
            jump: self.jump || other.jump,
        }
    }
}

/// A keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// A letter or digit key, by its uppercase character
    Char(char),
    /// Space bar
    Space,
    /// Left arrow
    ArrowLeft,
    /// Right arrow
    ArrowRight,
    /// Up arrow
    ArrowUp,
}

/// Which key drives which intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Move left
    pub left: Key,
    /// Move right
    pub right: Key,
    /// Jump
    pub jump: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: Key::Char('Q'),
            right: Key::Char('D'),
            jump: Key::Space,
        }
    }
}

/// Set of keys currently held down.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyboardState {
    pressed: BTreeSet<Key>,
}

impl KeyboardState {
    /// Records a key press.
    pub fn key_down(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    /// Records a key release.
    pub fn key_up(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    /// Whether `key` is held.
    #[must_use]
    pub fn is_down(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Intents from held keys.
    #[must_use]
    pub fn intents(&self, bindings: &KeyBindings) -> Intents {
        Intents {
            move_left: self.is_down(bindings.left),
            move_right: self.is_down(bindings.right),
            jump: self.is_down(bindings.jump),
        }
    }
}

/// Pointer events a virtual button reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Pointer entered the button
    Over,
    /// Pointer left the button
    Out,
    /// Pointer pressed on the button
    Down,
    /// Pointer released on the button
    Up,
}

/// One on-screen pressable zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VirtualButton {
    held: bool,
}

impl VirtualButton {
    /// Applies a pointer event.
    pub fn handle(&mut self, event: PointerEvent) {
        self.held = matches!(event, PointerEvent::Over | PointerEvent::Down);
    }

    /// Whether the button currently counts as held.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.held
    }
}

/// Identifies a virtual button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonId {
    /// Move left
    Left,
    /// Move right
    Right,
    /// Jump
    Jump,
}

/// The three on-screen buttons.
///
/// Created once per session; it survives level rebuilds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VirtualController {
    left: VirtualButton,
    right: VirtualButton,
    jump: VirtualButton,
}

impl VirtualController {
    /// Routes a pointer event to a button.
    pub fn pointer(&mut self, button: ButtonId, event: PointerEvent) {
        self.button_mut(button).handle(event);
    }

    /// A button's state.
    #[must_use]
    pub const fn button(&self, button: ButtonId) -> VirtualButton {
        match button {
            ButtonId::Left => self.left,
            ButtonId::Right => self.right,
            ButtonId::Jump => self.jump,
        }
    }

    fn button_mut(&mut self, button: ButtonId) -> &mut VirtualButton {
        match button {
            ButtonId::Left => &mut self.left,
            ButtonId::Right => &mut self.right,
            ButtonId::Jump => &mut self.jump,
        }
    }

    /// Intents from held buttons.
    #[must_use]
    pub const fn intents(&self) -> Intents {
        Intents {
            move_left: self.left.is_held(),
            move_right: self.right.is_held(),
            jump: self.jump.is_held(),
        }
    }

    /// Screen rectangles of the buttons for a viewport.
    ///
    /// Direction buttons sit in the bottom-left corner, the jump button in
    /// the bottom-right one.
    #[must_use]
    pub fn layout(viewport: Viewport) -> [(ButtonId, Aabb); 3] {
        let row = viewport.height - BUTTON_SIZE;
        let wide = Vec2::new(BUTTON_SIZE * DIRECTION_BUTTON_SCALE, BUTTON_SIZE);
        let square = Vec2::splat(BUTTON_SIZE);
        [
            (ButtonId::Left, Aabb::new(Vec2::new(0.0, row), wide)),
            (ButtonId::Right, Aabb::new(Vec2::new(RIGHT_BUTTON_X, row), wide)),
            (
                ButtonId::Jump,
                Aabb::new(Vec2::new(viewport.width - BUTTON_SIZE, row), square),
            ),
        ]
    }

    /// Button under a screen point, if any. Later buttons win overlaps.
    #[must_use]
    pub fn hit_test(viewport: Viewport, point: Vec2) -> Option<ButtonId> {
        Self::layout(viewport)
            .iter()
            .rev()
            .find(|(_, rect)| rect.contains_point(point))
            .map(|(id, _)| *id)
    }
}

/// Merges keyboard and virtual controller into intents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputAggregator {
    bindings: KeyBindings,
    keyboard: KeyboardState,
    controller: VirtualController,
}

impl InputAggregator {
    /// Creates an aggregator with the given key bindings.
    #[must_use]
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Self::default()
        }
    }

    /// Records a key press.
    pub fn key_down(&mut self, key: Key) {
        self.keyboard.key_down(key);
    }

    /// Records a key release.
    pub fn key_up(&mut self, key: Key) {
        self.keyboard.key_up(key);
    }

    /// Routes a pointer event to a virtual button.
    pub fn pointer(&mut self, button: ButtonId, event: PointerEvent) {
        self.controller.pointer(button, event);
    }

    /// Keyboard state.
    #[must_use]
    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    /// Virtual controller state.
    #[must_use]
    pub fn controller(&self) -> &VirtualController {
        &self.controller
    }

    /// Combined intents for this frame.
    #[must_use]
    pub fn intents(&self) -> Intents {
        self.keyboard
            .intents(&self.bindings)
            .or(self.controller.intents())
    }
}
