//! Input model: keys, modifier keys, tabs, and the drag state machine.
//!
//! `Key` and `Modifiers` capture what the host reported for a keyboard event.
//! `InputState` is the gesture tracked on the detail map between pointer-down
//! and pointer-up.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geometry::LngLat;
use crate::layer::PrimitiveId;

/// Keyboard keys the engine reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    /// Any other key, by its browser name.
    Other(String),
}

impl Key {
    /// Map a browser `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_browser(name: &str) -> Self {
        match name {
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Escape" => Self::Escape,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Unit direction `(d_lng, d_lat)` for arrow keys; north is up.
    #[must_use]
    pub fn direction(&self) -> Option<(f64, f64)> {
        match self {
            Self::ArrowUp => Some((0.0, 1.0)),
            Self::ArrowDown => Some((0.0, -1.0)),
            Self::ArrowLeft => Some((-1.0, 0.0)),
            Self::ArrowRight => Some((1.0, 0.0)),
            Self::Escape | Self::Other(_) => None,
        }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Top-level tab shown by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// All districts.
    #[default]
    Overview,
    /// Focused selection with the edit layer.
    Detail,
    /// Project list and details.
    Projects,
}

/// Which of the two map views an action refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Overview,
    Detail,
}

/// Gesture in progress on the detail map.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Dragging an editable primitive.
    Dragging {
        id: PrimitiveId,
        /// Pointer position at the previous event.
        last: LngLat,
        /// Whether the pointer moved since pointer-down.
        moved: bool,
    },
}
