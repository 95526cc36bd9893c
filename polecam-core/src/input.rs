/// Input events consumed by the mouse poles
///
/// Cursor positions are absolute pixels with the origin at the top-left corner
/// and Y growing downwards. Windowing layers with a Y-up convention must flip
/// the Y coordinate before forwarding.
use bitflags::bitflags;
use nalgebra::Point2;

/// Mouse buttons a pole can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

bitflags! {
    /// Modifier keys held while an event happened
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b001;
        const CTRL = 0b010;
        const ALT = 0b100;
    }
}

/// A single input event forwarded to a pole
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoleEvent {
    Button {
        button: MouseButton,
        pressed: bool,
        modifiers: Modifiers,
        position: Point2<f32>,
    },
    Move {
        position: Point2<f32>,
    },
    /// Positive directions scroll towards the target, negative away from it.
    Wheel {
        direction: i32,
        modifiers: Modifiers,
        position: Point2<f32>,
    },
    Key {
        key: char,
        fine: bool,
        frame_duration: f32,
    },
}

impl PoleEvent {
    pub fn press(button: MouseButton, modifiers: Modifiers, x: f32, y: f32) -> Self {
        Self::Button {
            button,
            pressed: true,
            modifiers,
            position: Point2::new(x, y),
        }
    }

    pub fn release(button: MouseButton, x: f32, y: f32) -> Self {
        Self::Button {
            button,
            pressed: false,
            modifiers: Modifiers::empty(),
            position: Point2::new(x, y),
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::Move {
            position: Point2::new(x, y),
        }
    }
}
