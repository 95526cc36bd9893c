/// Translation from crossterm events to pole events and app commands
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton as TermButton, MouseEvent,
    MouseEventKind,
};
use nalgebra::Point2;
use polecam_core::lighting::{LightingPreset, TimerTarget};
use polecam_core::{Modifiers, MouseButton, PoleEvent};

/// Pixel size of a terminal cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub width_px: f32,
    pub height_px: f32,
}

impl CellMetrics {
    /// Pixel position of the centre of a cell.
    pub fn to_pixels(&self, column: u16, row: u16) -> Point2<f32> {
        Point2::new(
            (column as f32 + 0.5) * self.width_px,
            (row as f32 + 0.5) * self.height_px,
        )
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width_px: 8.0,
            height_px: 16.0,
        }
    }
}

/// Keyboard commands understood by the terminal demo
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Quit,
    /// Slide the camera target; `fine` selects the small step.
    Move { key: char, fine: bool },
    TogglePause,
    Rewind,
    FastForward,
    SelectTarget(TimerTarget),
    Preset(LightingPreset),
    ToggleGamma,
    GammaUp,
    GammaDown,
    CycleLightingModel,
    ToggleTargetMarker,
    ShowSunTime,
}

pub fn to_modifiers(modifiers: KeyModifiers) -> Modifiers {
    let mut result = Modifiers::empty();
    result.set(Modifiers::SHIFT, modifiers.contains(KeyModifiers::SHIFT));
    result.set(Modifiers::CTRL, modifiers.contains(KeyModifiers::CONTROL));
    result.set(Modifiers::ALT, modifiers.contains(KeyModifiers::ALT));
    result
}

pub fn to_button(button: TermButton) -> MouseButton {
    match button {
        TermButton::Left => MouseButton::Left,
        TermButton::Right => MouseButton::Right,
        TermButton::Middle => MouseButton::Middle,
    }
}

/// Translate a terminal mouse event. Drags become plain moves; the pole
/// tracks which button is held.
pub fn mouse_event(event: &MouseEvent, metrics: &CellMetrics) -> Option<PoleEvent> {
    let position = metrics.to_pixels(event.column, event.row);
    let modifiers = to_modifiers(event.modifiers);
    let translated = match event.kind {
        MouseEventKind::Down(button) => PoleEvent::Button {
            button: to_button(button),
            pressed: true,
            modifiers,
            position,
        },
        MouseEventKind::Up(button) => PoleEvent::Button {
            button: to_button(button),
            pressed: false,
            modifiers,
            position,
        },
        MouseEventKind::Drag(_) | MouseEventKind::Moved => PoleEvent::Move { position },
        MouseEventKind::ScrollUp => PoleEvent::Wheel {
            direction: 1,
            modifiers,
            position,
        },
        MouseEventKind::ScrollDown => PoleEvent::Wheel {
            direction: -1,
            modifiers,
            position,
        },
        _ => return None,
    };
    Some(translated)
}

/// Map a key press to a command. Key releases and unbound keys map to `None`.
pub fn key_command(event: &KeyEvent) -> Option<Command> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Command::Quit);
    }

    let command = match event.code {
        KeyCode::Esc => Command::Quit,
        KeyCode::Char(' ') => Command::ShowSunTime,
        KeyCode::Char(c) => match c {
            'w' | 'a' | 's' | 'd' | 'q' | 'e' | 'W' | 'A' | 'S' | 'D' | 'Q' | 'E' => {
                Command::Move {
                    key: c.to_ascii_lowercase(),
                    fine: c.is_ascii_uppercase() || event.modifiers.contains(KeyModifiers::SHIFT),
                }
            }
            'p' => Command::TogglePause,
            '-' => Command::Rewind,
            '=' => Command::FastForward,
            '1' => Command::SelectTarget(TimerTarget::All),
            '2' => Command::SelectTarget(TimerTarget::Sun),
            '3' => Command::SelectTarget(TimerTarget::Lights),
            'l' => Command::Preset(LightingPreset::Hdr),
            'L' => Command::Preset(LightingPreset::Gamma),
            'k' => Command::ToggleGamma,
            'y' => Command::GammaUp,
            'h' => Command::GammaDown,
            'm' => Command::CycleLightingModel,
            't' => Command::ToggleTargetMarker,
            _ => return None,
        },
        _ => return None,
    };
    Some(command)
}
