/// polecam Web - WASM bindings for the view pole
///
/// Wraps a camera pole for browser pages: forward DOM mouse, wheel and key
/// events, then upload `view_matrix()` as a column-major `mat4`.

use nalgebra::Point2;
use polecam_core::config::PoleConfig;
use polecam_core::{Modifiers, MouseButton, MousePole, PoleEvent};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WebViewPole {
    pole: MousePole,
}

#[wasm_bindgen]
impl WebViewPole {
    /// Camera pole with the default placement, orbiting on the left button.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebViewPole {
        Self::from_config(&PoleConfig::default())
    }

    /// Camera pole configured from a TOML document.
    #[wasm_bindgen(js_name = fromToml)]
    pub fn from_toml(toml: &str) -> Result<WebViewPole, JsValue> {
        let config =
            PoleConfig::from_toml_str(toml).map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(Self::from_config(&config))
    }

    /// `button` uses DOM numbering: 0 left, 1 middle, 2 right.
    pub fn mouse_down(&mut self, button: u8, x: f32, y: f32, shift: bool, ctrl: bool, alt: bool) {
        if let Some(button) = dom_button(button) {
            self.pole.handle(&PoleEvent::press(button, modifiers(shift, ctrl, alt), x, y));
        }
    }

    pub fn mouse_up(&mut self, button: u8, x: f32, y: f32) {
        if let Some(button) = dom_button(button) {
            self.pole.handle(&PoleEvent::release(button, x, y));
        }
    }

    pub fn mouse_move(&mut self, x: f32, y: f32) {
        self.pole.handle(&PoleEvent::moved(x, y));
    }

    /// `delta_y` is the DOM wheel delta: positive scrolls away from the target.
    pub fn wheel(&mut self, delta_y: f32, x: f32, y: f32, shift: bool) {
        let direction = if delta_y > 0.0 {
            -1
        } else if delta_y < 0.0 {
            1
        } else {
            return;
        };
        self.pole.handle(&PoleEvent::Wheel {
            direction,
            modifiers: modifiers(shift, false, false),
            position: Point2::new(x, y),
        });
    }

    /// Movement keys (`wasdqe`); shift selects the small step.
    pub fn key(&mut self, key: &str, shift: bool, frame_duration: f32) {
        if let Some(c) = key.chars().next() {
            self.pole.handle(&PoleEvent::Key {
                key: c,
                fine: shift,
                frame_duration,
            });
        }
    }

    pub fn reset(&mut self) {
        self.pole.reset();
    }

    pub fn radius(&self) -> f32 {
        self.pole.radius()
    }

    /// World-to-camera matrix, 16 floats in column-major order.
    pub fn view_matrix(&self) -> Vec<f32> {
        self.pole.calc_matrix().as_slice().to_vec()
    }
}

impl WebViewPole {
    pub fn from_config(config: &PoleConfig) -> Self {
        Self {
            pole: MousePole::view(config.view_data(), config.view_scale(), MouseButton::Left),
        }
    }
}

impl Default for WebViewPole {
    fn default() -> Self {
        Self::new()
    }
}

fn dom_button(button: u8) -> Option<MouseButton> {
    match button {
        0 => Some(MouseButton::Left),
        1 => Some(MouseButton::Middle),
        2 => Some(MouseButton::Right),
        _ => None,
    }
}

fn modifiers(shift: bool, ctrl: bool, alt: bool) -> Modifiers {
    let mut result = Modifiers::empty();
    result.set(Modifiers::SHIFT, shift);
    result.set(Modifiers::CTRL, ctrl);
    result.set(Modifiers::ALT, alt);
    result
}
