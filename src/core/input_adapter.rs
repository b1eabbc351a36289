use winit::event::{ElementState, WindowEvent};
use winit::keyboard::Key;

use super::controller::{Button, InputEvent};

/// Adapter that bridges Winit events to render loop input
#[derive(Debug, Clone, Copy, Default)]
pub struct WinitController;

impl WinitController {
    pub fn new() -> Self {
        Self
    }

    /// Translate a Winit WindowEvent, or `None` if the loop ignores it
    pub fn process_event(&self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => Some(InputEvent::Quit),
            WindowEvent::KeyboardInput { event, .. } => {
                Self::key_to_input(event.state, &event.logical_key)
            }
            _ => None,
        }
    }

    /// Map a logical key press to input. Symbols are matched by the text the
    /// keyboard layout produces, so `+` works on layouts without a plus key.
    pub fn key_to_input(state: ElementState, key: &Key) -> Option<InputEvent> {
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            Key::Character(text) => Button::from_key_text(text.as_str()).map(InputEvent::KeyDown),
            _ => None,
        }
    }
}
