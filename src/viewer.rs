use log::debug;

use crate::core::{Button, DisplayContext, InputEvent, WindowContext, WindowDimensions};
use crate::device::PixelView;

/// Render loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// The render loop: mirrors live pixel memory onto a window and reacts to
/// input. Holds the display surface once one is attached and releases it
/// exactly once, on the transition to `Terminated`.
pub struct Viewer<'fb, W: WindowContext> {
    window: Option<W>,
    frame: PixelView<'fb>,
    context: DisplayContext,
    state: LoopState,
}

impl<'fb, W: WindowContext> Viewer<'fb, W> {
    pub fn new(frame: PixelView<'fb>, context: DisplayContext) -> Self {
        Self {
            window: None,
            frame,
            context,
            state: LoopState::Running,
        }
    }

    /// Take ownership of the display surface
    pub fn attach(&mut self, window: W) {
        match self.state {
            LoopState::Running => self.window = Some(window),
            LoopState::Terminated => debug!("Viewer terminated, dropping late display surface"),
        }
    }

    pub fn has_window(&self) -> bool {
        self.window.is_some()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn context(&self) -> &DisplayContext {
        &self.context
    }

    /// Apply one input event. Events after termination are ignored.
    pub fn handle_input(&mut self, event: InputEvent) -> LoopState {
        if !self.is_running() {
            return self.state;
        }

        match event {
            InputEvent::Quit => self.terminate(),
            InputEvent::KeyDown(Button::ZoomIn) => {
                self.context.zoom_in();
                self.apply_scale();
            }
            InputEvent::KeyDown(Button::ZoomOut) => {
                self.context.zoom_out();
                self.apply_scale();
            }
        }

        self.state
    }

    /// Snap the window back to the scaled size, even when the clamp left the
    /// scale unchanged
    fn apply_scale(&mut self) {
        if let Some(window) = self.window.as_mut() {
            window.request_size(self.context.window_size());
        }
        println!("Scale: {}x", self.context.scale());
    }

    /// The window's actual size changed
    pub fn surface_resized(&mut self, dimensions: WindowDimensions) {
        if let (LoopState::Running, Some(window)) = (self.state, self.window.as_mut()) {
            window.resize_surface(dimensions);
        }
    }

    /// Push the current pixels to the window and present
    pub fn render(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        match (self.state, self.window.as_mut()) {
            (LoopState::Running, Some(window)) => window.draw(self.frame),
            _ => Ok(()),
        }
    }

    pub fn request_redraw(&self) {
        if let (LoopState::Running, Some(window)) = (self.state, self.window.as_ref()) {
            window.request_redraw();
        }
    }

    /// Stop the loop and release the display surface
    pub fn terminate(&mut self) {
        self.state = LoopState::Terminated;
        if let Some(window) = self.window.take() {
            drop(window);
            debug!("Display surface released");
        }
    }
}
