use crate::device::PixelView;

/// Window dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowDimensions {
    pub width: u32,
    pub height: u32,
}

impl WindowDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Window abstraction - the display surface the render loop drives
pub trait WindowContext {
    /// Ask the windowing system for a new inner size
    fn request_size(&mut self, dimensions: WindowDimensions);

    /// The window's inner size changed; resize the swap chain to match
    fn resize_surface(&mut self, dimensions: WindowDimensions);

    /// Upload the pixels, stretch them over the window and present
    fn draw(&mut self, frame: PixelView<'_>) -> Result<(), Box<dyn std::error::Error>>;

    /// Request the window to redraw
    fn request_redraw(&self);
}
