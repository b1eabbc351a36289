use super::window::WindowDimensions;
use crate::device::Geometry;

/// Smallest display scale
pub const MIN_SCALE: u32 = 1;
/// Largest display scale
pub const MAX_SCALE: u32 = 8;

/// Display context - source dimensions plus the current integer scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayContext {
    /// Source width in pixels
    pub width: u32,
    /// Source height in pixels
    pub height: u32,
    scale: u32,
}

impl DisplayContext {
    /// Create new display context at scale 1
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: MIN_SCALE,
        }
    }

    pub fn from_geometry(geometry: &Geometry) -> Self {
        Self::new(geometry.width, geometry.height)
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Window size for the current scale, saturating at `u32::MAX`
    pub fn window_size(&self) -> WindowDimensions {
        WindowDimensions::new(
            self.width.saturating_mul(self.scale),
            self.height.saturating_mul(self.scale),
        )
    }

    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale.saturating_add(1));
    }

    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale.saturating_sub(1));
    }

    fn set_scale(&mut self, scale: u32) {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_at_scale_one() {
        let ctx = DisplayContext::new(800, 480);
        assert_eq!(ctx.scale(), 1);
        assert_eq!(ctx.window_size(), WindowDimensions::new(800, 480));
    }

    #[test]
    fn test_from_geometry() {
        let ctx = DisplayContext::from_geometry(&Geometry::new(320, 240, 16));
        assert_eq!(ctx.width, 320);
        assert_eq!(ctx.height, 240);
    }

    #[test]
    fn test_zoom_in_doubles_window() {
        let mut ctx = DisplayContext::new(800, 480);
        ctx.zoom_in();
        assert_eq!(ctx.scale(), 2);
        assert_eq!(ctx.window_size(), WindowDimensions::new(1600, 960));
    }

    #[test]
    fn test_zoom_in_clamps_at_max() {
        let mut ctx = DisplayContext::new(100, 50);
        for _ in 0..MAX_SCALE + 2 {
            ctx.zoom_in();
        }
        assert_eq!(ctx.scale(), MAX_SCALE);
        assert_eq!(ctx.window_size(), WindowDimensions::new(800, 400));
    }

    #[test]
    fn test_zoom_out_clamps_at_min() {
        let mut ctx = DisplayContext::new(800, 480);
        for _ in 0..3 {
            ctx.zoom_out();
        }
        assert_eq!(ctx.scale(), MIN_SCALE);
        assert_eq!(ctx.window_size(), WindowDimensions::new(800, 480));
    }

    #[test]
    fn test_scale_stays_in_range() {
        let mut ctx = DisplayContext::new(64, 32);
        // Deterministic mixed sequence of zooms
        for i in 0..200u32 {
            if (i * 7 + i / 3) % 5 < 3 {
                ctx.zoom_in();
            } else {
                ctx.zoom_out();
            }
            assert!((MIN_SCALE..=MAX_SCALE).contains(&ctx.scale()));
            assert_eq!(
                ctx.window_size(),
                WindowDimensions::new(64 * ctx.scale(), 32 * ctx.scale())
            );
        }
    }

    #[test]
    fn test_window_size_saturates() {
        let mut ctx = DisplayContext::new(u32::MAX / 2, 10);
        ctx.zoom_in();
        ctx.zoom_in();
        assert_eq!(ctx.window_size(), WindowDimensions::new(u32::MAX, 30));
    }
}
