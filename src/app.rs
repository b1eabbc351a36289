use log::debug;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::WindowId,
};

use crate::core::{DisplayContext, SurfaceRenderer, WindowDimensions, WinitController};
use crate::device::{Framebuffer, Geometry, PixelFormat};
use crate::error::{Result, ViewerError};
use crate::viewer::{LoopState, Viewer};

/// Winit application driving the viewer
pub struct App<'fb> {
    viewer: Viewer<'fb, SurfaceRenderer>,
    controller: WinitController,
    geometry: Geometry,
    format: PixelFormat,
    failure: Option<ViewerError>,
}

impl<'fb> App<'fb> {
    pub fn new(framebuffer: &'fb Framebuffer) -> Self {
        let geometry = framebuffer.geometry();
        Self {
            viewer: Viewer::new(framebuffer.view(), DisplayContext::from_geometry(&geometry)),
            controller: WinitController::new(),
            geometry,
            format: framebuffer.pixel_format(),
            failure: None,
        }
    }

    /// Outcome of the run: the first fatal error, if any
    pub fn into_result(self) -> Result<()> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ViewerError) {
        debug!("Fatal: {}", err);
        self.viewer.terminate();
        self.failure.get_or_insert(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.has_window() || !self.viewer.is_running() {
            return;
        }

        match SurfaceRenderer::new(event_loop, self.geometry, self.format) {
            Ok(renderer) => self.viewer.attach(renderer),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if !self.viewer.is_running() {
            return;
        }

        if let Some(input) = self.controller.process_event(&event) {
            if self.viewer.handle_input(input) == LoopState::Terminated {
                event_loop.exit();
            }
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                self.viewer
                    .surface_resized(WindowDimensions::new(size.width, size.height));
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.viewer.render() {
                    self.fail(event_loop, ViewerError::Render(e.to_string()));
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.viewer.request_redraw();
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Release the surface while the display connection is still alive
        self.viewer.terminate();
    }
}

/// Open the display and run the render loop until the window is closed.
///
/// The framebuffer outlives everything created here, so the mapping and the
/// device handle are released last.
pub fn run(framebuffer: &Framebuffer) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|e| ViewerError::DisplayInit(e.to_string()))?;
    let mut app = App::new(framebuffer);

    event_loop
        .run_app(&mut app)
        .map_err(|e| ViewerError::DisplayInit(e.to_string()))?;

    app.into_result()
}
