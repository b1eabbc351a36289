pub mod controller;
pub mod display_context;
pub mod gpu_context;
pub mod input_adapter;
pub mod surface_renderer;
pub mod window;

pub use controller::*;
pub use display_context::*;
pub use gpu_context::*;
pub use input_adapter::*;
pub use surface_renderer::*;
pub use window::*;
