pub mod framebuffer;
pub mod geometry;
pub mod path;

pub use framebuffer::*;
pub use geometry::*;
pub use path::*;
