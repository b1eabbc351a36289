pub mod app;
pub mod cli;
pub mod core;
pub mod device;
pub mod error;
pub mod viewer;

pub use error::{Result, ViewerError};
