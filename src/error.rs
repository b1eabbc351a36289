use std::io;

use thiserror::Error;

/// Every failure the viewer can hit. All of them are fatal.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("device path is {len} bytes, at most {max} are allowed")]
    DevicePathTooLong { len: usize, max: usize },

    #[error("failed to open framebuffer device {path}")]
    DeviceOpen {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to get framebuffer info from {path}")]
    DeviceQuery {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("unsupported color depth: {bits_per_pixel} bpp (supported: 16, 32)")]
    UnsupportedDepth { bits_per_pixel: u32 },

    #[error("failed to map {len} bytes of framebuffer memory")]
    Mapping {
        len: usize,
        #[source]
        source: io::Error,
    },

    #[error("display subsystem error: {0}")]
    DisplayInit(String),

    #[error("window creation error: {0}")]
    WindowCreate(String),

    #[error("renderer creation error: {0}")]
    RendererCreate(String),

    #[error("texture creation error: {0}")]
    TextureCreate(String),

    #[error("render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, ViewerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_io_source_is_chained() {
        let err = ViewerError::DeviceOpen {
            path: "/dev/fb7".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(err.to_string(), "failed to open framebuffer device /dev/fb7");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_backend_text_is_reported() {
        let err = ViewerError::TextureCreate("too big".to_string());
        assert_eq!(err.to_string(), "texture creation error: too big");
    }

    #[test]
    fn test_unsupported_depth_message() {
        let err = ViewerError::UnsupportedDepth { bits_per_pixel: 24 };
        assert!(err.to_string().contains("24 bpp"));
    }
}
