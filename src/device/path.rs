use std::fmt;
use std::path::Path;

use crate::error::{Result, ViewerError};

/// Prefix for bare framebuffer ids
pub const DEFAULT_FB_PATH: &str = "/dev/fb";
/// Id used when no argument is given
pub const DEFAULT_FB_ID: &str = "0";
/// Arguments with this prefix are taken as full paths
pub const DEVICE_DIR_PREFIX: &str = "/dev/";
/// Longest accepted path in bytes (a 64-byte C buffer minus its terminator)
pub const MAX_PATH_LEN: usize = 63;

/// Resolved framebuffer device path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePath(String);

impl DevicePath {
    /// Turn the optional command-line argument into a device path.
    ///
    /// - `None` resolves to `/dev/fb0`
    /// - anything starting with `/dev/` is used verbatim
    /// - anything else is an id appended to `/dev/fb`
    ///
    /// The id is not validated; a bogus one fails later when the device is
    /// opened.
    pub fn resolve(arg: Option<&str>) -> Result<Self> {
        let path = match arg {
            Some(full) if full.starts_with(DEVICE_DIR_PREFIX) => full.to_string(),
            Some(id) => format!("{}{}", DEFAULT_FB_PATH, id),
            None => format!("{}{}", DEFAULT_FB_PATH, DEFAULT_FB_ID),
        };

        if path.len() > MAX_PATH_LEN {
            return Err(ViewerError::DevicePathTooLong {
                len: path.len(),
                max: MAX_PATH_LEN,
            });
        }

        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Id shown in the geometry line: whatever follows the last `b`.
    pub fn display_id(&self) -> &str {
        match self.0.rfind('b') {
            Some(idx) => &self.0[idx + 1..],
            None => "?",
        }
    }
}

impl fmt::Display for DevicePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
