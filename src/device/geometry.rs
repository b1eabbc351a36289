use crate::error::{Result, ViewerError};

/// Framebuffer geometry as reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Visible width in pixels
    pub width: u32,
    /// Visible height in pixels
    pub height: u32,
    /// Color depth
    pub bits_per_pixel: u32,
}

impl Geometry {
    pub fn new(width: u32, height: u32, bits_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            bits_per_pixel,
        }
    }

    /// Whole bytes per pixel (integer division, like the kernel reports it)
    pub fn bytes_per_pixel(&self) -> u32 {
        self.bits_per_pixel / 8
    }

    /// Bytes per row of pixel data, saturating at `u32::MAX`
    pub fn stride(&self) -> u32 {
        self.width.saturating_mul(self.bytes_per_pixel())
    }

    /// Bytes per row, or `None` when a row does not fit a 32-bit pitch
    pub fn checked_stride(&self) -> Option<u32> {
        self.width.checked_mul(self.bytes_per_pixel())
    }

    /// Total pixel count
    pub fn pixel_count(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Length of the memory mapping: `width * height * bytes_per_pixel`
    pub fn mapping_len(&self) -> usize {
        self.pixel_count()
            .saturating_mul(self.bytes_per_pixel() as usize)
    }

    /// Mapping length, or `None` when the row pitch or the total overflows
    pub fn checked_mapping_len(&self) -> Option<usize> {
        let stride = self.checked_stride()?;
        (stride as usize).checked_mul(self.height as usize)
    }

    /// Pixel format matching this depth
    pub fn pixel_format(&self) -> Result<PixelFormat> {
        PixelFormat::from_depth(self.bits_per_pixel)
    }
}

/// Supported pixel layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 16 bpp, 5-6-5 packed little-endian
    Rgb565,
    /// 32 bpp, bytes B G R A in memory
    Argb8888,
}

impl PixelFormat {
    pub fn from_depth(bits_per_pixel: u32) -> Result<Self> {
        match bits_per_pixel {
            16 => Ok(PixelFormat::Rgb565),
            32 => Ok(PixelFormat::Argb8888),
            other => Err(ViewerError::UnsupportedDepth {
                bits_per_pixel: other,
            }),
        }
    }

    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            PixelFormat::Rgb565 => 2,
            PixelFormat::Argb8888 => 4,
        }
    }

    /// Texture format the pixels are streamed into
    pub fn texture_format(&self) -> wgpu::TextureFormat {
        match self {
            // No packed 5-6-5 texture format exists; the shader unpacks it.
            PixelFormat::Rgb565 => wgpu::TextureFormat::R16Uint,
            PixelFormat::Argb8888 => wgpu::TextureFormat::Bgra8Unorm,
        }
    }
}
