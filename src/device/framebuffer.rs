//! Framebuffer device mapping
//!
//! Opens a Linux fbdev node, reads its geometry with `FBIOGET_VSCREENINFO`
//! and maps the pixel memory shared read/write into the process. The mapping
//! is written by the device's driver at any time; readers go through
//! [`PixelView`], which makes no attempt to synchronize with those writes.

use std::fs::{File, OpenOptions};
use std::io;
use std::marker::PhantomData;
use std::os::unix::io::AsRawFd;
use std::ptr::NonNull;

use bytemuck::Zeroable;
use log::debug;

use super::geometry::{Geometry, PixelFormat};
use super::path::DevicePath;
use crate::error::{Result, ViewerError};

/// IOCTL request for variable screen info
const FBIOGET_VSCREENINFO: libc::c_ulong = 0x4600;

/// `struct fb_var_screeninfo` from `<linux/fb.h>`
#[repr(C)]
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, Zeroable)]
struct FbVarScreenInfo {
    xres: u32,
    yres: u32,
    xres_virtual: u32,
    yres_virtual: u32,
    xoffset: u32,
    yoffset: u32,
    bits_per_pixel: u32,
    grayscale: u32,
    red: FbBitField,
    green: FbBitField,
    blue: FbBitField,
    transp: FbBitField,
    nonstd: u32,
    activate: u32,
    height: u32,
    width: u32,
    accel_flags: u32,
    pixclock: u32,
    left_margin: u32,
    right_margin: u32,
    upper_margin: u32,
    lower_margin: u32,
    hsync_len: u32,
    vsync_len: u32,
    sync: u32,
    vmode: u32,
    rotate: u32,
    colorspace: u32,
    reserved: [u32; 4],
}

#[repr(C)]
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, Zeroable)]
struct FbBitField {
    offset: u32,
    length: u32,
    msb_right: u32,
}

/// An open framebuffer device with its pixel memory mapped.
///
/// Dropping it unmaps the memory and then closes the device, in that order.
pub struct Framebuffer {
    mmap: NonNull<u8>,
    mmap_len: usize,
    geometry: Geometry,
    format: PixelFormat,
    path: DevicePath,
    // Declared last: closed after `Drop::drop` has unmapped.
    file: File,
}

impl Framebuffer {
    /// Open the device, query its geometry and map its pixel memory
    pub fn open(path: DevicePath) -> Result<Self> {
        println!("Opening device: {}", path);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path.as_path())
            .map_err(|source| ViewerError::DeviceOpen {
                path: path.to_string(),
                source,
            })?;

        let geometry = query_geometry(&file).map_err(|source| ViewerError::DeviceQuery {
            path: path.to_string(),
            source,
        })?;

        println!(
            "fb{} {}x{}, {} bpp",
            path.display_id(),
            geometry.width,
            geometry.height,
            geometry.bits_per_pixel
        );

        Self::map(file, path, geometry)
    }

    /// Map `geometry.mapping_len()` bytes of an already open handle.
    ///
    /// On failure the handle is dropped (closed) before returning.
    pub fn map(file: File, path: DevicePath, geometry: Geometry) -> Result<Self> {
        let format = geometry.pixel_format()?;
        let mmap_len = geometry
            .checked_mapping_len()
            .ok_or_else(|| ViewerError::Mapping {
                len: geometry.mapping_len(),
                source: io::Error::from_raw_os_error(libc::EOVERFLOW),
            })?;

        if mmap_len == 0 {
            return Err(ViewerError::Mapping {
                len: 0,
                source: io::Error::from_raw_os_error(libc::EINVAL),
            });
        }

        let mmap = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                mmap_len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                0,
            )
        };

        if mmap == libc::MAP_FAILED {
            return Err(ViewerError::Mapping {
                len: mmap_len,
                source: io::Error::last_os_error(),
            });
        }

        let mmap = NonNull::new(mmap as *mut u8).ok_or_else(|| ViewerError::Mapping {
            len: mmap_len,
            source: io::Error::from_raw_os_error(libc::EFAULT),
        })?;

        debug!(
            "Mapped {} bytes of {} as {:?} at {:p}",
            mmap_len, path, format, mmap
        );

        Ok(Self {
            mmap,
            mmap_len,
            geometry,
            format,
            path,
            file,
        })
    }

    pub fn path(&self) -> &DevicePath {
        &self.path
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    /// Mapping length in bytes
    pub fn len(&self) -> usize {
        self.mmap_len
    }

    pub fn is_empty(&self) -> bool {
        self.mmap_len == 0
    }

    /// Live view of the mapped pixels
    pub fn view(&self) -> PixelView<'_> {
        PixelView {
            ptr: self.mmap.as_ptr(),
            len: self.mmap_len,
            _mapping: PhantomData,
        }
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        let ret = unsafe { libc::munmap(self.mmap.as_ptr() as *mut libc::c_void, self.mmap_len) };
        if ret < 0 {
            log::warn!(
                "munmap of {} failed: {}",
                self.path,
                io::Error::last_os_error()
            );
        }
        debug!("Released {} (fd {})", self.path, self.file.as_raw_fd());
    }
}

fn query_geometry(file: &File) -> io::Result<Geometry> {
    let mut info = FbVarScreenInfo::zeroed();
    let ret = unsafe { libc::ioctl(file.as_raw_fd(), FBIOGET_VSCREENINFO as _, &mut info) };
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(Geometry::new(info.xres, info.yres, info.bits_per_pixel))
}

/// Non-owning view of pixel memory.
///
/// When it comes from a [`Framebuffer`] the memory is shared with the device
/// driver, which keeps writing while we read. Copies are unsynchronized
/// snapshots and may mix two frames; that is accepted for a live viewer.
#[derive(Clone, Copy)]
pub struct PixelView<'a> {
    ptr: *const u8,
    len: usize,
    _mapping: PhantomData<&'a [u8]>,
}

impl<'a> PixelView<'a> {
    /// View over a buffer the caller owns
    pub fn from_slice(pixels: &'a [u8]) -> Self {
        Self {
            ptr: pixels.as_ptr(),
            len: pixels.len(),
            _mapping: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy the current contents into `dst`, returning the bytes copied
    pub fn copy_into(&self, dst: &mut [u8]) -> usize {
        let count = self.len.min(dst.len());
        // SAFETY: `ptr` is valid for `len` bytes for 'a, and `dst` is a
        // distinct Rust allocation so the ranges cannot overlap.
        unsafe {
            std::ptr::copy_nonoverlapping(self.ptr, dst.as_mut_ptr(), count);
        }
        count
    }
}

impl std::fmt::Debug for PixelView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelView")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .finish()
    }
}
