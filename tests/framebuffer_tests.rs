use std::fs::OpenOptions;
use std::io::Write;
use std::os::unix::fs::FileExt;

use fb_viewer::device::{DevicePath, Framebuffer, Geometry, PixelFormat};
use fb_viewer::ViewerError;

/// Label for mappings of plain files; the path is only used for messages
fn test_path() -> DevicePath {
    DevicePath::resolve(Some("/dev/fb-test")).unwrap()
}

/// Temp file sized for the geometry, opened read/write
fn backing_file(geometry: Geometry) -> (tempfile::NamedTempFile, std::fs::File) {
    let temp = tempfile::NamedTempFile::new().unwrap();
    temp.as_file().set_len(geometry.mapping_len() as u64).unwrap();
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(temp.path())
        .unwrap();
    (temp, file)
}

// ============================================================================
// Open / Query Failures
// ============================================================================

#[test]
fn test_open_missing_device() {
    let path = DevicePath::resolve(Some("/dev/fb-does-not-exist-42")).unwrap();
    match Framebuffer::open(path) {
        Err(ViewerError::DeviceOpen { path, source }) => {
            assert_eq!(path, "/dev/fb-does-not-exist-42");
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        Err(other) => panic!("expected DeviceOpen, got {:?}", other),
        Ok(_) => panic!("opening a missing device succeeded"),
    }
}

#[test]
fn test_query_fails_on_regular_file() {
    let mut temp = tempfile::NamedTempFile::new_in("/tmp").unwrap();
    temp.write_all(&[0u8; 64]).unwrap();

    // A regular file has no framebuffer ioctls; `/dev/` prefix keeps it verbatim
    let arg = format!("/dev/../{}", temp.path().display());
    let path = DevicePath::resolve(Some(&arg)).unwrap();

    match Framebuffer::open(path) {
        Err(ViewerError::DeviceQuery { source, .. }) => {
            assert_eq!(source.raw_os_error(), Some(libc::ENOTTY));
        }
        Err(other) => panic!("expected DeviceQuery, got {:?}", other),
        Ok(_) => panic!("querying a regular file succeeded"),
    }
}

// ============================================================================
// Mapping
// ============================================================================

#[test]
fn test_map_sizes_from_geometry() {
    let geometry = Geometry::new(32, 16, 32);
    let (_temp, file) = backing_file(geometry);

    let framebuffer = Framebuffer::map(file, test_path(), geometry).unwrap();

    assert_eq!(framebuffer.len(), 32 * 16 * 4);
    assert!(!framebuffer.is_empty());
    assert_eq!(framebuffer.view().len(), framebuffer.len());
    assert_eq!(framebuffer.geometry(), geometry);
    assert_eq!(framebuffer.pixel_format(), PixelFormat::Argb8888);
    assert_eq!(framebuffer.path().as_str(), "/dev/fb-test");
}

#[test]
fn test_map_16bpp() {
    let geometry = Geometry::new(20, 10, 16);
    let (_temp, file) = backing_file(geometry);

    let framebuffer = Framebuffer::map(file, test_path(), geometry).unwrap();

    assert_eq!(framebuffer.len(), 20 * 10 * 2);
    assert_eq!(framebuffer.pixel_format(), PixelFormat::Rgb565);
}

#[test]
fn test_view_observes_external_writes() {
    let geometry = Geometry::new(4, 4, 32);
    let (temp, file) = backing_file(geometry);
    let framebuffer = Framebuffer::map(file, test_path(), geometry).unwrap();
    let view = framebuffer.view();

    let mut snapshot = vec![0xAAu8; view.len()];
    view.copy_into(&mut snapshot);
    assert!(snapshot.iter().all(|&b| b == 0));

    // Another writer updates the shared memory behind our back
    let writer = OpenOptions::new().write(true).open(temp.path()).unwrap();
    writer.write_at(&[1, 2, 3, 4], 0).unwrap();
    writer.write_at(&[9, 9], 62).unwrap();

    view.copy_into(&mut snapshot);
    assert_eq!(&snapshot[0..4], &[1, 2, 3, 4]);
    assert_eq!(&snapshot[62..64], &[9, 9]);
}

#[test]
fn test_map_rejects_unsupported_depth() {
    let geometry = Geometry::new(8, 8, 24);
    let (_temp, file) = backing_file(geometry);

    match Framebuffer::map(file, test_path(), geometry) {
        Err(ViewerError::UnsupportedDepth { bits_per_pixel }) => assert_eq!(bits_per_pixel, 24),
        Err(other) => panic!("expected UnsupportedDepth, got {:?}", other),
        Ok(_) => panic!("24 bpp was accepted"),
    }
}

#[test]
fn test_map_rejects_empty_geometry() {
    let geometry = Geometry::new(0, 480, 32);
    let (_temp, file) = backing_file(geometry);

    match Framebuffer::map(file, test_path(), geometry) {
        Err(ViewerError::Mapping { len, source }) => {
            assert_eq!(len, 0);
            assert_eq!(source.raw_os_error(), Some(libc::EINVAL));
        }
        Err(other) => panic!("expected Mapping, got {:?}", other),
        Ok(_) => panic!("empty mapping was accepted"),
    }
}

#[test]
fn test_map_rejects_overflowing_geometry() {
    let (_temp, file) = backing_file(Geometry::new(4, 4, 32));
    let geometry = Geometry::new(u32::MAX, 2, 32);

    match Framebuffer::map(file, test_path(), geometry) {
        Err(ViewerError::Mapping { source, .. }) => {
            assert_eq!(source.raw_os_error(), Some(libc::EOVERFLOW));
        }
        Err(other) => panic!("expected Mapping, got {:?}", other),
        Ok(_) => panic!("overflowing geometry was accepted"),
    }
}

#[test]
fn test_map_fails_on_read_only_handle() {
    let geometry = Geometry::new(4, 4, 32);
    let (temp, _rw) = backing_file(geometry);
    let read_only = OpenOptions::new().read(true).open(temp.path()).unwrap();

    match Framebuffer::map(read_only, test_path(), geometry) {
        Err(ViewerError::Mapping { len, source }) => {
            assert_eq!(len, 64);
            assert_eq!(source.raw_os_error(), Some(libc::EACCES));
        }
        Err(other) => panic!("expected Mapping, got {:?}", other),
        Ok(_) => panic!("shared writable mapping of a read-only handle succeeded"),
    }
}
