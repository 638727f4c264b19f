//! Screenshot capture (spec §6.6): PNG export of one back-buffer render
//! target layer, RGBA8, row-major, top-left origin.
//!
//! Grounded on `original_source`'s `BBImage` (equivalent row-major RGBA8 PNG
//! write) and spec §6.6's exact statement that this is implemented with the
//! `image` crate's `RgbaImage` encoder — readback of the live render target
//! itself is out of scope (no Vulkan device), so this takes the already
//!-resolved pixel buffer as input.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgba};

use crate::error::{EngineError, Result};

pub const SCREENSHOT_DIR: &str = "screenshots";

/// Encodes `pixels` (row-major, top-left origin, 4 bytes per pixel) as
/// `screenshots/<name>.png` relative to `cwd`.
pub fn capture(cwd: &Path, name: &str, width: u32, height: u32, pixels: &[u8]) -> Result<PathBuf> {
    let expected_len = (width as usize) * (height as usize) * 4;
    if pixels.len() != expected_len {
        return Err(EngineError::CapacityExceeded {
            what: "screenshot pixel buffer",
            capacity: expected_len,
        });
    }

    let dir = cwd.join(SCREENSHOT_DIR);
    fs::create_dir_all(&dir).map_err(|e| EngineError::ReadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;

    let path = dir.join(format!("{}.png", name));
    let image: ImageBuffer<Rgba<u8>, &[u8]> = ImageBuffer::from_raw(width, height, pixels)
        .expect("pixel buffer length was validated against width*height*4 above");
    image.save(&path).map_err(|e| EngineError::ReadFailed {
        path: path.clone(),
        message: e.to_string(),
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_png_of_expected_size() {
        let dir = std::env::temp_dir().join("forge-engine-screenshot-test");
        fs::create_dir_all(&dir).ok();
        let pixels = vec![0u8; 4 * 4 * 4];
        let path = capture(&dir, "frame0", 4, 4, &pixels).unwrap();
        assert!(path.exists());
        fs::remove_dir_all(dir.join(SCREENSHOT_DIR)).ok();
    }

    #[test]
    fn mismatched_buffer_length_is_rejected() {
        let dir = std::env::temp_dir().join("forge-engine-screenshot-test-bad");
        fs::create_dir_all(&dir).ok();
        let pixels = vec![0u8; 3];
        assert!(capture(&dir, "bad", 4, 4, &pixels).is_err());
    }
}
