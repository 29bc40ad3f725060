/*
 *  display/drivers/framebuffer.rs
 *
 *  MClock - pigment wheels on an 8x8 matrix
 *  (c) 2020-26 Stuart Hunter
 *
 *  Sense HAT LED matrix through its Linux framebuffer
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use log::{debug, info};

use crate::display::error::DisplayError;
use crate::display::traits::{check_grid, check_rotation, DisplaySink};
use crate::downsample::{Grid, GRID_SIZE};

/// Name the rpisense-fb driver reports in sysfs.
pub const SENSE_HAT_FB_NAME: &str = "RPi-Sense FB";

/// Bytes in one 8x8 RGB565 frame.
pub const FRAME_BYTES: usize = GRID_SIZE * GRID_SIZE * 2;

/// Pack a colour into the HAT's little-endian RGB565.
pub fn rgb565(c: Rgb888) -> u16 {
    ((c.r() as u16 >> 3) << 11) | ((c.g() as u16 >> 2) << 5) | (c.b() as u16 >> 3)
}

/// Scan `/sys/class/graphics` for the Sense HAT framebuffer.
pub fn find_sense_hat(sysfs: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(sysfs).ok()?;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.starts_with("fb") {
            continue;
        }
        if let Ok(label) = fs::read_to_string(entry.path().join("name")) {
            if label.trim() == SENSE_HAT_FB_NAME {
                return Some(PathBuf::from("/dev").join(name.as_ref()));
            }
        }
    }
    None
}

pub struct FramebufferSink {
    path: PathBuf,
    file: File,
    rotation: u16,
}

impl FramebufferSink {
    /// Open an explicit framebuffer device (or any writable file).
    pub fn open(path: impl AsRef<Path>, rotation: u16) -> Result<Self, DisplayError> {
        let rotation = check_rotation(rotation)?;
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().write(true).open(&path)?;
        info!("Sense HAT framebuffer {} (rotation {})", path.display(), rotation);
        Ok(Self { path, file, rotation })
    }

    /// Locate the HAT through sysfs and open it.
    pub fn discover(rotation: u16) -> Result<Self, DisplayError> {
        let path = find_sense_hat(Path::new("/sys/class/graphics")).ok_or_else(|| {
            DisplayError::DeviceNotFound(format!("no framebuffer named '{}'", SENSE_HAT_FB_NAME))
        })?;
        Self::open(path, rotation)
    }

    /// The frame as it will be written to the device.
    pub fn encode(&self, grid: &Grid) -> Vec<u8> {
        let turned = grid.rotated(self.rotation);
        let mut bytes = Vec::with_capacity(FRAME_BYTES);
        for c in turned.as_slice() {
            bytes.extend_from_slice(&rgb565(*c).to_le_bytes());
        }
        bytes
    }
}

impl DisplaySink for FramebufferSink {
    fn name(&self) -> &str { "framebuffer" }

    fn set_grid(&mut self, grid: Grid) -> Result<(), DisplayError> {
        check_grid(&grid, GRID_SIZE)?;
        let bytes = self.encode(&grid);
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&bytes)?;
        self.file.flush()?;
        debug!("wrote {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let p = std::env::temp_dir().join(format!("mclock-{}-{}", name, std::process::id()));
        let _ = fs::remove_file(&p);
        File::create(&p).unwrap();
        p
    }

    #[test]
    fn packs_rgb565() {
        assert_eq!(rgb565(Rgb888::WHITE), 0xFFFF);
        assert_eq!(rgb565(Rgb888::BLACK), 0);
        assert_eq!(rgb565(Rgb888::RED), 0xF800);
        assert_eq!(rgb565(Rgb888::GREEN), 0x07E0);
        assert_eq!(rgb565(Rgb888::BLUE), 0x001F);
    }

    #[test]
    fn writes_whole_frames_from_the_start() {
        let path = scratch("fb");
        let mut sink = FramebufferSink::open(&path, 0).unwrap();
        let mut g = Grid::new(8);
        g.set(1, 0, Rgb888::RED);
        sink.set_grid(g.clone()).unwrap();
        sink.set_grid(g).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes.len(), FRAME_BYTES);
        assert_eq!(&bytes[2..4], &0xF800u16.to_le_bytes());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn rotation_moves_pixels() {
        let path = scratch("fb-rot");
        let sink = FramebufferSink::open(&path, 90).unwrap();
        let mut g = Grid::new(8);
        g.set(0, 0, Rgb888::BLUE);
        let bytes = sink.encode(&g);
        // top-left turns to top-right
        assert_eq!(&bytes[14..16], &0x001Fu16.to_le_bytes());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn bad_rotation_is_rejected() {
        let path = scratch("fb-bad");
        assert!(matches!(
            FramebufferSink::open(&path, 45),
            Err(DisplayError::InvalidRotation(45))
        ));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn finds_the_hat_in_sysfs() {
        let root = std::env::temp_dir().join(format!("mclock-sysfs-{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("fb0")).unwrap();
        fs::create_dir_all(root.join("fb1")).unwrap();
        fs::write(root.join("fb0/name"), "simple\n").unwrap();
        fs::write(root.join("fb1/name"), "RPi-Sense FB\n").unwrap();

        assert_eq!(find_sense_hat(&root), Some(PathBuf::from("/dev/fb1")));
        fs::remove_dir_all(&root).ok();
        assert_eq!(find_sense_hat(&root), None);
    }
}
