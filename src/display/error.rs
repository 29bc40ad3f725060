/*
 *  display/error.rs
 *
 *  MClock - pigment wheels on an 8x8 matrix
 *  (c) 2020-26 Stuart Hunter
 *
 *  Error type for the display sinks
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

use std::error::Error;
use std::fmt;

/// Unified error type for all sink operations
#[derive(Debug)]
pub enum DisplayError {
    /// Device could not be opened or written
    Io(std::io::Error),

    /// No matrix framebuffer found
    DeviceNotFound(String),

    /// Invalid rotation angle
    InvalidRotation(u16),

    /// Grid side differs from what the sink drives
    GridSizeMismatch { expected: usize, actual: usize },

    /// Generic error with message
    Other(String),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::Io(err) =>
                write!(f, "Display I/O error: {}", err),
            DisplayError::DeviceNotFound(msg) =>
                write!(f, "Display device not found: {}", msg),
            DisplayError::InvalidRotation(degrees) =>
                write!(f, "Invalid rotation angle: {} (must be 0, 90, 180, or 270)", degrees),
            DisplayError::GridSizeMismatch { expected, actual } =>
                write!(f, "Grid size mismatch: expected {}x{0}, got {}x{1}", expected, actual),
            DisplayError::Other(msg) =>
                write!(f, "{}", msg),
        }
    }
}

impl Error for DisplayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DisplayError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DisplayError {
    fn from(err: std::io::Error) -> Self {
        DisplayError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let e = DisplayError::GridSizeMismatch { expected: 8, actual: 4 };
        assert_eq!(e.to_string(), "Grid size mismatch: expected 8x8, got 4x4");
        assert!(DisplayError::InvalidRotation(45).to_string().contains("45"));
    }

    #[test]
    fn io_errors_keep_their_source() {
        let e: DisplayError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(e.source().is_some());
    }
}
