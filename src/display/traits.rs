/*
 *  display/traits.rs
 *
 *  MClock - pigment wheels on an 8x8 matrix
 *  (c) 2020-26 Stuart Hunter
 *
 *  Core trait definitions for the LED matrix sinks
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

use crate::display::error::DisplayError;
use crate::downsample::Grid;

/// Anything that can show one low resolution frame per tick.
///
/// Sinks receive a fully populated grid each cycle and own any mapping onto
/// real hardware (pixel order, colour depth, rotation). There are no partial
/// updates.
pub trait DisplaySink {
    /// Short name for logging
    fn name(&self) -> &str;

    /// Grid side the sink expects
    fn grid_size(&self) -> usize {
        crate::downsample::GRID_SIZE
    }

    /// Show a frame, replacing whatever was there.
    fn set_grid(&mut self, grid: Grid) -> Result<(), DisplayError>;

    /// Blank the display (all pixels off).
    fn clear(&mut self) -> Result<(), DisplayError> {
        let n = self.grid_size();
        self.set_grid(Grid::new(n))
    }
}

/// Validates a sink rotation; the matrix can only be turned in right angles.
pub fn check_rotation(degrees: u16) -> Result<u16, DisplayError> {
    match degrees {
        0 | 90 | 180 | 270 => Ok(degrees),
        _ => Err(DisplayError::InvalidRotation(degrees)),
    }
}

/// Rejects a grid whose side is not what the sink drives.
pub fn check_grid(grid: &Grid, expected: usize) -> Result<(), DisplayError> {
    if grid.size() != expected {
        return Err(DisplayError::GridSizeMismatch { expected, actual: grid.size() });
    }
    Ok(())
}
