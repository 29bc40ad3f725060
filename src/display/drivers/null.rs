/*
 *  display/drivers/null.rs
 *
 *  MClock - pigment wheels on an 8x8 matrix
 *  (c) 2020-26 Stuart Hunter
 *
 *  Sink that drops every frame, for headless timing runs
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

use log::trace;

use crate::display::error::DisplayError;
use crate::display::traits::{check_grid, DisplaySink};
use crate::downsample::{Grid, GRID_SIZE};

#[derive(Debug, Default)]
pub struct NullSink {
    frames: u64,
}

impl NullSink {
    pub fn new() -> Self { Self::default() }
}

impl DisplaySink for NullSink {
    fn name(&self) -> &str { "null" }

    fn set_grid(&mut self, grid: Grid) -> Result<(), DisplayError> {
        check_grid(&grid, GRID_SIZE)?;
        self.frames += 1;
        trace!("null sink dropped frame {}", self.frames);
        Ok(())
    }
}
