/*
 *  display/drivers/terminal.rs
 *
 *  MClock - pigment wheels on an 8x8 matrix
 *  (c) 2020-26 Stuart Hunter
 *
 *  Truecolor terminal sink, the desktop stand-in for the matrix
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

use std::io::Write;

use embedded_graphics::prelude::*;

use crate::display::error::DisplayError;
use crate::display::traits::{check_grid, DisplaySink};
use crate::downsample::{Grid, GRID_SIZE};

const RESET: &str = "\x1b[0m";

/// Paints each cell as two background-coloured spaces, redrawing in place.
pub struct TerminalSink<W: Write> {
    out: W,
    size: usize,
    drawn: bool,
}

impl TerminalSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, size: GRID_SIZE, drawn: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySink for TerminalSink<W> {
    fn name(&self) -> &str { "terminal" }

    fn grid_size(&self) -> usize { self.size }

    fn set_grid(&mut self, grid: Grid) -> Result<(), DisplayError> {
        check_grid(&grid, self.size)?;
        let mut frame = String::with_capacity(self.size * self.size * 24);
        if self.drawn {
            // back up over the previous frame
            frame.push_str(&format!("\x1b[{}A", self.size));
        }
        for row in grid.rows() {
            for c in row {
                frame.push_str(&format!("\x1b[48;2;{};{};{}m  ", c.r(), c.g(), c.b()));
            }
            frame.push_str(RESET);
            frame.push('\n');
        }
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        self.drawn = true;
        Ok(())
    }
}
