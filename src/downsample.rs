/*
 *  downsample.rs
 *
 *  MClock - pigment wheels on an 8x8 matrix
 *  (c) 2020-26 Stuart Hunter
 *
 *  Reduce the dial raster to the LED matrix
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

use std::fmt;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;

/// Side of the Sense HAT matrix.
pub const GRID_SIZE: usize = 8;

/// Low resolution output, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Rgb888>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self { size, cells: vec![Rgb888::BLACK; size * size] }
    }

    pub fn size(&self) -> usize { self.size }

    pub fn get(&self, col: usize, row: usize) -> Option<Rgb888> {
        if col < self.size && row < self.size {
            Some(self.cells[row * self.size + col])
        } else {
            None
        }
    }

    pub fn set(&mut self, col: usize, row: usize, color: Rgb888) {
        if col < self.size && row < self.size {
            self.cells[row * self.size + col] = color;
        }
    }

    pub fn as_slice(&self) -> &[Rgb888] { &self.cells }

    pub fn rows(&self) -> impl Iterator<Item = &[Rgb888]> {
        self.cells.chunks(self.size.max(1))
    }

    /// Copy turned clockwise by a multiple of 90 degrees.
    pub fn rotated(&self, degrees: u16) -> Grid {
        let n = self.size;
        let mut out = Grid::new(n);
        for row in 0..n {
            for col in 0..n {
                let (c, r) = match degrees % 360 {
                    90 => (n - 1 - row, col),
                    180 => (n - 1 - col, n - 1 - row),
                    270 => (row, n - 1 - col),
                    _ => (col, row),
                };
                out.cells[r * n + c] = self.cells[row * n + col];
            }
        }
        out
    }
}

/// How one block of canvas pixels becomes one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DownsamplePolicy {
    /// Distance weighted mean, brightened by dividing the weight total by `dim`.
    CentralityWeighted { dim: f32 },
    /// Plain integer mean.
    FlatAverage,
    /// A single random pixel from the block.
    RandomPick { seed: Option<u64> },
}

impl Default for DownsamplePolicy {
    fn default() -> Self {
        DownsamplePolicy::CentralityWeighted { dim: 0.6 }
    }
}

impl fmt::Display for DownsamplePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownsamplePolicy::CentralityWeighted { dim } => write!(f, "weighted(dim={dim})"),
            DownsamplePolicy::FlatAverage => write!(f, "flat"),
            DownsamplePolicy::RandomPick { seed: Some(s) } => write!(f, "random(seed={s})"),
            DownsamplePolicy::RandomPick { seed: None } => write!(f, "random"),
        }
    }
}

/// Block side: the radius split into `grid_size / 2` steps.
pub fn block_size(radius: u32, grid_size: usize) -> usize {
    radius as usize / (grid_size / 2).max(1)
}

pub fn downsample(canvas: &Canvas, grid_size: usize, policy: &DownsamplePolicy) -> Grid {
    let block = block_size(canvas.radius(), grid_size);
    let mut grid = Grid::new(grid_size);
    if block == 0 {
        return grid;
    }

    let mut rng = match policy {
        DownsamplePolicy::RandomPick { seed: Some(s) } => Some(StdRng::seed_from_u64(*s)),
        DownsamplePolicy::RandomPick { seed: None } => Some(StdRng::from_os_rng()),
        _ => None,
    };

    for row in 0..grid_size {
        for col in 0..grid_size {
            let block_px = BlockView { canvas, x0: col * block, y0: row * block, block };
            let color = match (policy, rng.as_mut()) {
                (DownsamplePolicy::CentralityWeighted { dim }, _) => weighted_average(&block_px, *dim),
                (DownsamplePolicy::RandomPick { .. }, Some(rng)) => random_pick(&block_px, rng),
                _ => flat_average(&block_px),
            };
            grid.set(col, row, color);
        }
    }
    debug!("downsampled {}px canvas to {}x{} with {}", canvas.side(), grid_size, grid_size, policy);
    grid
}

struct BlockView<'a> {
    canvas: &'a Canvas,
    x0: usize,
    y0: usize,
    block: usize,
}

impl BlockView<'_> {
    /// (local x, local y, colour) for every pixel in the block.
    fn pixels(&self) -> impl Iterator<Item = (usize, usize, Rgb888)> + '_ {
        (0..self.block).flat_map(move |y| {
            (0..self.block).map(move |x| {
                let c = self.canvas.pixel(self.x0 + x, self.y0 + y).unwrap_or(Rgb888::BLACK);
                (x, y, c)
            })
        })
    }
}

fn flat_average(block: &BlockView<'_>) -> Rgb888 {
    let (mut r, mut g, mut b, mut count) = (0u32, 0u32, 0u32, 0u32);
    for (_, _, c) in block.pixels() {
        r += c.r() as u32;
        g += c.g() as u32;
        b += c.b() as u32;
        count += 1;
    }
    if count == 0 {
        return Rgb888::BLACK;
    }
    Rgb888::new((r / count) as u8, (g / count) as u8, (b / count) as u8)
}

/// Each pixel weighs its distance from the block's (integer) centre. The
/// weighted sums are divided by `total / dim`, so dim < 1 brightens.
fn weighted_average(block: &BlockView<'_>, dim: f32) -> Rgb888 {
    let mid = (block.block / 2) as f64;
    let mut acc = [0f64; 3];
    let mut total = 0f64;

    for (x, y, c) in block.pixels() {
        let w = (x as f64 - mid).hypot(y as f64 - mid);
        acc[0] += w * c.r() as f64;
        acc[1] += w * c.g() as f64;
        acc[2] += w * c.b() as f64;
        total += w;
    }

    if total <= 0.0 {
        // single pixel block: no weight to share out
        return flat_average(block);
    }

    let denom = total / dim as f64;
    let channel = |v: f64| (v / denom).floor().clamp(0.0, 255.0) as u8;
    Rgb888::new(channel(acc[0]), channel(acc[1]), channel(acc[2]))
}

fn random_pick(block: &BlockView<'_>, rng: &mut StdRng) -> Rgb888 {
    let x = rng.random_range(0..block.block);
    let y = rng.random_range(0..block.block);
    block.canvas.pixel(block.x0 + x, block.y0 + y).unwrap_or(Rgb888::BLACK)
}
