/*
 *  lib.rs
 *
 *  MClock - pigment wheels on an 8x8 matrix
 *  (c) 2020-26 Stuart Hunter
 *
 *  An analog clock of three translucent pigment wheels, rendered at 64x64
 *  and filtered down onto an 8x8 RGB matrix.
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

pub mod angles;
pub mod canvas;
pub mod compositor;
pub mod config;
pub mod display;
pub mod downsample;
pub mod error;
pub mod hands;
pub mod pacer;
pub mod render;
pub mod time_source;

pub use angles::{hand_angles, HandAngles, TimeOfDay};
pub use canvas::Canvas;
pub use config::{ClockConfig, ConfigError, Settings};
pub use display::{DisplayError, DisplaySink};
pub use downsample::{DownsamplePolicy, Grid};
pub use error::{ClockError, ClockResult};
pub use render::ClockRenderer;
pub use time_source::{FixedClock, LocalClock, TimeSource};

/// Shown at start-up and by `--credits`.
pub const CREDITS: &str = "M Clock 2.0 / by Guido van Rossum / after a design by Rob Juda";
