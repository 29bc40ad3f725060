/*
 *  error.rs
 *
 *  MClock - pigment wheels on an 8x8 matrix
 *  (c) 2020-26 Stuart Hunter
 *
 *  Crate level error type
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

use thiserror::Error;

use crate::config::ConfigError;
use crate::display::DisplayError;

/// Everything a render cycle or its collaborators can fail with.
#[derive(Debug, Error)]
pub enum ClockError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("display error: {0}")]
    Display(#[from] DisplayError),
    #[error("invalid time of day {hour:02}:{minute:02}:{second:02}")]
    InvalidTime { hour: u32, minute: u32, second: u32 },
}

pub type ClockResult<T> = Result<T, ClockError>;
