/*
 *  time_source.rs
 *
 *  MClock - pigment wheels on an 8x8 matrix
 *  (c) 2020-26 Stuart Hunter
 *
 *  Where each cycle gets its hour, minute and second
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

use chrono::{Local, Timelike};

use crate::angles::TimeOfDay;
use crate::error::ClockResult;

pub trait TimeSource {
    fn now(&mut self) -> ClockResult<TimeOfDay>;
}

/// Wall clock in the local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl TimeSource for LocalClock {
    fn now(&mut self) -> ClockResult<TimeOfDay> {
        let t = Local::now();
        TimeOfDay::new(t.hour(), t.minute(), t.second())
    }
}

/// A pinned instant, optionally stepping one second per read.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    time: TimeOfDay,
    advance: bool,
}

impl FixedClock {
    pub fn new(time: TimeOfDay) -> Self {
        Self { time, advance: false }
    }

    pub fn ticking(time: TimeOfDay) -> Self {
        Self { time, advance: true }
    }
}

impl TimeSource for FixedClock {
    fn now(&mut self) -> ClockResult<TimeOfDay> {
        let t = self.time;
        if self.advance {
            self.time = t.succ();
        }
        Ok(t)
    }
}
