/*
 *  angles.rs
 *
 *  MClock - pigment wheels on an 8x8 matrix
 *  (c) 2020-26 Stuart Hunter
 *
 *  Wall clock time to hand angles
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

//! Angles are degrees counter-clockwise from 3 o'clock, so 12 sits at 90°
//! and a hand sweeping clockwise sees its angle decrease.

use std::fmt;

use crate::error::{ClockError, ClockResult};

/// Angle of the 12 o'clock position.
pub const TWELVE_O_CLOCK: f32 = 90.0;

/// A validated time of day, one render cycle's only input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
    second: u32,
}

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32, second: u32) -> ClockResult<Self> {
        if hour > 23 || minute > 59 || second > 59 {
            return Err(ClockError::InvalidTime { hour, minute, second });
        }
        Ok(Self { hour, minute, second })
    }

    pub fn hour(&self) -> u32 { self.hour }
    pub fn minute(&self) -> u32 { self.minute }
    pub fn second(&self) -> u32 { self.second }

    pub fn seconds_since_midnight(&self) -> u32 {
        self.hour * 3600 + self.minute * 60 + self.second
    }

    /// One second later, wrapping at midnight.
    pub fn succ(&self) -> Self {
        let s = (self.seconds_since_midnight() + 1) % 86_400;
        Self { hour: s / 3600, minute: (s / 60) % 60, second: s % 60 }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

impl std::str::FromStr for TimeOfDay {
    type Err = String;

    /// Accepts `HH:MM` or `HH:MM:SS`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(format!("expected HH:MM[:SS], got '{s}'"));
        }
        let mut nums = [0u32; 3];
        for (slot, part) in nums.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| format!("'{part}' is not a number in '{s}'"))?;
        }
        TimeOfDay::new(nums[0], nums[1], nums[2]).map_err(|e| e.to_string())
    }
}

/// Fold any finite angle into [0, 360).
#[inline]
pub fn normalize_degrees(deg: f32) -> f32 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 { 0.0 } else { r }
}

/// The three hand angles of one cycle, all in [0, 360).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAngles {
    pub second: f32,
    pub minute: f32,
    pub hour: f32,
}

impl HandAngles {
    /// Pins the second wheel at the top of the dial.
    pub fn with_frozen_seconds(self) -> Self {
        Self { second: TWELVE_O_CLOCK, ..self }
    }
}

pub fn hand_angles(time: TimeOfDay) -> HandAngles {
    let (h, m, s) = (time.hour as f32, time.minute as f32, time.second as f32);
    HandAngles {
        second: normalize_degrees(TWELVE_O_CLOCK - s * 6.0),
        minute: normalize_degrees(TWELVE_O_CLOCK - (m * 60.0 + s) / 10.0),
        hour: normalize_degrees(TWELVE_O_CLOCK - (h * 3600.0 + m * 60.0 + s) / 120.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> HandAngles {
        hand_angles(TimeOfDay::new(h, m, s).unwrap())
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn known_instants() {
        let noon = at(12, 0, 0);
        assert!(close(noon.minute, 90.0));
        assert!(close(noon.hour, 90.0));
        assert!(close(noon.second, 90.0));

        assert!(close(at(3, 0, 0).hour, 0.0));
        assert!(close(at(0, 0, 30).second, 270.0));
        assert!(close(at(9, 0, 0).hour, 180.0));
    }

    #[test]
    fn half_past_six() {
        let a = at(6, 30, 0);
        assert!(close(a.minute, 270.0));
        assert!(close(a.hour, 255.0));
    }

    #[test]
    fn every_second_of_the_day_is_normalized() {
        for s in 0..86_400u32 {
            let a = at(s / 3600, (s / 60) % 60, s % 60);
            for v in [a.second, a.minute, a.hour] {
                assert!((0.0..360.0).contains(&v), "{v} out of range at {s}");
            }
        }
    }

    #[test]
    fn frozen_seconds_sit_at_twelve() {
        let a = at(10, 10, 45).with_frozen_seconds();
        assert_eq!(a.second, 90.0);
        assert_eq!(a.minute, at(10, 10, 45).minute);
    }

    #[test]
    fn normalize_handles_negative_and_large() {
        assert!(close(normalize_degrees(-90.0), 270.0));
        assert!(close(normalize_degrees(720.5), 0.5));
        assert_eq!(normalize_degrees(-1e-9), 0.0);
    }

    #[test]
    fn rejects_out_of_range_time() {
        assert!(TimeOfDay::new(24, 0, 0).is_err());
        assert!(TimeOfDay::new(0, 60, 0).is_err());
        assert!(TimeOfDay::new(0, 0, 60).is_err());
    }

    #[test]
    fn parses_and_ticks() {
        let t: TimeOfDay = "23:59:59".parse().unwrap();
        assert_eq!(t.succ(), TimeOfDay::new(0, 0, 0).unwrap());
        let t: TimeOfDay = "6:30".parse().unwrap();
        assert_eq!(t.to_string(), "06:30:00");
        assert!("25:00".parse::<TimeOfDay>().is_err());
        assert!("noon".parse::<TimeOfDay>().is_err());
    }
}
