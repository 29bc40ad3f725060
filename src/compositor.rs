/*
 *  compositor.rs
 *
 *  MClock - pigment wheels on an 8x8 matrix
 *  (c) 2020-26 Stuart Hunter
 *
 *  Three translucent shade wheels flattened into pie slices
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

//! A white dial sits behind three transparent discs, one per hand. Each disc
//! carries N pie segments of one pigment (cyan, magenta or yellow) running
//! from fully saturated at the hand to fully clear. Rather than blending three
//! layers we cut the dial at every segment edge of every disc and paint each
//! resulting slice once with the three shades active there.

use std::fmt;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Sector};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::angles::{normalize_degrees, HandAngles};

pub const CHANNELS: usize = 3;
pub const FULL_TURN: f32 = 360.0;
/// Narrowest slice we hand to the rasterizer.
pub const MIN_SLICE_DEGREES: f32 = 1.0;
/// Shade of a fully clear segment.
pub const TRANSPARENT: u8 = 255;

/// Channel slot each hand's wheel tints.
pub const MINUTE_CHANNEL: usize = 0;
pub const HOUR_CHANNEL: usize = 1;
pub const SECOND_CHANNEL: usize = 2;

/// Which of the three wheels contribute pigment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct ChannelSet([bool; CHANNELS]);

impl ChannelSet {
    pub const ALL: ChannelSet = ChannelSet([true; CHANNELS]);
    pub const NONE: ChannelSet = ChannelSet([false; CHANNELS]);

    pub fn only(channel: usize) -> Self {
        let mut set = Self::NONE;
        if channel < CHANNELS {
            set.0[channel] = true;
        }
        set
    }

    pub fn contains(&self, channel: usize) -> bool {
        self.0.get(channel).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..CHANNELS).filter(|c| self.0[*c])
    }
}

impl Default for ChannelSet {
    fn default() -> Self { Self::ALL }
}

impl TryFrom<Vec<usize>> for ChannelSet {
    type Error = String;

    fn try_from(v: Vec<usize>) -> Result<Self, Self::Error> {
        let mut set = Self::NONE;
        for c in v {
            if c >= CHANNELS {
                return Err(format!("channel {c} out of range 0..{CHANNELS}"));
            }
            set.0[c] = true;
        }
        Ok(set)
    }
}

impl From<ChannelSet> for Vec<usize> {
    fn from(set: ChannelSet) -> Self {
        set.iter().collect()
    }
}

impl std::str::FromStr for ChannelSet {
    type Err = String;

    /// Comma separated channel indices, e.g. `0,2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v = s
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| p.parse::<usize>().map_err(|_| format!("bad channel '{p}'")))
            .collect::<Result<Vec<_>, _>>()?;
        ChannelSet::try_from(v)
    }
}

impl fmt::Display for ChannelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// One segment edge on one wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub angle: f32,
    pub shade: u8,
    pub channel: usize,
}

/// A slice of the dial with a single fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillInterval {
    pub start: f32,
    pub end: f32,
    pub color: Rgb888,
}

impl FillInterval {
    /// True angular width of the slice.
    pub fn extent(&self) -> f32 {
        self.end - self.start
    }

    /// Width actually painted, never below [`MIN_SLICE_DEGREES`].
    pub fn painted_extent(&self) -> f32 {
        self.extent().max(MIN_SLICE_DEGREES)
    }
}

/// Shade of segment `index` on an N segment wheel: 0 on the hand, 255 furthest round.
pub fn segment_shade(index: usize, segments: usize) -> u8 {
    let span = (segments.max(2) - 1) as u32;
    let i = (index as u32).min(span);
    ((255 * i + span / 2) / span) as u8
}

/// Every segment edge of the three wheels, sorted by angle.
///
/// Each wheel starts half a segment before its hand so segment 0 is centred on
/// it. The segment straddling 0° is repeated at 0° so the first slice of the
/// dial already knows that wheel's shade. Ties keep generation order.
pub fn build_breakpoints(angles: &HandAngles, segments: usize, active: ChannelSet) -> Vec<Breakpoint> {
    let n = segments.max(2);
    let step = FULL_TURN / n as f32;
    let mut table = Vec::with_capacity(CHANNELS * (n + 1));

    for (channel, hand) in [
        (MINUTE_CHANNEL, angles.minute),
        (HOUR_CHANNEL, angles.hour),
        (SECOND_CHANNEL, angles.second),
    ] {
        let start = normalize_degrees(hand - step / 2.0);
        let shade_of = |i: usize| if active.contains(channel) { segment_shade(i, n) } else { TRANSPARENT };
        let mut wrapped = false;

        for i in 0..n {
            let raw = start + i as f32 * step;
            let angle = if raw >= FULL_TURN {
                if !wrapped {
                    wrapped = true;
                    table.push(Breakpoint { angle: 0.0, shade: shade_of(i - 1), channel });
                }
                raw - FULL_TURN
            } else {
                raw
            };
            table.push(Breakpoint { angle, shade: shade_of(i), channel });
        }

        // last segment runs over 360 unless the wheel started exactly on 0
        if !wrapped && start > 0.0 {
            table.push(Breakpoint { angle: 0.0, shade: shade_of(n - 1), channel });
        }
    }

    // sort_by is stable
    table.sort_by(|a, b| a.angle.total_cmp(&b.angle));
    table
}

/// Walks the sorted table against a closing edge at 360° and yields each
/// non-empty slice with the shades in force across it.
pub fn fill_intervals(table: &[Breakpoint]) -> Vec<FillInterval> {
    let mut fill = [TRANSPARENT; CHANNELS];
    let mut out = Vec::with_capacity(table.len());

    for (i, bp) in table.iter().enumerate() {
        fill[bp.channel] = bp.shade;
        let next = table.get(i + 1).map_or(FULL_TURN, |n| n.angle);
        if next > bp.angle {
            out.push(FillInterval {
                start: bp.angle,
                end: next,
                color: Rgb888::new(fill[0], fill[1], fill[2]),
            });
        }
    }
    out
}

/// Dial slices run counter-clockwise with y up; embedded-graphics measures
/// clockwise with y down. Returns (start, sweep) for the rasterizer.
pub fn dial_to_screen(start: f32, extent: f32) -> (f32, f32) {
    (-(start + extent), extent)
}

/// Paints every slice as a filled sector of the dial.
pub fn draw_background<D>(
    target: &mut D,
    center: Point,
    radius: u32,
    intervals: &[FillInterval],
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    for slice in intervals {
        let (start, sweep) = dial_to_screen(slice.start, slice.painted_extent());
        trace!("slice {:.2}+{:.2} {:?}", slice.start, slice.painted_extent(), slice.color);
        Sector::with_center(center, radius * 2, start.deg(), sweep.deg())
            .into_styled(PrimitiveStyle::with_fill(slice.color))
            .draw(target)?;
    }
    Ok(())
}
