/*
 *  render.rs
 *
 *  MClock - pigment wheels on an 8x8 matrix
 *  (c) 2020-26 Stuart Hunter
 *
 *  One cycle: time -> angles -> wheels -> hands -> grid
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

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use log::debug;

use crate::angles::{hand_angles, HandAngles, TimeOfDay};
use crate::canvas::Canvas;
use crate::compositor::{build_breakpoints, draw_background, fill_intervals};
use crate::config::ClockConfig;
use crate::display::DisplaySink;
use crate::downsample::{downsample, Grid};
use crate::error::ClockResult;
use crate::hands::draw_hands;
use crate::time_source::TimeSource;

/// Owns the canvas and turns a time of day into a finished grid.
pub struct ClockRenderer {
    config: ClockConfig,
    canvas: Canvas,
}

impl ClockRenderer {
    pub fn new(config: ClockConfig) -> ClockResult<Self> {
        config.validate()?;
        let canvas = Canvas::new(config.radius);
        Ok(Self { config, canvas })
    }

    pub fn config(&self) -> &ClockConfig { &self.config }

    /// The full resolution frame from the last render.
    pub fn canvas(&self) -> &Canvas { &self.canvas }

    /// Angles as this renderer will draw them.
    pub fn angles(&self, time: TimeOfDay) -> HandAngles {
        let angles = hand_angles(time);
        if self.config.show_seconds { angles } else { angles.with_frozen_seconds() }
    }

    pub fn render(&mut self, time: TimeOfDay) -> Grid {
        let angles = self.angles(time);
        let cfg = &self.config;

        // corners outside the dial are never painted by the wheels
        self.canvas.clear_color(Rgb888::BLACK);
        let center = self.canvas.center();

        let table = build_breakpoints(&angles, cfg.segments, cfg.active_channels);
        let slices = fill_intervals(&table);
        draw_background(&mut self.canvas, center, cfg.radius, &slices)
            .unwrap_or_else(|never| match never {});
        draw_hands(&mut self.canvas, center, cfg.radius, &angles, &cfg.hands)
            .unwrap_or_else(|never| match never {});

        debug!(
            "{} s={:.1} m={:.1} h={:.1} slices={}",
            time, angles.second, angles.minute, angles.hour, slices.len()
        );
        downsample(&self.canvas, cfg.grid_size, &cfg.downsample)
    }

    /// Read the clock, render, hand the grid to the sink.
    pub fn tick(
        &mut self,
        clock: &mut dyn TimeSource,
        sink: &mut dyn DisplaySink,
    ) -> ClockResult<TimeOfDay> {
        let now = clock.now()?;
        let grid = self.render(now);
        sink.set_grid(grid)?;
        Ok(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::display::MockSink;
    use crate::error::ClockError;
    use crate::time_source::FixedClock;

    fn at(h: u32, m: u32, s: u32) -> TimeOfDay {
        TimeOfDay::new(h, m, s).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = ClockConfig { segments: 1, ..ClockConfig::default() };
        assert!(matches!(
            ClockRenderer::new(cfg),
            Err(ClockError::Config(ConfigError::InvalidSegmentCount(1)))
        ));
    }

    #[test]
    fn frozen_seconds_pin_the_wheel() {
        let cfg = ClockConfig { show_seconds: false, ..ClockConfig::default() };
        let r = ClockRenderer::new(cfg).unwrap();
        assert_eq!(r.angles(at(6, 30, 17)).second, 90.0);

        let r = ClockRenderer::new(ClockConfig::default()).unwrap();
        assert!((r.angles(at(6, 30, 15)).second - 0.0).abs() < 1e-4);
    }

    #[test]
    fn corners_stay_black() {
        let mut r = ClockRenderer::new(ClockConfig::default()).unwrap();
        r.render(at(10, 10, 10));
        assert_eq!(r.canvas().pixel(0, 0), Some(Rgb888::BLACK));
        assert_eq!(r.canvas().pixel(63, 63), Some(Rgb888::BLACK));
    }

    #[test]
    fn renders_are_repeatable() {
        let mut r = ClockRenderer::new(ClockConfig::default()).unwrap();
        let a = r.render(at(3, 15, 45));
        r.render(at(9, 0, 0));
        let b = r.render(at(3, 15, 45));
        assert_eq!(a, b);
    }

    #[test]
    fn time_moves_the_frame() {
        let mut r = ClockRenderer::new(ClockConfig::default()).unwrap();
        assert_ne!(r.render(at(3, 0, 0)), r.render(at(9, 0, 0)));
    }

    #[test]
    fn tick_feeds_the_sink() {
        let mut r = ClockRenderer::new(ClockConfig::default()).unwrap();
        let mut clock = FixedClock::ticking(at(12, 0, 0));
        let mut sink = MockSink::new();
        let first = r.tick(&mut clock, &mut sink).unwrap();
        let second = r.tick(&mut clock, &mut sink).unwrap();
        assert_eq!(first.to_string(), "12:00:00");
        assert_eq!(second.to_string(), "12:00:01");
        assert_eq!(sink.frame_count(), 2);
    }

    #[test]
    fn tick_reports_sink_failure() {
        let mut r = ClockRenderer::new(ClockConfig::default()).unwrap();
        let mut clock = FixedClock::new(at(1, 2, 3));
        let mut sink = MockSink::new();
        sink.state().lock().unwrap().simulate_write_failure = true;
        assert!(matches!(r.tick(&mut clock, &mut sink), Err(ClockError::Display(_))));
    }
}
