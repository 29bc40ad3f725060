/*
 *  hands.rs
 *
 *  MClock - pigment wheels on an 8x8 matrix
 *  (c) 2020-26 Stuart Hunter
 *
 *  Hour and minute hands drawn over the wheels
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
use embedded_graphics::primitives::{Line, PrimitiveStyleBuilder};
use serde::{Deserialize, Serialize};

use crate::angles::HandAngles;

/// Hand geometry and colours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandStyle {
    /// Hour hand length as a fraction of the dial radius
    pub hour_scale: f32,
    pub minute_scale: f32,
    pub width: u32,
    pub hour_color: [u8; 3],
    pub minute_color: [u8; 3],
}

impl Default for HandStyle {
    fn default() -> Self {
        Self {
            hour_scale: 0.67,
            minute_scale: 0.975,
            width: 8,
            hour_color: [255, 255, 255],
            minute_color: [0, 0, 0],
        }
    }
}

/// Tip of a hand `len` pixels long at dial angle `deg`; screen y grows downward.
pub fn hand_tip(center: Point, len: f32, deg: f32) -> Point {
    let rad = deg.to_radians();
    Point::new(
        center.x + (len * rad.cos()) as i32,
        center.y - (len * rad.sin()) as i32,
    )
}

fn rgb(c: [u8; 3]) -> Rgb888 {
    Rgb888::new(c[0], c[1], c[2])
}

/// Draws the minute hand then the hour hand, so the hour hand wins where they cross.
pub fn draw_hands<D>(
    target: &mut D,
    center: Point,
    radius: u32,
    angles: &HandAngles,
    style: &HandStyle,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let r = radius as f32;
    for (deg, scale, color) in [
        (angles.minute, style.minute_scale, style.minute_color),
        (angles.hour, style.hour_scale, style.hour_color),
    ] {
        Line::new(center, hand_tip(center, r * scale, deg))
            .into_styled(
                PrimitiveStyleBuilder::new()
                    .stroke_width(style.width)
                    .stroke_color(rgb(color))
                    .build(),
            )
            .draw(target)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;

    #[test]
    fn tips_follow_the_dial() {
        let c = Point::new(32, 32);
        assert_eq!(hand_tip(c, 20.0, 90.0), Point::new(32, 12));
        assert_eq!(hand_tip(c, 20.0, 0.0), Point::new(52, 32));
        assert_eq!(hand_tip(c, 20.0, 180.0), Point::new(12, 32));
        assert_eq!(hand_tip(c, 20.0, 270.0), Point::new(32, 52));
    }

    #[test]
    fn hands_land_where_they_point() {
        let mut canvas = Canvas::new(32);
        canvas.clear_color(Rgb888::new(10, 20, 30));
        // minute straight up, hour at three
        let a = HandAngles { second: 90.0, minute: 90.0, hour: 0.0 };
        let style = HandStyle { width: 3, ..HandStyle::default() };
        let center = canvas.center();
        draw_hands(&mut canvas, center, 32, &a, &style).unwrap();

        assert_eq!(canvas.pixel(32, 8), Some(Rgb888::BLACK));
        assert_eq!(canvas.pixel(50, 32), Some(Rgb888::WHITE));
        // nothing on the left half
        assert_eq!(canvas.pixel(10, 32), Some(Rgb888::new(10, 20, 30)));
    }

    #[test]
    fn hour_hand_is_shorter() {
        let mut canvas = Canvas::new(32);
        canvas.clear_color(Rgb888::BLUE);
        let a = HandAngles { second: 90.0, minute: 0.0, hour: 180.0 };
        let style = HandStyle { width: 1, ..HandStyle::default() };
        let center = canvas.center();
        draw_hands(&mut canvas, center, 32, &a, &style).unwrap();

        // minute reaches 31px right, hour stops about 21px left
        assert_eq!(canvas.pixel(62, 32), Some(Rgb888::BLACK));
        assert_eq!(canvas.pixel(12, 32), Some(Rgb888::WHITE));
        assert_eq!(canvas.pixel(6, 32), Some(Rgb888::BLUE));
    }
}
