/*
 *  canvas.rs
 *
 *  MClock - pigment wheels on an 8x8 matrix
 *  (c) 2020-26 Stuart Hunter
 *
 *  High resolution RGB raster the dial is painted into
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

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Square RGB framebuffer, `2 * radius` pixels on a side.
#[derive(Debug, Clone)]
pub struct Canvas {
    buf: Vec<Rgb888>,
    radius: u32,
    side: usize,
}

impl Canvas {
    pub fn new(radius: u32) -> Self {
        let side = (radius as usize) * 2;
        Self { buf: vec![Rgb888::BLACK; side * side], radius, side }
    }

    pub fn radius(&self) -> u32 { self.radius }
    pub fn side(&self) -> usize { self.side }

    pub fn center(&self) -> Point {
        Point::new(self.radius as i32, self.radius as i32)
    }

    /// Immutable raw access, row-major
    pub fn as_slice(&self) -> &[Rgb888] { &self.buf }

    pub fn clear_color(&mut self, color: Rgb888) {
        self.buf.fill(color);
    }

    /// Pixel at (x, y); None outside the canvas.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb888> {
        if x < self.side && y < self.side {
            Some(self.buf[y * self.side + x])
        } else {
            None
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb888) {
        if x < self.side && y < self.side {
            self.buf[y * self.side + x] = color;
        }
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.side && y < self.side {
                return Some(y * self.side + x);
            }
        }
        None
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.side as u32, self.side as u32)
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clear_color(color);
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        // clip first, primitives hand us rows that may hang off the edge
        let area = area.intersection(&self.bounding_box());
        let Size { width, height } = area.size;
        if width == 0 || height == 0 { return Ok(()); }
        let (x0, y0) = (area.top_left.x as usize, area.top_left.y as usize);
        for row in y0..y0 + height as usize {
            let base = row * self.side;
            self.buf[base + x0..base + x0 + width as usize].fill(color);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{Line, PrimitiveStyle};

    #[test]
    fn new_canvas_is_black_and_square() {
        let c = Canvas::new(32);
        assert_eq!(c.side(), 64);
        assert_eq!(c.size(), Size::new(64, 64));
        assert!(c.as_slice().iter().all(|p| *p == Rgb888::BLACK));
        assert_eq!(c.center(), Point::new(32, 32));
    }

    #[test]
    fn pixel_access_is_bounds_checked() {
        let mut c = Canvas::new(4);
        c.set_pixel(7, 7, Rgb888::RED);
        c.set_pixel(8, 0, Rgb888::RED);
        assert_eq!(c.pixel(7, 7), Some(Rgb888::RED));
        assert_eq!(c.pixel(8, 0), None);
        assert_eq!(c.as_slice().iter().filter(|p| **p == Rgb888::RED).count(), 1);
    }

    #[test]
    fn draws_through_embedded_graphics() {
        let mut c = Canvas::new(8);
        Line::new(Point::new(-4, 3), Point::new(40, 3))
            .into_styled(PrimitiveStyle::with_stroke(Rgb888::GREEN, 1))
            .draw(&mut c)
            .unwrap();
        for x in 0..16 {
            assert_eq!(c.pixel(x, 3), Some(Rgb888::GREEN));
        }
        assert_eq!(c.pixel(0, 2), Some(Rgb888::BLACK));
    }

    #[test]
    fn fill_solid_clips_to_canvas() {
        let mut c = Canvas::new(4);
        c.fill_solid(&Rectangle::new(Point::new(6, -2), Size::new(10, 4)), Rgb888::BLUE)
            .unwrap();
        assert_eq!(c.pixel(6, 0), Some(Rgb888::BLUE));
        assert_eq!(c.pixel(7, 1), Some(Rgb888::BLUE));
        assert_eq!(c.pixel(5, 0), Some(Rgb888::BLACK));
        assert_eq!(c.pixel(6, 2), Some(Rgb888::BLACK));
    }
}
