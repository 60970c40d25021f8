use std::convert::Infallible;

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};

/// Monochrome bitmap the renderer draws into before it is pushed to a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel state; anything outside the frame reads as off.
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map(|idx| self.pixels[idx]).unwrap_or(false)
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|on| **on).count()
    }

    /// Every pixel as `(x, y, on)` in row-major order.
    pub fn iter_pixels(&self) -> impl Iterator<Item = (u32, u32, bool)> + '_ {
        self.pixels.iter().enumerate().map(move |(idx, on)| {
            let idx = idx as u32;
            (idx % self.width, idx / self.width, *on)
        })
    }

    pub fn blank(&mut self) {
        self.pixels.fill(false);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            // Clipped silently: marquee text is routinely half off-screen.
            if let Some(idx) = self.index(point.x, point.y) {
                self.pixels[idx] = color.is_on();
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color.is_on());
        Ok(())
    }
}
