// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! In-memory RGB565 panel.
//!
//! Emulates the display memory of the physical panel so the renderers can run
//! on a desktop. Rasterization is integer-only (Bresenham lines, midpoint
//! circles) with no anti-aliasing.

use std::path::Path;

use super::{Color, DrawSurface, Rect};

/// A panel-sized RGB565 pixel buffer.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: i32,
    height: i32,
    pixels: Vec<Color>,
    generation: u64,
}

impl Framebuffer {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        let len = usize::try_from(width.max(0)).unwrap_or(0) * usize::try_from(height.max(0)).unwrap_or(0);
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; len],
            generation: 0,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width.unsigned_abs()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height.unsigned_abs()
    }

    /// Incremented on every write; lets viewers skip re-uploading unchanged frames.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Color at `(x, y)`, or `None` outside the panel.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Row-major RGB888 bytes, three per pixel.
    #[must_use]
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_rgb()).collect()
    }

    /// Write the panel contents as a PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), image::ImageError> {
        let image = image::RgbImage::from_fn(self.width(), self.height(), |x, y| {
            let color = i32::try_from(x)
                .ok()
                .zip(i32::try_from(y).ok())
                .and_then(|(x, y)| self.pixel(x, y))
                .unwrap_or_default();
            image::Rgb(color.to_rgb())
        });
        image.save(path)
    }

    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.bounds().contains(x, y) {
            usize::try_from(y * self.width + x).ok()
        } else {
            None
        }
    }

    fn put(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    fn hline(&mut self, x0: i32, x1: i32, y: i32, color: Color) {
        let (from, to) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        for x in from.max(0)..=to.min(self.width - 1) {
            self.put(x, y, color);
        }
    }

    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

impl DrawSurface for Framebuffer {
    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
        self.touch();
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.put(x, y, color);
        self.touch();
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);
        self.hline(rect.x, right, rect.y, color);
        self.hline(rect.x, right, bottom, color);
        for y in rect.y..=bottom {
            self.put(rect.x, y, color);
            self.put(right, y, color);
        }
        self.touch();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let clipped = rect.clip(&self.bounds());
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                self.put(x, y, color);
            }
        }
        self.touch();
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        loop {
            self.put(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
        self.touch();
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, color: Color) {
        if r < 0 {
            return;
        }
        let (mut x, mut y) = (r, 0);
        let mut err = 1 - r;
        while x >= y {
            for (px, py) in [(x, y), (y, x), (-y, x), (-x, y), (-x, -y), (-y, -x), (y, -x), (x, -y)] {
                self.put(cx + px, cy + py, color);
            }
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
        self.touch();
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: Color) {
        if r < 0 {
            return;
        }
        for dy in -r..=r {
            let mut half = 0;
            while (half + 1) * (half + 1) + dy * dy <= r * r {
                half += 1;
            }
            self.hline(cx - half, cx + half, cy + dy, color);
        }
        self.touch();
    }

    fn blit_mono(&mut self, rect: Rect, bits: &[bool], fg: Color, bg: Color) {
        if rect.is_empty() {
            return;
        }
        for (i, &on) in bits.iter().enumerate().take(usize::try_from(rect.w * rect.h).unwrap_or(0)) {
            let i = i32::try_from(i).unwrap_or(i32::MAX);
            self.put(rect.x + i % rect.w, rect.y + i / rect.w, if on { fg } else { bg });
        }
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FG: Color = Color::rgb(0, 255, 0);

    fn lit(fb: &Framebuffer) -> usize {
        fb.pixels.iter().filter(|&&c| c == FG).count()
    }

    #[test]
    fn test_clear_and_generation() {
        let mut fb = Framebuffer::new(10, 8);
        let before = fb.generation();
        fb.clear(FG);
        assert_eq!(lit(&fb), 80);
        assert!(fb.generation() > before);
    }

    #[test]
    fn test_line_endpoints_inclusive() {
        let mut fb = Framebuffer::new(20, 20);
        fb.draw_line(2, 3, 12, 3, FG);
        assert_eq!(lit(&fb), 11);
        assert_eq!(fb.pixel(2, 3), Some(FG));
        assert_eq!(fb.pixel(12, 3), Some(FG));

        let mut fb = Framebuffer::new(20, 20);
        fb.draw_line(15, 15, 5, 5, FG);
        assert_eq!(lit(&fb), 11);
        assert_eq!(fb.pixel(10, 10), Some(FG));
    }

    #[test]
    fn test_drawing_is_clipped() {
        let mut fb = Framebuffer::new(10, 10);
        fb.fill_rect(Rect::new(-5, -5, 8, 8), FG);
        assert_eq!(lit(&fb), 9);
        fb.draw_line(-20, 5, 30, 5, FG);
        assert_eq!(fb.pixel(0, 5), Some(FG));
        assert_eq!(fb.pixel(9, 5), Some(FG));
        assert_eq!(fb.pixel(10, 5), None);
    }

    #[test]
    fn test_circle_is_symmetric() {
        let mut fb = Framebuffer::new(21, 21);
        fb.draw_circle(10, 10, 6, FG);
        assert_eq!(fb.pixel(16, 10), Some(FG));
        assert_eq!(fb.pixel(4, 10), Some(FG));
        assert_eq!(fb.pixel(10, 4), Some(FG));
        assert_eq!(fb.pixel(10, 16), Some(FG));
        assert_ne!(fb.pixel(10, 10), Some(FG));

        let mut filled = Framebuffer::new(21, 21);
        filled.fill_circle(10, 10, 3, FG);
        assert_eq!(filled.pixel(10, 10), Some(FG));
        assert_eq!(filled.pixel(13, 10), Some(FG));
        assert_ne!(filled.pixel(13, 13), Some(FG));
    }

    #[test]
    fn test_rect_outline() {
        let mut fb = Framebuffer::new(10, 10);
        fb.draw_rect(Rect::new(1, 1, 4, 3), FG);
        // perimeter of a 4x3 box
        assert_eq!(lit(&fb), 10);
        assert_ne!(fb.pixel(2, 2), Some(FG));
    }

    #[test]
    fn test_blit_mono() {
        let mut fb = Framebuffer::new(4, 4);
        let bg = Color::rgb(255, 255, 0);
        fb.blit_mono(Rect::new(1, 1, 2, 2), &[true, false, false, true], FG, bg);
        assert_eq!(fb.pixel(1, 1), Some(FG));
        assert_eq!(fb.pixel(2, 1), Some(bg));
        assert_eq!(fb.pixel(2, 2), Some(FG));
        assert_eq!(fb.pixel(0, 0), Some(Color::BLACK));
    }
}
