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

//! Drawing surface abstraction.
//!
//! The renderers talk to the panel through [`DrawSurface`], a small set of
//! integer-pixel primitives matching what an SPI display driver offers. There
//! is no backing store on the host side: whatever was drawn stays on the panel
//! until something is drawn over it.

pub mod framebuffer;
pub mod recording;

pub use framebuffer::Framebuffer;
pub use recording::{DrawOp, RecordingSurface};

use serde::{Deserialize, Serialize};

/// A packed RGB565 color, the native format of ILI9341-class panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color(pub u16);

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Pack an 8-bit-per-channel color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3))
    }

    /// Expand back to 8 bits per channel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, reason = "each channel is masked to its bit width")]
    pub const fn to_rgb(self) -> [u8; 3] {
        let r = ((self.0 >> 11) & 0x1F) as u8;
        let g = ((self.0 >> 5) & 0x3F) as u8;
        let b = (self.0 & 0x1F) as u8;
        [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(r, g, b)
    }
}

impl From<Color> for [u8; 3] {
    fn from(color: Color) -> Self {
        color.to_rgb()
    }
}

/// The semantic colors used by every renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Primary foreground (civil contacts, borders).
    pub bright: Color,
    /// Secondary foreground (rings, trails, separators).
    pub dim: Color,
    /// Military contacts.
    pub alert: Color,
    /// Titles, headers, waypoints.
    pub amber: Color,
    /// Selection background, selected trails and labels.
    pub highlight: Color,
    pub background: Color,
    /// Text drawn on top of `highlight`.
    pub contrast: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            bright: Color::rgb(0, 255, 0),
            dim: Color::rgb(0, 128, 0),
            alert: Color::rgb(255, 0, 0),
            amber: Color::rgb(255, 191, 0),
            highlight: Color::rgb(255, 255, 0),
            background: Color::BLACK,
            contrast: Color::BLACK,
        }
    }
}

/// An axis-aligned pixel rectangle. Contains `[x, x + w) × [y, y + h)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    #[must_use]
    pub const fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Intersection of two rectangles (empty if disjoint).
    #[must_use]
    pub fn clip(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect::new(x, y, (right - x).max(0), (bottom - y).max(0))
    }

    /// Square bounding box of a circle.
    #[must_use]
    pub const fn around(cx: i32, cy: i32, r: i32) -> Rect {
        Rect::new(cx - r, cy - r, 2 * r + 1, 2 * r + 1)
    }
}

/// Pixel primitives offered by the display.
///
/// All coordinates are integer pixels, origin top-left. Implementations clip
/// to their own bounds.
pub trait DrawSurface {
    /// Panel size in pixels as `(width, height)`.
    fn size(&self) -> (i32, i32);

    /// Fill the whole panel.
    fn clear(&mut self, color: Color);

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color);

    /// One-pixel rectangle outline.
    fn draw_rect(&mut self, rect: Rect, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color);

    /// Connected line segments through `points`.
    fn draw_polyline(&mut self, points: &[(i32, i32)], color: Color) {
        for pair in points.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            self.draw_line(x0, y0, x1, y1, color);
        }
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, color: Color);

    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: Color);

    /// Block-write a monochrome bitmap, row-major, `rect.w * rect.h` entries.
    fn blit_mono(&mut self, rect: Rect, bits: &[bool], fg: Color, bg: Color);
}
