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

//! A surface that logs draw calls instead of rasterizing them.

use super::{Color, DrawSurface, Rect};

/// One physical draw call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    Clear(Color),
    Pixel { x: i32, y: i32, color: Color },
    Rect { rect: Rect, color: Color },
    FillRect { rect: Rect, color: Color },
    Line { from: (i32, i32), to: (i32, i32), color: Color },
    Circle { center: (i32, i32), r: i32, color: Color },
    FillCircle { center: (i32, i32), r: i32, color: Color },
    /// A block write; one per text draw.
    Blit { rect: Rect, fg: Color, bg: Color },
}

/// Records every call made against it, for counting physical draws.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: i32,
    height: i32,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain the log, typically between frames.
    pub fn take(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    #[must_use]
    pub fn count(&self, predicate: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| predicate(op)).count()
    }

    /// Number of text draws at exactly `(x, y)`.
    #[must_use]
    pub fn blits_at(&self, x: i32, y: i32) -> usize {
        self.count(|op| matches!(op, DrawOp::Blit { rect, .. } if rect.x == x && rect.y == y))
    }

    /// Text draws whose top edge sits on row `y`.
    #[must_use]
    pub fn blits_on_row(&self, y: i32) -> usize {
        self.count(|op| matches!(op, DrawOp::Blit { rect, .. } if rect.y == y))
    }

    #[must_use]
    pub fn fill_circles_at(&self, x: i32, y: i32) -> usize {
        self.count(|op| matches!(op, DrawOp::FillCircle { center, .. } if *center == (x, y)))
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.ops.push(DrawOp::Clear(color));
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.ops.push(DrawOp::Pixel { x, y, color });
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::Rect { rect, color });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        self.ops.push(DrawOp::Line {
            from: (x0, y0),
            to: (x1, y1),
            color,
        });
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, color: Color) {
        self.ops.push(DrawOp::Circle {
            center: (cx, cy),
            r,
            color,
        });
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: Color) {
        self.ops.push(DrawOp::FillCircle {
            center: (cx, cy),
            r,
            color,
        });
    }

    fn blit_mono(&mut self, rect: Rect, _bits: &[bool], fg: Color, bg: Color) {
        self.ops.push(DrawOp::Blit { rect, fg, bg });
    }
}
