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

//! Write-through damage tracking for the panel.
//!
//! The panel has no readable backing store, so the cache is the only record of
//! what is on the glass. Each entry describes the text last drawn at a screen
//! cell. An entry is written in the same call that issues the physical draw,
//! and removed whenever anything else paints over its extent, so a cache hit
//! always means the pixels are already correct.
//!
//! Table rows additionally track which contact occupies each row and whether
//! it was highlighted, so a row background is only repainted when that
//! changes.

use std::collections::HashMap;

use log::trace;

use crate::font::TextRenderer;
use crate::surface::{Color, DrawSurface, Rect};

/// Top-left corner of a text cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub x: i32,
    pub y: i32,
}

impl CellKey {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Foreground and background of a text draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ink {
    pub fg: Color,
    pub bg: Color,
}

impl Ink {
    #[must_use]
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self { fg, bg }
    }
}

/// What was last drawn at a cell, including its pixel extent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellContent {
    pub text: String,
    pub ink: Ink,
    pub width: i32,
    pub height: i32,
}

impl CellContent {
    fn extent(&self, at: CellKey) -> Rect {
        Rect::new(at.x, at.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RowState {
    id: String,
    selected: bool,
}

/// Damage-tracking cache shared by the table and scope renderers.
#[derive(Debug, Default)]
pub struct CanvasCache {
    cells: HashMap<CellKey, CellContent>,
    rows: HashMap<i32, RowState>,
    pending_rows: HashMap<i32, RowState>,
}

impl CanvasCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, at: CellKey) -> Option<&CellContent> {
        self.cells.get(&at)
    }

    pub fn set(&mut self, at: CellKey, content: CellContent) {
        self.cells.insert(at, content);
    }

    /// Forget everything. Cell keys are layout specific, so this must run
    /// before drawing a different layout.
    pub fn clear_all(&mut self) {
        self.cells.clear();
        self.rows.clear();
        self.pending_rows.clear();
    }

    /// Number of cached text cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of table rows tracked from the last committed frame.
    #[must_use]
    pub fn row_len(&self) -> usize {
        self.rows.len()
    }

    /// Draw `text` at `at` unless the cell already shows exactly that.
    ///
    /// Returns whether a physical draw was issued. `force` skips the cache
    /// lookup, for cells whose background was just repainted.
    pub fn draw_text(
        &mut self,
        surface: &mut dyn DrawSurface,
        font: &dyn TextRenderer,
        at: CellKey,
        text: &str,
        ink: Ink,
        force: bool,
    ) -> bool {
        let content = CellContent {
            text: text.to_string(),
            ink,
            width: font.text_width(text),
            height: font.height(),
        };
        if !force && self.cells.get(&at) == Some(&content) {
            return false;
        }

        // Neighbours this text paints over no longer show what they cached.
        let extent = content.extent(at);
        self.cells
            .retain(|key, cell| *key == at || !cell.extent(*key).intersects(&extent));

        font.draw(surface, at.x, at.y, text, ink.fg, ink.bg);
        self.cells.insert(at, content);
        true
    }

    /// Fill `rect` and drop every cell it touches.
    pub fn erase(&mut self, surface: &mut dyn DrawSurface, rect: Rect, color: Color) {
        surface.fill_rect(rect, color);
        self.invalidate(rect);
    }

    /// Drop every cell overlapping `rect` without drawing. Used when
    /// something other than cached text paints there.
    pub fn invalidate(&mut self, rect: Rect) -> usize {
        let before = self.cells.len();
        self.cells.retain(|key, cell| !cell.extent(*key).intersects(&rect));
        let removed = before - self.cells.len();
        if removed > 0 {
            trace!("Invalidated {removed} cells under {rect:?}");
        }
        removed
    }

    /// Whether the row at `y` showed something other than `id`/`selected`
    /// last frame.
    #[must_use]
    pub fn row_changed(&self, y: i32, id: &str, selected: bool) -> bool {
        !matches!(self.rows.get(&y), Some(row) if row.id == id && row.selected == selected)
    }

    /// Start recording this frame's rows.
    pub fn begin_rows(&mut self) {
        self.pending_rows.clear();
    }

    pub fn set_row(&mut self, y: i32, id: &str, selected: bool) {
        self.pending_rows.insert(
            y,
            RowState {
                id: id.to_string(),
                selected,
            },
        );
    }

    /// Rows shown last frame that this frame has not re-stated, top to bottom.
    #[must_use]
    pub fn stale_rows(&self) -> Vec<i32> {
        let mut stale: Vec<i32> = self
            .rows
            .keys()
            .filter(|y| !self.pending_rows.contains_key(y))
            .copied()
            .collect();
        stale.sort_unstable();
        stale
    }

    /// Make this frame's rows the reference for the next one.
    pub fn commit_rows(&mut self) {
        self.rows = std::mem::take(&mut self.pending_rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::Font8x8;
    use crate::surface::{DrawOp, RecordingSurface};

    const GREEN: Color = Color::rgb(0, 255, 0);
    const INK: Ink = Ink::new(GREEN, Color::BLACK);

    fn content(text: &str) -> CellContent {
        CellContent {
            text: text.to_string(),
            ink: INK,
            width: 8 * i32::try_from(text.len()).unwrap(),
            height: 8,
        }
    }

    #[test]
    fn test_set_then_get() {
        let mut cache = CanvasCache::new();
        let at = CellKey::new(10, 40);
        cache.set(at, content("BAW28K"));
        assert_eq!(cache.get(at), Some(&content("BAW28K")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_all_forgets_everything() {
        let mut cache = CanvasCache::new();
        cache.set(CellKey::new(1, 1), content("A"));
        cache.set(CellKey::new(2, 20), content("B"));
        cache.begin_rows();
        cache.set_row(40, "a1b2c3", false);
        cache.commit_rows();

        cache.clear_all();
        assert_eq!(cache.get(CellKey::new(1, 1)), None);
        assert_eq!(cache.get(CellKey::new(2, 20)), None);
        assert!(cache.is_empty());
        assert_eq!(cache.row_len(), 0);
        assert!(cache.row_changed(40, "a1b2c3", false));
    }

    #[test]
    fn test_unchanged_text_is_not_redrawn() {
        let mut cache = CanvasCache::new();
        let mut surface = RecordingSurface::new(240, 320);
        let at = CellKey::new(10, 40);

        assert!(cache.draw_text(&mut surface, &Font8x8, at, "12000", INK, false));
        assert!(!cache.draw_text(&mut surface, &Font8x8, at, "12000", INK, false));
        assert_eq!(surface.blits_at(10, 40), 1);

        // a color change is a content change
        let alert = Ink::new(Color::rgb(255, 0, 0), Color::BLACK);
        assert!(cache.draw_text(&mut surface, &Font8x8, at, "12000", alert, false));
        // force always draws
        assert!(cache.draw_text(&mut surface, &Font8x8, at, "12000", alert, true));
        assert_eq!(surface.blits_at(10, 40), 3);
    }

    #[test]
    fn test_erase_forces_redraw() {
        let mut cache = CanvasCache::new();
        let mut surface = RecordingSurface::new(240, 320);
        let at = CellKey::new(10, 40);
        cache.draw_text(&mut surface, &Font8x8, at, "TEXT", INK, false);

        cache.erase(&mut surface, Rect::new(4, 39, 232, 10), Color::BLACK);
        assert_eq!(cache.get(at), None);
        assert!(matches!(surface.ops().last(), Some(DrawOp::FillRect { .. })));
        assert!(cache.draw_text(&mut surface, &Font8x8, at, "TEXT", INK, false));
    }

    #[test]
    fn test_invalidate_only_touches_overlaps() {
        let mut cache = CanvasCache::new();
        cache.set(CellKey::new(0, 0), content("LEFT"));
        cache.set(CellKey::new(100, 0), content("RIGHT"));
        assert_eq!(cache.invalidate(Rect::around(110, 4, 3)), 1);
        assert!(cache.get(CellKey::new(0, 0)).is_some());
        assert!(cache.get(CellKey::new(100, 0)).is_none());
    }

    #[test]
    fn test_overlapping_draw_invalidates_neighbour() {
        let mut cache = CanvasCache::new();
        let mut surface = RecordingSurface::new(240, 320);
        cache.draw_text(&mut surface, &Font8x8, CellKey::new(40, 0), "ALT", INK, false);
        cache.draw_text(&mut surface, &Font8x8, CellKey::new(0, 0), "LONGCALLS", INK, false);
        assert!(cache.get(CellKey::new(40, 0)).is_none());
        assert!(cache.get(CellKey::new(0, 0)).is_some());
    }

    #[test]
    fn test_row_state_tracking() {
        let mut cache = CanvasCache::new();
        assert!(cache.row_changed(40, "a", false));

        cache.begin_rows();
        cache.set_row(40, "a", false);
        cache.set_row(50, "b", false);
        cache.commit_rows();
        assert!(!cache.row_changed(40, "a", false));
        assert!(cache.row_changed(40, "a", true));
        assert!(cache.row_changed(40, "b", false));

        cache.begin_rows();
        cache.set_row(40, "a", true);
        assert_eq!(cache.stale_rows(), vec![50]);
        cache.commit_rows();
        assert_eq!(cache.row_len(), 1);
    }
}
