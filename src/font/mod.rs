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

//! Bitmap text rendering.
//!
//! Every renderer draws text through [`TextRenderer`]. A string is rasterized
//! into one monochrome block and written with a single
//! [`DrawSurface::blit_mono`] call, the way the panel driver streams a text
//! window over SPI.

mod font8x8;
mod xglcd;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::RadarError;
use crate::surface::{Color, DrawSurface, Rect};

pub use font8x8::Font8x8;
pub use xglcd::XglcdFont;

/// A fixed-advance bitmap font.
pub trait TextRenderer: Send + Sync + fmt::Debug {
    /// Horizontal advance per character, spacing included.
    fn char_width(&self) -> i32;

    fn height(&self) -> i32;

    /// Whether pixel `(x, y)` of the character cell for `ch` is set.
    /// Characters the font lacks render blank.
    fn glyph_pixel(&self, ch: char, x: i32, y: i32) -> bool;

    fn text_width(&self, text: &str) -> i32 {
        i32::try_from(text.chars().count()).unwrap_or(i32::MAX).saturating_mul(self.char_width())
    }

    /// Draw `text` with its top-left corner at `(x, y)`, background included.
    /// Returns the extent written.
    fn draw(&self, surface: &mut dyn DrawSurface, x: i32, y: i32, text: &str, fg: Color, bg: Color) -> Rect {
        let (w, h) = (self.text_width(text), self.height());
        let extent = Rect::new(x, y, w, h);
        if extent.is_empty() {
            return extent;
        }

        let advance = self.char_width();
        let mut bits = vec![false; usize::try_from(w * h).unwrap_or(0)];
        for (i, ch) in text.chars().enumerate() {
            let origin = i32::try_from(i).unwrap_or(i32::MAX).saturating_mul(advance);
            for gy in 0..h {
                for gx in 0..advance {
                    if self.glyph_pixel(ch, gx, gy) {
                        if let Ok(idx) = usize::try_from(gy * w + origin + gx) {
                            bits[idx] = true;
                        }
                    }
                }
            }
        }
        surface.blit_mono(extent, &bits, fg, bg);
        extent
    }
}

/// Which font to use for a text role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FontSpec {
    /// The built-in 8x8 console font.
    Builtin8x8,
    /// The built-in 5x7 font on an 8 pixel line.
    Builtin5x7,
    /// An XGLCD `.c` font file.
    Xglcd {
        path: PathBuf,
        width: u8,
        height: u8,
        #[serde(default = "default_letter_count")]
        letter_count: usize,
    },
}

fn default_letter_count() -> usize {
    223
}

impl FontSpec {
    /// Instantiate the font, reading it from disk if needed.
    pub fn load(&self) -> Result<Arc<dyn TextRenderer>, RadarError> {
        Ok(match self {
            Self::Builtin8x8 => Arc::new(Font8x8),
            Self::Builtin5x7 => Arc::new(XglcdFont::classic()),
            Self::Xglcd {
                path,
                width,
                height,
                letter_count,
            } => Arc::new(XglcdFont::load(path, *width, *height, *letter_count)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, Framebuffer, RecordingSurface};

    #[test]
    fn test_one_blit_per_string() {
        let mut surface = RecordingSurface::new(240, 320);
        let extent = Font8x8.draw(&mut surface, 10, 20, "CALL", Color(1), Color(0));
        assert_eq!(extent, Rect::new(10, 20, 32, 8));
        assert_eq!(
            surface.ops(),
            &[DrawOp::Blit {
                rect: Rect::new(10, 20, 32, 8),
                fg: Color(1),
                bg: Color(0)
            }]
        );
    }

    #[test]
    fn test_empty_string_draws_nothing() {
        let mut surface = RecordingSurface::new(240, 320);
        let extent = XglcdFont::classic().draw(&mut surface, 0, 0, "", Color(1), Color(0));
        assert!(extent.is_empty());
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_draw_rasterizes_glyphs() {
        let fg = Color::rgb(0, 255, 0);
        let mut fb = Framebuffer::new(16, 8);
        Font8x8.draw(&mut fb, 0, 0, "I-", fg, Color::BLACK);
        // 'I' top bar spans columns 1..=4 of the first cell
        assert_eq!(fb.pixel(2, 0), Some(fg));
        assert_eq!(fb.pixel(0, 0), Some(Color::BLACK));
        // '-' is a bar on row 3 of the second cell
        assert_eq!(fb.pixel(8, 3), Some(fg));
        assert_eq!(fb.pixel(8, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_font_spec_deserialize() {
        #[derive(Deserialize)]
        struct Holder {
            font: FontSpec,
        }
        let holder: Holder = parse(r#"{"font":{"kind":"xglcd","path":"fonts/FixedFont5x8.c","width":5,"height":8}}"#);
        assert_eq!(
            holder.font,
            FontSpec::Xglcd {
                path: PathBuf::from("fonts/FixedFont5x8.c"),
                width: 5,
                height: 8,
                letter_count: 223,
            }
        );
        let holder: Holder = parse(r#"{"font":{"kind":"builtin8x8"}}"#);
        assert_eq!(holder.font.load().unwrap().height(), 8);
    }

    fn parse<T: serde::de::DeserializeOwned>(json: &str) -> T {
        serde_json::from_str(json).unwrap()
    }
}
