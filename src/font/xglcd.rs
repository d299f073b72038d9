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

//! XGLCD fixed-width bitmap fonts.
//!
//! The XGLCD `.c` export holds one glyph per line:
//!
//! ```text
//! 0x05, 0x7E, 0x11, 0x11, 0x11, 0x7E,  // Code for char A
//! ```
//!
//! The first byte is the glyph's pixel width, followed by column data,
//! left to right, `ceil(height / 8)` bytes per column with the least
//! significant bit at the top. Glyphs start at ASCII 32.

use std::path::Path;

use log::debug;

use super::TextRenderer;
use crate::error::RadarError;

const FIRST_CHAR: u32 = 32;
const SPACING: i32 = 1;

#[derive(Debug, Clone)]
struct Glyph {
    width: u8,
    columns: Vec<u8>,
}

/// A fixed-width bitmap font in XGLCD column layout.
#[derive(Debug, Clone)]
pub struct XglcdFont {
    width: u8,
    height: u8,
    glyphs: Vec<Glyph>,
}

impl XglcdFont {
    /// Load an XGLCD `.c` font file.
    pub fn load(path: &Path, width: u8, height: u8, letter_count: usize) -> Result<Self, RadarError> {
        let source = std::fs::read_to_string(path).map_err(|e| RadarError::Font {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let font = Self::parse(&source, width, height, letter_count).map_err(|reason| RadarError::Font {
            path: path.to_path_buf(),
            reason,
        })?;
        debug!(
            "Loaded {}x{} font with {} glyphs from {}",
            width,
            height,
            font.glyphs.len(),
            path.display()
        );
        Ok(font)
    }

    /// Parse XGLCD source text.
    pub fn parse(source: &str, width: u8, height: u8, letter_count: usize) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("invalid font size {width}x{height}"));
        }

        let mut data = Vec::new();
        for line in source.lines().map(str::trim).filter(|line| line.starts_with("0x")) {
            let values = line.split("//").next().unwrap_or_default();
            for token in values.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                let digits = token.trim_start_matches("0x").trim_start_matches("0X");
                let byte = u8::from_str_radix(digits, 16).map_err(|e| format!("bad byte {token:?}: {e}"))?;
                data.push(byte);
            }
        }

        let bytes_per_letter = usize::from(bytes_per_column(height)) * usize::from(width) + 1;
        let glyphs: Vec<Glyph> = data
            .chunks_exact(bytes_per_letter)
            .take(letter_count)
            .map(|chunk| Glyph {
                width: chunk[0].min(width),
                columns: chunk[1..].to_vec(),
            })
            .collect();

        if glyphs.is_empty() {
            return Err("no glyph data found".to_string());
        }
        Ok(Self { width, height, glyphs })
    }

    /// The built-in 5x7 font on an 8 pixel line.
    #[must_use]
    pub fn classic() -> Self {
        let mut glyphs: Vec<Glyph> = CLASSIC_5X7
            .iter()
            .map(|columns| Glyph {
                width: 5,
                columns: columns.to_vec(),
            })
            .collect();

        // Pad up to the Latin-1 degree sign so track readouts render.
        let degree_index = usize::try_from(u32::from('°') - FIRST_CHAR).unwrap_or(0);
        glyphs.resize(
            degree_index,
            Glyph {
                width: 0,
                columns: Vec::new(),
            },
        );
        glyphs.push(Glyph {
            width: 4,
            columns: vec![0x06, 0x09, 0x09, 0x06, 0x00],
        });

        Self {
            width: 5,
            height: 8,
            glyphs,
        }
    }

    fn glyph(&self, ch: char) -> Option<&Glyph> {
        let index = u32::from(ch).checked_sub(FIRST_CHAR)?;
        self.glyphs.get(usize::try_from(index).ok()?)
    }
}

fn bytes_per_column(height: u8) -> u8 {
    (height - 1) / 8 + 1
}

impl TextRenderer for XglcdFont {
    fn char_width(&self) -> i32 {
        i32::from(self.width) + SPACING
    }

    fn height(&self) -> i32 {
        i32::from(self.height)
    }

    fn glyph_pixel(&self, ch: char, x: i32, y: i32) -> bool {
        let Some(glyph) = self.glyph(ch) else {
            return false;
        };
        let (Ok(x), Ok(y)) = (u8::try_from(x), u8::try_from(y)) else {
            return false;
        };
        if x >= glyph.width || y >= self.height {
            return false;
        }
        let per_column = bytes_per_column(self.height);
        let index = usize::from(x) * usize::from(per_column) + usize::from(y / 8);
        glyph.columns.get(index).is_some_and(|byte| byte & (1 << (y % 8)) != 0)
    }
}

#[rustfmt::skip]
const CLASSIC_5X7: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x08, 0x14, 0x22, 0x41, 0x00], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x00, 0x41, 0x22, 0x14, 0x08], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x7F, 0x41, 0x41, 0x00], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x7F, 0x10, 0x28, 0x44, 0x00], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x08, 0x04, 0x08, 0x10, 0x08], // ~
];
