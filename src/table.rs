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

//! Distance-sorted contact table with status footer.
//!
//! Rows are fixed-width text so a changed value overwrites the old one in
//! place. All text goes through the [`CanvasCache`]; a row's background is
//! only repainted when a different contact moves into it or its selection
//! changes.

use std::cmp::Ordering;
use std::sync::Arc;

use adsb_feed::{Contact, FeedStatus, MAX_CALLSIGN_LEN};
use chrono::{DateTime, Utc};
use log::debug;

use crate::cache::{CanvasCache, CellKey, Ink};
use crate::config::AppConfig;
use crate::font::TextRenderer;
use crate::layout::TableGeometry;
use crate::surface::{DrawSurface, Rect};

pub const TITLE: &str = "AIRCRAFT DATA";
pub const HEADERS: [&str; 6] = ["CALL", "ALT", "SPD", "DIST", "TRK", "SQUAWK"];
const COLUMN_RATIOS: [f64; 6] = [0.23, 0.15, 0.15, 0.15, 0.15, 0.17];
/// Characters each column's values need, matching [`format_columns`].
const FIELD_CHARS: [i32; 6] = [8, 5, 3, 4, 4, 4];
const FOOTER_LINES: i32 = 5;

/// Layout of one drawn row, kept for hit-testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    pub contact_id: String,
    pub y: i32,
    pub height: i32,
}

/// Result of a table hit-test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pick {
    /// A row was touched.
    Contact(String),
    /// The row area was touched below the rows.
    Deselect,
}

/// Everything the table shows for one frame.
#[derive(Debug, Clone, Copy)]
pub struct TableFrame<'a> {
    pub contacts: &'a [Contact],
    pub status: FeedStatus,
    pub last_update: Option<DateTime<Utc>>,
    pub now: DateTime<Utc>,
    pub selected: Option<&'a str>,
}

/// Vertical metrics derived from the panel and fonts.
#[derive(Debug, Clone, Copy)]
struct Metrics {
    headers_y: i32,
    start_y: i32,
    row_h: i32,
    max_rows: usize,
}

/// The contact table panel.
#[derive(Debug)]
pub struct DataTable {
    rect: Rect,
    compact: bool,
    table_font: Arc<dyn TextRenderer>,
    status_font: Arc<dyn TextRenderer>,
    rows: Vec<RowRecord>,
}

impl DataTable {
    #[must_use]
    pub fn new(geometry: TableGeometry, table_font: Arc<dyn TextRenderer>, status_font: Arc<dyn TextRenderer>) -> Self {
        Self {
            rect: geometry.rect,
            compact: geometry.compact,
            table_font,
            status_font,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Rows laid out by the last draw.
    #[must_use]
    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }

    /// How many rows fit in the panel.
    #[must_use]
    pub fn max_rows(&self) -> usize {
        self.metrics().max_rows
    }

    fn metrics(&self) -> Metrics {
        let font_h = self.table_font.height();
        let headers_y = self.rect.y + 16;
        let start_y = headers_y + font_h + 4;
        let row_h = font_h + 2;

        let used = start_y - self.rect.y;
        let available = if self.compact {
            self.rect.h - used - 4
        } else {
            let footer_h = FOOTER_LINES * self.status_font.height() + 8;
            self.rect.h - used - footer_h
        };
        let max_rows = usize::try_from(available / row_h.max(1)).unwrap_or(0).max(1);

        Metrics {
            headers_y,
            start_y,
            row_h,
            max_rows,
        }
    }

    /// Left edge and width of each column.
    ///
    /// Columns start from their ratio share, widen to fit their values in the
    /// table font, and give back slack from the right to stay on the panel.
    fn columns(&self) -> [(i32, i32); 6] {
        let total = self.rect.w - 12;
        let char_w = self.table_font.char_width().max(1);
        let mut widths = [0; 6];
        for ((width, ratio), chars) in widths.iter_mut().zip(COLUMN_RATIOS).zip(FIELD_CHARS) {
            *width = scale(f64::from(total), ratio).max(chars * char_w);
        }

        let mut excess = widths.iter().sum::<i32>() - total;
        for (width, chars) in widths.iter_mut().zip(FIELD_CHARS).rev() {
            if excess <= 0 {
                break;
            }
            let give = (*width - chars * char_w).max(0).min(excess);
            *width -= give;
            excess -= give;
        }

        let mut columns = [(0, 0); 6];
        let mut x = self.rect.x + 6;
        for (column, width) in columns.iter_mut().zip(widths) {
            *column = (x, width);
            x += width;
        }
        columns
    }

    /// Draw the table. Returns the number of text cells physically drawn.
    pub fn draw(
        &mut self,
        surface: &mut dyn DrawSurface,
        cache: &mut CanvasCache,
        frame: &TableFrame<'_>,
        config: &AppConfig,
    ) -> usize {
        let palette = config.palette;
        let metrics = self.metrics();
        let columns = self.columns();
        let font = Arc::clone(&self.table_font);
        let mut drawn = 0;

        // Static chrome: only redrawn when the title had to be, i.e. after a wipe.
        let title_x = self.rect.x + self.rect.w / 2 - font.text_width(TITLE) / 2;
        let header_ink = Ink::new(palette.amber, palette.background);
        if cache.draw_text(surface, font.as_ref(), CellKey::new(title_x, self.rect.y + 4), TITLE, header_ink, false) {
            drawn += 1;
            surface.draw_rect(self.rect, palette.bright);
            let separator_y = metrics.headers_y + font.height();
            surface.draw_line(
                self.rect.x + 4,
                separator_y,
                self.rect.right() - 4,
                separator_y,
                palette.dim,
            );
        }
        for (header, (x, width)) in HEADERS.iter().zip(columns) {
            let header = clip(header, width, font.as_ref());
            if cache.draw_text(surface, font.as_ref(), CellKey::new(x, metrics.headers_y), &header, header_ink, false) {
                drawn += 1;
            }
        }

        let mut sorted: Vec<&Contact> = frame.contacts.iter().collect();
        sorted.sort_by(|a, b| by_distance(a, b));

        self.rows.clear();
        cache.begin_rows();
        for (i, contact) in sorted.iter().take(metrics.max_rows).enumerate() {
            let y = metrics.start_y + i32::try_from(i).unwrap_or(i32::MAX) * metrics.row_h;
            let selected = frame.selected == Some(contact.id.as_str());
            self.rows.push(RowRecord {
                contact_id: contact.id.clone(),
                y,
                height: metrics.row_h,
            });

            let bg = if selected { palette.highlight } else { palette.background };
            let repaint = cache.row_changed(y, &contact.id, selected);
            if repaint {
                cache.erase(surface, self.row_rect(y, metrics.row_h), bg);
            }
            cache.set_row(y, &contact.id, selected);

            let fg = if selected {
                palette.contrast
            } else if contact.is_military {
                palette.alert
            } else {
                palette.bright
            };
            for (text, (x, width)) in format_columns(contact).iter().zip(columns) {
                let text = clip(text, width, font.as_ref());
                if cache.draw_text(surface, font.as_ref(), CellKey::new(x, y), &text, Ink::new(fg, bg), repaint) {
                    drawn += 1;
                }
            }
        }

        for y in cache.stale_rows() {
            cache.erase(surface, self.row_rect(y, metrics.row_h), palette.background);
        }
        cache.commit_rows();

        if !self.compact {
            drawn += self.draw_footer(surface, cache, frame, config);
        }

        debug!(
            "Table: {} of {} rows shown, {} cells drawn",
            self.rows.len(),
            frame.contacts.len(),
            drawn
        );
        drawn
    }

    fn row_rect(&self, y: i32, row_h: i32) -> Rect {
        Rect::new(self.rect.x + 4, y - 1, self.rect.w - 8, row_h)
    }

    fn draw_footer(
        &self,
        surface: &mut dyn DrawSurface,
        cache: &mut CanvasCache,
        frame: &TableFrame<'_>,
        config: &AppConfig,
    ) -> usize {
        let palette = config.palette;
        let font = self.status_font.as_ref();
        let line_h = font.height();
        let columns = usize::try_from((self.rect.w - 12) / font.char_width().max(1)).unwrap_or(0);

        let military = frame.contacts.iter().filter(|c| c.is_military).count();
        let countdown = countdown_text(frame.last_update, frame.now, config.fetch_interval_secs);
        let lines = [
            (format!("STATUS: {}", frame.status), status_color(frame.status, config)),
            (
                format!("CONTACTS: {} ({} MIL)", frame.contacts.len(), military),
                palette.bright,
            ),
            (format!("RANGE: {}NM", config.radius_nm), palette.bright),
            (
                format!("NEXT: {countdown}"),
                if countdown == UPDATING { palette.amber } else { palette.bright },
            ),
            (
                format!("CACHE: {} TXT {} ROW", cache.len(), cache.row_len()),
                palette.dim,
            ),
        ];

        let top = self.rect.bottom() - FOOTER_LINES * line_h - 4;
        let mut drawn = 0;
        for (i, (text, color)) in lines.iter().enumerate() {
            let y = top + i32::try_from(i).unwrap_or(0) * line_h;
            let padded = pad(text, columns);
            if cache.draw_text(
                surface,
                font,
                CellKey::new(self.rect.x + 6, y),
                &padded,
                Ink::new(*color, palette.background),
                false,
            ) {
                drawn += 1;
            }
        }
        drawn
    }

    /// Whether `(x, y)` is on the panel.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rect.contains(x, y)
    }

    /// Whether `(x, y)` is on the panel above the first row.
    #[must_use]
    pub fn is_header(&self, x: i32, y: i32) -> bool {
        self.contains(x, y) && y < self.metrics().start_y - 1
    }

    /// Hit-test against the rows of the last draw.
    #[must_use]
    pub fn pick(&self, x: i32, y: i32) -> Option<Pick> {
        if !self.contains(x, y) {
            return None;
        }
        if let Some(row) = self
            .rows
            .iter()
            .find(|row| y >= row.y - 1 && y < row.y - 1 + row.height)
        {
            return Some(Pick::Contact(row.contact_id.clone()));
        }
        match self.rows.first() {
            Some(first) if y >= first.y => Some(Pick::Deselect),
            _ => None,
        }
    }
}

const UPDATING: &str = "UPDATING";

fn status_color(status: FeedStatus, config: &AppConfig) -> crate::surface::Color {
    match status {
        FeedStatus::Failed => config.palette.alert,
        FeedStatus::Scanning => config.palette.amber,
        _ => config.palette.bright,
    }
}

#[allow(clippy::cast_possible_truncation, reason = "column widths are small positive pixel counts")]
fn scale(total: f64, ratio: f64) -> i32 {
    (total * ratio) as i32
}

/// Ascending distance; a NaN distance sorts after everything else.
fn by_distance(a: &Contact, b: &Contact) -> Ordering {
    let key = |c: &Contact| {
        if c.distance_nm.is_nan() {
            f64::INFINITY
        } else {
            c.distance_nm
        }
    };
    key(a).total_cmp(&key(b))
}

/// Cut `text` to the characters that fit in `width` pixels, so a cell never
/// paints over its right-hand neighbour.
fn clip(text: &str, width: i32, font: &dyn TextRenderer) -> String {
    let fits = usize::try_from(width / font.char_width().max(1)).unwrap_or(0);
    text.chars().take(fits).collect()
}

/// Pad or cut `text` to exactly `columns` characters.
fn pad(text: &str, columns: usize) -> String {
    let cut: String = text.chars().take(columns).collect();
    format!("{cut:<columns$}")
}

fn countdown_text(last_update: Option<DateTime<Utc>>, now: DateTime<Utc>, interval_secs: u64) -> String {
    let interval_ms = i64::try_from(interval_secs.saturating_mul(1000)).unwrap_or(i64::MAX);
    let remaining_ms = last_update.map_or(0, |at| interval_ms - (now - at).num_milliseconds());
    if remaining_ms > 0 {
        format!("{:02}S", remaining_ms / 1000)
    } else {
        UPDATING.to_string()
    }
}

/// Fixed-width column values for one contact.
#[must_use]
#[allow(clippy::cast_possible_truncation, reason = "display values are whole numbers of bounded size")]
pub fn format_columns(contact: &Contact) -> [String; 6] {
    let call: String = contact.display_name().chars().take(MAX_CALLSIGN_LEN).collect();

    let altitude = if contact.altitude_ft > 0 {
        format!("{:>5}", contact.altitude_ft)
    } else {
        format!("{:>5}", "-")
    };

    let speed = if contact.speed_kt > 0 {
        format!("{:>3}", contact.speed_kt)
    } else {
        format!("{:>3}", "-")
    };

    let distance = if contact.distance_nm > 0.0 && contact.distance_nm.is_finite() {
        if contact.distance_nm < 100.0 {
            format!("{:>4}", format!("{:.1}", contact.distance_nm))
        } else {
            format!("{:>3}+", contact.distance_nm as i64).chars().take(4).collect()
        }
    } else {
        format!("{:>4}", "-")
    };

    let track = if contact.track_deg > 0.0 {
        format!("{:>3}°", contact.track_deg as i64)
    } else {
        format!("{:>4}", "-")
    };

    let squawk = match &contact.squawk {
        Some(code) => format!("{:<4}", code.chars().take(4).collect::<String>()),
        None => format!("{:<4}", "-"),
    };

    [format!("{call:<8}"), altitude, speed, distance, track, squawk]
}
