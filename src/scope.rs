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

//! Circular radar scope.
//!
//! Rings, crosshairs and waypoints are drawn once per activation. Contacts
//! are plotted on top every frame without erasing the previous positions;
//! old blips stay until the next full wipe. Labels are only drawn for
//! contacts that were not on screen last frame, or for one frame after a
//! contact is tapped.

use std::collections::HashSet;
use std::sync::Arc;

use adsb_feed::Contact;
use log::debug;

use crate::cache::{CanvasCache, CellKey, Ink};
use crate::config::AppConfig;
use crate::font::TextRenderer;
use crate::layout::ScopeGeometry;
use crate::projection::{Projection, ScreenPoint};
use crate::surface::{DrawSurface, Rect};

const RINGS: i32 = 3;
const RING_STEP_DEG: usize = 30;
const SELECTION_RING_PX: i32 = 6;
const LABELED_DOT_PX: i32 = 3;
const DOT_PX: i32 = 2;
const LABEL_OFFSET: (i32, i32) = (8, -12);

/// Per-frame inputs for plotting contacts.
#[derive(Debug, Clone, Copy)]
pub struct PlanesFrame<'a> {
    pub contacts: &'a [Contact],
    /// Ids plotted last frame; their labels are not redrawn.
    pub previously_seen: &'a HashSet<String>,
    pub selected: Option<&'a str>,
    /// Contact tapped since the last frame; gets a highlight ring and label.
    pub just_selected: Option<&'a str>,
    /// Wall clock in milliseconds, for the blink phase.
    pub now_ms: u64,
}

/// What [`RadarScope::draw_planes`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeFrame {
    pub plotted: usize,
    pub labeled: usize,
    /// Military contacts skipped in the off half of the blink cycle.
    pub blinked_off: usize,
    /// Contacts outside the scope disk.
    pub off_scope: usize,
}

/// The scope panel.
#[derive(Debug)]
pub struct RadarScope {
    center: ScreenPoint,
    radius: i32,
    font: Arc<dyn TextRenderer>,
}

impl RadarScope {
    #[must_use]
    pub fn new(geometry: ScopeGeometry, font: Arc<dyn TextRenderer>) -> Self {
        Self {
            center: geometry.center,
            radius: geometry.radius,
            font,
        }
    }

    #[must_use]
    pub fn center(&self) -> ScreenPoint {
        self.center
    }

    #[must_use]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Bounding box of the scope disk.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::around(self.center.x, self.center.y, self.radius)
    }

    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.bounds().contains(x, y)
    }

    /// Whether `(x, y)` is in the middle third of the bounding box on both axes.
    #[must_use]
    pub fn in_center_third(&self, x: i32, y: i32) -> bool {
        let bounds = self.bounds();
        let third = bounds.w / 3;
        let middle = Rect::new(bounds.x + third, bounds.y + third, third, third);
        middle.contains(x, y)
    }

    #[must_use]
    pub fn projection(&self, config: &AppConfig) -> Projection {
        Projection {
            center: config.observer,
            radius_nm: config.radius_nm,
            screen_center: self.center,
            screen_radius_px: self.radius,
        }
    }

    /// Draw the static parts: range rings, crosshairs and waypoints.
    pub fn draw_scope(&self, surface: &mut dyn DrawSurface, cache: &mut CanvasCache, config: &AppConfig) {
        let dim = config.palette.dim;
        for ring in 1..=RINGS {
            let points = ring_points(self.center, self.radius * ring / RINGS);
            surface.draw_polyline(&points, dim);
        }

        let (cx, cy, r) = (self.center.x, self.center.y, self.radius);
        surface.draw_line(cx - r, cy, cx + r, cy, dim);
        surface.draw_line(cx, cy - r, cx, cy + r, dim);

        let projection = self.projection(config);
        for position in config.waypoints.values() {
            if let Some(point) = projection.project(*position) {
                surface.draw_pixel(point.x, point.y, config.palette.amber);
            }
        }
        cache.invalidate(self.bounds());

        self.stamp_labels(surface, cache, config, true);
    }

    /// Ring and waypoint labels, through the cache. `force` redraws them
    /// even where the cache says they are intact.
    fn stamp_labels(&self, surface: &mut dyn DrawSurface, cache: &mut CanvasCache, config: &AppConfig, force: bool) {
        let font = self.font.as_ref();
        let background = config.palette.background;

        if config.label_rings {
            let ink = Ink::new(config.palette.dim, background);
            for ring in 1..=RINGS {
                let ring_radius = self.radius * ring / RINGS;
                let label = format!("{}NM", ring_range_nm(config.radius_nm, ring));
                let at = CellKey::new(self.center.x + ring_radius - 20, self.center.y + 5);
                cache.draw_text(surface, font, at, &label, ink, force);
            }
        }

        let projection = self.projection(config);
        let ink = Ink::new(config.palette.amber, background);
        for (name, position) in &config.waypoints {
            if name.is_empty() {
                continue;
            }
            if let Some(point) = projection.project(*position) {
                cache.draw_text(surface, font, CellKey::new(point.x - 5, point.y + 2), name, ink, force);
            }
        }
    }

    /// Plot this frame's contacts.
    pub fn draw_planes(
        &self,
        surface: &mut dyn DrawSurface,
        cache: &mut CanvasCache,
        frame: &PlanesFrame<'_>,
        config: &AppConfig,
    ) -> ScopeFrame {
        let palette = config.palette;
        let projection = self.projection(config);
        let blink_on = !config.blink_military || blink_phase_on(frame.now_ms, config.blink_period_ms);
        let mut stats = ScopeFrame::default();

        for contact in frame.contacts {
            let Some(ScreenPoint { x, y }) = projection.project(contact.position) else {
                stats.off_scope += 1;
                continue;
            };
            if contact.is_military && !blink_on {
                stats.blinked_off += 1;
                continue;
            }

            let show_label = !frame.previously_seen.contains(&contact.id);
            let ring = frame.just_selected == Some(contact.id.as_str());
            let selected = frame.selected == Some(contact.id.as_str());
            let pip = if contact.is_military { palette.alert } else { palette.bright };

            if ring {
                surface.draw_circle(x, y, SELECTION_RING_PX, palette.highlight);
                cache.invalidate(Rect::around(x, y, SELECTION_RING_PX));
            }

            let dot = if show_label { LABELED_DOT_PX } else { DOT_PX };
            surface.fill_circle(x, y, dot, pip);
            cache.invalidate(Rect::around(x, y, dot));

            if contact.track_deg > 0.0 {
                let (tx, ty) = trail_end(x, y, contact, config);
                let color = if selected { palette.highlight } else { palette.dim };
                surface.draw_line(tx, ty, x, y, color);
                cache.invalidate(line_bounds(x, y, tx, ty));
            }

            if show_label || ring {
                let color = if ring { palette.highlight } else { pip };
                let extent = self.font.draw(
                    surface,
                    x + LABEL_OFFSET.0,
                    y + LABEL_OFFSET.1,
                    contact.display_name(),
                    color,
                    palette.background,
                );
                cache.invalidate(extent);
                stats.labeled += 1;
            }

            stats.plotted += 1;
        }

        self.stamp_labels(surface, cache, config, false);

        debug!(
            "Scope: {} plotted, {} labeled, {} blinked off, {} off scope",
            stats.plotted, stats.labeled, stats.blinked_off, stats.off_scope
        );
        stats
    }
}

/// True during the visible half of the blink cycle.
#[must_use]
pub fn blink_phase_on(now_ms: u64, period_ms: u64) -> bool {
    let half = period_ms / 2;
    half == 0 || (now_ms / half) % 2 == 0
}

/// A closed 12-segment ring approximation, 13 points.
#[allow(clippy::cast_possible_truncation, reason = "pixel offsets truncate toward zero")]
fn ring_points(center: ScreenPoint, radius: i32) -> Vec<(i32, i32)> {
    (0..=360)
        .step_by(RING_STEP_DEG)
        .map(|deg: i32| {
            let rad = f64::from(deg % 360).to_radians();
            let r = f64::from(radius);
            (center.x + (r * rad.cos()) as i32, center.y + (r * rad.sin()) as i32)
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, reason = "ring labels are whole miles")]
fn ring_range_nm(radius_nm: f64, ring: i32) -> i64 {
    (f64::from(ring) / f64::from(RINGS) * radius_nm) as i64
}

/// Far end of the track trail; length grows with speed.
#[allow(clippy::cast_possible_truncation, reason = "pixel coordinates truncate toward zero")]
fn trail_end(x: i32, y: i32, contact: &Contact, config: &AppConfig) -> (i32, i32) {
    let min_len = f64::from(config.trail_min_px);
    let max_len = f64::from(config.trail_max_px);
    let fraction = if config.trail_max_speed_kt > 0.0 {
        f64::from(contact.speed_kt).min(config.trail_max_speed_kt) / config.trail_max_speed_kt
    } else {
        1.0
    };
    let length = min_len + (max_len - min_len) * fraction;
    let track = contact.track_deg.to_radians();
    (
        (f64::from(x) + length * track.sin()) as i32,
        (f64::from(y) - length * track.cos()) as i32,
    )
}

fn line_bounds(x0: i32, y0: i32, x1: i32, y1: i32) -> Rect {
    let (left, top) = (x0.min(x1), y0.min(y1));
    Rect::new(left, top, (x0 - x1).abs() + 1, (y0 - y1).abs() + 1)
}
