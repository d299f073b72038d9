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

//! Layout and selection state machine.
//!
//! The controller owns every piece of cross-frame render state: the cache,
//! the seen set, the selection and the panels. Hosts (the headless loop and
//! the emulator window) feed it touches and contact lists and hand it a
//! surface to draw on.

use std::collections::HashSet;
use std::sync::Arc;

use adsb_feed::{Contact, FeedStatus};
use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::cache::CanvasCache;
use crate::config::AppConfig;
use crate::error::RadarError;
use crate::font::TextRenderer;
use crate::layout::LayoutStyle;
use crate::scope::{PlanesFrame, RadarScope, ScopeFrame};
use crate::surface::DrawSurface;
use crate::table::{DataTable, Pick, TableFrame};
use crate::touch::TouchPoint;

/// The tracked aircraft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub selected: Option<String>,
    /// Set by a selecting touch and cleared after the next frame.
    pub just_selected: Option<String>,
}

impl Selection {
    pub fn clear(&mut self) {
        self.selected = None;
        self.just_selected = None;
    }

    /// Select `id`, or deselect it if it already is. Returns whether `id`
    /// ends up selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.selected.as_deref() == Some(id) {
            self.clear();
            false
        } else {
            self.selected = Some(id.to_string());
            self.just_selected = Some(id.to_string());
            true
        }
    }
}

/// What a touch did.
#[derive(Debug, Clone, PartialEq)]
pub enum TouchOutcome {
    LayoutChanged(LayoutStyle),
    RangeChanged(f64),
    Selected(String),
    Deselected,
    Ignored,
}

/// Draw statistics for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub scope: Option<ScopeFrame>,
    pub table_cells: usize,
}

/// Owns the panels and all render bookkeeping.
#[derive(Debug)]
pub struct Controller {
    config: AppConfig,
    layout: LayoutStyle,
    table: Option<DataTable>,
    scope: Option<RadarScope>,
    cache: CanvasCache,
    selection: Selection,
    previously_seen: HashSet<String>,
    table_font: Arc<dyn TextRenderer>,
    status_font: Arc<dyn TextRenderer>,
    last_refresh: Option<DateTime<Utc>>,
}

impl Controller {
    /// Build a controller, loading the configured fonts.
    pub fn new(config: AppConfig) -> Result<Self, RadarError> {
        let table_font = config.table_font.load()?;
        let status_font = config.status_font.load()?;
        Ok(Self::with_fonts(config, table_font, status_font))
    }

    #[must_use]
    pub fn with_fonts(config: AppConfig, table_font: Arc<dyn TextRenderer>, status_font: Arc<dyn TextRenderer>) -> Self {
        let layout = config.initial_layout;
        let width = i32::try_from(config.screen_width).unwrap_or(i32::MAX);
        let height = i32::try_from(config.screen_height).unwrap_or(i32::MAX);
        let mut controller = Self {
            config,
            layout,
            table: None,
            scope: None,
            cache: CanvasCache::new(),
            selection: Selection::default(),
            previously_seen: HashSet::new(),
            table_font,
            status_font,
            last_refresh: None,
        };
        controller.build_panels(width, height);
        controller
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn layout(&self) -> LayoutStyle {
        self.layout
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn previously_seen(&self) -> &HashSet<String> {
        &self.previously_seen
    }

    #[must_use]
    pub fn cache(&self) -> &CanvasCache {
        &self.cache
    }

    #[must_use]
    pub fn table(&self) -> Option<&DataTable> {
        self.table.as_ref()
    }

    #[must_use]
    pub fn scope(&self) -> Option<&RadarScope> {
        self.scope.as_ref()
    }

    fn build_panels(&mut self, width: i32, height: i32) {
        let geometry = self.layout.geometry(width, height);
        self.scope = geometry
            .scope
            .map(|scope| RadarScope::new(scope, Arc::clone(&self.status_font)));
        self.table = geometry
            .table
            .map(|table| DataTable::new(table, Arc::clone(&self.table_font), Arc::clone(&self.status_font)));
    }

    /// Wipe the screen and start the current layout from scratch.
    pub fn activate(&mut self, surface: &mut dyn DrawSurface) {
        surface.clear(self.config.palette.background);
        self.cache.clear_all();
        self.previously_seen.clear();
        let (width, height) = surface.size();
        self.build_panels(width, height);
        if let Some(scope) = &self.scope {
            scope.draw_scope(surface, &mut self.cache, &self.config);
        }
        self.last_refresh = None;
        debug!("Activated layout {}", self.layout);
    }

    /// Switch to `layout` and redraw. Selection is kept.
    pub fn set_layout(&mut self, surface: &mut dyn DrawSurface, layout: LayoutStyle) {
        info!("Layout {} -> {}", self.layout, layout);
        self.layout = layout;
        self.activate(surface);
    }

    /// Apply one touch.
    pub fn handle_touch(&mut self, surface: &mut dyn DrawSurface, point: TouchPoint) -> TouchOutcome {
        let TouchPoint { x, y } = point;

        if self.layout == LayoutStyle::TableOnly {
            let next = self.layout.next();
            self.set_layout(surface, next);
            return TouchOutcome::LayoutChanged(next);
        }

        if let Some(table) = self.table.as_ref().filter(|table| table.contains(x, y)) {
            return match table.pick(x, y) {
                Some(Pick::Deselect) => {
                    self.selection.clear();
                    TouchOutcome::Deselected
                }
                Some(Pick::Contact(id)) => {
                    if self.selection.toggle(&id) {
                        info!("Selected {id}");
                        TouchOutcome::Selected(id)
                    } else {
                        info!("Deselected {id}");
                        TouchOutcome::Deselected
                    }
                }
                // Header, or an empty table.
                None => {
                    let next = self.layout.next();
                    self.set_layout(surface, next);
                    TouchOutcome::LayoutChanged(next)
                }
            };
        }

        let Some(scope) = &self.scope else {
            return TouchOutcome::Ignored;
        };
        if scope.in_center_third(x, y) {
            let range = self.config.cycle_range();
            self.activate(surface);
            TouchOutcome::RangeChanged(range)
        } else {
            let next = if x < scope.center().x {
                self.layout.prev()
            } else {
                self.layout.next()
            };
            self.set_layout(surface, next);
            TouchOutcome::LayoutChanged(next)
        }
    }

    /// Draw one frame of `contacts`, then roll the per-frame state forward.
    pub fn render_frame(
        &mut self,
        surface: &mut dyn DrawSurface,
        contacts: &[Contact],
        status: FeedStatus,
        last_update: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> FrameReport {
        let mut report = FrameReport::default();
        let selected = self.selection.selected.as_deref();

        if let Some(scope) = &self.scope {
            let frame = PlanesFrame {
                contacts,
                previously_seen: &self.previously_seen,
                selected,
                just_selected: self.selection.just_selected.as_deref(),
                now_ms: u64::try_from(now.timestamp_millis()).unwrap_or(0),
            };
            report.scope = Some(scope.draw_planes(surface, &mut self.cache, &frame, &self.config));
        }

        if let Some(table) = &mut self.table {
            let frame = TableFrame {
                contacts,
                status,
                last_update,
                now,
                selected,
            };
            report.table_cells = table.draw(surface, &mut self.cache, &frame, &self.config);
        }

        self.selection.just_selected = None;
        self.previously_seen = contacts.iter().map(|c| c.id.clone()).collect();
        report
    }

    /// Wipe and redraw everything once `screen_refresh_secs` have passed
    /// since the last wipe, clearing accumulated blips. Returns whether it did.
    pub fn refresh_if_due(&mut self, surface: &mut dyn DrawSurface, now: DateTime<Utc>) -> bool {
        let interval = i64::try_from(self.config.screen_refresh_secs).unwrap_or(i64::MAX);
        if interval == 0 {
            return false;
        }
        let Some(since) = self.last_refresh else {
            self.last_refresh = Some(now);
            return false;
        };
        if (now - since).num_seconds() < interval {
            return false;
        }
        debug!("Periodic screen refresh");
        self.activate(surface);
        self.last_refresh = Some(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use adsb_feed::GeoPosition;
    use chrono::TimeZone;

    use super::*;
    use crate::font::XglcdFont;
    use crate::surface::{DrawOp, RecordingSurface};

    fn controller(layout: LayoutStyle) -> Controller {
        let config = AppConfig {
            initial_layout: layout,
            ..AppConfig::default()
        };
        let font: Arc<dyn TextRenderer> = Arc::new(XglcdFont::classic());
        Controller::with_fonts(config, Arc::clone(&font), font)
    }

    fn contact(id: &str, distance_nm: f64) -> Contact {
        let observer = AppConfig::default().observer;
        Contact {
            id: id.to_string(),
            callsign: None,
            category: None,
            squawk: None,
            position: GeoPosition::new(observer.latitude + distance_nm / 60.0, observer.longitude),
            altitude_ft: 10000,
            speed_kt: 250,
            vertical_rate_fpm: 0,
            track_deg: 0.0,
            distance_nm,
            bearing_deg: 0.0,
            is_military: false,
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_selection_toggle() {
        let mut selection = Selection::default();
        assert!(selection.toggle("a"));
        assert_eq!(selection.just_selected.as_deref(), Some("a"));
        assert!(selection.toggle("b"));
        assert_eq!(selection.selected.as_deref(), Some("b"));
        assert!(!selection.toggle("b"));
        assert_eq!(selection, Selection::default());
    }

    #[test]
    fn test_table_only_touch_cycles_layout() {
        let mut controller = controller(LayoutStyle::TableOnly);
        let mut surface = RecordingSurface::new(240, 320);
        controller.activate(&mut surface);
        let outcome = controller.handle_touch(&mut surface, TouchPoint::new(100, 250));
        assert_eq!(outcome, TouchOutcome::LayoutChanged(LayoutStyle::MaxScope));
        assert!(controller.scope().is_some());
    }

    #[test]
    fn test_scope_touches() {
        let mut controller = controller(LayoutStyle::SplitScreen);
        let mut surface = RecordingSurface::new(240, 320);
        controller.activate(&mut surface);

        let outcome = controller.handle_touch(&mut surface, TouchPoint::new(120, 80));
        assert_eq!(outcome, TouchOutcome::RangeChanged(15.0));
        assert_eq!(controller.layout(), LayoutStyle::SplitScreen);

        let outcome = controller.handle_touch(&mut surface, TouchPoint::new(20, 80));
        assert_eq!(outcome, TouchOutcome::LayoutChanged(LayoutStyle::MaxScope));

        let mut controller = self::controller(LayoutStyle::SplitScreen);
        let outcome = controller.handle_touch(&mut surface, TouchPoint::new(220, 80));
        assert_eq!(outcome, TouchOutcome::LayoutChanged(LayoutStyle::TableOnly));
    }

    #[test]
    fn test_header_touch_toggles_layout_without_selection_change() {
        let mut controller = controller(LayoutStyle::SplitScreen);
        let mut surface = RecordingSurface::new(240, 320);
        controller.activate(&mut surface);
        let contacts = vec![contact("a", 2.0)];
        controller.render_frame(&mut surface, &contacts, FeedStatus::Active, Some(at(0)), at(0));
        controller.handle_touch(&mut surface, TouchPoint::new(50, 199));
        assert_eq!(controller.selection().selected.as_deref(), Some("a"));

        let outcome = controller.handle_touch(&mut surface, TouchPoint::new(50, 175));
        assert_eq!(outcome, TouchOutcome::LayoutChanged(LayoutStyle::TableOnly));
        assert_eq!(controller.selection().selected.as_deref(), Some("a"));
    }

    #[test]
    fn test_activate_resets_frame_state() {
        let mut controller = controller(LayoutStyle::SplitScreen);
        let mut surface = RecordingSurface::new(240, 320);
        controller.activate(&mut surface);
        let contacts = vec![contact("a", 2.0), contact("b", 4.0)];
        controller.render_frame(&mut surface, &contacts, FeedStatus::Active, Some(at(0)), at(0));
        assert_eq!(controller.previously_seen().len(), 2);
        assert!(!controller.cache().is_empty());

        controller.activate(&mut surface);
        assert!(controller.previously_seen().is_empty());
        assert!(controller.cache().is_empty());
        assert_eq!(controller.cache().row_len(), 0);
        assert_eq!(surface.count(|op| matches!(op, DrawOp::Clear(_))), 2);
    }

    #[test]
    fn test_just_selected_lasts_one_frame() {
        let mut controller = controller(LayoutStyle::SplitScreen);
        let mut surface = RecordingSurface::new(240, 320);
        controller.activate(&mut surface);
        let contacts = vec![contact("a", 2.0)];
        controller.render_frame(&mut surface, &contacts, FeedStatus::Active, Some(at(0)), at(0));

        let outcome = controller.handle_touch(&mut surface, TouchPoint::new(50, 199));
        assert_eq!(outcome, TouchOutcome::Selected("a".to_string()));
        let report = controller.render_frame(&mut surface, &contacts, FeedStatus::Active, Some(at(5)), at(5));
        assert_eq!(report.scope.unwrap().labeled, 1);
        assert_eq!(controller.selection().just_selected, None);

        let report = controller.render_frame(&mut surface, &contacts, FeedStatus::Active, Some(at(10)), at(10));
        assert_eq!(report.scope.unwrap().labeled, 0);
        assert_eq!(controller.selection().selected.as_deref(), Some("a"));
    }

    #[test]
    fn test_refresh_if_due() {
        let mut controller = controller(LayoutStyle::SplitScreen);
        let mut surface = RecordingSurface::new(240, 320);
        controller.activate(&mut surface);
        assert!(!controller.refresh_if_due(&mut surface, at(0)));
        assert!(!controller.refresh_if_due(&mut surface, at(59)));
        assert!(controller.refresh_if_due(&mut surface, at(60)));
        assert!(!controller.refresh_if_due(&mut surface, at(61)));

        let mut config = controller.config().clone();
        config.screen_refresh_secs = 0;
        let font: Arc<dyn TextRenderer> = Arc::new(XglcdFont::classic());
        let mut never = Controller::with_fonts(config, Arc::clone(&font), font);
        never.refresh_if_due(&mut surface, at(0));
        assert!(!never.refresh_if_due(&mut surface, at(10_000)));
    }
}
