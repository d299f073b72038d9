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

//! End-to-end frames through the controller with scripted feeds and touches.

use adsb_feed::protocol::{AircraftJsonParser, Protocol};
use adsb_feed::{Contact, ContactFilter, FeedStatus, RawRecord};
use chrono::{DateTime, TimeZone, Utc};
use radarscope::surface::{DrawOp, Rect, RecordingSurface};
use radarscope::touch::TouchPoint;
use radarscope::{AppConfig, Controller, LayoutStyle, TouchOutcome};

// Split screen on 240x320 with the built-in 5x7 font: rows start at 198, 10px apart.
const FIRST_ROW_Y: i32 = 198;
const ROW_H: i32 = 10;

fn config() -> AppConfig {
    AppConfig {
        initial_layout: LayoutStyle::SplitScreen,
        ..AppConfig::default()
    }
}

/// A record due north of the observer at roughly `nm` nautical miles.
fn record(hex: &str, flight: &str, nm: f64) -> RawRecord {
    let observer = config().observer;
    RawRecord {
        hex: Some(hex.to_string()),
        flight: Some(flight.to_string()),
        lat: Some(observer.latitude + nm / 60.0),
        lon: Some(observer.longitude),
        altitude: Some(12000.0),
        speed: Some(280.0),
        track: Some(90.0),
        ..RawRecord::default()
    }
}

fn contacts(records: &[RawRecord], filter: &ContactFilter) -> Vec<Contact> {
    Contact::from_records(records, filter, 100)
}

/// Millisecond timestamps on a blink boundary: even half-periods are "on".
fn at_ms(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_700_000_000_000 + ms).unwrap()
}

fn started() -> (Controller, RecordingSurface) {
    let mut controller = Controller::new(config()).unwrap();
    let mut surface = RecordingSurface::new(240, 320);
    controller.activate(&mut surface);
    surface.take();
    (controller, surface)
}

fn row_y(row: i32) -> i32 {
    FIRST_ROW_Y + row * ROW_H
}

#[test]
fn test_range_filter_sort_and_military_blink() {
    let (mut controller, mut surface) = started();
    let config = config();
    let filter = config.contact_filter();

    let feed = [
        record("a00001", "FAR", 12.5),
        record("ae0002", "MID", 8.2),
        record("a00003", "NEAR", 5.0),
    ];
    let first = contacts(&feed, &filter);
    assert_eq!(first.len(), 2);

    let report = controller.render_frame(&mut surface, &first, FeedStatus::Active, Some(at_ms(0)), at_ms(0));
    let rows: Vec<&str> = controller
        .table()
        .unwrap()
        .rows()
        .iter()
        .map(|row| row.contact_id.as_str())
        .collect();
    assert_eq!(rows, vec!["a00003", "ae0002"]);
    assert_eq!(report.scope.unwrap().plotted, 2);
    assert!(!controller.previously_seen().contains("a00001"));
    assert_eq!(controller.previously_seen().len(), 2);

    // Next poll: the 8.2nm contact is now flagged military, in the blink-off phase.
    surface.take();
    let military_filter = ContactFilter {
        military_prefixes: vec!["AE".to_string()],
        ..filter
    };
    let second = contacts(&feed, &military_filter);
    let report = controller.render_frame(&mut surface, &second, FeedStatus::Active, Some(at_ms(500)), at_ms(500));

    let scope = report.scope.unwrap();
    assert_eq!(scope.plotted, 1);
    assert_eq!(scope.blinked_off, 1);
    assert_eq!(controller.table().unwrap().rows().len(), 2);
    let alert = config.palette.alert;
    assert!(
        surface.count(|op| matches!(op, DrawOp::Blit { rect, fg, .. } if rect.y == row_y(1) && *fg == alert)) > 0,
        "military row redrawn in the alert color"
    );

    // Back in the on phase the blip returns.
    let report = controller.render_frame(&mut surface, &second, FeedStatus::Active, Some(at_ms(1000)), at_ms(1000));
    assert_eq!(report.scope.unwrap().plotted, 2);
}

#[test]
fn test_touch_below_rows_deselects() {
    let (mut controller, mut surface) = started();
    let filter = config().contact_filter();
    let list = contacts(&[record("a00001", "ONE", 2.0), record("a00002", "TWO", 4.0)], &filter);
    controller.render_frame(&mut surface, &list, FeedStatus::Active, Some(at_ms(0)), at_ms(0));

    let outcome = controller.handle_touch(&mut surface, TouchPoint::new(60, row_y(0) + 2));
    assert_eq!(outcome, TouchOutcome::Selected("a00001".to_string()));

    let outcome = controller.handle_touch(&mut surface, TouchPoint::new(60, row_y(4)));
    assert_eq!(outcome, TouchOutcome::Deselected);
    assert_eq!(controller.selection().selected, None);
    assert_eq!(controller.selection().just_selected, None);
    assert_eq!(controller.layout(), LayoutStyle::SplitScreen);
}

#[test]
fn test_selection_moves_without_double_highlight() {
    let (mut controller, mut surface) = started();
    let config = config();
    let filter = config.contact_filter();
    let list = contacts(&[record("a00001", "ONE", 2.0), record("a00002", "TWO", 4.0)], &filter);
    controller.render_frame(&mut surface, &list, FeedStatus::Active, Some(at_ms(0)), at_ms(0));

    controller.handle_touch(&mut surface, TouchPoint::new(60, row_y(0) + 2));
    controller.render_frame(&mut surface, &list, FeedStatus::Active, Some(at_ms(1000)), at_ms(1000));

    controller.handle_touch(&mut surface, TouchPoint::new(60, row_y(1) + 2));
    assert_eq!(controller.selection().selected.as_deref(), Some("a00002"));
    surface.take();
    controller.render_frame(&mut surface, &list, FeedStatus::Active, Some(at_ms(2000)), at_ms(2000));

    let highlight = config.palette.highlight;
    let background = config.palette.background;
    let highlighted: Vec<i32> = surface
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::FillRect { rect, color } if *color == highlight => Some(rect.y + 1),
            _ => None,
        })
        .collect();
    assert_eq!(highlighted, vec![row_y(1)]);
    assert_eq!(
        surface.count(|op| matches!(op, DrawOp::FillRect { rect, color } if rect.y + 1 == row_y(0) && *color == background)),
        1
    );

    // Tapping the selected row again clears the selection.
    let outcome = controller.handle_touch(&mut surface, TouchPoint::new(60, row_y(1) + 2));
    assert_eq!(outcome, TouchOutcome::Deselected);
    assert_eq!(controller.selection().selected, None);
}

#[test]
fn test_row_truncation_and_stale_rows() {
    let (mut controller, mut surface) = started();
    let filter = config().contact_filter();
    let many: Vec<RawRecord> = (0..10u32)
        .map(|i| record(&format!("a0{i:04}"), &format!("T{i}"), 0.5 + f64::from(i) * 0.5))
        .collect();
    let list = contacts(&many, &filter);
    assert_eq!(list.len(), 10);

    controller.render_frame(&mut surface, &list, FeedStatus::Active, Some(at_ms(0)), at_ms(0));
    let max_rows = controller.table().unwrap().max_rows();
    assert_eq!(controller.table().unwrap().rows().len(), max_rows);
    assert!(max_rows < 10);

    surface.take();
    let few = &list[..3];
    controller.render_frame(&mut surface, few, FeedStatus::Active, Some(at_ms(1000)), at_ms(1000));
    assert_eq!(controller.table().unwrap().rows().len(), 3);
    assert_eq!(controller.cache().row_len(), 3);

    let background = config().palette.background;
    for row in 3..i32::try_from(max_rows).unwrap() {
        let blanked = Rect::new(8, row_y(row) - 1, 228, ROW_H);
        assert_eq!(
            surface.count(|op| matches!(op, DrawOp::FillRect { rect, color } if *rect == blanked && *color == background)),
            1,
            "row {row} blanked"
        );
    }
}

#[test]
fn test_labels_only_for_new_or_just_selected() {
    let (mut controller, mut surface) = started();
    let filter = config().contact_filter();
    let list = contacts(&[record("a00001", "ONE", 2.0), record("a00002", "TWO", 4.0)], &filter);

    let report = controller.render_frame(&mut surface, &list, FeedStatus::Active, Some(at_ms(0)), at_ms(0));
    assert_eq!(report.scope.unwrap().labeled, 2);

    let report = controller.render_frame(&mut surface, &list, FeedStatus::Active, Some(at_ms(1000)), at_ms(1000));
    assert_eq!(report.scope.unwrap().labeled, 0);

    // A new contact appears: only it is labeled.
    let grown = contacts(
        &[record("a00001", "ONE", 2.0), record("a00002", "TWO", 4.0), record("a00003", "NEW", 6.0)],
        &filter,
    );
    let report = controller.render_frame(&mut surface, &grown, FeedStatus::Active, Some(at_ms(2000)), at_ms(2000));
    assert_eq!(report.scope.unwrap().labeled, 1);

    controller.handle_touch(&mut surface, TouchPoint::new(60, row_y(1) + 2));
    let report = controller.render_frame(&mut surface, &grown, FeedStatus::Active, Some(at_ms(3000)), at_ms(3000));
    assert_eq!(report.scope.unwrap().labeled, 1);
}

#[test]
fn test_failed_fetch_keeps_statics() {
    let (mut controller, mut surface) = started();
    let report = controller.render_frame(&mut surface, &[], FeedStatus::Failed, None, at_ms(0));
    assert_eq!(report.scope.unwrap().plotted, 0);
    assert_eq!(surface.count(|op| matches!(op, DrawOp::Clear(_))), 0);
    assert!(controller.table().unwrap().rows().is_empty());
}

#[test]
fn test_feed_document_to_frame() {
    let document = br#"{
        "now": 1700000000.0,
        "messages": 1234,
        "aircraft": [
            {"hex": "a1b2c3", "flight": "UAL123  ", "lat": 37.47, "lon": -122.11, "alt_baro": 9000, "gs": 310.5, "track": 45.0, "squawk": "1200"},
            {"hex": "a4d5e6", "alt_baro": "ground"},
            {"hex": "ae0ff1", "lat": 37.40, "lon": -122.15, "alt_baro": "ground", "gs": 12.0}
        ]
    }"#;
    let parsed = AircraftJsonParser::new().parse(document).unwrap().unwrap();
    let filter = ContactFilter {
        military_prefixes: vec!["ae".to_string()],
        ..config().contact_filter()
    };
    let list = contacts(&parsed.aircraft, &filter);
    assert_eq!(list.len(), 2);
    assert!(list.iter().any(|c| c.is_military && c.altitude_ft == 0));

    let (mut controller, mut surface) = started();
    let report = controller.render_frame(&mut surface, &list, FeedStatus::Active, Some(at_ms(0)), at_ms(0));
    assert_eq!(report.scope.unwrap().plotted, 2);
    assert_eq!(controller.table().unwrap().rows().len(), 2);
}
