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

//! Display-ready aircraft contacts.
//!
//! A [`Contact`] is a validated, range-filtered view of one [`RawRecord`].
//! Contacts are rebuilt from scratch on every poll and correlated between
//! polls only through their `id`.

use log::trace;

use crate::geo::{distance_bearing, GeoPosition};
use crate::protocol::RawRecord;

/// Maximum callsign length shown anywhere on the display.
pub const MAX_CALLSIGN_LEN: usize = 8;

/// Id given to records that carry no hex address.
pub const UNKNOWN_ID: &str = "------";

/// Observer position and admission rules for building contacts.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactFilter {
    /// Observer (scope center) position.
    pub observer: GeoPosition,
    /// Contacts further than this are dropped.
    pub radius_nm: f64,
    /// Hex prefixes that mark an airframe as military (case-insensitive).
    pub military_prefixes: Vec<String>,
}

impl ContactFilter {
    fn is_military(&self, id: &str) -> bool {
        self.military_prefixes
            .iter()
            .map(|prefix| prefix.to_ascii_lowercase())
            .any(|prefix| !prefix.is_empty() && id.starts_with(&prefix))
    }
}

/// A normalized aircraft contact.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    /// Lower-cased ICAO hex address.
    pub id: String,
    /// Trimmed callsign, at most 8 characters.
    pub callsign: Option<String>,
    pub category: Option<String>,
    pub squawk: Option<String>,
    pub position: GeoPosition,
    pub altitude_ft: u32,
    pub speed_kt: u32,
    pub vertical_rate_fpm: i32,
    /// Track over ground in `[0, 360)`.
    pub track_deg: f64,
    pub distance_nm: f64,
    pub bearing_deg: f64,
    pub is_military: bool,
}

impl Contact {
    /// Build a contact from a feed record.
    ///
    /// Returns `None` for records without a position, and for records
    /// further than the filter radius. A missing or blank hex address becomes
    /// [`UNKNOWN_ID`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation, reason = "float to int casts saturate and vertical rates are far inside i32")]
    pub fn from_record(record: &RawRecord, filter: &ContactFilter) -> Option<Self> {
        let (Some(latitude), Some(longitude)) = (record.lat, record.lon) else {
            trace!("Skipping {:?}: no position", record.hex);
            return None;
        };

        let id = record
            .hex
            .as_deref()
            .map(|hex| hex.trim().to_ascii_lowercase())
            .filter(|hex| !hex.is_empty())
            .unwrap_or_else(|| UNKNOWN_ID.to_string());

        let position = GeoPosition::new(latitude, longitude);
        let (distance_nm, bearing_deg) = distance_bearing(filter.observer, position);
        if distance_nm > filter.radius_nm {
            trace!(
                "Skipping {}: {:.1}nm outside {}nm range",
                id,
                distance_nm,
                filter.radius_nm
            );
            return None;
        }

        let is_military = filter.is_military(&id);

        Some(Self {
            callsign: record.flight.as_deref().and_then(normalize_callsign),
            category: non_blank(record.category.as_deref()),
            squawk: non_blank(record.squawk.as_deref()),
            position,
            altitude_ft: non_negative(record.altitude),
            speed_kt: non_negative(record.speed),
            vertical_rate_fpm: record.vert_rate.map_or(0, |rate| rate as i32),
            track_deg: record.track.map_or(0.0, |track| track.rem_euclid(360.0)),
            distance_nm,
            bearing_deg,
            is_military,
            id,
        })
    }

    /// Build contacts from a batch of records, considering at most `max_count`.
    #[must_use]
    pub fn from_records(records: &[RawRecord], filter: &ContactFilter, max_count: usize) -> Vec<Self> {
        records
            .iter()
            .take(max_count)
            .filter_map(|record| Self::from_record(record, filter))
            .collect()
    }

    /// Callsign if known, otherwise the hex id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.callsign.as_deref().unwrap_or(&self.id)
    }
}

fn normalize_callsign(raw: &str) -> Option<String> {
    let callsign: String = raw.trim().chars().take(MAX_CALLSIGN_LEN).collect();
    if callsign.is_empty() {
        None
    } else {
        Some(callsign)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "clamped to u32 range first")]
fn non_negative(value: Option<f64>) -> u32 {
    value
        .filter(|v| v.is_finite())
        .map_or(0, |v| v.clamp(0.0, f64::from(u32::MAX)) as u32)
}
