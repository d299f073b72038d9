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

//! Application configuration management.
//!
//! Configuration is stored as TOML via `confy`. Every field has a serde
//! default, so a partial file (or none at all) yields a working setup. The
//! range is the one value that changes at runtime, through
//! [`AppConfig::cycle_range`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use adsb_feed::{ContactFilter, FeedConfig, GeoPosition};
use log::info;
use serde::{Deserialize, Serialize};

use crate::font::FontSpec;
use crate::layout::LayoutStyle;
use crate::surface::Palette;

const APP_NAME: &str = "radarscope";
const CONFIG_NAME: &str = "config";

/// Range steps selected by tapping the scope center, in nautical miles.
const RANGE_STEPS: [(f64, f64); 5] = [(5.0, 10.0), (10.0, 15.0), (15.0, 30.0), (30.0, 50.0), (50.0, 5.0)];

/// Range used when the current one is not in the step table.
const FALLBACK_RANGE_NM: f64 = 5.0;

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Configuration schema version for migrations
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// URL of the dump1090/readsb `aircraft.json` document
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    /// Observer position; the center of the scope
    #[serde(default = "default_observer")]
    pub observer: GeoPosition,

    /// Scope range in nautical miles
    #[serde(default = "default_radius_nm")]
    pub radius_nm: f64,

    /// Trail length for a stationary contact, in pixels
    #[serde(default = "default_trail_min_px")]
    pub trail_min_px: i32,

    /// Trail length at or above `trail_max_speed_kt`, in pixels
    #[serde(default = "default_trail_max_px")]
    pub trail_max_px: i32,

    #[serde(default = "default_trail_max_speed_kt")]
    pub trail_max_speed_kt: f64,

    /// Blink military contacts on the scope
    #[serde(default = "default_true")]
    pub blink_military: bool,

    /// Full on/off blink cycle in milliseconds
    #[serde(default = "default_blink_period_ms")]
    pub blink_period_ms: u64,

    #[serde(default = "default_fetch_interval_secs")]
    pub fetch_interval_secs: u64,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Maximum number of feed records considered per poll
    #[serde(default = "default_max_contacts")]
    pub max_contacts: usize,

    /// ICAO hex prefixes treated as military
    #[serde(default = "default_military_prefixes")]
    pub military_prefixes: Vec<String>,

    /// Named reference points drawn on the scope
    #[serde(default)]
    pub waypoints: BTreeMap<String, GeoPosition>,

    /// Label each range ring with its distance
    #[serde(default)]
    pub label_rings: bool,

    #[serde(default = "default_font")]
    pub table_font: FontSpec,

    /// Font for the footer and scope labels
    #[serde(default = "default_font")]
    pub status_font: FontSpec,

    #[serde(default = "default_screen_width")]
    pub screen_width: u32,

    #[serde(default = "default_screen_height")]
    pub screen_height: u32,

    #[serde(default)]
    pub initial_layout: LayoutStyle,

    /// Full screen wipe interval in seconds (0 disables)
    #[serde(default = "default_screen_refresh_secs")]
    pub screen_refresh_secs: u64,

    /// Upper bound for one touch poll, in milliseconds
    #[serde(default = "default_touch_poll_ms")]
    pub touch_poll_ms: u64,

    /// Touch sampling step within a poll, in milliseconds
    #[serde(default = "default_touch_step_ms")]
    pub touch_step_ms: u64,

    #[serde(default)]
    pub palette: Palette,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

fn default_feed_url() -> String {
    FeedConfig::default().url
}

fn default_observer() -> GeoPosition {
    GeoPosition::new(37.428833, -122.114667)
}

fn default_radius_nm() -> f64 {
    10.0
}

fn default_trail_min_px() -> i32 {
    4
}

fn default_trail_max_px() -> i32 {
    18
}

fn default_trail_max_speed_kt() -> f64 {
    600.0
}

fn default_true() -> bool {
    true
}

fn default_blink_period_ms() -> u64 {
    1000
}

fn default_fetch_interval_secs() -> u64 {
    5
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_max_contacts() -> usize {
    100
}

fn default_military_prefixes() -> Vec<String> {
    vec!["7CF".to_string()]
}

fn default_font() -> FontSpec {
    FontSpec::Builtin5x7
}

fn default_screen_width() -> u32 {
    240
}

fn default_screen_height() -> u32 {
    320
}

fn default_screen_refresh_secs() -> u64 {
    60
}

fn default_touch_poll_ms() -> u64 {
    1000
}

fn default_touch_step_ms() -> u64 {
    50
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            feed_url: default_feed_url(),
            observer: default_observer(),
            radius_nm: default_radius_nm(),
            trail_min_px: default_trail_min_px(),
            trail_max_px: default_trail_max_px(),
            trail_max_speed_kt: default_trail_max_speed_kt(),
            blink_military: true,
            blink_period_ms: default_blink_period_ms(),
            fetch_interval_secs: default_fetch_interval_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            max_contacts: default_max_contacts(),
            military_prefixes: default_military_prefixes(),
            waypoints: BTreeMap::new(),
            label_rings: false,
            table_font: default_font(),
            status_font: default_font(),
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
            initial_layout: LayoutStyle::default(),
            screen_refresh_secs: default_screen_refresh_secs(),
            touch_poll_ms: default_touch_poll_ms(),
            touch_step_ms: default_touch_step_ms(),
            palette: Palette::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self, confy::ConfyError> {
        info!("Loading configuration from {}", Self::config_path()?.display());
        confy::load(APP_NAME, CONFIG_NAME)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self, confy::ConfyError> {
        info!("Loading configuration from {}", path.display());
        confy::load_path(path)
    }

    /// Get the config file path for display to user
    pub fn config_path() -> Result<PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }

    /// Step the range through 5, 10, 15, 30 and 50 nm, wrapping around.
    /// Returns the new range.
    pub fn cycle_range(&mut self) -> f64 {
        self.radius_nm = next_range(self.radius_nm);
        info!("Range set to {}nm", self.radius_nm);
        self.radius_nm
    }

    /// Admission rules for building contacts from the feed
    #[must_use]
    pub fn contact_filter(&self) -> ContactFilter {
        ContactFilter {
            observer: self.observer,
            radius_nm: self.radius_nm,
            military_prefixes: self.military_prefixes.clone(),
        }
    }

    #[must_use]
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            url: self.feed_url.clone(),
            timeout: Duration::from_secs(self.fetch_timeout_secs),
            max_count: self.max_contacts,
        }
    }

    #[must_use]
    pub fn fetch_interval(&self) -> Duration {
        Duration::from_secs(self.fetch_interval_secs)
    }
}

fn next_range(current: f64) -> f64 {
    RANGE_STEPS
        .iter()
        .find(|(from, _)| (current - from).abs() < f64::EPSILON)
        .map_or(FALLBACK_RANGE_NM, |&(_, to)| to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_cycle() {
        let mut config = AppConfig::default();
        config.radius_nm = 5.0;
        let seen: Vec<f64> = (0..5).map(|_| config.cycle_range()).collect();
        assert_eq!(seen, vec![10.0, 15.0, 30.0, 50.0, 5.0]);
    }

    #[test]
    fn test_unknown_range_falls_back() {
        let mut config = AppConfig::default();
        config.radius_nm = 12.5;
        assert!((config.cycle_range() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_contact_filter_follows_range() {
        let mut config = AppConfig::default();
        config.cycle_range();
        let filter = config.contact_filter();
        assert!((filter.radius_nm - 15.0).abs() < f64::EPSILON);
        assert_eq!(filter.military_prefixes, vec!["7CF".to_string()]);
        assert_eq!(filter.observer, config.observer);
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"radius_nm": 30.0, "waypoints": {"KPAO": {"latitude": 37.461, "longitude": -122.115}}}"#,
        )
        .unwrap();
        assert!((config.radius_nm - 30.0).abs() < f64::EPSILON);
        assert_eq!(config.fetch_interval(), Duration::from_secs(5));
        assert_eq!(config.screen_width, 240);
        assert_eq!(config.table_font, FontSpec::Builtin5x7);
        assert_eq!(config.waypoints.len(), 1);
        assert_eq!(config.palette, Palette::default());
    }

    #[test]
    fn test_feed_config() {
        let config = AppConfig::default();
        let feed = config.feed_config();
        assert_eq!(feed.timeout, Duration::from_secs(10));
        assert_eq!(feed.max_count, 100);
        assert_eq!(feed.url, config.feed_url);
    }
}
