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

//! Geographic to scope-pixel projection.
//!
//! A local flat-earth approximation: one degree of latitude is 111 km and
//! longitude is scaled by the cosine of the center latitude. Good enough for
//! a scope a few tens of nautical miles across; range filtering uses the
//! haversine distance from [`adsb_feed::geo`] instead.

use adsb_feed::GeoPosition;

const KM_PER_DEGREE: f64 = 111.0;
const KM_PER_NM: f64 = 1.852;

/// An integer screen coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Maps positions around `center` onto a disk of `screen_radius_px` pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub center: GeoPosition,
    pub radius_nm: f64,
    pub screen_center: ScreenPoint,
    pub screen_radius_px: i32,
}

impl Projection {
    /// Project `position`, or `None` if it falls outside the scope disk.
    ///
    /// The disk is closed: a point exactly on the rim is inside.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, reason = "pixel coordinates truncate toward zero")]
    pub fn project(&self, position: GeoPosition) -> Option<ScreenPoint> {
        if self.radius_nm <= 0.0 || self.screen_radius_px <= 0 {
            return None;
        }

        let lat_km = (position.latitude - self.center.latitude) * KM_PER_DEGREE;
        let lon_km = (position.longitude - self.center.longitude)
            * KM_PER_DEGREE
            * self.center.latitude.to_radians().cos();

        let radius = f64::from(self.screen_radius_px);
        let scale = radius / (self.radius_nm * KM_PER_NM);
        let dx = lon_km * scale;
        let dy = -lat_km * scale;

        if dx * dx + dy * dy > radius * radius {
            return None;
        }

        let x = f64::from(self.screen_center.x) + dx;
        let y = f64::from(self.screen_center.y) + dy;
        Some(ScreenPoint::new(x as i32, y as i32))
    }
}
