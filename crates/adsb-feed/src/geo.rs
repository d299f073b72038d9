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

//! Great-circle helpers used for range filtering.
//!
//! Distances are computed on a spherical earth with the haversine formula; the
//! bearing is the initial true bearing from the observer to the target.

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;
const KM_TO_NM: f64 = 0.539_957;

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPosition {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Haversine distance in nautical miles between two points.
#[must_use]
pub fn haversine_distance_nm(from: GeoPosition, to: GeoPosition) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lat = lat2 - lat1;
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let distance_km = 2.0 * a.sqrt().asin() * EARTH_RADIUS_KM;

    distance_km * KM_TO_NM
}

/// Initial true bearing in degrees, normalized to `[0, 360)`.
#[must_use]
pub fn true_bearing_deg(from: GeoPosition, to: GeoPosition) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// Distance (nm) and bearing (degrees) from `from` to `to`.
#[must_use]
pub fn distance_bearing(from: GeoPosition, to: GeoPosition) -> (f64, f64) {
    (haversine_distance_nm(from, to), true_bearing_deg(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        // LAX to JFK is approximately 2,150 nautical miles
        let lax = GeoPosition::new(33.9425, -118.4081);
        let jfk = GeoPosition::new(40.6413, -73.7781);
        let distance = haversine_distance_nm(lax, jfk);
        assert!((distance - 2150.0).abs() < 15.0, "got {distance}");
    }

    #[test]
    fn test_one_degree_of_latitude_is_sixty_nm() {
        let a = GeoPosition::new(37.0, -122.0);
        let b = GeoPosition::new(38.0, -122.0);
        assert!((haversine_distance_nm(a, b) - 60.0).abs() < 0.1);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = GeoPosition::new(0.0, 0.0);
        assert!(true_bearing_deg(origin, GeoPosition::new(1.0, 0.0)).abs() < 1e-6);
        assert!((true_bearing_deg(origin, GeoPosition::new(0.0, 1.0)) - 90.0).abs() < 1e-6);
        assert!((true_bearing_deg(origin, GeoPosition::new(-1.0, 0.0)) - 180.0).abs() < 1e-6);
        assert!((true_bearing_deg(origin, GeoPosition::new(0.0, -1.0)) - 270.0).abs() < 1e-6);
    }

    #[test]
    fn test_same_point_is_zero_distance() {
        let p = GeoPosition::new(37.428833, -122.114667);
        let (distance, bearing) = distance_bearing(p, p);
        assert!(distance.abs() < 1e-9);
        assert!((0.0..360.0).contains(&bearing));
    }
}
