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

//! Polling client for dump1090/readsb `aircraft.json` feeds.
//!
//! The library is split into layers that can be used independently:
//!
//! - **Protocol layer**: decoding of the `aircraft.json` document into raw records
//! - **Contact layer**: validation, range filtering and normalization into [`Contact`]s
//! - **Client layer**: HTTP fetch with a bounded timeout, and a background poller
//!
//! # Quick Start
//!
//! ```no_run
//! use adsb_feed::{ContactFilter, FeedClient, FeedConfig, GeoPosition};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let client = FeedClient::new(FeedConfig {
//!         url: "http://localhost:8080/data/aircraft.json".to_string(),
//!         ..Default::default()
//!     })
//!     .unwrap();
//!     let filter = ContactFilter {
//!         observer: GeoPosition::new(37.428833, -122.114667),
//!         radius_nm: 10.0,
//!         military_prefixes: vec!["7cf".to_string()],
//!     };
//!
//!     for contact in client.fetch_contacts(&filter).await.unwrap_or_default() {
//!         println!("{} {:.1}nm", contact.display_name(), contact.distance_nm);
//!     }
//! }
//! ```
//!
//! ## Protocol Layer Only
//!
//! ```
//! use adsb_feed::protocol::{AircraftJsonParser, Protocol};
//!
//! let mut parser = AircraftJsonParser::new();
//! let doc = br#"{"aircraft":[{"hex":"a1b2c3","lat":37.4,"lon":-122.1}]}"#;
//! if let Ok(Some(doc)) = parser.parse(doc) {
//!     println!("Got {} records", doc.aircraft.len());
//! }
//! ```

pub mod client;
pub mod contact;
pub mod geo;
pub mod poller;
pub mod protocol;

pub use client::{FeedClient, FeedConfig, FeedStatus, FetchError};
pub use contact::{Contact, ContactFilter, MAX_CALLSIGN_LEN, UNKNOWN_ID};
pub use geo::{distance_bearing, haversine_distance_nm, true_bearing_deg, GeoPosition};
pub use poller::{FeedEvent, FeedPoller, FeedUpdate};
pub use protocol::{AircraftJsonParser, FeedDocument, ParseError, Protocol, RawRecord};
