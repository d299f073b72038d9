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

//! Protocol layer for aircraft feed documents.
//!
//! This module provides a trait-based abstraction over feed formats. The
//! `aircraft.json` document served by dump1090, readsb and tar1090 is the only
//! format implemented today.

mod aircraft_json;

pub use aircraft_json::AircraftJsonParser;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Errors that can occur while decoding a feed document.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// One entry of the `aircraft` array, as published by the aggregator.
///
/// Every field is optional; records without a position are common (Mode S only
/// targets) and are filtered later by the contact model. Numeric fields decode
/// leniently so that values like `"ground"` do not reject the whole document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    /// ICAO 24-bit address as hex (e.g. "a33eda").
    #[serde(default)]
    pub hex: Option<String>,
    /// Callsign, usually space padded to 8 characters.
    #[serde(default, deserialize_with = "lenient_string")]
    pub flight: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lon: Option<f64>,
    /// Barometric altitude in feet.
    #[serde(default, alias = "alt_baro", deserialize_with = "lenient_f64")]
    pub altitude: Option<f64>,
    /// Ground speed in knots.
    #[serde(default, alias = "gs", deserialize_with = "lenient_f64")]
    pub speed: Option<f64>,
    /// Vertical rate in feet per minute.
    #[serde(default, alias = "baro_rate", deserialize_with = "lenient_f64")]
    pub vert_rate: Option<f64>,
    /// Track over ground in degrees.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub track: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub squawk: Option<String>,
    /// Emitter category (e.g. "A3").
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
}

/// The complete `aircraft.json` document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeedDocument {
    /// Unix time the document was produced.
    #[serde(default)]
    pub now: Option<f64>,
    /// Total messages received by the decoder.
    #[serde(default)]
    pub messages: Option<u64>,
    #[serde(default)]
    pub aircraft: Vec<RawRecord>,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Trait for feed parsers.
///
/// Implement this trait to add support for new feed formats.
pub trait Protocol {
    /// The message type produced by this parser.
    type Message;
    /// The error type for parsing failures.
    type Error;

    /// Parse input bytes into a message.
    ///
    /// Returns `Ok(Some(message))` if parsing succeeded,
    /// `Ok(None)` if the input is valid but doesn't produce a message,
    /// or `Err(error)` if parsing failed.
    fn parse(&mut self, input: &[u8]) -> Result<Option<Self::Message>, Self::Error>;
}
