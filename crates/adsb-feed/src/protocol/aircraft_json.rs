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

//! `aircraft.json` parser.
//!
//! Document format (abridged):
//! ```text
//! { "now": 1765419480.0, "messages": 145,
//!   "aircraft": [ { "hex": "407993", "flight": "BAW28K  ", "lat": 37.46, "lon": -122.15, ... } ] }
//! ```

use super::{FeedDocument, ParseError, Protocol};

/// Parser for dump1090/readsb `aircraft.json` documents.
#[derive(Debug, Default)]
pub struct AircraftJsonParser;

impl AircraftJsonParser {
    /// Create a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Protocol for AircraftJsonParser {
    type Message = FeedDocument;
    type Error = ParseError;

    fn parse(&mut self, input: &[u8]) -> Result<Option<FeedDocument>, ParseError> {
        if input.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let value: serde_json::Value = serde_json::from_slice(input)?;
        if value.get("aircraft").is_none() {
            return Err(ParseError::MissingField("aircraft"));
        }

        Ok(Some(serde_json::from_value(value)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
    { "now" : 1765419480.0,
      "messages" : 145,
      "aircraft" : [
        {"hex":"a33eda","altitude":19650,"vert_rate":3392,"track":134,"speed":410,"mlat":[],"tisb":[],"messages":13,"seen":0.9,"rssi":-8.8},
        {"hex":"407993","squawk":"6532","flight":"BAW28K  ","lat":37.461090,"lon":-122.152600,"nucp":7,"seen_pos":0.7,"altitude":4550,"vert_rate":-896,"track":26,"speed":189,"category":"A5","mlat":[],"tisb":[],"messages":121,"seen":0.0,"rssi":-3.4},
        {"hex":"a55785","lat":37.323443,"lon":-122.295745,"nucp":7,"seen_pos":24.9,"altitude":13775,"vert_rate":2496,"track":136,"speed":389,"mlat":[],"tisb":[],"messages":11,"seen":23.5,"rssi":-6.9}
      ]
    }
    "#;

    #[test]
    fn test_parse_sample_document() {
        let mut parser = AircraftJsonParser::new();
        let doc = parser.parse(SAMPLE.as_bytes()).unwrap().unwrap();

        assert_eq!(doc.messages, Some(145));
        assert_eq!(doc.aircraft.len(), 3);

        let first = &doc.aircraft[0];
        assert_eq!(first.hex.as_deref(), Some("a33eda"));
        assert!(first.lat.is_none());
        assert_eq!(first.altitude, Some(19650.0));

        let second = &doc.aircraft[1];
        assert_eq!(second.flight.as_deref(), Some("BAW28K  "));
        assert_eq!(second.squawk.as_deref(), Some("6532"));
        assert_eq!(second.category.as_deref(), Some("A5"));
        assert_eq!(second.vert_rate, Some(-896.0));
    }

    #[test]
    fn test_parse_readsb_field_names() {
        let mut parser = AircraftJsonParser::new();
        let line = br#"{"aircraft":[{"hex":"abc123","alt_baro":"ground","gs":12.5,"baro_rate":0,"lat":1.0,"lon":2.0}]}"#;
        let doc = parser.parse(line).unwrap().unwrap();
        let record = &doc.aircraft[0];
        assert!(record.altitude.is_none());
        assert_eq!(record.speed, Some(12.5));
        assert_eq!(record.vert_rate, Some(0.0));
    }

    #[test]
    fn test_numeric_squawk_is_accepted() {
        let mut parser = AircraftJsonParser::new();
        let doc = parser
            .parse(br#"{"aircraft":[{"hex":"abc123","squawk":1200}]}"#)
            .unwrap()
            .unwrap();
        assert_eq!(doc.aircraft[0].squawk.as_deref(), Some("1200"));
    }

    #[test]
    fn test_parse_empty_input() {
        let mut parser = AircraftJsonParser::new();
        assert!(parser.parse(b"  \n").unwrap().is_none());
    }

    #[test]
    fn test_missing_aircraft_array() {
        let mut parser = AircraftJsonParser::new();
        let result = parser.parse(br#"{"now": 1.0}"#);
        assert!(matches!(result, Err(ParseError::MissingField("aircraft"))));
    }

    #[test]
    fn test_invalid_json() {
        let mut parser = AircraftJsonParser::new();
        assert!(matches!(
            parser.parse(b"{not json"),
            Err(ParseError::InvalidDocument(_))
        ));
    }
}
