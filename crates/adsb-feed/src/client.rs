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

//! HTTP client for `aircraft.json` feeds.

use std::fmt;
use std::time::Duration;

use log::{debug, info, warn};
use thiserror::Error;

use crate::contact::{Contact, ContactFilter};
use crate::protocol::{AircraftJsonParser, FeedDocument, ParseError, Protocol};

/// Errors that can occur while fetching the feed.
///
/// Callers treat every variant the same way: the poll cycle yields no
/// contacts and the status degrades to [`FeedStatus::Failed`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error: status code {0}")]
    Status(u16),

    #[error("decode failed: {0}")]
    Decode(#[from] ParseError),
}

/// Health of the feed as shown in the status footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedStatus {
    #[default]
    Initialising,
    Scanning,
    Active,
    NoContacts,
    Failed,
}

impl FeedStatus {
    /// Status after a completed fetch.
    #[must_use]
    pub fn from_result(result: &Result<Vec<Contact>, FetchError>) -> Self {
        match result {
            Ok(contacts) if contacts.is_empty() => Self::NoContacts,
            Ok(_) => Self::Active,
            Err(_) => Self::Failed,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initialising => "INITIALISING",
            Self::Scanning => "SCANNING",
            Self::Active => "ACTIVE",
            Self::NoContacts => "NO CONTACTS",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for FeedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Full URL of the `aircraft.json` document.
    pub url: String,
    /// Upper bound for one request, connect included.
    pub timeout: Duration,
    /// Maximum number of raw records considered per poll.
    pub max_count: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/data/aircraft.json".to_string(),
            timeout: Duration::from_secs(10),
            max_count: 100,
        }
    }
}

/// Fetches and decodes the aircraft feed.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    config: FeedConfig,
}

impl FeedClient {
    /// Create a client for the given feed.
    pub fn new(config: FeedConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Fetch the raw feed document.
    pub async fn fetch_document(&self) -> Result<FeedDocument, FetchError> {
        debug!("Fetching aircraft data from {}", self.config.url);
        let response = self.http.get(&self.config.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let document = AircraftJsonParser::new().parse(&body)?.unwrap_or_default();
        Ok(document)
    }

    /// Fetch the feed and build the contact list for this poll cycle.
    pub async fn fetch_contacts(&self, filter: &ContactFilter) -> Result<Vec<Contact>, FetchError> {
        let document = self.fetch_document().await.inspect_err(|e| {
            warn!("Couldn't fetch aircraft data: {e}; skipping");
        })?;

        let contacts = Contact::from_records(&document.aircraft, filter, self.config.max_count);
        info!(
            "Collected {} of {} aircraft within {}nm",
            contacts.len(),
            document.aircraft.len().min(self.config.max_count),
            filter.radius_nm
        );
        Ok(contacts)
    }
}
