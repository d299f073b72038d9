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

//! Background feed polling.
//!
//! Runs the fetch loop in a tokio task and hands finished contact lists to
//! the owner over a channel. The task never touches render state; each
//! [`FeedUpdate`] is an immutable snapshot for one poll cycle.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info};
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::client::{FeedClient, FeedStatus};
use crate::contact::{Contact, ContactFilter};

/// Result of one poll cycle.
#[derive(Debug, Clone)]
pub struct FeedUpdate {
    pub contacts: Vec<Contact>,
    pub status: FeedStatus,
    pub fetched_at: DateTime<Utc>,
}

/// Events emitted by the poller.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// A fetch has started.
    Scanning,
    /// A fetch completed (successfully or not).
    Updated(FeedUpdate),
}

/// Handle to a running feed poller.
///
/// Dropping the handle stops the background task.
pub struct FeedPoller {
    event_rx: mpsc::Receiver<FeedEvent>,
    filter_tx: watch::Sender<ContactFilter>,
    cancel_token: CancellationToken,
}

impl std::fmt::Debug for FeedPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedPoller")
            .field("cancel_token", &self.cancel_token)
            .finish_non_exhaustive()
    }
}

impl FeedPoller {
    /// Spawn the polling task on the current tokio runtime.
    #[must_use]
    pub fn spawn(client: FeedClient, filter: ContactFilter, interval: Duration) -> Self {
        let (event_tx, event_rx) = mpsc::channel(16);
        let (filter_tx, filter_rx) = watch::channel(filter);
        let cancel_token = CancellationToken::new();

        let task_cancel = cancel_token.clone();
        tokio::spawn(async move {
            poll_loop(client, event_tx, filter_rx, task_cancel, interval).await;
        });

        Self {
            event_rx,
            filter_tx,
            cancel_token,
        }
    }

    /// Take the next pending event without waiting.
    pub fn try_next(&mut self) -> Option<FeedEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Wait for the next event. Returns `None` once the poller has stopped.
    pub async fn next(&mut self) -> Option<FeedEvent> {
        self.event_rx.recv().await
    }

    /// Replace the contact filter; triggers an immediate re-poll.
    pub fn set_filter(&self, filter: ContactFilter) {
        if self.filter_tx.send(filter).is_err() {
            debug!("Feed poller has stopped, filter change dropped");
        }
    }
}

impl Drop for FeedPoller {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn poll_loop(
    client: FeedClient,
    event_tx: mpsc::Sender<FeedEvent>,
    mut filter_rx: watch::Receiver<ContactFilter>,
    cancel_token: CancellationToken,
    interval: Duration,
) {
    info!("Polling {} every {}s", client.url(), interval.as_secs());

    loop {
        if cancel_token.is_cancelled() {
            info!("Feed poller cancelled");
            return;
        }

        let filter = filter_rx.borrow_and_update().clone();

        if event_tx.send(FeedEvent::Scanning).await.is_err() {
            return; // Receiver dropped
        }

        let result = tokio::select! {
            result = client.fetch_contacts(&filter) => result,
            () = cancel_token.cancelled() => {
                info!("Feed poller cancelled during fetch");
                return;
            }
        };

        let update = FeedUpdate {
            status: FeedStatus::from_result(&result),
            contacts: result.unwrap_or_default(),
            fetched_at: Utc::now(),
        };
        if event_tx.send(FeedEvent::Updated(update)).await.is_err() {
            return;
        }

        tokio::select! {
            () = sleep(interval) => {}
            changed = filter_rx.changed() => {
                if changed.is_err() {
                    return; // Sender dropped
                }
                debug!("Contact filter changed, polling immediately");
            }
            () = cancel_token.cancelled() => {
                info!("Feed poller cancelled");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FeedConfig;
    use crate::geo::GeoPosition;

    fn filter(radius_nm: f64) -> ContactFilter {
        ContactFilter {
            observer: GeoPosition::new(37.4, -122.1),
            radius_nm,
            military_prefixes: Vec::new(),
        }
    }

    fn unreachable_client() -> FeedClient {
        FeedClient::new(FeedConfig {
            url: "http://127.0.0.1:9/data/aircraft.json".to_string(),
            timeout: Duration::from_secs(1),
            max_count: 10,
        })
        .unwrap()
    }

    async fn next_update(poller: &mut FeedPoller) -> FeedUpdate {
        loop {
            match poller.next().await {
                Some(FeedEvent::Updated(update)) => return update,
                Some(FeedEvent::Scanning) => {}
                None => panic!("poller stopped"),
            }
        }
    }

    #[tokio::test]
    async fn test_failed_fetch_reported_then_filter_change_repolls() {
        let mut poller = FeedPoller::spawn(unreachable_client(), filter(10.0), Duration::from_secs(3600));

        assert!(matches!(poller.next().await, Some(FeedEvent::Scanning)));
        let update = next_update(&mut poller).await;
        assert_eq!(update.status, FeedStatus::Failed);
        assert!(update.contacts.is_empty());

        // The hour-long interval would block without the filter wake-up.
        poller.set_filter(filter(30.0));
        let update = tokio::time::timeout(Duration::from_secs(5), next_update(&mut poller))
            .await
            .unwrap();
        assert_eq!(update.status, FeedStatus::Failed);
    }

    #[tokio::test]
    async fn test_set_filter_after_stop_is_harmless() {
        let mut poller = FeedPoller::spawn(unreachable_client(), filter(10.0), Duration::from_secs(3600));
        poller.cancel_token.cancel();
        while poller.next().await.is_some() {}
        poller.set_filter(filter(30.0));
        assert!(poller.try_next().is_none());
    }
}
