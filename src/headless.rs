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

//! Single-threaded control loop without a window.
//!
//! Mirrors the loop of the physical device: one task polls touch, fetches
//! the feed and renders into an in-memory panel, in that order. Interrupts
//! are only honoured between iterations.

use std::path::PathBuf;
use std::time::Duration;

use adsb_feed::{FeedClient, FeedStatus};
use chrono::Utc;
use log::info;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::controller::Controller;
use crate::error::RadarError;
use crate::surface::Framebuffer;
use crate::touch::{poll_touch, ScriptedTouches};

/// Options for a headless run.
#[derive(Debug, Clone, Default)]
pub struct HeadlessOptions {
    /// Stop after this many frames; run until interrupted otherwise.
    pub frames: Option<u64>,
    /// Write the panel as a PNG on exit.
    pub snapshot: Option<PathBuf>,
    /// Taps delivered one per touch poll, in order.
    pub taps: Vec<(i32, i32)>,
}

/// Run the loop on a current-thread runtime until done or interrupted.
pub fn run(config: AppConfig, options: HeadlessOptions) -> Result<u64, RadarError> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(run_loop(config, options))
}

async fn run_loop(config: AppConfig, options: HeadlessOptions) -> Result<u64, RadarError> {
    let client = FeedClient::new(config.feed_config())?;
    let touch_limit = Duration::from_millis(config.touch_poll_ms);
    let touch_step = Duration::from_millis(config.touch_step_ms.max(1));
    let interval = config.fetch_interval();
    let mut framebuffer = Framebuffer::new(config.screen_width, config.screen_height);
    let mut controller = Controller::new(config)?;
    let mut touches = ScriptedTouches::new(options.taps);

    let cancel_token = CancellationToken::new();
    let interrupt = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping after this frame");
            interrupt.cancel();
        }
    });

    info!("Headless run against {}", client.url());
    controller.activate(&mut framebuffer);

    let mut last_update = None;
    let mut frames = 0;
    while !cancel_token.is_cancelled() && options.frames.is_none_or(|limit| frames < limit) {
        let started = Instant::now();
        let now = Utc::now();
        controller.refresh_if_due(&mut framebuffer, now);

        if let Some(point) = poll_touch(&mut touches, touch_limit, touch_step).await {
            let outcome = controller.handle_touch(&mut framebuffer, point);
            info!("Touch ({}, {}): {outcome:?}", point.x, point.y);
        }

        let filter = controller.config().contact_filter();
        let result = client.fetch_contacts(&filter).await;
        let status = FeedStatus::from_result(&result);
        if result.is_ok() {
            last_update = Some(Utc::now());
        }
        let contacts = result.unwrap_or_default();

        controller.render_frame(&mut framebuffer, &contacts, status, last_update, Utc::now());
        frames += 1;

        if options.frames.is_some_and(|limit| frames >= limit) {
            break;
        }
        tokio::select! {
            () = sleep(interval.saturating_sub(started.elapsed())) => {}
            () = cancel_token.cancelled() => {}
        }
    }

    if let Some(path) = &options.snapshot {
        framebuffer.save_png(path)?;
        info!("Wrote snapshot to {}", path.display());
    }
    info!("Headless run finished after {frames} frames");
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_with_unreachable_feed() {
        let config = AppConfig {
            feed_url: "http://127.0.0.1:9/data/aircraft.json".to_string(),
            fetch_interval_secs: 0,
            fetch_timeout_secs: 1,
            touch_poll_ms: 5,
            touch_step_ms: 1,
            ..AppConfig::default()
        };
        let snapshot = std::env::temp_dir().join(format!("radarscope-test-{}.png", std::process::id()));
        let options = HeadlessOptions {
            frames: Some(2),
            snapshot: Some(snapshot.clone()),
            taps: vec![(120, 80)],
        };

        let frames = run(config, options).unwrap();
        assert_eq!(frames, 2);

        let image = image::open(&snapshot).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (240, 320));
        let _ = std::fs::remove_file(snapshot);
    }
}
