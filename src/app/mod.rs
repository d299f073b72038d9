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

//! Desktop emulator for the touch panel.
//!
//! The window thread owns the controller and the framebuffer. The feed is
//! polled on a separate tokio runtime and only immutable updates cross over.

pub mod panel_view;

use std::time::Duration;

use adsb_feed::{Contact, ContactFilter, FeedClient, FeedEvent, FeedPoller, FeedStatus};
use chrono::{DateTime, Utc};
use log::info;

use crate::config::AppConfig;
use crate::controller::Controller;
use crate::error::RadarError;
use crate::surface::Framebuffer;
use crate::touch::{PointerTouch, TouchSource};

pub use panel_view::PanelView;

const WINDOW_TITLE: &str = "Radarscope";
const PANEL_SCALE: f32 = 2.0;
const REPAINT_INTERVAL: Duration = Duration::from_millis(250);

/// Feed poller and the runtime it runs on. Field order matters: the poller
/// is cancelled before the runtime shuts down.
struct FeedLink {
    poller: FeedPoller,
    filter: ContactFilter,
    _runtime: tokio::runtime::Runtime,
}

impl FeedLink {
    fn start(config: &AppConfig) -> Result<Self, RadarError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("feed-poller")
            .enable_all()
            .build()?;
        let client = FeedClient::new(config.feed_config())?;
        let filter = config.contact_filter();
        let poller = {
            let _guard = runtime.enter();
            FeedPoller::spawn(client, filter.clone(), config.fetch_interval())
        };
        Ok(Self {
            poller,
            filter,
            _runtime: runtime,
        })
    }

    /// Push a new filter to the poller if the range or observer moved.
    fn sync_filter(&mut self, filter: ContactFilter) {
        if filter != self.filter {
            self.poller.set_filter(filter.clone());
            self.filter = filter;
        }
    }
}

/// The emulator window.
pub struct RadarApp {
    controller: Controller,
    framebuffer: Framebuffer,
    pointer: PointerTouch,
    panel: PanelView,
    feed: FeedLink,
    contacts: Vec<Contact>,
    status: FeedStatus,
    last_update: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for RadarApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadarApp")
            .field("layout", &self.controller.layout())
            .field("contacts", &self.contacts.len())
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl RadarApp {
    pub fn new(config: AppConfig) -> Result<Self, RadarError> {
        let feed = FeedLink::start(&config)?;
        let mut framebuffer = Framebuffer::new(config.screen_width, config.screen_height);
        let mut controller = Controller::new(config)?;
        controller.activate(&mut framebuffer);

        Ok(Self {
            controller,
            framebuffer,
            pointer: PointerTouch::new(),
            panel: PanelView::new(PANEL_SCALE),
            feed,
            contacts: Vec::new(),
            status: FeedStatus::Initialising,
            last_update: None,
        })
    }

    /// Drain feed events. Returns whether anything arrived.
    fn drain_feed(&mut self) -> bool {
        let mut changed = false;
        while let Some(event) = self.feed.poller.try_next() {
            match event {
                FeedEvent::Scanning => self.status = FeedStatus::Scanning,
                FeedEvent::Updated(update) => {
                    if update.status != FeedStatus::Failed {
                        self.last_update = Some(update.fetched_at);
                    }
                    self.status = update.status;
                    self.contacts = update.contacts;
                }
            }
            changed = true;
        }
        changed
    }

    fn render(&mut self) {
        self.controller.render_frame(
            &mut self.framebuffer,
            &self.contacts,
            self.status,
            self.last_update,
            Utc::now(),
        );
    }

    fn status_line(&self) -> String {
        let config = self.controller.config();
        let selected = self.controller.selection().selected.as_deref().unwrap_or("-");
        format!(
            "{}  {}NM  {}  {} CONTACTS  SEL {}",
            self.controller.layout(),
            config.radius_nm,
            self.status,
            self.contacts.len(),
            selected
        )
    }
}

impl eframe::App for RadarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint_after(REPAINT_INTERVAL);

        let mut dirty = self.drain_feed();
        dirty |= self.controller.refresh_if_due(&mut self.framebuffer, Utc::now());

        if let Some(point) = self.pointer.sample() {
            let outcome = self.controller.handle_touch(&mut self.framebuffer, point);
            info!("Touch ({}, {}): {outcome:?}", point.x, point.y);
            self.feed.sync_filter(self.controller.config().contact_filter());
            dirty = true;
        }
        if dirty {
            self.render();
        }

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(
                egui::RichText::new(self.status_line())
                    .color(egui::Color32::from_rgb(0, 200, 0))
                    .size(11.0)
                    .monospace(),
            );
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                if let Some((x, y)) = self.panel.show(ui, &self.framebuffer) {
                    self.pointer.press(x, y);
                    ctx.request_repaint();
                }
            });
    }
}

/// Open the emulator window and block until it closes.
pub fn run(config: AppConfig) -> Result<(), RadarError> {
    #[allow(clippy::cast_precision_loss, reason = "panel sizes are small")]
    let inner_size = [
        config.screen_width as f32 * PANEL_SCALE + 16.0,
        config.screen_height as f32 * PANEL_SCALE + 48.0,
    ];
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(inner_size)
            .with_resizable(false)
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };

    let app = RadarApp::new(config)?;
    info!("Opening emulator window");
    eframe::run_native(WINDOW_TITLE, options, Box::new(|_cc| Ok(Box::new(app))))?;
    Ok(())
}
