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

//! Live air-traffic display for a small touch panel.
//!
//! A circular radar scope and a distance-sorted table of the same contacts,
//! redrawn incrementally. The panel has no readable framebuffer, so every
//! text draw goes through a write-through [`cache::CanvasCache`] that decides
//! what actually has to be sent to the glass.
//!
//! The [`controller::Controller`] owns all render state. It can be hosted by
//! the single-threaded [`headless`] loop or by the desktop emulator in
//! [`app`].

pub mod app;
pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod font;
pub mod headless;
pub mod layout;
pub mod projection;
pub mod scope;
pub mod surface;
pub mod table;
pub mod touch;

pub use config::AppConfig;
pub use controller::{Controller, Selection, TouchOutcome};
pub use error::RadarError;
pub use layout::LayoutStyle;
