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

use std::path::PathBuf;

use thiserror::Error;

/// Startup and shell errors.
///
/// Feed failures never surface here; they degrade the status line instead.
#[derive(Debug, Error)]
pub enum RadarError {
    #[error("unknown layout style: {0}")]
    UnknownLayoutStyle(String),

    #[error("configuration error: {0}")]
    Config(#[from] confy::ConfyError),

    #[error("failed to load font {}: {reason}", path.display())]
    Font { path: PathBuf, reason: String },

    #[error("feed client error: {0}")]
    Feed(#[from] adsb_feed::FetchError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot failed: {0}")]
    Snapshot(#[from] image::ImageError),

    #[error("UI error: {0}")]
    Ui(String),
}

impl From<eframe::Error> for RadarError {
    fn from(err: eframe::Error) -> Self {
        Self::Ui(err.to_string())
    }
}
