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

use adsb_feed::GeoPosition;
use clap::Parser;
use log::info;

use radarscope::headless::{self, HeadlessOptions};
use radarscope::{app, AppConfig, LayoutStyle, RadarError};

/// Live ADS-B radar scope for a 240x320 touch panel
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to the per-user confy location)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run the control loop without a window
    #[arg(long, default_value_t = false)]
    headless: bool,

    /// Stop after this many frames (headless only)
    #[arg(long, value_name = "N")]
    frames: Option<u64>,

    /// Write the final panel contents to a PNG (headless only)
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Scripted touch at x,y; repeat for a sequence (headless only)
    #[arg(long, value_name = "X,Y", value_parser = parse_tap)]
    tap: Vec<(i32, i32)>,

    /// aircraft.json URL
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Observer latitude
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Observer longitude
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Scope range in nautical miles
    #[arg(long, value_name = "NM")]
    range: Option<f64>,

    /// Initial layout: max_scope, split_screen, table_only or 0-2
    #[arg(long)]
    layout: Option<String>,

    /// Verbose logging (DEBUG level)
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    /// Load the config file and apply command-line overrides on top.
    fn resolve_config(&self) -> Result<AppConfig, RadarError> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load_from(path)?,
            None => AppConfig::load()?,
        };

        if let Some(url) = &self.url {
            config.feed_url.clone_from(url);
        }
        if self.lat.is_some() || self.lon.is_some() {
            config.observer = GeoPosition::new(
                self.lat.unwrap_or(config.observer.latitude),
                self.lon.unwrap_or(config.observer.longitude),
            );
        }
        if let Some(range) = self.range {
            config.radius_nm = range;
        }
        if let Some(layout) = &self.layout {
            config.initial_layout = layout.parse::<LayoutStyle>()?;
        }
        Ok(config)
    }
}

fn parse_tap(s: &str) -> Result<(i32, i32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in '{s}': {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in '{s}': {e}"))?;
    Ok((x, y))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

fn main() -> Result<(), RadarError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.resolve_config()?;
    info!(
        "Observer {:.4},{:.4} range {}nm layout {}",
        config.observer.latitude, config.observer.longitude, config.radius_nm, config.initial_layout
    );

    if cli.headless {
        let options = HeadlessOptions {
            frames: cli.frames,
            snapshot: cli.snapshot.clone(),
            taps: cli.tap.clone(),
        };
        headless::run(config, options)?;
        Ok(())
    } else {
        app::run(config)
    }
}
