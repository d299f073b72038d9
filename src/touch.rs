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

//! Touch input.
//!
//! Resistive panel controllers report `(0, 0)` when nothing is pressed, so a
//! raw origin sample is treated as "no touch" by every source.

use std::collections::VecDeque;
use std::time::Duration;

use log::trace;
use tokio::time::Instant;

/// A screen coordinate reported by a touch source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchPoint {
    pub x: i32,
    pub y: i32,
}

impl TouchPoint {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// A raw controller sample; the origin means nothing is pressed.
    #[must_use]
    pub fn from_raw(x: i32, y: i32) -> Option<Self> {
        (x != 0 || y != 0).then_some(Self { x, y })
    }
}

/// Something that can be asked whether the screen is being touched.
pub trait TouchSource {
    fn sample(&mut self) -> Option<TouchPoint>;
}

/// Taps supplied up front, one per sample. Used by the headless runner and tests.
#[derive(Debug, Default)]
pub struct ScriptedTouches {
    queue: VecDeque<(i32, i32)>,
}

impl ScriptedTouches {
    pub fn new(taps: impl IntoIterator<Item = (i32, i32)>) -> Self {
        Self {
            queue: taps.into_iter().collect(),
        }
    }

    pub fn push(&mut self, x: i32, y: i32) {
        self.queue.push_back((x, y));
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl TouchSource for ScriptedTouches {
    fn sample(&mut self) -> Option<TouchPoint> {
        let (x, y) = self.queue.pop_front()?;
        TouchPoint::from_raw(x, y)
    }
}

/// Latest pointer press from the emulator window, consumed on sample.
#[derive(Debug, Default)]
pub struct PointerTouch {
    pending: Option<(i32, i32)>,
}

impl PointerTouch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press in panel coordinates. A newer press replaces an unread one.
    pub fn press(&mut self, x: i32, y: i32) {
        self.pending = Some((x, y));
    }
}

impl TouchSource for PointerTouch {
    fn sample(&mut self) -> Option<TouchPoint> {
        let (x, y) = self.pending.take()?;
        TouchPoint::from_raw(x, y)
    }
}

/// Sample `source` every `step` until a touch arrives or `limit` has passed.
pub async fn poll_touch(source: &mut dyn TouchSource, limit: Duration, step: Duration) -> Option<TouchPoint> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(point) = source.sample() {
            trace!("Touch at ({}, {})", point.x, point.y);
            return Some(point);
        }
        let now = Instant::now();
        if now >= deadline {
            return None;
        }
        tokio::time::sleep(step.min(deadline - now)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_is_no_touch() {
        assert_eq!(TouchPoint::from_raw(0, 0), None);
        assert_eq!(TouchPoint::from_raw(0, 5), Some(TouchPoint::new(0, 5)));
    }

    #[test]
    fn test_scripted_touches_in_order() {
        let mut touches = ScriptedTouches::new([(10, 20), (0, 0), (30, 40)]);
        assert_eq!(touches.sample(), Some(TouchPoint::new(10, 20)));
        assert_eq!(touches.sample(), None);
        assert_eq!(touches.sample(), Some(TouchPoint::new(30, 40)));
        assert_eq!(touches.remaining(), 0);
        assert_eq!(touches.sample(), None);
    }

    #[test]
    fn test_pointer_press_consumed_once() {
        let mut pointer = PointerTouch::new();
        pointer.press(5, 6);
        pointer.press(7, 8);
        assert_eq!(pointer.sample(), Some(TouchPoint::new(7, 8)));
        assert_eq!(pointer.sample(), None);
    }

    #[tokio::test]
    async fn test_poll_returns_immediately_on_touch() {
        let mut touches = ScriptedTouches::new([(1, 2)]);
        let started = std::time::Instant::now();
        let point = poll_touch(&mut touches, Duration::from_secs(5), Duration::from_millis(50)).await;
        assert_eq!(point, Some(TouchPoint::new(1, 2)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_poll_gives_up_at_limit() {
        let mut touches = ScriptedTouches::default();
        let started = std::time::Instant::now();
        let point = poll_touch(&mut touches, Duration::from_millis(30), Duration::from_millis(5)).await;
        assert_eq!(point, None);
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
