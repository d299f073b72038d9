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

//! Shows the emulated panel as a scaled texture and maps clicks back to
//! panel pixels.

use egui::{ColorImage, TextureHandle, TextureOptions};

use crate::surface::Framebuffer;

/// Texture mirror of a [`Framebuffer`].
pub struct PanelView {
    texture: Option<TextureHandle>,
    uploaded: Option<u64>,
    scale: f32,
}

impl std::fmt::Debug for PanelView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelView")
            .field("uploaded", &self.uploaded)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl PanelView {
    #[must_use]
    pub fn new(scale: f32) -> Self {
        Self {
            texture: None,
            uploaded: None,
            scale: scale.max(1.0),
        }
    }

    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Re-upload the framebuffer if it changed since the last upload.
    fn upload(&mut self, ctx: &egui::Context, framebuffer: &Framebuffer) {
        if self.uploaded == Some(framebuffer.generation()) && self.texture.is_some() {
            return;
        }
        let size = [framebuffer.width() as usize, framebuffer.height() as usize];
        let image = ColorImage::from_rgb(size, &framebuffer.to_rgb_bytes());

        if let Some(tex) = &mut self.texture {
            tex.set(image, TextureOptions::NEAREST);
        } else {
            self.texture = Some(ctx.load_texture("radarscope_panel", image, TextureOptions::NEAREST));
        }
        self.uploaded = Some(framebuffer.generation());
    }

    /// Paint the panel. Returns the clicked panel pixel, if any.
    pub fn show(&mut self, ui: &mut egui::Ui, framebuffer: &Framebuffer) -> Option<(i32, i32)> {
        self.upload(ui.ctx(), framebuffer);

        #[allow(clippy::cast_precision_loss, reason = "panel sizes are small")]
        let size = egui::vec2(
            framebuffer.width() as f32 * self.scale,
            framebuffer.height() as f32 * self.scale,
        );
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());

        if let Some(texture) = &self.texture {
            ui.painter().image(
                texture.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }

        if !response.clicked() {
            return None;
        }
        let pos = response.interact_pointer_pos()?;
        to_panel(pos - rect.min, self.scale, framebuffer.width(), framebuffer.height())
    }
}

/// Convert an offset inside the scaled image to a panel pixel.
#[allow(clippy::cast_possible_truncation, reason = "offsets are bounded by the panel size")]
fn to_panel(offset: egui::Vec2, scale: f32, width: u32, height: u32) -> Option<(i32, i32)> {
    if offset.x < 0.0 || offset.y < 0.0 {
        return None;
    }
    let x = (offset.x / scale).floor() as i32;
    let y = (offset.y / scale).floor() as i32;
    let inside = u32::try_from(x).is_ok_and(|x| x < width) && u32::try_from(y).is_ok_and(|y| y < height);
    inside.then_some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_mapping() {
        assert_eq!(to_panel(egui::vec2(0.0, 0.0), 2.0, 240, 320), Some((0, 0)));
        assert_eq!(to_panel(egui::vec2(241.0, 161.9), 2.0, 240, 320), Some((120, 80)));
        assert_eq!(to_panel(egui::vec2(479.9, 639.9), 2.0, 240, 320), Some((239, 319)));
        assert_eq!(to_panel(egui::vec2(480.0, 10.0), 2.0, 240, 320), None);
        assert_eq!(to_panel(egui::vec2(-1.0, 10.0), 2.0, 240, 320), None);
    }

    #[test]
    fn test_scale_floor() {
        assert!((PanelView::new(0.5).scale() - 1.0).abs() < f32::EPSILON);
        assert!((PanelView::new(3.0).scale() - 3.0).abs() < f32::EPSILON);
    }
}
