use nannou::prelude::vec2;

use super::surface::{Rgba, Surface};
use super::{FrameInput, Layer};
use crate::config::VisualizationConfig;

/// Track label centered on the surface.
#[derive(Default)]
pub struct TextOverlay;

impl Layer for TextOverlay {
    fn name(&self) -> &'static str {
        "label"
    }

    fn is_enabled(&self, config: &VisualizationConfig) -> bool {
        config.label.show && !config.label.text.is_empty()
    }

    fn draw(&mut self, frame: &FrameInput<'_>, surface: &mut dyn Surface) {
        if surface.is_degenerate() {
            return;
        }
        let center = vec2(surface.width() / 2.0, surface.height() / 2.0);
        let label = &frame.config.label;
        surface.fill_text(&label.text, center, label.font_size, Rgba::white(1.0));
    }
}
