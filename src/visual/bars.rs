use super::surface::{Rgba, Surface, gray_level};
use super::{FrameInput, Layer};
use crate::config::{LayerKind, VisualizationConfig};

/// Spectrum bars rising from the bottom edge.
///
/// A full-scale bin fills half the surface height; bins that don't fit the
/// width are left out.
#[derive(Default)]
pub struct BarsLayer;

impl Layer for BarsLayer {
    fn name(&self) -> &'static str {
        LayerKind::Bars.label()
    }

    fn is_enabled(&self, config: &VisualizationConfig) -> bool {
        config.layers.bars
    }

    fn draw(&mut self, frame: &FrameInput<'_>, surface: &mut dyn Surface) {
        let n = frame.bin_count();
        if n == 0 || surface.is_degenerate() {
            return;
        }
        let (w, h) = (surface.width(), surface.height());
        let bar_w = (w / n as f32) * 2.5;

        let mut x = 0.0;
        for &v in &frame.snapshot.frequency {
            let bar_h = v as f32 * h / 512.0;
            let gray = gray_level(v as f32 + 50.0);
            surface.fill_rect(x, h - bar_h, bar_w, bar_h, Rgba::gray(gray, 0.7));

            x += bar_w + 1.0;
            if x > w {
                break;
            }
        }
    }
}
