use nannou::prelude::vec2;

use super::smoothing::{RESPONSIVE, SmoothingBuffer};
use super::surface::{Rgba, Surface, gray_level};
use super::{FrameInput, Layer, LayerContext};
use crate::config::{LayerKind, VisualizationConfig};

/// Smoothed level above which a ray gets a fading tail.
const TAIL_THRESHOLD: f32 = 0.2;

/// Rays from the center whose lengths follow evenly spaced frequency bins.
pub struct PolarLinesLayer {
    smoothed: SmoothingBuffer,
}

impl PolarLinesLayer {
    pub fn new(line_count: usize) -> Self {
        Self {
            smoothed: SmoothingBuffer::new(line_count, 0.0, RESPONSIVE),
        }
    }

    pub fn smoothed(&self) -> &SmoothingBuffer {
        &self.smoothed
    }
}

impl Layer for PolarLinesLayer {
    fn name(&self) -> &'static str {
        LayerKind::PolarLines.label()
    }

    fn is_enabled(&self, config: &VisualizationConfig) -> bool {
        config.layers.polar_lines
    }

    fn draw(&mut self, frame: &FrameInput<'_>, surface: &mut dyn Surface) {
        let line_count = frame.config.line_count;
        self.smoothed.refit(line_count, 0.0);
        let n = frame.bin_count();
        if line_count == 0 || n == 0 || surface.is_degenerate() {
            return;
        }

        let (w, h) = (surface.width(), surface.height());
        let center = vec2(w / 2.0, h / 2.0);
        let max_len = w.min(h) * frame.config.line_length as f32 / 100.0;
        let step = n / line_count;

        for i in 0..line_count {
            let angle = i as f32 / line_count as f32 * std::f32::consts::TAU;
            let dir = vec2(angle.cos(), angle.sin());

            let raw = frame.snapshot.frequency[(i * step) % n] as f32 / 255.0;
            let s = self.smoothed.update(i, raw);

            let len = s * max_len;
            let tip = center + dir * len;
            let weight = 1.0 + s * 4.0;
            let gray = gray_level(150.0 + (s * 105.0).floor());
            let alpha = 0.3 + s * 0.6;
            surface.stroke_line(center, tip, weight, Rgba::gray(gray, alpha));

            if s > TAIL_THRESHOLD {
                let tail = center + dir * (len * 1.3);
                surface.stroke_line(tip, tail, weight * 0.5, Rgba::gray(gray, alpha * 0.3));
            }
        }
    }

    fn on_session_start(&mut self, ctx: &LayerContext<'_>) {
        self.smoothed = SmoothingBuffer::new(ctx.config.line_count, 0.0, RESPONSIVE);
    }
}
