use nannou::prelude::{Vec2, vec2};

use super::smoothing::{RESPONSIVE, SmoothingBuffer};
use super::surface::{Rgba, Surface};
use super::{FrameInput, Layer, LayerContext};
use crate::config::{LayerKind, VisualizationConfig};

/// Deviations at or below this many byte units are treated as silence.
pub const NOISE_GATE: f32 = 2.0;

/// Time-domain polyline across the middle of the surface.
///
/// The amplitude is driven by the average *frequency* volume, so loud
/// passages swing wider than the raw samples alone would.
pub struct WaveformLayer {
    smoothed: SmoothingBuffer,
    points: Vec<Vec2>,
}

impl WaveformLayer {
    pub fn new(bin_count: usize, baseline: u8) -> Self {
        Self {
            smoothed: SmoothingBuffer::new(bin_count, baseline as f32, RESPONSIVE),
            points: Vec::with_capacity(bin_count),
        }
    }

    pub fn smoothed(&self) -> &SmoothingBuffer {
        &self.smoothed
    }
}

fn volume_factor(avg_volume: f32) -> f32 {
    (avg_volume / 128.0).clamp(0.2, 1.5)
}

impl Layer for WaveformLayer {
    fn name(&self) -> &'static str {
        LayerKind::Waves.label()
    }

    fn is_enabled(&self, config: &VisualizationConfig) -> bool {
        config.layers.waves
    }

    fn draw(&mut self, frame: &FrameInput<'_>, surface: &mut dyn Surface) {
        let samples = &frame.snapshot.time_domain;
        let n = samples.len();
        self.smoothed.refit(n, frame.config.wave_baseline as f32);
        if n == 0 {
            return;
        }

        let baseline = frame.config.wave_baseline as f32;
        let scale = frame.config.wave_amplitude as f32 / 100.0
            * volume_factor(frame.snapshot.average_volume());

        let audible = samples
            .iter()
            .any(|&s| ((s as f32 - baseline) * scale).abs() > NOISE_GATE);

        // keep the history moving even when gated so the line fades back in
        for (i, &s) in samples.iter().enumerate() {
            let deviation = (s as f32 - baseline) * scale;
            self.smoothed.update(i, baseline + deviation);
        }

        if !audible || surface.is_degenerate() {
            return;
        }

        let (w, h) = (surface.width(), surface.height());
        let slice_w = w / n as f32;
        self.points.clear();
        let mut x = 0.0;
        for &v in self.smoothed.values() {
            let y = h / 2.0 + (v - baseline) * h / 256.0;
            self.points.push(vec2(x, y));
            x += slice_w;
            if x > w {
                break;
            }
        }
        surface.stroke_polyline(&self.points, 2.0, Rgba::white(0.7));
    }

    fn on_session_start(&mut self, ctx: &LayerContext<'_>) {
        self.smoothed = SmoothingBuffer::new(
            ctx.bin_count,
            ctx.config.wave_baseline as f32,
            RESPONSIVE,
        );
    }
}
