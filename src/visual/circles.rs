use nannou::prelude::vec2;

use super::surface::{Rgba, Surface};
use super::{FrameInput, Layer};
use crate::config::{LayerKind, VisualizationConfig};

const BIN_STRIDE: usize = 5;
const DOT_RADIUS: f32 = 5.0;

/// Concentric rings, one per sampled bin, around a center dot.
#[derive(Default)]
pub struct CirclesLayer;

impl Layer for CirclesLayer {
    fn name(&self) -> &'static str {
        LayerKind::Circles.label()
    }

    fn is_enabled(&self, config: &VisualizationConfig) -> bool {
        config.layers.circles
    }

    fn draw(&mut self, frame: &FrameInput<'_>, surface: &mut dyn Surface) {
        if surface.is_degenerate() {
            return;
        }
        let (w, h) = (surface.width(), surface.height());
        let center = vec2(w / 2.0, h / 2.0);
        surface.fill_circle(center, DOT_RADIUS, Rgba::white(0.7));

        let max_radius = w.min(h) / 2.0;
        for &v in frame.snapshot.frequency.iter().step_by(BIN_STRIDE) {
            let radius = v as f32 * max_radius / 255.0;
            if radius > 0.0 {
                let alpha = v as f32 / 255.0 * 0.6;
                surface.stroke_circle(center, radius, 2.0, Rgba::white(alpha));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AudioSnapshot;
    use crate::visual::surface::{DisplayList, DrawCommand};

    #[test]
    fn rings_every_fifth_bin_skipping_silent_ones() {
        let mut freq = vec![0u8; 20];
        freq[0] = 255;
        freq[5] = 51;
        freq[7] = 200; // not sampled
        let snapshot = AudioSnapshot::from_bytes(freq, vec![128; 20]);
        let config = VisualizationConfig::default();
        let frame = FrameInput {
            snapshot: &snapshot,
            config: &config,
            time_secs: 0.0,
        };
        let mut list = DisplayList::new(360.0, 640.0);
        CirclesLayer.draw(&frame, &mut list);

        let cmds = list.commands();
        assert_eq!(cmds.len(), 3);
        assert!(matches!(cmds[0], DrawCommand::FillCircle { radius, .. } if radius == 5.0));

        let DrawCommand::StrokeCircle {
            center,
            radius,
            color,
            ..
        } = &cmds[1]
        else {
            panic!("expected ring");
        };
        assert_eq!(*center, vec2(180.0, 320.0));
        assert_eq!(*radius, 180.0);
        assert!((color.a - 0.6).abs() < 1e-6);

        let DrawCommand::StrokeCircle { radius, .. } = &cmds[2] else {
            panic!("expected ring");
        };
        assert!((radius - 36.0).abs() < 1e-4);
    }
}
