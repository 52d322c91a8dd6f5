use rand::rngs::StdRng;

use super::bars::BarsLayer;
use super::circles::CirclesLayer;
use super::grid::GridLayer;
use super::overlay::TextOverlay;
use super::particles::ParticlesLayer;
use super::polar::PolarLinesLayer;
use super::surface::{Rgba, Surface};
use super::waveform::WaveformLayer;
use super::{FrameInput, Layer, LayerContext};
use crate::config::VisualizationConfig;

pub const BACKGROUND: Rgba = Rgba::new(20, 20, 20, 1.0);

/// Clears the surface and runs the enabled layers in a fixed order:
/// bars, circles, waves, particles, polar lines, grid, label.
pub struct Compositor {
    layers: Vec<Box<dyn Layer>>,
    width: f32,
    height: f32,
    bin_count: usize,
}

impl Compositor {
    pub fn new(ctx: &LayerContext<'_>, rng: StdRng) -> Self {
        let layers: Vec<Box<dyn Layer>> = vec![
            Box::new(BarsLayer),
            Box::new(CirclesLayer),
            Box::new(WaveformLayer::new(ctx.bin_count, ctx.config.wave_baseline)),
            Box::new(ParticlesLayer::with_rng(ctx, rng)),
            Box::new(PolarLinesLayer::new(ctx.config.line_count)),
            Box::new(GridLayer::new(ctx)),
            Box::new(TextOverlay),
        ];
        Self {
            layers,
            width: ctx.width,
            height: ctx.height,
            bin_count: ctx.bin_count,
        }
    }

    fn ctx<'a>(&self, config: &'a VisualizationConfig) -> LayerContext<'a> {
        LayerContext {
            config,
            width: self.width,
            height: self.height,
            bin_count: self.bin_count,
        }
    }

    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Names of the layers `config` enables, in drawing order.
    pub fn active_layers(&self, config: &VisualizationConfig) -> Vec<&'static str> {
        self.layers
            .iter()
            .filter(|l| l.is_enabled(config))
            .map(|l| l.name())
            .collect()
    }

    /// Paints one frame. Returns how many layers drew.
    pub fn render(&mut self, frame: &FrameInput<'_>, surface: &mut dyn Surface) -> usize {
        surface.fill_rect(0.0, 0.0, surface.width(), surface.height(), BACKGROUND);
        let mut drawn = 0;
        for layer in &mut self.layers {
            if layer.is_enabled(frame.config) {
                layer.draw(frame, surface);
                drawn += 1;
            }
        }
        drawn
    }

    /// Resets per-session smoothing history ahead of a new frame chain.
    pub fn restart(&mut self, config: &VisualizationConfig) {
        let ctx = self.ctx(config);
        for layer in &mut self.layers {
            layer.on_session_start(&ctx);
        }
    }

    pub fn reconfigure(&mut self, previous: &VisualizationConfig, config: &VisualizationConfig) {
        let ctx = self.ctx(config);
        for layer in &mut self.layers {
            layer.on_config_changed(previous, &ctx);
        }
    }

    pub fn on_dimensions_changed(&mut self, config: &VisualizationConfig, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        let ctx = self.ctx(config);
        for layer in &mut self.layers {
            layer.on_dimensions_changed(&ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AudioSnapshot;
    use crate::config::LayerKind;
    use crate::visual::surface::{DisplayList, DrawCommand};
    use rand::SeedableRng;

    fn compositor(config: &VisualizationConfig) -> Compositor {
        let ctx = LayerContext {
            config,
            width: 360.0,
            height: 640.0,
            bin_count: 64,
        };
        Compositor::new(&ctx, StdRng::seed_from_u64(3))
    }

    #[test]
    fn layers_run_in_fixed_order() {
        let mut config = VisualizationConfig::default();
        for kind in LayerKind::ALL {
            config.layers.set(kind, true);
        }
        config.label.text = "track".into();
        let comp = compositor(&config);
        assert_eq!(
            comp.active_layers(&config),
            vec![
                "bars",
                "circles",
                "waves",
                "snow",
                "polar lines",
                "spectrogram grid",
                "label"
            ]
        );
    }

    #[test]
    fn clears_then_draws_enabled_layers() {
        let config = VisualizationConfig::default();
        let mut comp = compositor(&config);
        let snapshot = AudioSnapshot::from_bytes(vec![255; 64], vec![128; 64]);
        let frame = FrameInput {
            snapshot: &snapshot,
            config: &config,
            time_secs: 0.0,
        };
        let mut list = DisplayList::new(360.0, 640.0);
        let drawn = comp.render(&frame, &mut list);
        assert_eq!(drawn, 1);
        assert_eq!(
            list.commands()[0],
            DrawCommand::FillRect {
                x: 0.0,
                y: 0.0,
                w: 360.0,
                h: 640.0,
                color: BACKGROUND,
            }
        );
        assert!(list.len() > 1);
    }

    #[test]
    fn zero_area_surface_only_clears() {
        let mut config = VisualizationConfig::default();
        for kind in LayerKind::ALL {
            config.layers.set(kind, true);
        }
        config.label.text = "track".into();
        let ctx = LayerContext {
            config: &config,
            width: 0.0,
            height: 0.0,
            bin_count: 64,
        };
        let mut comp = Compositor::new(&ctx, StdRng::seed_from_u64(1));
        let snapshot = AudioSnapshot::from_bytes(vec![255; 64], vec![255; 64]);
        let frame = FrameInput {
            snapshot: &snapshot,
            config: &config,
            time_secs: 1.0,
        };
        let mut list = DisplayList::new(0.0, 0.0);
        comp.render(&frame, &mut list);
        assert_eq!(list.len(), 1);
    }
}
