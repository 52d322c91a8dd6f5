pub mod bars;
pub mod canvas;
pub mod circles;
pub mod compositor;
pub mod fonts;
pub mod grid;
pub mod overlay;
pub mod particles;
pub mod polar;
pub mod smoothing;
pub mod surface;
pub mod waveform;

pub use compositor::Compositor;
pub use surface::{DisplayList, DrawCommand, Rgba, Surface};

use crate::analysis::AudioSnapshot;
use crate::config::VisualizationConfig;

/// Everything a layer reads during one frame step.
pub struct FrameInput<'a> {
    pub snapshot: &'a AudioSnapshot,
    pub config: &'a VisualizationConfig,
    /// Wall-clock seconds, drives the particle swing.
    pub time_secs: f64,
}

impl FrameInput<'_> {
    pub fn bin_count(&self) -> usize {
        self.snapshot.len()
    }
}

/// What a layer needs to size its persistent state.
#[derive(Clone, Copy)]
pub struct LayerContext<'a> {
    pub config: &'a VisualizationConfig,
    pub width: f32,
    pub height: f32,
    pub bin_count: usize,
}

/// One visual layer: draws from the frame input and owns its own state.
pub trait Layer {
    fn name(&self) -> &'static str;

    fn is_enabled(&self, config: &VisualizationConfig) -> bool;

    fn draw(&mut self, frame: &FrameInput<'_>, surface: &mut dyn Surface);

    /// A frame chain is (re)starting.
    fn on_session_start(&mut self, _ctx: &LayerContext<'_>) {}

    /// The configuration changed from `_previous` to `_ctx.config`.
    fn on_config_changed(&mut self, _previous: &VisualizationConfig, _ctx: &LayerContext<'_>) {}

    fn on_dimensions_changed(&mut self, _ctx: &LayerContext<'_>) {}
}
