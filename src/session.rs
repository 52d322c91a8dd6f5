use rand::rngs::StdRng;

use crate::analysis::{AnalysisSource, AudioSnapshot};
use crate::config::VisualizationConfig;
use crate::scheduler::FrameScheduler;
use crate::visual::{Compositor, DisplayList, FrameInput, LayerContext};

/// State a frame step reads and mutates. Only the scheduler's step touches it
/// while a chain is running.
struct FrameState {
    source: Box<dyn AnalysisSource>,
    snapshot: AudioSnapshot,
    compositor: Compositor,
    surface: DisplayList,
    config: VisualizationConfig,
}

impl FrameState {
    /// Samples the source and paints one frame. Returns how many layers drew.
    fn step(&mut self, time_secs: f64) -> usize {
        self.snapshot.capture(self.source.as_mut());
        self.surface.clear();
        let frame = FrameInput {
            snapshot: &self.snapshot,
            config: &self.config,
            time_secs,
        };
        self.compositor.render(&frame, &mut self.surface)
    }
}

/// One play session: an audio source, the layers it drives, and the frame
/// chain that runs them.
///
/// Configuration and dimension changes go through [`PlaySession::apply_config`]
/// and [`PlaySession::on_dimensions_changed`], which stop the chain, swap in
/// rebuilt layer state, and restart the chain if it was running.
pub struct PlaySession {
    scheduler: FrameScheduler,
    state: FrameState,
}

impl PlaySession {
    pub fn new(
        source: Box<dyn AnalysisSource>,
        config: VisualizationConfig,
        width: f32,
        height: f32,
        rng: StdRng,
    ) -> Self {
        let bin_count = source.frequency_bin_count();
        let compositor = Compositor::new(
            &LayerContext {
                config: &config,
                width,
                height,
                bin_count,
            },
            rng,
        );
        log::info!("play session ready: {bin_count} bins, {width}x{height} surface");
        Self {
            scheduler: FrameScheduler::new(),
            state: FrameState {
                source,
                snapshot: AudioSnapshot::new(bin_count),
                compositor,
                surface: DisplayList::new(width, height),
                config,
            },
        }
    }

    pub fn config(&self) -> &VisualizationConfig {
        &self.state.config
    }

    pub fn display_list(&self) -> &DisplayList {
        &self.state.surface
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Starts (or restarts) the frame chain with fresh smoothing history.
    pub fn start(&mut self) {
        self.scheduler.stop();
        self.state.compositor.restart(&self.state.config);
        self.scheduler.start();
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Runs the pending frame step, if the chain is running.
    pub fn on_refresh(&mut self, time_secs: f64) -> Option<usize> {
        self.scheduler
            .tick(&mut self.state, |state| state.step(time_secs))
    }

    pub fn apply_config(&mut self, config: VisualizationConfig) -> anyhow::Result<()> {
        config.validate()?;
        if config == self.state.config {
            return Ok(());
        }
        let was_running = self.scheduler.is_running();
        self.scheduler.stop();

        let previous = std::mem::replace(&mut self.state.config, config);
        self.state
            .compositor
            .reconfigure(&previous, &self.state.config);
        log::debug!(
            "reconfigured, active layers: {:?}",
            self.state.compositor.active_layers(&self.state.config)
        );

        if was_running {
            self.start();
        }
        Ok(())
    }

    pub fn on_dimensions_changed(&mut self, width: f32, height: f32) {
        if (width, height) == self.state.compositor.dimensions() {
            return;
        }
        let was_running = self.scheduler.is_running();
        self.scheduler.stop();

        self.state.surface.resize(width, height);
        self.state
            .compositor
            .on_dimensions_changed(&self.state.config, width, height);
        log::info!("surface resized to {width}x{height}");

        if was_running {
            self.start();
        }
    }
}
