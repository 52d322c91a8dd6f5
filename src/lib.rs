//! Audio-reactive layered visuals for vertical (9:16) video capture.

pub mod analysis;
pub mod audio;
pub mod cli;
pub mod config;
pub mod scheduler;
pub mod session;
pub mod visual;

pub use analysis::{AnalysisSource, AudioSnapshot, FFT_SIZE};
pub use config::{LayerKind, LayerToggles, VisualizationConfig};
pub use scheduler::FrameScheduler;
pub use session::PlaySession;
