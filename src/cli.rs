//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{LabelConfig, LayerKind, LayerToggles, VisualizationConfig};

pub const DEFAULT_TRACK: &str = "music/edge of knowledge.wav";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LayerArg {
    Bars,
    Circles,
    Waves,
    Snow,
    Polar,
    Grid,
}

impl From<LayerArg> for LayerKind {
    fn from(arg: LayerArg) -> Self {
        match arg {
            LayerArg::Bars => LayerKind::Bars,
            LayerArg::Circles => LayerKind::Circles,
            LayerArg::Waves => LayerKind::Waves,
            LayerArg::Snow => LayerKind::Particles,
            LayerArg::Polar => LayerKind::PolarLines,
            LayerArg::Grid => LayerKind::SpectrogramGrid,
        }
    }
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "reel_visualizer")]
#[command(about = "Layered audio visualizer for vertical video", long_about = None)]
pub struct Args {
    /// WAV file to play
    #[arg(value_name = "TRACK", default_value = DEFAULT_TRACK)]
    pub track: PathBuf,

    /// Repeat the track when it ends
    #[arg(long = "loop")]
    pub looped: bool,

    /// Window width; the height follows the 9:16 aspect
    #[arg(long, value_name = "PIXELS", default_value_t = 360)]
    pub width: u32,

    /// Layers to enable, comma separated
    #[arg(long, value_enum, value_delimiter = ',', default_value = "bars")]
    pub layers: Vec<LayerArg>,

    /// Waveform sensitivity in percent (5-100)
    #[arg(long, default_value_t = 50)]
    pub wave_amplitude: u32,

    /// Time-domain byte treated as the waveform's zero line
    #[arg(long, default_value_t = 128)]
    pub wave_baseline: u8,

    /// Snow density (10-200)
    #[arg(long, default_value_t = 50)]
    pub particles: usize,

    /// Snow flake size (1-10)
    #[arg(long, default_value_t = 3)]
    pub snow_size: u32,

    /// Polar line count (10-180)
    #[arg(long, default_value_t = 60)]
    pub lines: usize,

    /// Polar line length in percent of the short side (10-100)
    #[arg(long, default_value_t = 50)]
    pub line_length: u32,

    /// Grid cell size in pixels (10-50)
    #[arg(long, default_value_t = 20)]
    pub cell_size: u32,

    /// Grid sensitivity in percent (10-100)
    #[arg(long, default_value_t = 50)]
    pub sensitivity: u32,

    /// Hide the track label
    #[arg(long)]
    pub no_label: bool,

    /// Label text instead of the track name
    #[arg(long, value_name = "TEXT")]
    pub label: Option<String>,

    /// Label font families, comma separated, looked up among system fonts
    #[arg(long, default_value = "Arial, sans-serif")]
    pub font: String,

    /// TrueType font used to render the label
    #[arg(long, value_name = "PATH")]
    pub font_file: Option<PathBuf>,

    /// Label font size (8-64)
    #[arg(long, default_value_t = 16)]
    pub font_size: u32,
}

impl Args {
    /// Window size in logical pixels, 9:16.
    pub fn window_size(&self) -> (u32, u32) {
        (self.width, self.width * 16 / 9)
    }

    /// Builds and validates the visual configuration. `track_label` is used
    /// when no explicit label was given.
    pub fn to_config(&self, track_label: &str) -> anyhow::Result<VisualizationConfig> {
        let mut layers = LayerToggles {
            bars: false,
            ..LayerToggles::default()
        };
        for &arg in &self.layers {
            layers.set(arg.into(), true);
        }

        let config = VisualizationConfig {
            layers,
            wave_amplitude: self.wave_amplitude,
            wave_baseline: self.wave_baseline,
            particle_count: self.particles,
            snow_size: self.snow_size,
            line_count: self.lines,
            line_length: self.line_length,
            grid_cell_size: self.cell_size,
            grid_sensitivity: self.sensitivity,
            label: LabelConfig {
                show: !self.no_label,
                text: self
                    .label
                    .clone()
                    .unwrap_or_else(|| track_label.to_string()),
                font: self.font.clone(),
                font_file: self.font_file.clone(),
                font_size: self.font_size,
            },
        };
        config.validate()?;
        Ok(config)
    }
}
