use std::path::PathBuf;

/// The six toggle-able visual layers, in compositing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Bars,
    Circles,
    Waves,
    Particles,
    PolarLines,
    SpectrogramGrid,
}

impl LayerKind {
    pub const ALL: [LayerKind; 6] = [
        LayerKind::Bars,
        LayerKind::Circles,
        LayerKind::Waves,
        LayerKind::Particles,
        LayerKind::PolarLines,
        LayerKind::SpectrogramGrid,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LayerKind::Bars => "bars",
            LayerKind::Circles => "circles",
            LayerKind::Waves => "waves",
            LayerKind::Particles => "snow",
            LayerKind::PolarLines => "polar lines",
            LayerKind::SpectrogramGrid => "spectrogram grid",
        }
    }
}

/// Which layers are on. At least one is always on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerToggles {
    pub bars: bool,
    pub circles: bool,
    pub waves: bool,
    pub particles: bool,
    pub polar_lines: bool,
    pub spectrogram_grid: bool,
}

impl Default for LayerToggles {
    fn default() -> Self {
        Self {
            bars: true,
            circles: false,
            waves: false,
            particles: false,
            polar_lines: false,
            spectrogram_grid: false,
        }
    }
}

impl LayerToggles {
    pub fn is_enabled(&self, kind: LayerKind) -> bool {
        match kind {
            LayerKind::Bars => self.bars,
            LayerKind::Circles => self.circles,
            LayerKind::Waves => self.waves,
            LayerKind::Particles => self.particles,
            LayerKind::PolarLines => self.polar_lines,
            LayerKind::SpectrogramGrid => self.spectrogram_grid,
        }
    }

    fn slot(&mut self, kind: LayerKind) -> &mut bool {
        match kind {
            LayerKind::Bars => &mut self.bars,
            LayerKind::Circles => &mut self.circles,
            LayerKind::Waves => &mut self.waves,
            LayerKind::Particles => &mut self.particles,
            LayerKind::PolarLines => &mut self.polar_lines,
            LayerKind::SpectrogramGrid => &mut self.spectrogram_grid,
        }
    }

    pub fn active_count(&self) -> usize {
        LayerKind::ALL
            .iter()
            .filter(|&&k| self.is_enabled(k))
            .count()
    }

    /// Flips one layer. Turning off the last active layer brings `bars` back.
    pub fn toggle(&mut self, kind: LayerKind) {
        let slot = self.slot(kind);
        *slot = !*slot;
        if self.active_count() == 0 {
            self.bars = true;
        }
    }

    /// Sets a layer explicitly, with the same last-layer protection as `toggle`.
    pub fn set(&mut self, kind: LayerKind, on: bool) {
        *self.slot(kind) = on;
        if self.active_count() == 0 {
            self.bars = true;
        }
    }
}

/// Label drawn over the visuals.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelConfig {
    pub show: bool,
    pub text: String,
    /// Comma-separated family list, looked up in the system font dirs when
    /// no font file is given.
    pub font: String,
    pub font_file: Option<PathBuf>,
    pub font_size: u32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            show: true,
            text: String::new(),
            font: "Arial, sans-serif".to_string(),
            font_file: None,
            font_size: 16,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VisualizationConfig {
    pub layers: LayerToggles,

    pub wave_amplitude: u32,
    pub wave_baseline: u8,

    pub particle_count: usize,
    pub snow_size: u32,

    pub line_count: usize,
    pub line_length: u32,

    pub grid_cell_size: u32,
    pub grid_sensitivity: u32,

    pub label: LabelConfig,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            layers: LayerToggles::default(),
            wave_amplitude: 50,
            wave_baseline: 128,
            particle_count: 50,
            snow_size: 3,
            line_count: 60,
            line_length: 50,
            grid_cell_size: 20,
            grid_sensitivity: 50,
            label: LabelConfig::default(),
        }
    }
}

pub const WAVE_AMPLITUDE_RANGE: (u32, u32) = (5, 100);
pub const PARTICLE_COUNT_RANGE: (usize, usize) = (10, 200);
pub const SNOW_SIZE_RANGE: (u32, u32) = (1, 10);
pub const LINE_COUNT_RANGE: (usize, usize) = (10, 180);
pub const LINE_LENGTH_RANGE: (u32, u32) = (10, 100);
pub const GRID_CELL_SIZE_RANGE: (u32, u32) = (10, 50);
pub const GRID_SENSITIVITY_RANGE: (u32, u32) = (10, 100);
pub const FONT_SIZE_RANGE: (u32, u32) = (8, 64);

fn check_range<T: PartialOrd + std::fmt::Display>(
    name: &str,
    value: T,
    (lo, hi): (T, T),
) -> anyhow::Result<()> {
    anyhow::ensure!(
        value >= lo && value <= hi,
        "{name} must be within {lo}..={hi}, got {value}"
    );
    Ok(())
}

impl VisualizationConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.layers.active_count() > 0,
            "at least one visualization layer must be enabled"
        );
        check_range("wave amplitude", self.wave_amplitude, WAVE_AMPLITUDE_RANGE)?;
        check_range("particle count", self.particle_count, PARTICLE_COUNT_RANGE)?;
        check_range("snow size", self.snow_size, SNOW_SIZE_RANGE)?;
        check_range("line count", self.line_count, LINE_COUNT_RANGE)?;
        check_range("line length", self.line_length, LINE_LENGTH_RANGE)?;
        check_range("grid cell size", self.grid_cell_size, GRID_CELL_SIZE_RANGE)?;
        check_range(
            "grid sensitivity",
            self.grid_sensitivity,
            GRID_SENSITIVITY_RANGE,
        )?;
        check_range("font size", self.label.font_size, FONT_SIZE_RANGE)?;
        Ok(())
    }

    /// True when the particle field must be rebuilt to reflect `other`.
    pub fn particles_differ(&self, other: &Self) -> bool {
        self.particle_count != other.particle_count || self.snow_size != other.snow_size
    }

    /// True when the grid must be rebuilt to reflect `other`.
    pub fn grid_differs(&self, other: &Self) -> bool {
        self.grid_cell_size != other.grid_cell_size
    }
}

/// Steps `value` by `delta` and keeps it inside `range`.
pub fn nudge<T>(value: T, delta: i64, (lo, hi): (T, T)) -> T
where
    T: Copy + PartialOrd + TryFrom<i64> + TryInto<i64>,
{
    let Ok(current) = value.try_into() else {
        return value;
    };
    let next = T::try_from(current + delta).unwrap_or(lo);
    if next < lo {
        lo
    } else if next > hi {
        hi
    } else {
        next
    }
}
