use nannou::prelude::vec2;

use super::smoothing::{SLUGGISH, blend};
use super::surface::{Rgba, Surface, gray_level};
use super::{FrameInput, Layer, LayerContext};
use crate::config::{LayerKind, VisualizationConfig};

const NOISE_FLOOR: f32 = 0.05;
const OUTLINE_ENERGY: f32 = 0.4;
const PULSE_ENERGY: f32 = 0.7;

#[derive(Clone, Debug, PartialEq)]
pub struct GridCell {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub energy: f32,
    pub target_energy: f32,
}

/// A row-major grid of cells covering the surface, each tied to one band.
#[derive(Clone, Debug)]
pub struct GridCellSystem {
    cells: Vec<GridCell>,
}

impl GridCellSystem {
    pub fn new(cell_size: f32, width: f32, height: f32) -> Self {
        if !(cell_size > 0.0 && width > 0.0 && height > 0.0) {
            return Self { cells: Vec::new() };
        }
        let rows = (height / cell_size).ceil() as usize;
        let cols = (width / cell_size).ceil() as usize;
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(GridCell {
                    x: col as f32 * cell_size,
                    y: row as f32 * cell_size,
                    size: cell_size,
                    energy: 0.0,
                    target_energy: 0.0,
                });
            }
        }
        Self { cells }
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Pulls every cell's energy towards its band's level.
    pub fn update(&mut self, frequency: &[u8], sensitivity: f32) {
        let n = frequency.len();
        if n == 0 || self.cells.is_empty() {
            return;
        }
        let step = n / self.cells.len();
        for (index, cell) in self.cells.iter_mut().enumerate() {
            let bin = (index * step) % n;
            cell.target_energy = frequency[bin] as f32 / 255.0 * sensitivity * 2.0;
            cell.energy = blend(cell.energy, cell.target_energy, SLUGGISH);
        }
    }

    pub fn paint(&self, surface: &mut dyn Surface) {
        for cell in &self.cells {
            let e = cell.energy;
            if e <= NOISE_FLOOR {
                continue;
            }
            let size = cell.size * (e * 0.8).min(0.9);
            let center = vec2(cell.x + cell.size / 2.0, cell.y + cell.size / 2.0);
            let gray = gray_level(100.0 + (e * 155.0).floor());
            let alpha = (0.2 + e * 0.7).min(0.9);
            surface.fill_circle(center, size / 2.0, Rgba::gray(gray, alpha));

            if e > OUTLINE_ENERGY {
                surface.stroke_circle(center, size / 2.0, 1.0, Rgba::white(alpha * 0.6));
            }
            if e > PULSE_ENERGY {
                surface.stroke_circle(center, size * 1.3 / 2.0, 2.0, Rgba::white(alpha * 0.2));
            }
        }
    }
}

pub struct GridLayer {
    system: GridCellSystem,
}

impl GridLayer {
    pub fn new(ctx: &LayerContext<'_>) -> Self {
        Self {
            system: Self::rebuild(ctx),
        }
    }

    pub fn system(&self) -> &GridCellSystem {
        &self.system
    }

    fn rebuild(ctx: &LayerContext<'_>) -> GridCellSystem {
        GridCellSystem::new(ctx.config.grid_cell_size as f32, ctx.width, ctx.height)
    }

    /// Fresh grid for a new cell size.
    pub fn on_grid_params_changed(&mut self, ctx: &LayerContext<'_>) {
        let next = Self::rebuild(ctx);
        log::debug!("rebuilt grid with {} cells", next.len());
        self.system = next;
    }
}

impl Layer for GridLayer {
    fn name(&self) -> &'static str {
        LayerKind::SpectrogramGrid.label()
    }

    fn is_enabled(&self, config: &VisualizationConfig) -> bool {
        config.layers.spectrogram_grid
    }

    fn draw(&mut self, frame: &FrameInput<'_>, surface: &mut dyn Surface) {
        let sensitivity = frame.config.grid_sensitivity as f32 / 100.0;
        self.system.update(&frame.snapshot.frequency, sensitivity);
        if !surface.is_degenerate() {
            self.system.paint(surface);
        }
    }

    fn on_config_changed(&mut self, previous: &VisualizationConfig, ctx: &LayerContext<'_>) {
        if previous.grid_differs(ctx.config) {
            self.on_grid_params_changed(ctx);
        }
    }

    fn on_dimensions_changed(&mut self, ctx: &LayerContext<'_>) {
        self.on_grid_params_changed(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::surface::{DisplayList, DrawCommand};

    #[test]
    fn reel_grid_cell_count() {
        let grid = GridCellSystem::new(20.0, 360.0, 640.0);
        assert_eq!(grid.len(), 32 * 18);
        assert_eq!(grid.len(), 576);
    }

    #[test]
    fn partial_cells_round_up_and_tile_without_gaps() {
        let grid = GridCellSystem::new(30.0, 100.0, 50.0);
        // 2 rows x 4 cols
        assert_eq!(grid.len(), 8);
        let cells = grid.cells();
        assert_eq!((cells[0].x, cells[0].y), (0.0, 0.0));
        assert_eq!((cells[3].x, cells[3].y), (90.0, 0.0));
        assert_eq!((cells[4].x, cells[4].y), (0.0, 30.0));
        for pair in cells[..4].windows(2) {
            assert_eq!(pair[1].x - pair[0].x, pair[0].size);
        }
    }

    #[test]
    fn zero_area_has_no_cells() {
        assert!(GridCellSystem::new(20.0, 0.0, 640.0).is_empty());
        assert!(GridCellSystem::new(0.0, 360.0, 640.0).is_empty());
    }

    #[test]
    fn energy_converges_slowly() {
        let mut grid = GridCellSystem::new(10.0, 10.0, 10.0);
        let freq = vec![255u8; 16];
        grid.update(&freq, 0.5);
        assert!((grid.cells()[0].energy - 0.3).abs() < 1e-6);
        assert_eq!(grid.cells()[0].target_energy, 1.0);

        for _ in 0..14 {
            grid.update(&freq, 0.5);
        }
        assert!((grid.cells()[0].energy - 1.0).abs() < 0.01);
    }

    #[test]
    fn cells_map_to_spread_out_bins() {
        // 4 cells over 8 bins: step 2
        let mut grid = GridCellSystem::new(10.0, 20.0, 20.0);
        let freq = [0, 0, 255, 0, 0, 0, 0, 0];
        grid.update(&freq, 0.5);
        let energies: Vec<f32> = grid.cells().iter().map(|c| c.target_energy).collect();
        assert_eq!(energies, vec![0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn more_cells_than_bins_all_read_bin_zero() {
        let mut grid = GridCellSystem::new(10.0, 40.0, 40.0);
        let mut freq = [0u8; 8];
        freq[0] = 255;
        grid.update(&freq, 1.0);
        assert!(grid.cells().iter().all(|c| c.target_energy == 2.0));
    }

    fn painted(energy: f32) -> DisplayList {
        let mut grid = GridCellSystem::new(20.0, 20.0, 20.0);
        grid.cells[0].energy = energy;
        let mut list = DisplayList::new(20.0, 20.0);
        grid.paint(&mut list);
        list
    }

    #[test]
    fn energy_thresholds_control_decorations() {
        assert!(painted(0.05).is_empty());
        assert_eq!(painted(0.3).len(), 1);
        assert_eq!(painted(0.5).len(), 2);
        assert_eq!(painted(1.0).len(), 3);
    }

    #[test]
    fn size_is_capped_at_ninety_percent() {
        let list = painted(2.0);
        let DrawCommand::FillCircle {
            center,
            radius,
            color,
        } = &list.commands()[0]
        else {
            panic!("expected fill");
        };
        assert_eq!(*center, vec2(10.0, 10.0));
        assert!((radius - 9.0).abs() < 1e-5);
        assert_eq!(color.r, 255);
        assert!((color.a - 0.9).abs() < 1e-6);

        let DrawCommand::StrokeCircle { radius, weight, .. } = &list.commands()[2] else {
            panic!("expected pulse");
        };
        assert!((radius - 11.7).abs() < 1e-4);
        assert_eq!(*weight, 2.0);
    }
}
