use nannou::prelude::vec2;
use rand::rngs::StdRng;
use rand::Rng;

use super::surface::{Rgba, Surface, gray_level};
use super::{FrameInput, Layer, LayerContext};
use crate::config::{LayerKind, VisualizationConfig};

/// Rendered radius above which a particle also gets snowflake arms.
const FLAKE_THRESHOLD: f32 = 1.5;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub speed: f32,
    pub swing_factor: f32,
    pub swing_offset: f32,
    pub energy: f32,
}

/// Uniform in `[0, 1)`.
fn unit(rng: &mut impl Rng) -> f32 {
    rng.gen_range(0.0..1.0)
}

impl Particle {
    fn spawn(rng: &mut impl Rng, width: f32, height: f32, snow_size: u32) -> Self {
        Self {
            x: unit(rng) * width,
            y: unit(rng) * height,
            radius: (unit(rng) * 2.5 + 1.5) * (snow_size as f32 / 3.0),
            speed: unit(rng) + 0.5,
            swing_factor: unit(rng) * 2.0 + 1.0,
            swing_offset: unit(rng) * std::f32::consts::TAU,
            energy: 0.0,
        }
    }

    pub fn rendered_radius(&self) -> f32 {
        self.radius * (1.0 + self.energy * 4.0)
    }

    pub fn brightness(&self) -> u8 {
        gray_level(200.0 + (self.energy * 55.0).floor())
    }
}

/// Falling snow whose speed, swing and size follow the overall volume.
#[derive(Clone, Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    width: f32,
    height: f32,
}

impl ParticleSystem {
    pub fn new(
        count: usize,
        snow_size: u32,
        width: f32,
        height: f32,
        rng: &mut impl Rng,
    ) -> Self {
        let particles = (0..count)
            .map(|_| Particle::spawn(rng, width.max(0.0), height.max(0.0), snow_size))
            .collect();
        Self {
            particles,
            width,
            height,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Advances every particle one frame.
    ///
    /// `volume` is the average frequency level in `0..=1`; `time_secs` drives
    /// the sideways swing.
    pub fn step(&mut self, volume: f32, time_secs: f64, rng: &mut impl Rng) {
        let (w, h) = (self.width, self.height);
        if !(w > 0.0 && h > 0.0) {
            return;
        }
        let energy = volume * 2.5;
        for p in &mut self.particles {
            p.energy = energy;
            p.y += p.speed * (1.0 + energy);
            let phase = time_secs * p.swing_factor as f64 + p.swing_offset as f64;
            p.x += phase.sin() as f32 * (0.5 + energy * 1.5);

            if p.y >= h {
                p.y = 0.0;
                p.x = unit(rng) * w;
            }
            if !(0.0..w).contains(&p.x) {
                p.x = p.x.rem_euclid(w);
                if p.x >= w {
                    p.x = 0.0;
                }
            }
        }
    }

    pub fn paint(&self, surface: &mut dyn Surface) {
        for p in &self.particles {
            let center = vec2(p.x, p.y);
            let radius = p.rendered_radius();
            let brightness = p.brightness();
            surface.fill_circle(center, radius, Rgba::gray(brightness, 0.8));

            if radius > FLAKE_THRESHOLD {
                let arm = radius * 1.5;
                let diag = arm * 0.7;
                let stroke = Rgba::gray(brightness, 0.4);
                let arms = [
                    (vec2(-arm, 0.0), vec2(arm, 0.0)),
                    (vec2(0.0, -arm), vec2(0.0, arm)),
                    (vec2(-diag, -diag), vec2(diag, diag)),
                    (vec2(-diag, diag), vec2(diag, -diag)),
                ];
                for (a, b) in arms {
                    surface.stroke_line(center + a, center + b, 0.5, stroke);
                }
            }
        }
    }
}

pub struct ParticlesLayer {
    system: ParticleSystem,
    rng: StdRng,
}

impl ParticlesLayer {
    pub fn with_rng(ctx: &LayerContext<'_>, mut rng: StdRng) -> Self {
        let system = Self::respawn(ctx, &mut rng);
        Self { system, rng }
    }

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    fn respawn(ctx: &LayerContext<'_>, rng: &mut StdRng) -> ParticleSystem {
        ParticleSystem::new(
            ctx.config.particle_count,
            ctx.config.snow_size,
            ctx.width,
            ctx.height,
            rng,
        )
    }

    /// Fresh field for a new particle count or snow size.
    pub fn on_particle_params_changed(&mut self, ctx: &LayerContext<'_>) {
        let next = Self::respawn(ctx, &mut self.rng);
        log::debug!("respawned {} particles", next.len());
        self.system = next;
    }
}

impl Layer for ParticlesLayer {
    fn name(&self) -> &'static str {
        LayerKind::Particles.label()
    }

    fn is_enabled(&self, config: &VisualizationConfig) -> bool {
        config.layers.particles
    }

    fn draw(&mut self, frame: &FrameInput<'_>, surface: &mut dyn Surface) {
        let volume = frame.snapshot.average_volume() / 255.0;
        self.system.step(volume, frame.time_secs, &mut self.rng);
        if !surface.is_degenerate() {
            self.system.paint(surface);
        }
    }

    fn on_config_changed(&mut self, previous: &VisualizationConfig, ctx: &LayerContext<'_>) {
        if previous.particles_differ(ctx.config) {
            self.on_particle_params_changed(ctx);
        }
    }

    fn on_dimensions_changed(&mut self, ctx: &LayerContext<'_>) {
        self.on_particle_params_changed(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AudioSnapshot;
    use crate::visual::surface::{DisplayList, DrawCommand};
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn spawns_requested_count_with_positive_radius() {
        let system = ParticleSystem::new(120, 3, 360.0, 640.0, &mut rng());
        assert_eq!(system.len(), 120);
        assert!(system.particles().iter().all(|p| p.radius > 0.0));
    }

    #[test]
    fn default_snow_size_radius_range() {
        let system = ParticleSystem::new(200, 3, 360.0, 640.0, &mut rng());
        for p in system.particles() {
            assert!((1.5..=4.0).contains(&p.radius), "radius {}", p.radius);
            assert!((0.5..1.5).contains(&p.speed));
            assert!((1.0..3.0).contains(&p.swing_factor));
        }
    }

    #[test]
    fn bottom_overflow_resets_to_top() {
        let mut r = rng();
        let mut system = ParticleSystem::new(30, 3, 360.0, 640.0, &mut r);
        for p in system.particles_mut() {
            p.y = 640.0;
        }
        system.step(0.5, 12.3, &mut r);
        for p in system.particles() {
            assert_eq!(p.y, 0.0);
            assert!((0.0..360.0).contains(&p.x));
        }
    }

    #[test]
    fn positions_stay_on_surface() {
        let mut r = rng();
        let mut system = ParticleSystem::new(50, 10, 100.0, 80.0, &mut r);
        for frame in 0..500 {
            system.step(1.0, frame as f64 / 60.0, &mut r);
            for p in system.particles() {
                assert!((0.0..100.0).contains(&p.x), "x {}", p.x);
                assert!((0.0..80.0).contains(&p.y), "y {}", p.y);
            }
        }
    }

    #[test]
    fn horizontal_overflow_wraps_without_rerandomizing() {
        let mut r = rng();
        let mut system = ParticleSystem::new(1, 3, 100.0, 100.0, &mut r);
        {
            let p = &mut system.particles_mut()[0];
            p.x = 99.9;
            p.y = 10.0;
            p.swing_factor = 0.0;
            p.swing_offset = std::f32::consts::FRAC_PI_2; // sin = 1, push right
        }
        system.step(0.0, 0.0, &mut r);
        let p = &system.particles()[0];
        assert!((p.x - 0.4).abs() < 1e-3, "x {}", p.x);
    }

    #[test]
    fn energy_scales_size_and_brightness() {
        let mut r = rng();
        let mut system = ParticleSystem::new(1, 3, 100.0, 100.0, &mut r);
        system.step(1.0, 0.0, &mut r);
        let p = &system.particles()[0];
        assert_eq!(p.energy, 2.5);
        assert_eq!(p.rendered_radius(), p.radius * 11.0);
        assert_eq!(p.brightness(), 255);

        system.step(0.0, 0.0, &mut r);
        assert_eq!(system.particles()[0].brightness(), 200);
    }

    #[test]
    fn large_flakes_get_arms() {
        let mut system = ParticleSystem::new(1, 3, 100.0, 100.0, &mut rng());
        let mut list = DisplayList::new(100.0, 100.0);
        system.particles_mut()[0].radius = 2.0;
        system.paint(&mut list);
        assert_eq!(list.len(), 5);
        let p = &system.particles()[0];
        let center = vec2(p.x, p.y);
        // rendered radius 2.0, arm 3.0, diagonal 2.1
        let DrawCommand::StrokeLine {
            from,
            to,
            weight,
            color,
        } = &list.commands()[3]
        else {
            panic!("expected a diagonal arm");
        };
        assert_eq!(*weight, 0.5);
        assert_eq!(*color, Rgba::gray(200, 0.4));
        assert!((*from - (center + vec2(-2.1, -2.1))).length() < 1e-4);
        assert!((*to - (center + vec2(2.1, 2.1))).length() < 1e-4);

        let DrawCommand::StrokeLine { from, to, .. } = &list.commands()[1] else {
            panic!("expected a horizontal arm");
        };
        assert_eq!(*from, center + vec2(-3.0, 0.0));
        assert_eq!(*to, center + vec2(3.0, 0.0));

        list.clear();
        system.particles_mut()[0].radius = 1.0;
        system.paint(&mut list);
        assert_eq!(list.len(), 1);
    }

    fn ctx(config: &VisualizationConfig) -> LayerContext<'_> {
        LayerContext {
            config,
            width: 360.0,
            height: 640.0,
            bin_count: 1024,
        }
    }

    #[test]
    fn layer_respawns_on_param_change_only() {
        let mut config = VisualizationConfig::default();
        let mut layer = ParticlesLayer::with_rng(&ctx(&config), rng());
        assert_eq!(layer.system().len(), 50);

        let previous = config.clone();
        config.grid_sensitivity = 80;
        let before = layer.system().particles()[0].clone();
        layer.on_config_changed(&previous, &ctx(&config));
        assert_eq!(layer.system().particles()[0], before);

        let previous = config.clone();
        config.particle_count = 80;
        layer.on_config_changed(&previous, &ctx(&config));
        assert_eq!(layer.system().len(), 80);
    }

    #[test]
    fn draw_moves_particles_down() {
        let config = VisualizationConfig::default();
        let mut layer = ParticlesLayer::with_rng(&ctx(&config), rng());
        for p in layer.system.particles_mut() {
            p.y = 10.0;
        }
        let snapshot = AudioSnapshot::new(4);
        let frame = FrameInput {
            snapshot: &snapshot,
            config: &config,
            time_secs: 1.0,
        };
        let mut list = DisplayList::new(360.0, 640.0);
        layer.draw(&frame, &mut list);
        assert!(layer.system().particles().iter().all(|p| p.y > 10.0));
        assert!(!list.is_empty());
    }
}
