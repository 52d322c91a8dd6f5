use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use nannou::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use reel_visualizer::analysis::{FFT_SIZE, TrackAnalysis};
use reel_visualizer::audio::{AudioData, AudioPlayer, track_label};
use reel_visualizer::cli::Args;
use reel_visualizer::config::{self, LayerKind, VisualizationConfig, nudge};
use reel_visualizer::session::PlaySession;
use reel_visualizer::visual::{canvas, fonts};

struct Track {
    path: PathBuf,
    audio: AudioData,
}

struct Model {
    looped: bool,
    config: VisualizationConfig,
    track: Option<Track>,
    player: Option<Rc<AudioPlayer>>,
    session: Option<PlaySession>,
    font: Option<nannou::text::Font>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    // Reject bad flags before a window opens.
    Args::parse().to_config("")?;
    nannou::app(model).update(update).run();
    Ok(())
}

fn model(app: &App) -> Model {
    let args = Args::parse();
    let (width, height) = args.window_size();
    app.new_window()
        .title("reel visualizer")
        .size(width, height)
        .view(view)
        .key_pressed(key_pressed)
        .build()
        .unwrap();

    let track = match AudioData::load_wav(&args.track) {
        Ok(audio) => {
            log::info!(
                "loaded {} ({} Hz, {:.1}s)",
                args.track.display(),
                audio.sample_rate,
                audio.duration_sec
            );
            Some(Track {
                path: args.track.clone(),
                audio,
            })
        }
        Err(e) => {
            log::error!("Error loading audio: {e:#}");
            None
        }
    };
    let label = track
        .as_ref()
        .map(|t| track_label(&t.path))
        .unwrap_or_default();

    let config = match args.to_config(&label) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e:#}, using defaults");
            VisualizationConfig::default()
        }
    };

    let font_path = fonts::label_font_path(&config.label, &fonts::system_font_dirs());
    let font = font_path.and_then(|path| {
        nannou::text::font::from_file(&path)
            .map_err(|e| log::warn!("could not load font {}: {e:?}", path.display()))
            .ok()
    });

    Model {
        looped: args.looped,
        config,
        track,
        player: None,
        session: None,
        font,
    }
}

fn toggle_play(app: &App, model: &mut Model) {
    let Some(track) = &model.track else {
        log::warn!("no track loaded");
        return;
    };

    if model.session.is_none() {
        let player = match AudioPlayer::open(&track.path, model.looped) {
            Ok(player) => Rc::new(player),
            Err(e) => {
                log::error!("{e:#}");
                return;
            }
        };
        let source = TrackAnalysis::new(
            track.audio.clone(),
            Rc::clone(&player),
            FFT_SIZE,
            model.looped,
        );
        let win = app.window_rect();
        model.session = Some(PlaySession::new(
            Box::new(source),
            model.config.clone(),
            win.w(),
            win.h(),
            StdRng::from_entropy(),
        ));
        model.player = Some(player);
    }

    let (Some(session), Some(player)) = (&mut model.session, &model.player) else {
        return;
    };
    if session.is_running() {
        player.pause();
        session.stop();
        log::info!("paused");
    } else {
        player.play();
        session.start();
        log::info!("playing");
    }
}

fn apply_config(model: &mut Model, config: VisualizationConfig) {
    let applied = match &mut model.session {
        Some(session) => session.apply_config(config.clone()),
        None => config.validate(),
    };
    match applied {
        Ok(()) => model.config = config,
        Err(e) => log::warn!("{e:#}"),
    }
}

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    let mut next = model.config.clone();
    match key {
        Key::Space => return toggle_play(app, model),
        Key::Key1 => next.layers.toggle(LayerKind::Bars),
        Key::Key2 => next.layers.toggle(LayerKind::Circles),
        Key::Key3 => next.layers.toggle(LayerKind::Waves),
        Key::Key4 => next.layers.toggle(LayerKind::Particles),
        Key::Key5 => next.layers.toggle(LayerKind::PolarLines),
        Key::Key6 => next.layers.toggle(LayerKind::SpectrogramGrid),
        Key::F => next.label.show = !next.label.show,
        Key::Up => {
            next.particle_count = nudge(next.particle_count, 10, config::PARTICLE_COUNT_RANGE)
        }
        Key::Down => {
            next.particle_count = nudge(next.particle_count, -10, config::PARTICLE_COUNT_RANGE)
        }
        Key::Right => next.line_count = nudge(next.line_count, 10, config::LINE_COUNT_RANGE),
        Key::Left => next.line_count = nudge(next.line_count, -10, config::LINE_COUNT_RANGE),
        Key::RBracket => {
            next.grid_cell_size = nudge(next.grid_cell_size, 5, config::GRID_CELL_SIZE_RANGE)
        }
        Key::LBracket => {
            next.grid_cell_size = nudge(next.grid_cell_size, -5, config::GRID_CELL_SIZE_RANGE)
        }
        Key::Equals => next.snow_size = nudge(next.snow_size, 1, config::SNOW_SIZE_RANGE),
        Key::Minus => next.snow_size = nudge(next.snow_size, -1, config::SNOW_SIZE_RANGE),
        _ => return,
    }
    if next != model.config {
        apply_config(model, next);
    }
}

fn update(app: &App, model: &mut Model, _update: Update) {
    let Some(session) = &mut model.session else {
        return;
    };
    let win = app.window_rect();
    session.on_dimensions_changed(win.w(), win.h());
    session.on_refresh(app.time as f64);
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    match &model.session {
        Some(session) => canvas::paint(
            &draw,
            app.window_rect(),
            session.display_list(),
            model.font.as_ref(),
        ),
        None => canvas::clear(&draw),
    }
    if let Err(e) = draw.to_frame(app, &frame) {
        log::error!("failed to render frame: {e:?}");
    }
}
