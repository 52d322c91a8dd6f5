use anyhow::Context;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::cell::Cell;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Reports where playback currently is.
pub trait PlaybackClock {
    fn position_secs(&self) -> f32;
}

impl<C: PlaybackClock + ?Sized> PlaybackClock for Rc<C> {
    fn position_secs(&self) -> f32 {
        (**self).position_secs()
    }
}

pub struct AudioPlayer {
    _stream: OutputStream, // must stay alive for audio to keep playing
    _handle: OutputStreamHandle,
    sink: Sink,
    resumed_at: Cell<Option<Instant>>,
    played: Cell<Duration>,
}

impl AudioPlayer {
    /// Opens the default output and queues `path`, paused.
    pub fn open(path: &Path, looped: bool) -> anyhow::Result<Self> {
        let (_stream, handle) =
            OutputStream::try_default().context("Failed to open audio output device")?;
        let sink = Sink::try_new(&handle).context("Failed to create audio sink")?;
        let file = BufReader::new(
            File::open(path)
                .with_context(|| format!("Failed to open {} for playback", path.display()))?,
        );
        let source = Decoder::new(file).context("Failed to decode track for playback")?;
        sink.pause();
        if looped {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }
        Ok(Self {
            _stream,
            _handle: handle,
            sink,
            resumed_at: Cell::new(None),
            played: Cell::new(Duration::ZERO),
        })
    }

    pub fn play(&self) {
        if self.resumed_at.get().is_none() {
            self.resumed_at.set(Some(Instant::now()));
        }
        self.sink.play();
    }

    pub fn pause(&self) {
        self.sink.pause();
        if let Some(since) = self.resumed_at.take() {
            self.played.set(self.played.get() + since.elapsed());
        }
    }
}

impl PlaybackClock for AudioPlayer {
    fn position_secs(&self) -> f32 {
        let running = self
            .resumed_at
            .get()
            .map(|since| since.elapsed())
            .unwrap_or_default();
        (self.played.get() + running).as_secs_f32()
    }
}
