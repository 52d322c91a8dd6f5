use hound::{SampleFormat, WavReader};
use std::path::Path;

/// A decoded track, mixed down to mono.
#[derive(Clone)]
pub struct AudioData {
    pub sample_rate: u32,
    pub samples_mono: Vec<f32>,
    pub duration_sec: f32,
}

impl AudioData {
    pub fn load_wav<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let mut reader = WavReader::open(path)?;
        let spec = reader.spec();

        let channels = spec.channels as usize;
        if channels != 1 && channels != 2 {
            anyhow::bail!("Only mono/stereo WAV supported got({channels}) instead.");
        }

        let mono = match spec.sample_format {
            SampleFormat::Int => {
                if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                    anyhow::bail!(
                        "Unsupported PCM bit depth ({}-bit)",
                        spec.bits_per_sample
                    );
                }
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                mix_down(
                    reader.samples::<i32>().map(|s| s.map(|s| s as f32 / scale)),
                    channels,
                )?
            }
            SampleFormat::Float => {
                if spec.bits_per_sample != 32 {
                    anyhow::bail!(
                        "Only 32-bit float WAV supported got ({}-bit)",
                        spec.bits_per_sample
                    );
                }
                mix_down(reader.samples::<f32>(), channels)?
            }
        };

        Ok(Self::from_samples(spec.sample_rate, mono))
    }

    pub fn from_samples(sample_rate: u32, samples_mono: Vec<f32>) -> Self {
        let duration_sec = samples_mono.len() as f32 / sample_rate.max(1) as f32;
        Self {
            sample_rate,
            samples_mono,
            duration_sec,
        }
    }

    /// Writes the `n` samples that end at `t_sec` into `out`.
    ///
    /// Positions before the start or past the end read as silence unless
    /// `looped` is set, in which case the track repeats.
    pub fn window_ending_at(&self, t_sec: f32, n: usize, looped: bool, out: &mut Vec<f32>) {
        out.clear();
        out.reserve(n);

        let len = self.samples_mono.len() as isize;
        if len == 0 {
            out.resize(n, 0.0);
            return;
        }

        let t = if looped {
            t_sec.rem_euclid(self.duration_sec.max(0.000_1))
        } else {
            t_sec
        };
        let end = (t * self.sample_rate as f32) as isize;
        let start = end - n as isize;

        for i in 0..(n as isize) {
            let idx = start + i;
            let s = if looped {
                self.samples_mono[idx.rem_euclid(len) as usize]
            } else if (0..len).contains(&idx) {
                self.samples_mono[idx as usize]
            } else {
                0.0
            };
            out.push(s);
        }
    }
}

/// Averages interleaved frames into one channel.
fn mix_down<E>(
    samples: impl Iterator<Item = Result<f32, E>>,
    channels: usize,
) -> anyhow::Result<Vec<f32>>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let mut mono = Vec::new();
    let mut frame = Vec::with_capacity(channels);
    for s in samples {
        frame.push(s?);
        if frame.len() == channels {
            mono.push(frame.iter().sum::<f32>() / channels as f32);
            frame.clear();
        }
    }
    Ok(mono)
}
