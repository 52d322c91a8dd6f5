pub mod analyzer;
pub mod track;

pub use analyzer::ByteAnalyzer;
pub use track::TrackAnalysis;

/// Samples per analysis window.
pub const FFT_SIZE: usize = 2048;

/// A per-frame audio analysis capability.
///
/// The bin count is fixed for the lifetime of the source. Each sampler is
/// called at most once per frame and returns instantaneous values.
pub trait AnalysisSource {
    fn frequency_bin_count(&self) -> usize;

    /// Latches the input both samplers of the coming frame read from.
    fn begin_frame(&mut self) {}

    /// Fills `out` with per-bin magnitudes in `0..=255`.
    fn sample_frequency(&mut self, out: &mut [u8]);

    /// Fills `out` with raw amplitudes, 128 being zero.
    fn sample_time_domain(&mut self, out: &mut [u8]);
}

/// Frequency and time-domain bytes for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioSnapshot {
    pub frequency: Vec<u8>,
    pub time_domain: Vec<u8>,
}

impl AudioSnapshot {
    pub fn new(bin_count: usize) -> Self {
        Self {
            frequency: vec![0; bin_count],
            time_domain: vec![128; bin_count],
        }
    }

    pub fn from_bytes(frequency: Vec<u8>, time_domain: Vec<u8>) -> Self {
        debug_assert_eq!(frequency.len(), time_domain.len());
        Self {
            frequency,
            time_domain,
        }
    }

    /// Overwrites both channels from `source`.
    pub fn capture(&mut self, source: &mut dyn AnalysisSource) {
        let n = source.frequency_bin_count();
        if self.frequency.len() != n {
            *self = Self::new(n);
        }
        source.begin_frame();
        source.sample_frequency(&mut self.frequency);
        source.sample_time_domain(&mut self.time_domain);
    }

    pub fn len(&self) -> usize {
        self.frequency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }

    /// Mean of the frequency bytes, `0.0..=255.0`.
    pub fn average_volume(&self) -> f32 {
        if self.frequency.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.frequency.iter().map(|&b| b as u32).sum();
        sum as f32 / self.frequency.len() as f32
    }
}
