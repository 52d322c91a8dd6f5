use super::{AnalysisSource, ByteAnalyzer};
use crate::audio::{AudioData, PlaybackClock};

/// Analyses a decoded track at the position reported by a playback clock.
pub struct TrackAnalysis<C> {
    audio: AudioData,
    clock: C,
    analyzer: ByteAnalyzer,
    window: Vec<f32>,
    looped: bool,
}

impl<C: PlaybackClock> TrackAnalysis<C> {
    pub fn new(audio: AudioData, clock: C, fft_size: usize, looped: bool) -> Self {
        Self {
            audio,
            clock,
            analyzer: ByteAnalyzer::new(fft_size),
            window: vec![0.0; fft_size],
            looped,
        }
    }

    fn refresh_window(&mut self) {
        let t = self.clock.position_secs();
        self.audio
            .window_ending_at(t, self.analyzer.fft_size, self.looped, &mut self.window);
    }
}

impl<C: PlaybackClock> AnalysisSource for TrackAnalysis<C> {
    fn frequency_bin_count(&self) -> usize {
        self.analyzer.bin_count()
    }

    fn begin_frame(&mut self) {
        self.refresh_window();
    }

    fn sample_frequency(&mut self, out: &mut [u8]) {
        self.analyzer.frequency_bytes(&self.window, out);
    }

    fn sample_time_domain(&mut self, out: &mut [u8]) {
        ByteAnalyzer::time_domain_bytes(&self.window, out);
    }
}
