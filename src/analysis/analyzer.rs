use rustfft::{FftPlanner, num_complex::Complex32};

/// Spectrum analyser producing byte-scaled magnitudes from a sample window.
///
/// Magnitudes are smoothed over time per bin and mapped from the
/// `min_db..max_db` decibel range onto `0..=255`.
pub struct ByteAnalyzer {
    pub fft_size: usize,
    pub min_db: f32,
    pub max_db: f32,
    pub smoothing: f32,

    blackman: Vec<f32>,
    fft_buf: Vec<Complex32>,
    smoothed: Vec<f32>,

    fft: std::sync::Arc<dyn rustfft::Fft<f32>>,
}

impl ByteAnalyzer {
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let n = fft_size as f32;
        let blackman = (0..fft_size)
            .map(|i| {
                let phase = 2.0 * std::f32::consts::PI * i as f32 / n;
                0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
            })
            .collect::<Vec<_>>();

        Self {
            fft_size,
            min_db: -100.0,
            max_db: -30.0,
            smoothing: 0.8,

            blackman,
            fft_buf: vec![Complex32::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; fft_size / 2],

            fft,
        }
    }

    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Runs one analysis step over `window` and writes the byte spectrum.
    ///
    /// Updates the per-bin smoothing state, so call it once per frame.
    pub fn frequency_bytes(&mut self, window: &[f32], out: &mut [u8]) {
        debug_assert_eq!(window.len(), self.fft_size);

        for (i, slot) in self.fft_buf.iter_mut().enumerate() {
            let x = window.get(i).copied().unwrap_or(0.0) * self.blackman[i];
            *slot = Complex32::new(x, 0.0);
        }
        self.fft.process(&mut self.fft_buf);

        let norm = 1.0 / self.fft_size as f32;
        let tau = self.smoothing;
        let range = self.max_db - self.min_db;
        for (i, s) in self.smoothed.iter_mut().enumerate() {
            let mag = self.fft_buf[i].norm() * norm;
            *s = tau * *s + (1.0 - tau) * mag;
            if let Some(byte) = out.get_mut(i) {
                let db = if *s > 0.0 {
                    20.0 * s.log10()
                } else {
                    f32::NEG_INFINITY
                };
                *byte = (255.0 * (db - self.min_db) / range).clamp(0.0, 255.0) as u8;
            }
        }
    }

    /// Maps `[-1, 1]` samples onto bytes centred at 128.
    pub fn time_domain_bytes(window: &[f32], out: &mut [u8]) {
        for (byte, &s) in out.iter_mut().zip(window) {
            *byte = (128.0 * (1.0 + s)).clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(bin: usize, fft_size: usize) -> Vec<f32> {
        (0..fft_size)
            .map(|i| {
                (2.0 * std::f32::consts::PI * bin as f32 * i as f32 / fft_size as f32).sin()
            })
            .collect()
    }

    #[test]
    fn silence_maps_to_floor() {
        let mut analyzer = ByteAnalyzer::new(256);
        let mut out = vec![7u8; analyzer.bin_count()];
        analyzer.frequency_bytes(&vec![0.0; 256], &mut out);
        assert!(out.iter().all(|&b| b == 0));
    }

    #[test]
    fn tone_peaks_at_its_bin() {
        let mut analyzer = ByteAnalyzer::new(1024);
        let mut out = vec![0u8; analyzer.bin_count()];
        analyzer.frequency_bytes(&sine(40, 1024), &mut out);
        assert_eq!(out[40], 255);
        assert!(out[300] < 128, "far bin {}", out[300]);
    }

    #[test]
    fn smoothing_decays_after_tone_stops() {
        let mut analyzer = ByteAnalyzer::new(1024);
        let mut out = vec![0u8; analyzer.bin_count()];
        let tone = sine(40, 1024);
        for _ in 0..10 {
            analyzer.frequency_bytes(&tone, &mut out);
        }
        let loud = out[40];

        let silence = vec![0.0; 1024];
        for _ in 0..10 {
            analyzer.frequency_bytes(&silence, &mut out);
        }
        assert!(out[40] < loud);
        assert!(out[40] > 0);
    }

    #[test]
    fn time_domain_is_offset_binary() {
        let mut out = [0u8; 4];
        ByteAnalyzer::time_domain_bytes(&[0.0, 0.5, -1.0, 1.0], &mut out);
        assert_eq!(out, [128, 192, 0, 255]);
    }
}
