// FFT module - short-time magnitude spectra
//
// Each block is multiplied by a periodic Hann window and transformed with a
// length-K DFT. Only the K/2 + 1 non-negative frequency bins are kept, and
// magnitudes are scaled by 1 / sum(window) so a full-scale sinusoid maps to
// an amplitude-true peak.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use crate::analysis::framing::require_positive;
use crate::error::FeatureError;

/// Magnitude spectra for a sequence of blocks
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralFrames {
    /// One `K/2 + 1` magnitude vector per block
    pub spectra: Vec<Vec<f32>>,
    /// Cumulative block time `n * K / fs`, independent of the hop size
    ///
    /// These tags are not the framer's hop-based `BlockMatrix::times`.
    /// Feature extraction does not read them. They are kept so spectral
    /// frames carry the same time axis as a standalone analysis pass, and
    /// `test_analyze_times_are_cumulative_block_lengths` pins them. Use
    /// `BlockMatrix::times` for block onsets.
    pub times: Vec<f32>,
}

/// Periodic (DFT-symmetric) Hann window: `0.5 - 0.5 cos(2 pi i / K)`
pub fn periodic_hann(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f32 / len as f32).cos())
        .collect()
}

/// Windowed FFT analyzer for fixed-length blocks
///
/// The plan and window are computed once; `analyze` is otherwise stateless,
/// so every extractor that needs spectra can run its own pass.
pub struct SpectralAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    block_size: usize,
    window: Vec<f32>,
    scale: f32,
}

impl SpectralAnalyzer {
    /// Create an analyzer for blocks of `block_size` samples
    pub fn new(block_size: usize) -> Result<Self, FeatureError> {
        require_positive("block_size", block_size)?;

        let window = periodic_hann(block_size);
        let window_sum: f32 = window.iter().sum();
        // K = 1 gives an all-zero window
        let scale = if window_sum > 0.0 { 1.0 / window_sum } else { 0.0 };

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(block_size);

        Ok(Self {
            fft,
            block_size,
            window,
            scale,
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of non-negative frequency bins per spectrum
    pub fn num_bins(&self) -> usize {
        self.block_size / 2 + 1
    }

    /// Compute the magnitude spectrum of one block
    ///
    /// Shorter blocks are zero-padded and longer blocks truncated to the
    /// analyzer's block size.
    pub fn magnitude_spectrum(&self, block: &[f32]) -> Vec<f32> {
        let mut buffer: Vec<Complex<f32>> = self
            .window
            .iter()
            .enumerate()
            .map(|(i, &w)| Complex::new(block.get(i).copied().unwrap_or(0.0) * w, 0.0))
            .collect();

        self.fft.process(&mut buffer);

        buffer[..self.num_bins()]
            .iter()
            .map(|c| c.norm() * self.scale)
            .collect()
    }

    /// Compute magnitude spectra for all blocks
    ///
    /// # Arguments
    /// * `blocks` - Blocks of `block_size` samples
    /// * `sample_rate` - Rate used only for the time tags; spectral
    ///   extractors that are rate independent pass `1.0`
    pub fn analyze(&self, blocks: &[Vec<f32>], sample_rate: f32) -> SpectralFrames {
        let spectra = blocks
            .iter()
            .map(|block| self.magnitude_spectrum(block))
            .collect();
        let times = (0..blocks.len())
            .map(|n| (n * self.block_size) as f32 / sample_rate)
            .collect();

        SpectralFrames { spectra, times }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(len: usize, cycles_per_block: f32, block: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * cycles_per_block * i as f32 / block as f32).sin())
            .collect()
    }

    #[test]
    fn test_periodic_hann_shape() {
        let w = periodic_hann(8);
        assert_eq!(w.len(), 8);
        assert!(w[0].abs() < 1e-7);
        assert!((w[4] - 1.0).abs() < 1e-6);
        // periodic form: w[i] == w[K - i]
        assert!((w[1] - w[7]).abs() < 1e-6);
        assert!((w.iter().sum::<f32>() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_spectrum_length() {
        let analyzer = SpectralAnalyzer::new(1024).unwrap();
        let spectrum = analyzer.magnitude_spectrum(&vec![0.1; 1024]);
        assert_eq!(spectrum.len(), 513);

        let analyzer = SpectralAnalyzer::new(7).unwrap();
        assert_eq!(analyzer.magnitude_spectrum(&[1.0; 7]).len(), 4);
    }

    #[test]
    fn test_bin_centered_sine_peaks_at_half_amplitude() {
        let analyzer = SpectralAnalyzer::new(256).unwrap();
        let spectrum = analyzer.magnitude_spectrum(&sine(256, 16.0, 256));

        let (peak_bin, &peak) = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap();
        assert_eq!(peak_bin, 16);
        assert!((peak - 0.5).abs() < 1e-3, "peak magnitude {}", peak);
        // Hann side lobes sit in the adjacent bins only
        assert!(spectrum[14] < 1e-4);
        assert!(spectrum[18] < 1e-4);
    }

    #[test]
    fn test_silence_gives_zero_spectrum() {
        let analyzer = SpectralAnalyzer::new(64).unwrap();
        let spectrum = analyzer.magnitude_spectrum(&[0.0; 64]);
        assert!(spectrum.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_analyze_times_are_cumulative_block_lengths() {
        let analyzer = SpectralAnalyzer::new(1024).unwrap();
        let blocks = vec![vec![0.0; 1024]; 3];

        let frames = analyzer.analyze(&blocks, 44_100.0);
        assert_eq!(frames.spectra.len(), 3);
        assert_eq!(frames.times[0], 0.0);
        // Tags advance by the block length, not by the framing hop
        assert!((frames.times[2] - 2048.0 / 44_100.0).abs() < 1e-7);

        let unit = analyzer.analyze(&blocks, 1.0);
        assert_eq!(unit.times, vec![0.0, 1024.0, 2048.0]);
        assert_eq!(unit.spectra, frames.spectra);
    }

    #[test]
    fn test_rejects_zero_block_size() {
        assert!(SpectralAnalyzer::new(0).is_err());
    }
}
