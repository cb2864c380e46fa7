// Spectral module - Frequency-domain feature extraction
//
// This module computes per-block features from magnitude spectra.
// Spectra have K/2 + 1 bins for a block of K samples.
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

/// Spectral feature computation functions
pub struct SpectralFeatures {
    sample_rate: f32,
    block_size: usize,
    epsilon: f32,
}

impl SpectralFeatures {
    /// Create a new spectral features processor
    ///
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz (only the centroid uses it)
    /// * `block_size` - Block length the spectra were computed from
    /// * `epsilon` - Guard added to the centroid denominator
    pub fn new(sample_rate: f32, block_size: usize, epsilon: f32) -> Self {
        Self {
            sample_rate,
            block_size,
            epsilon,
        }
    }

    /// Compute spectral centroid in Hz
    ///
    /// Formula: centroid = Σ(k × X[k]) / (ΣX[k] + ε) / (K - 1) × fs / 2,
    /// with K = block_size / 2 and k = 0..=K.
    ///
    /// Silent blocks yield 0 Hz thanks to the ε guard.
    pub fn compute_centroid(&self, spectrum: &[f32]) -> f32 {
        let half = self.block_size / 2;
        // K - 1 vanishes for blocks shorter than 4 samples
        let bin_norm = half.saturating_sub(1).max(1) as f32;

        let weighted_sum: f32 = spectrum
            .iter()
            .take(half + 1)
            .enumerate()
            .map(|(k, &mag)| k as f32 * mag)
            .sum();
        let magnitude_sum: f32 = spectrum.iter().take(half + 1).sum();

        weighted_sum / (magnitude_sum + self.epsilon) / bin_norm * self.sample_rate / 2.0
    }

    /// Compute spectral crest (peak-to-sum ratio)
    ///
    /// Formula: crest = max(X) / ΣX
    ///
    /// Returns 0.0 for an all-zero spectrum instead of NaN.
    pub fn compute_crest(&self, spectrum: &[f32]) -> f32 {
        let magnitude_sum: f32 = spectrum.iter().sum();
        if magnitude_sum <= 0.0 {
            return 0.0;
        }

        let peak = spectrum.iter().copied().fold(0.0f32, f32::max);
        peak / magnitude_sum
    }

    /// Compute spectral flux between consecutive spectra
    ///
    /// Formula: flux = ‖X[n] - X[n-1]‖₂ / (block_size / 2)
    pub fn compute_flux(&self, previous: &[f32], current: &[f32]) -> f32 {
        let distance = previous
            .iter()
            .zip(current)
            .map(|(&a, &b)| (b - a) * (b - a))
            .sum::<f32>()
            .sqrt();

        distance / (self.block_size as f32 / 2.0)
    }
}
