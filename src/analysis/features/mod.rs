// FeatureExtractor - low-level descriptors for speech/music discrimination
//
// This module frames a signal and extracts five per-block features from
// time-domain blocks and their magnitude spectra.
//
// Module organization:
// - types: Data structures (FeatureMatrix, AggregatedFeatures, FeatureKind)
// - fft: Windowed FFT magnitude spectra
// - spectral: Frequency-domain features (centroid, crest, flux)
// - temporal: Time-domain features (RMS, ZCR)
// - mod.rs: Coordinator (FeatureExtractor)
//
// Features extracted, in row order:
// 1. Spectral Centroid: Weighted mean frequency (brightness measure)
// 2. RMS: Block level in dB with a silence floor
// 3. Zero-Crossing Rate (ZCR): Rate of sign changes (noise/tonality measure)
// 4. Spectral Crest: Peak-to-sum magnitude ratio (tonality measure)
// 5. Spectral Flux: Spectral change against the previous block
//
// The centroid runs its own spectral pass at the real sample rate; crest
// and flux each run a pass at unit rate. The passes are kept separate.
//
// References:
// - Peeters, G. (2004). A large set of audio features for sound description
// - Lerch, A. (2012). An Introduction to Audio Content Analysis

pub mod fft;
mod spectral;
mod temporal;
mod types;

pub use fft::{periodic_hann, SpectralAnalyzer, SpectralFrames};
pub use types::{AggregatedFeatures, FeatureKind, FeatureMatrix, NUM_AGGREGATES, NUM_FEATURES};

use spectral::SpectralFeatures;
use temporal::TemporalFeatures;

use crate::analysis::framing::{block_audio, require_positive};
use crate::config::FeatureConfig;
use crate::error::FeatureError;

/// Sample rate handed to the analyzer by the rate-independent extractors
const UNIT_SAMPLE_RATE: f32 = 1.0;

/// FeatureExtractor coordinates framing and the five extractors
///
/// One extractor serves any number of signals with the same block and hop
/// sizes; it holds no per-signal state.
pub struct FeatureExtractor {
    analyzer: SpectralAnalyzer,
    temporal_features: TemporalFeatures,
    config: FeatureConfig,
}

impl FeatureExtractor {
    /// Create a new FeatureExtractor
    ///
    /// # Errors
    /// `FeatureError::InvalidParameter` if the block or hop size is zero
    pub fn new(config: FeatureConfig) -> Result<Self, FeatureError> {
        config.validate()?;

        Ok(Self {
            analyzer: SpectralAnalyzer::new(config.block_size)?,
            temporal_features: TemporalFeatures::new(config.epsilon, config.silence_floor_db),
            config,
        })
    }

    /// Extract all features from a signal
    ///
    /// This method coordinates the entire feature extraction pipeline:
    /// 1. Frame the signal once into overlapping blocks
    /// 2. Run the five extractors on the blocks
    /// 3. Stack the rows as centroid, RMS, ZCR, crest, flux
    ///
    /// # Arguments
    /// * `signal` - Mono samples
    /// * `sample_rate` - Sample rate in Hz
    pub fn extract(&self, signal: &[f32], sample_rate: u32) -> Result<FeatureMatrix, FeatureError> {
        let framed = block_audio(
            signal,
            self.config.block_size,
            self.config.hop_size,
            sample_rate,
        )?;

        log::debug!(
            "Extracting features: {} samples -> {} blocks of {}",
            signal.len(),
            framed.len(),
            self.config.block_size
        );

        FeatureMatrix::from_rows([
            self.spectral_centroid(&framed.blocks, sample_rate)?,
            self.rms(&framed.blocks),
            self.zero_crossing_rate(&framed.blocks),
            self.spectral_crest(&framed.blocks),
            self.spectral_flux(&framed.blocks),
        ])
    }

    /// Spectral centroid in Hz for each block
    pub fn spectral_centroid(
        &self,
        blocks: &[Vec<f32>],
        sample_rate: u32,
    ) -> Result<Vec<f32>, FeatureError> {
        require_positive("sample_rate", sample_rate as usize)?;

        let fs = sample_rate as f32;
        let frames = self.analyzer.analyze(blocks, fs);
        let spectral = SpectralFeatures::new(fs, self.config.block_size, self.config.epsilon);

        Ok(frames
            .spectra
            .iter()
            .map(|spectrum| spectral.compute_centroid(spectrum))
            .collect())
    }

    /// RMS level in dB for each block
    pub fn rms(&self, blocks: &[Vec<f32>]) -> Vec<f32> {
        blocks
            .iter()
            .map(|block| self.temporal_features.compute_rms_db(block))
            .collect()
    }

    /// Zero-crossing rate for each block
    pub fn zero_crossing_rate(&self, blocks: &[Vec<f32>]) -> Vec<f32> {
        blocks
            .iter()
            .map(|block| self.temporal_features.compute_zcr(block))
            .collect()
    }

    /// Spectral crest for each block (unit-rate spectra)
    pub fn spectral_crest(&self, blocks: &[Vec<f32>]) -> Vec<f32> {
        let frames = self.analyzer.analyze(blocks, UNIT_SAMPLE_RATE);
        let spectral = self.unit_rate_features();

        frames
            .spectra
            .iter()
            .map(|spectrum| spectral.compute_crest(spectrum))
            .collect()
    }

    /// Spectral flux for each block (unit-rate spectra); block 0 is 0
    pub fn spectral_flux(&self, blocks: &[Vec<f32>]) -> Vec<f32> {
        let frames = self.analyzer.analyze(blocks, UNIT_SAMPLE_RATE);
        let spectral = self.unit_rate_features();

        let mut flux = Vec::with_capacity(frames.spectra.len());
        if frames.spectra.is_empty() {
            return flux;
        }

        flux.push(0.0);
        flux.extend(
            frames
                .spectra
                .windows(2)
                .map(|pair| spectral.compute_flux(&pair[0], &pair[1])),
        );
        flux
    }

    fn unit_rate_features(&self) -> SpectralFeatures {
        SpectralFeatures::new(
            UNIT_SAMPLE_RATE,
            self.config.block_size,
            self.config.epsilon,
        )
    }
}

/// Frame a signal and extract its 5 × N feature matrix
///
/// Convenience wrapper around [`FeatureExtractor`] using default guard
/// constants.
pub fn extract_features(
    signal: &[f32],
    block_size: usize,
    hop_size: usize,
    sample_rate: u32,
) -> Result<FeatureMatrix, FeatureError> {
    let config = FeatureConfig {
        block_size,
        hop_size,
        ..FeatureConfig::default()
    };
    FeatureExtractor::new(config)?.extract(signal, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: u32 = 44_100;

    /// Generate pure sine wave for testing
    fn generate_sine_wave(sample_rate: u32, frequency: f32, duration_samples: usize) -> Vec<f32> {
        (0..duration_samples)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * std::f32::consts::PI * frequency * t).sin()
            })
            .collect()
    }

    /// Generate white noise for testing
    fn generate_white_noise(duration_samples: usize) -> Vec<f32> {
        use rand::{rngs::StdRng, Rng, SeedableRng};
        let mut rng = StdRng::seed_from_u64(7);
        (0..duration_samples)
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect()
    }

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(FeatureConfig::default()).unwrap()
    }

    #[test]
    fn test_rows_share_block_count() {
        let signal = generate_sine_wave(SAMPLE_RATE, 440.0, 10_000);
        let features = extractor().extract(&signal, SAMPLE_RATE).unwrap();

        let expected = 10_000usize.div_ceil(256);
        for (kind, row) in features.rows() {
            assert_eq!(row.len(), expected, "{:?}", kind);
        }
    }

    #[test]
    fn test_centroid_low_vs_high_frequency() {
        let extractor = extractor();
        let low = extractor
            .extract(&generate_sine_wave(SAMPLE_RATE, 200.0, 8192), SAMPLE_RATE)
            .unwrap();
        let high = extractor
            .extract(&generate_sine_wave(SAMPLE_RATE, 5000.0, 8192), SAMPLE_RATE)
            .unwrap();

        assert!(low.centroid[4] < 400.0, "low centroid {}", low.centroid[4]);
        assert!(
            (high.centroid[4] - 5000.0).abs() < 200.0,
            "high centroid {}",
            high.centroid[4]
        );
    }

    #[test]
    fn test_centroid_is_scale_invariant() {
        let extractor = extractor();
        let block = generate_sine_wave(SAMPLE_RATE, 1500.0, 1024);
        let scaled: Vec<f32> = block.iter().map(|&x| x * 7.5).collect();

        let a = extractor
            .spectral_centroid(&[block], SAMPLE_RATE)
            .unwrap()[0];
        let b = extractor
            .spectral_centroid(&[scaled], SAMPLE_RATE)
            .unwrap()[0];
        assert!((a - b).abs() / a < 1e-4, "{} vs {}", a, b);
    }

    #[test]
    fn test_zcr_sine_vs_noise() {
        let extractor = extractor();
        let sine = extractor
            .extract(&generate_sine_wave(SAMPLE_RATE, 100.0, 4096), SAMPLE_RATE)
            .unwrap();
        let noise = extractor
            .extract(&generate_white_noise(4096), SAMPLE_RATE)
            .unwrap();

        assert!(sine.zcr[2] < 0.05, "sine ZCR {}", sine.zcr[2]);
        assert!(noise.zcr[2] > 0.3, "noise ZCR {}", noise.zcr[2]);
    }

    #[test]
    fn test_crest_tone_vs_noise() {
        let extractor = extractor();
        let tone = extractor
            .extract(&generate_sine_wave(SAMPLE_RATE, 1000.0, 4096), SAMPLE_RATE)
            .unwrap();
        let noise = extractor
            .extract(&generate_white_noise(4096), SAMPLE_RATE)
            .unwrap();

        assert!(
            tone.crest[2] > 4.0 * noise.crest[2],
            "tone crest {} noise crest {}",
            tone.crest[2],
            noise.crest[2]
        );
    }

    #[test]
    fn test_flux_first_block_is_zero() {
        let extractor = extractor();
        for signal in [
            generate_white_noise(3000),
            generate_sine_wave(SAMPLE_RATE, 700.0, 3000),
            vec![0.0; 3000],
        ] {
            let features = extractor.extract(&signal, SAMPLE_RATE).unwrap();
            assert_eq!(features.flux[0], 0.0);
            assert!(features.flux.iter().all(|&f| f >= 0.0));
        }
    }

    #[test]
    fn test_flux_rises_at_onset() {
        let mut signal = vec![0.0f32; 4096];
        signal.extend(generate_white_noise(4096));
        let features = extractor().extract(&signal, SAMPLE_RATE).unwrap();

        // Blocks 0..=12 end before sample 4096; later blocks overlap the noise
        assert_eq!(features.flux[5], 0.0);
        assert!(features.flux[14] > 0.0);
    }

    #[test]
    fn test_extract_with_silence() {
        let features = extractor().extract(&vec![0.0; 4096], SAMPLE_RATE).unwrap();

        assert!(features.centroid.iter().all(|&c| c == 0.0));
        assert!(features.rms.iter().all(|&r| r == -100.0));
        assert!(features.zcr.iter().all(|&z| z == 0.0));
        assert!(features.crest.iter().all(|&c| c == 0.0));
        assert!(features.flux.iter().all(|&f| f == 0.0));
    }

    #[test]
    fn test_features_in_valid_ranges() {
        let signal = generate_white_noise(20_000);
        let features = extractor().extract(&signal, SAMPLE_RATE).unwrap();

        for &c in &features.centroid {
            assert!((0.0..=SAMPLE_RATE as f32).contains(&c), "centroid {}", c);
        }
        for &z in &features.zcr {
            assert!((0.0..=1.0).contains(&z), "zcr {}", z);
        }
        for &c in &features.crest {
            assert!((0.0..=1.0).contains(&c), "crest {}", c);
        }
        for &r in &features.rms {
            assert!(r >= -100.0 && r <= 0.5, "rms {}", r);
        }
    }

    #[test]
    fn test_extract_features_wrapper_validates() {
        assert!(extract_features(&[0.0; 10], 0, 4, SAMPLE_RATE).is_err());
        assert!(extract_features(&[0.0; 10], 8, 0, SAMPLE_RATE).is_err());

        let features = extract_features(&[0.1; 10], 8, 4, SAMPLE_RATE).unwrap();
        assert_eq!(features.num_blocks(), 3);
    }
}
