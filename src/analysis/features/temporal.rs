// Temporal module - Time-domain feature extraction
//
// This module computes features directly from time-domain blocks:
// the RMS level in dB and the zero-crossing rate.

/// Temporal feature computation functions
pub struct TemporalFeatures {
    epsilon: f32,
    silence_floor_db: f32,
}

impl TemporalFeatures {
    /// Create a new temporal features processor
    ///
    /// # Arguments
    /// * `epsilon` - Added to the linear RMS before taking the logarithm
    /// * `silence_floor_db` - Lowest level reported
    pub fn new(epsilon: f32, silence_floor_db: f32) -> Self {
        Self {
            epsilon,
            silence_floor_db,
        }
    }

    /// Compute RMS level in dB
    ///
    /// Formula: max(20 × log10(sqrt(mean(x²)) + ε), floor)
    pub fn compute_rms_db(&self, block: &[f32]) -> f32 {
        if block.is_empty() {
            return self.silence_floor_db;
        }

        let mean_square = block.iter().map(|&x| x * x).sum::<f32>() / block.len() as f32;
        let level = 20.0 * (mean_square.sqrt() + self.epsilon).log10();
        level.max(self.silence_floor_db)
    }

    /// Compute zero-crossing rate (ZCR)
    ///
    /// Formula: ZCR = (1 / (2N)) × Σ|sign(x[n]) - sign(x[n-1])|
    ///
    /// `sign(0)` is 0, so touching zero counts as half a crossing.
    ///
    /// # Returns
    /// Zero-crossing rate (0.0 to 1.0)
    pub fn compute_zcr(&self, block: &[f32]) -> f32 {
        if block.len() < 2 {
            return 0.0;
        }

        let sign_changes: f32 = block
            .windows(2)
            .map(|pair| (sign(pair[1]) - sign(pair[0])).abs())
            .sum();

        sign_changes / (2 * block.len()) as f32
    }
}

fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
