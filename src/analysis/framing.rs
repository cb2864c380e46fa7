// Framing module - split a signal into overlapping blocks
//
// Blocks start every `hop_size` samples and span `block_size` samples.
// The block count is ceil(len / hop_size), so the tail blocks reach past
// the end of the signal and are zero-padded.

use crate::error::FeatureError;

/// Overlapping blocks of one signal with their start times
#[derive(Debug, Clone, PartialEq)]
pub struct BlockMatrix {
    /// One `block_size`-long vector per block
    pub blocks: Vec<Vec<f32>>,
    /// Start time of each block in seconds (`n * hop_size / fs`)
    pub times: Vec<f32>,
    pub block_size: usize,
    pub hop_size: usize,
}

impl BlockMatrix {
    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Check a size parameter is strictly positive.
pub(crate) fn require_positive(name: &'static str, value: usize) -> Result<(), FeatureError> {
    if value == 0 {
        return Err(FeatureError::InvalidParameter { name, value: 0 });
    }
    Ok(())
}

/// Frame a signal into zero-padded overlapping blocks
///
/// # Arguments
/// * `signal` - Mono samples
/// * `block_size` - Block length in samples (> 0)
/// * `hop_size` - Advance between block starts in samples (> 0)
/// * `sample_rate` - Sample rate in Hz (> 0), used for the time stamps
///
/// # Returns
/// `ceil(signal.len() / hop_size)` blocks and their start times
pub fn block_audio(
    signal: &[f32],
    block_size: usize,
    hop_size: usize,
    sample_rate: u32,
) -> Result<BlockMatrix, FeatureError> {
    require_positive("block_size", block_size)?;
    require_positive("hop_size", hop_size)?;
    require_positive("sample_rate", sample_rate as usize)?;

    let num_blocks = signal.len().div_ceil(hop_size);
    let mut blocks = Vec::with_capacity(num_blocks);
    let mut times = Vec::with_capacity(num_blocks);

    for n in 0..num_blocks {
        let start = n * hop_size;
        let stop = (start + block_size).min(signal.len());

        let mut block = vec![0.0f32; block_size];
        block[..stop - start].copy_from_slice(&signal[start..stop]);

        blocks.push(block);
        times.push(start as f32 / sample_rate as f32);
    }

    Ok(BlockMatrix {
        blocks,
        times,
        block_size,
        hop_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_count_is_ceil_of_len_over_hop() {
        for (len, hop, expected) in [(1000, 256, 4), (1024, 256, 4), (1025, 256, 5), (1, 7, 1)] {
            let signal = vec![0.5f32; len];
            let matrix = block_audio(&signal, 512, hop, 44_100).unwrap();
            assert_eq!(matrix.len(), expected, "len={} hop={}", len, hop);
            assert!(matrix.blocks.iter().all(|b| b.len() == 512));
        }
    }

    #[test]
    fn test_blocks_copy_signal_and_zero_pad_tail() {
        let signal: Vec<f32> = (1..=10).map(|v| v as f32).collect();
        let matrix = block_audio(&signal, 4, 2, 8).unwrap();

        assert_eq!(matrix.len(), 5);
        assert_eq!(matrix.blocks[0], vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(matrix.blocks[1], vec![3.0, 4.0, 5.0, 6.0]);
        assert_eq!(matrix.blocks[3], vec![7.0, 8.0, 9.0, 10.0]);
        assert_eq!(matrix.blocks[4], vec![9.0, 10.0, 0.0, 0.0]);
    }

    #[test]
    fn test_samples_past_signal_end_are_zero() {
        let short = vec![1.0f32; 3];
        let matrix = block_audio(&short, 8, 1, 100).unwrap();
        assert_eq!(matrix.len(), 3);
        for (n, block) in matrix.blocks.iter().enumerate() {
            let live = 3 - n;
            assert!(block[..live].iter().all(|&s| s == 1.0));
            assert!(block[live..].iter().all(|&s| s == 0.0));
        }

        // hop larger than block skips samples but never starts past the end
        let signal = vec![1.0f32; 10];
        let matrix = block_audio(&signal, 2, 4, 100).unwrap();
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.blocks[2], vec![1.0, 1.0]);
    }

    #[test]
    fn test_times_follow_hop() {
        let signal = vec![0.0f32; 44_100];
        let matrix = block_audio(&signal, 1024, 256, 44_100).unwrap();
        assert_eq!(matrix.times.len(), matrix.len());
        assert_eq!(matrix.times[0], 0.0);
        assert!((matrix.times[4] - 1024.0 / 44_100.0).abs() < 1e-7);
    }

    #[test]
    fn test_empty_signal_yields_no_blocks() {
        let matrix = block_audio(&[], 1024, 256, 44_100).unwrap();
        assert!(matrix.is_empty());
        assert!(matrix.times.is_empty());
    }

    #[test]
    fn test_rejects_non_positive_parameters() {
        let signal = vec![0.0f32; 16];
        assert!(matches!(
            block_audio(&signal, 0, 4, 100),
            Err(FeatureError::InvalidParameter {
                name: "block_size",
                ..
            })
        ));
        assert!(matches!(
            block_audio(&signal, 4, 0, 100),
            Err(FeatureError::InvalidParameter {
                name: "hop_size",
                ..
            })
        ));
        assert!(block_audio(&signal, 4, 2, 0).is_err());
    }
}
