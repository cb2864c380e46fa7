// Decoder module - WAV files to mono samples at the analysis rate
//
// Decoding sits behind the `AudioDecoder` trait so the corpus builder can be
// driven by other sources (and by stubs in tests). The default decoder reads
// PCM/float WAV with hound, averages channels to mono, and resamples with a
// windowed-sinc resampler when the file rate differs from the target.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use std::path::Path;

use crate::error::CorpusError;

/// Source of mono samples for one corpus file
pub trait AudioDecoder: Send + Sync {
    /// Decode `path` to mono f32 samples at `target_sample_rate`
    fn decode(&self, path: &Path, target_sample_rate: u32) -> Result<Vec<f32>, CorpusError>;
}

/// hound-backed WAV decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct WavDecoder;

impl AudioDecoder for WavDecoder {
    fn decode(&self, path: &Path, target_sample_rate: u32) -> Result<Vec<f32>, CorpusError> {
        let (samples, sample_rate) = read_wav_mono(path)?;
        resample(&samples, sample_rate, target_sample_rate)
    }
}

/// Read a WAV file and average its channels to mono
///
/// Integer samples are scaled to [-1, 1] by the format's full-scale value.
pub fn read_wav_mono(path: &Path) -> Result<(Vec<f32>, u32), CorpusError> {
    let mut reader = hound::WavReader::open(path).map_err(|err| CorpusError::Decode {
        reason: format!("failed to open {}: {err}", path.display()),
    })?;
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(CorpusError::Decode {
            reason: format!("{} has zero channels", path.display()),
        });
    }

    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<f32>, _>>()?,
        hound::SampleFormat::Int => match spec.bits_per_sample {
            8 | 16 | 24 | 32 => {
                let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|v| v as f32 / full_scale))
                    .collect::<Result<Vec<f32>, _>>()?
            }
            bits => {
                return Err(CorpusError::Decode {
                    reason: format!(
                        "unsupported bits_per_sample={} for {}",
                        bits,
                        path.display()
                    ),
                })
            }
        },
    };

    if spec.channels == 1 {
        return Ok((samples, spec.sample_rate));
    }

    let channels = spec.channels as usize;
    let mono = samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();

    Ok((mono, spec.sample_rate))
}

/// Sinc length of the resampling filter
const SINC_LEN: usize = 256;

/// Upper bound on zero-input passes used to drain the resampler tail
const MAX_FLUSH_PASSES: usize = 4;

/// Resample mono audio from one rate to another
///
/// The output holds exactly `ceil(len * to_sr / from_sr)` samples. The whole
/// signal goes through in one chunk, then zero chunks push out the samples
/// still held in the filter. Output sample `n` lines up with input time
/// `n * from_sr / to_sr`.
pub fn resample(samples: &[f32], from_sr: u32, to_sr: u32) -> Result<Vec<f32>, CorpusError> {
    if from_sr == to_sr || samples.is_empty() {
        return Ok(samples.to_vec());
    }
    if from_sr == 0 || to_sr == 0 {
        return Err(CorpusError::Decode {
            reason: format!("cannot resample {} Hz -> {} Hz", from_sr, to_sr),
        });
    }

    let expected = (samples.len() as u64 * to_sr as u64).div_ceil(from_sr as u64) as usize;
    log::debug!(
        "Resampling {} samples from {} Hz to {} Hz ({} out)",
        samples.len(),
        from_sr,
        to_sr,
        expected
    );

    let params = SincInterpolationParameters {
        sinc_len: SINC_LEN,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    // Chunks shorter than two filter lengths never produce output
    let chunk_size = samples.len().max(2 * SINC_LEN);
    let mut resampler =
        SincFixedIn::<f32>::new(to_sr as f64 / from_sr as f64, 2.0, params, chunk_size, 1)
            .map_err(|err| CorpusError::Decode {
                reason: format!("resampler setup failed: {err}"),
            })?;

    let mut output = Vec::with_capacity(expected + resampler.output_frames_max());
    let first = resampler
        .process_partial(Some(&[samples][..]), None)
        .map_err(|err| CorpusError::Decode {
            reason: format!("resampling failed: {err}"),
        })?;
    output.extend(first.into_iter().next().unwrap_or_default());

    for _ in 0..MAX_FLUSH_PASSES {
        if output.len() >= expected {
            break;
        }
        let tail = resampler
            .process_partial(None::<&[&[f32]]>, None)
            .map_err(|err| CorpusError::Decode {
                reason: format!("resampler flush failed: {err}"),
            })?;
        output.extend(tail.into_iter().next().unwrap_or_default());
    }

    output.resize(expected, 0.0);
    Ok(output)
}
