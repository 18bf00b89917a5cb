//! WAV files standing in for the speaker and microphone

use askwave_core::audio::capture_len;
use askwave_core::resample::{downmix, resample_audio};
use askwave_core::{AudioSink, AudioSource, ModemError};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::{Path, PathBuf};

use crate::CliError;

/// Write `samples` as 16-bit mono PCM.
///
/// Buffers peaking above full scale (the default high amplitude is 1.2) are
/// scaled down as a whole rather than clipped, so the envelope shape survives.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), CliError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let peak = samples.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
    let gain = if peak > 1.0 { 1.0 / peak } else { 1.0 };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        let scaled = (sample * gain).clamp(-1.0, 1.0);
        writer.write_sample((scaled * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;

    tracing::debug!(
        "Wrote {} samples to {} (gain {:.3})",
        samples.len(),
        path.display(),
        gain
    );
    Ok(())
}

/// Read a WAV file as mono f32 samples in [-1, 1], with its sample rate
pub fn read_wav(path: &Path) -> Result<(Vec<f32>, u32), CliError> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    tracing::debug!(
        "Read WAV: {} Hz, {} channels, {} bits",
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample
    );

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(CliError::Unsupported(format!(
                    "bit depth {}",
                    spec.bits_per_sample
                )));
            }
            let full_scale = (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<Result<_, _>>()?
        }
    };

    let mono = downmix(&interleaved, spec.channels as usize)?;
    Ok((mono, spec.sample_rate))
}

/// Playback into a WAV file
pub struct WavSink {
    path: PathBuf,
}

impl WavSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AudioSink for WavSink {
    fn play(&mut self, samples: &[f32], sample_rate: u32) -> askwave_core::Result<()> {
        write_wav(&self.path, samples, sample_rate).map_err(|e| ModemError::Audio(e.to_string()))
    }
}

/// Capture from a WAV file, converted to the requested rate
///
/// Recordings longer than the file are padded with silence.
pub struct WavSource {
    path: PathBuf,
}

impl WavSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AudioSource for WavSource {
    fn record(&mut self, duration_secs: f64, sample_rate: u32) -> askwave_core::Result<Vec<f32>> {
        let (samples, file_rate) =
            read_wav(&self.path).map_err(|e| ModemError::Audio(e.to_string()))?;
        let mut recording = resample_audio(&samples, file_rate, sample_rate);
        recording.resize(capture_len(duration_secs, sample_rate), 0.0);
        Ok(recording)
    }
}
