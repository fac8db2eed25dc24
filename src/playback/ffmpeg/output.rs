// SPDX-License-Identifier: MPL-2.0
//! Audio output through the system's default device using cpal.

use crate::error::PlaybackError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// Maximum buffered audio, in seconds.
const MAX_BUFFER_SECS: usize = 2;

/// Gain and pause flags shared between the backend handle, the decode
/// thread and the device callback.
#[derive(Debug)]
pub struct OutputControls {
    /// Volume stored as the bits of an `f32` for atomic access.
    volume_bits: AtomicU32,
    paused: AtomicBool,
}

impl OutputControls {
    pub fn new(volume: f32) -> Self {
        Self {
            volume_bits: AtomicU32::new(volume.to_bits()),
            paused: AtomicBool::new(true),
        }
    }

    pub fn volume(&self) -> f32 {
        f32::from_bits(self.volume_bits.load(Ordering::Relaxed))
    }

    pub fn set_volume(&self, volume: f32) {
        self.volume_bits.store(volume.to_bits(), Ordering::Relaxed);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Relaxed);
    }
}

type SampleBuffer = Arc<Mutex<VecDeque<f32>>>;

/// Open output stream. Must stay on the thread that created it.
pub struct AudioOutput {
    buffer: SampleBuffer,
    controls: Arc<OutputControls>,
    sample_rate: u32,
    channels: u16,
    max_buffered: usize,
    _stream: cpal::Stream,
}

impl AudioOutput {
    /// Opens the default output device.
    ///
    /// The caller resamples to [`sample_rate`](Self::sample_rate) and
    /// [`channels`](Self::channels) before pushing.
    pub fn new(controls: Arc<OutputControls>) -> Result<Self, PlaybackError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| PlaybackError::AudioOutput("no output device found".to_string()))?;
        let supported_config = device
            .default_output_config()
            .map_err(|e| PlaybackError::AudioOutput(format!("failed to get config: {e}")))?;

        let sample_rate = supported_config.sample_rate();
        let channels = supported_config.channels();
        let max_buffered = sample_rate as usize * channels as usize * MAX_BUFFER_SECS;
        let buffer: SampleBuffer = Arc::new(Mutex::new(VecDeque::with_capacity(max_buffered)));

        let config: cpal::StreamConfig = supported_config.config();
        let stream = match supported_config.sample_format() {
            cpal::SampleFormat::F32 => {
                Self::build_stream::<f32>(&device, &config, Arc::clone(&buffer), Arc::clone(&controls))?
            }
            cpal::SampleFormat::I16 => {
                Self::build_stream::<i16>(&device, &config, Arc::clone(&buffer), Arc::clone(&controls))?
            }
            cpal::SampleFormat::U16 => {
                Self::build_stream::<u16>(&device, &config, Arc::clone(&buffer), Arc::clone(&controls))?
            }
            format => {
                return Err(PlaybackError::AudioOutput(format!(
                    "unsupported sample format: {format:?}"
                )))
            }
        };
        stream
            .play()
            .map_err(|e| PlaybackError::AudioOutput(format!("failed to start stream: {e}")))?;

        tracing::debug!(sample_rate, channels, "audio output opened");

        Ok(Self {
            buffer,
            controls,
            sample_rate,
            channels,
            max_buffered,
            _stream: stream,
        })
    }

    fn build_stream<T: cpal::SizedSample + cpal::FromSample<f32>>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        buffer: SampleBuffer,
        controls: Arc<OutputControls>,
    ) -> Result<cpal::Stream, PlaybackError> {
        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    let silence = T::from_sample(0.0f32);
                    if controls.is_paused() {
                        data.fill(silence);
                        return;
                    }
                    let Ok(mut buf) = buffer.lock() else {
                        data.fill(silence);
                        return;
                    };
                    let gain = perceptual_gain(controls.volume());
                    for sample in data.iter_mut() {
                        *sample = match buf.pop_front() {
                            Some(value) => T::from_sample(apply_gain(value, gain)),
                            None => silence,
                        };
                    }
                },
                |err| tracing::warn!(%err, "audio output stream error"),
                None,
            )
            .map_err(|e| PlaybackError::AudioOutput(format!("failed to build stream: {e}")))
    }

    /// Queues interleaved samples laid out for the device's channel count.
    /// Samples beyond the buffer cap are dropped.
    pub fn push(&self, samples: &[f32]) {
        if let Ok(mut buf) = self.buffer.lock() {
            let room = self.max_buffered.saturating_sub(buf.len());
            buf.extend(samples.iter().take(room));
        }
    }

    /// Queues interleaved samples with `channels` channels, spreading them
    /// over the device's channel count (extra device channels get silence).
    pub fn push_interleaved(&self, samples: &[f32], channels: u16) {
        if channels == self.channels || channels == 0 {
            self.push(samples);
            return;
        }
        let device_channels = usize::from(self.channels);
        let source_channels = usize::from(channels);
        let mut mapped = Vec::with_capacity(samples.len() / source_channels * device_channels);
        for frame in samples.chunks_exact(source_channels) {
            mapped.extend((0..device_channels).map(|c| frame.get(c).copied().unwrap_or(0.0)));
        }
        self.push(&mapped);
    }

    /// Drops everything queued (used on seek).
    pub fn clear(&self) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }
    }

    /// Seconds of audio waiting to be played.
    #[allow(clippy::cast_precision_loss)]
    pub fn buffered_secs(&self) -> f64 {
        let queued = self.buffer.lock().map(|buf| buf.len()).unwrap_or(0);
        queued as f64 / (f64::from(self.sample_rate) * f64::from(self.channels))
    }

    pub fn set_paused(&self, paused: bool) {
        self.controls.set_paused(paused);
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

/// Quadratic volume curve: a linear slider feels linear to the ear.
fn perceptual_gain(volume: f32) -> f32 {
    volume * volume
}

/// Applies gain and clips. The upper bound stays just below 1.0 because
/// converting exactly 1.0 to `i16` overflows.
fn apply_gain(sample: f32, gain: f32) -> f32 {
    (sample * gain).clamp(-1.0, 0.999_999_9)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_start_paused() {
        let controls = OutputControls::new(0.8);
        assert!(controls.is_paused());
        assert!((controls.volume() - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn controls_store_volume_and_pause() {
        let controls = OutputControls::new(1.0);
        controls.set_volume(0.25);
        controls.set_paused(false);
        assert!((controls.volume() - 0.25).abs() < f32::EPSILON);
        assert!(!controls.is_paused());
    }

    #[test]
    fn perceptual_gain_is_quadratic() {
        assert!((perceptual_gain(0.5) - 0.25).abs() < f32::EPSILON);
        assert!((perceptual_gain(1.0) - 1.0).abs() < f32::EPSILON);
        assert_eq!(perceptual_gain(0.0), 0.0);
    }

    #[test]
    fn gain_is_clipped() {
        assert!(apply_gain(0.9, 2.25) < 1.0);
        assert_eq!(apply_gain(-0.9, 2.25), -1.0);
        assert!((apply_gain(0.5, 0.5) - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    #[ignore = "requires audio hardware"]
    fn audio_output_can_be_created() {
        let controls = Arc::new(OutputControls::new(0.8));
        if let Ok(output) = AudioOutput::new(controls) {
            assert!(output.sample_rate() > 0);
            assert!(output.channels() > 0);
            output.push(&[0.0; 64]);
            assert!(output.buffered_secs() > 0.0);
            output.clear();
            assert_eq!(output.buffered_secs(), 0.0);
        }
    }
}
