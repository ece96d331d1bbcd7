//! Microphone capture via cpal.

use anyhow::{bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use super::audio_source::AudioSource;

/// Captures from the default input device.
///
/// Samples are converted to f32 and downmixed to mono in the stream
/// callback, so the rest of the pipeline only ever sees one channel.
pub struct MicAudioSource {
    device: cpal::Device,
    sample_format: cpal::SampleFormat,
    channels: u16,
    sample_rate: u32,
    buffer: Arc<Mutex<Vec<f32>>>,
    stream: Option<cpal::Stream>,
}

impl MicAudioSource {
    /// Create a mic source capturing at `sample_rate` (16 kHz for Whisper).
    pub fn new(sample_rate: u32) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .context("No input device available")?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "unknown".to_string())
        );

        let default_config = device
            .default_input_config()
            .context("Input device has no default config")?;

        Ok(Self {
            device,
            sample_format: default_config.sample_format(),
            channels: default_config.channels(),
            sample_rate,
            buffer: Arc::new(Mutex::new(Vec::new())),
            stream: None,
        })
    }

    fn build_stream<T>(&self) -> Result<cpal::Stream>
    where
        T: SizedSample,
        f32: FromSample<T>,
    {
        let config = cpal::StreamConfig {
            channels: self.channels,
            sample_rate: cpal::SampleRate(self.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let buffer = self.buffer.clone();
        let channels = self.channels as usize;
        let err_fn = |err| error!("Mic stream error: {}", err);

        let stream = self.device.build_input_stream(
            &config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let Ok(mut buffer) = buffer.lock() else {
                    return;
                };
                if channels <= 1 {
                    buffer.extend(data.iter().map(|s| f32::from_sample(*s)));
                } else {
                    for frame in data.chunks(channels) {
                        let sum: f32 = frame.iter().map(|s| f32::from_sample(*s)).sum();
                        buffer.push(sum / channels as f32);
                    }
                }
            },
            err_fn,
            None,
        )?;

        Ok(stream)
    }
}

impl AudioSource for MicAudioSource {
    fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            bail!("Mic source already recording");
        }

        self.buffer.lock().unwrap().clear();

        let stream = match self.sample_format {
            cpal::SampleFormat::F32 => self.build_stream::<f32>(),
            cpal::SampleFormat::I16 => self.build_stream::<i16>(),
            cpal::SampleFormat::U16 => self.build_stream::<u16>(),
            other => bail!("Unsupported input sample format: {:?}", other),
        }?;

        stream.play()?;
        self.stream = Some(stream);

        info!("Mic capture started ({}Hz)", self.sample_rate);
        Ok(())
    }

    fn stop(&mut self) -> Result<Vec<f32>> {
        let Some(stream) = self.stream.take() else {
            bail!("Mic source not recording");
        };
        drop(stream);

        let samples = std::mem::take(&mut *self.buffer.lock().unwrap());
        info!("Mic capture stopped, {} samples", samples.len());
        Ok(samples)
    }

    fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Drop for MicAudioSource {
    fn drop(&mut self) {
        if self.stream.is_some() {
            debug!("Dropping active MicAudioSource");
            let _ = self.stop();
        }
    }
}
