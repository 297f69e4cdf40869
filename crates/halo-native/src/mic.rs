//! Microphone capture via cpal.
//!
//! The audio thread only downmixes and appends into a mutex-guarded ring;
//! the frame loop copies a snapshot and runs the analyser itself.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use halo_core::{FrameAudio, HaloError, SpectrumAnalyzer, ANALYSER_FFT_SIZE};

struct SampleRing {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SampleRing {
    fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, v: f32) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(v);
    }
}

pub struct MicCapture {
    _stream: cpal::Stream,
    ring: Arc<Mutex<SampleRing>>,
    analyzer: SpectrumAnalyzer,
    snapshot: Vec<f32>,
}

impl MicCapture {
    pub fn open() -> Result<Self, HaloError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| HaloError::MicUnavailable("no input device".into()))?;
        let supported = device
            .default_input_config()
            .map_err(|e| HaloError::MicUnavailable(e.to_string()))?;
        let channels = supported.channels() as usize;
        let format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();

        let ring = Arc::new(Mutex::new(SampleRing::new(ANALYSER_FFT_SIZE)));
        let stream = match format {
            cpal::SampleFormat::F32 => {
                build_input(&device, &config, channels, Arc::clone(&ring), |v: f32| v)
            }
            cpal::SampleFormat::I16 => {
                build_input(&device, &config, channels, Arc::clone(&ring), |v: i16| {
                    v as f32 / i16::MAX as f32
                })
            }
            cpal::SampleFormat::U16 => {
                build_input(&device, &config, channels, Arc::clone(&ring), |v: u16| {
                    (v as f32 / u16::MAX as f32) * 2.0 - 1.0
                })
            }
            other => {
                return Err(HaloError::MicUnavailable(format!(
                    "unsupported sample format {other:?}"
                )))
            }
        }
        .map_err(|e| HaloError::MicDenied(e.to_string()))?;
        stream
            .play()
            .map_err(|e| HaloError::MicDenied(e.to_string()))?;

        log::info!(
            "[mic] capturing {} ch @ {} Hz ({:?})",
            channels,
            config.sample_rate.0,
            format
        );
        Ok(Self {
            _stream: stream,
            ring,
            analyzer: SpectrumAnalyzer::new(ANALYSER_FFT_SIZE),
            snapshot: Vec::with_capacity(ANALYSER_FFT_SIZE),
        })
    }

    /// Snapshot the latest samples and analyse them for this frame.
    pub fn read(&mut self) -> FrameAudio<'_> {
        self.snapshot.clear();
        if let Ok(ring) = self.ring.lock() {
            self.snapshot.extend(ring.samples.iter().copied());
        }
        let spectrum = self.analyzer.process(&self.snapshot);
        FrameAudio {
            spectrum: Some(spectrum),
            waveform: Some(&self.snapshot),
        }
    }
}

fn build_input<T, F>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    ring: Arc<Mutex<SampleRing>>,
    convert: F,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample,
    F: Fn(T) -> f32 + Send + 'static,
{
    let channels = channels.max(1);
    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let Ok(mut ring) = ring.lock() else {
                return;
            };
            for frame in data.chunks(channels) {
                let sum: f32 = frame.iter().map(|s| convert(*s)).sum();
                ring.push(sum / frame.len() as f32);
            }
        },
        |err| log::warn!("[mic] stream error: {err}"),
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_keeps_most_recent_samples() {
        let mut r = SampleRing::new(3);
        for v in 0..5 {
            r.push(v as f32);
        }
        let kept: Vec<f32> = r.samples.iter().copied().collect();
        assert_eq!(kept, vec![2.0, 3.0, 4.0]);
    }
}
