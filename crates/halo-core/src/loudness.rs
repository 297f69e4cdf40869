//! Loudness sampling: reduce a magnitude spectrum to one smoothed scalar.
//!
//! With a live microphone the sampler averages a low/mid slice of the
//! normalized spectrum and low-passes it. Without one it follows a slow
//! synthetic oscillation so the visualization keeps breathing.

use crate::constants::{
    BAND_SKIP_BINS, BAND_TAKE_BINS, HALO_MIC_BOOST, IDLE_LEVEL_AMPLITUDE, IDLE_LEVEL_BASE,
    IDLE_LEVEL_OMEGA, IDLE_SMOOTHING, LIVE_SMOOTHING, RMS_KEEP,
};

/// Outcome of the one-time microphone negotiation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MicStatus {
    #[default]
    Idle,
    Requested,
    Granted,
    Denied,
    Unavailable,
    /// Released on page hide; final like a denial.
    Released,
}

impl MicStatus {
    pub fn is_live(self) -> bool {
        matches!(self, MicStatus::Granted)
    }

    /// Only an untouched slot may prompt; every later outcome is final.
    pub fn may_request(self) -> bool {
        matches!(self, MicStatus::Idle)
    }

    /// Status after the input is torn down. A slot that never prompted stays
    /// idle; failures keep their reason.
    pub fn after_release(self) -> MicStatus {
        match self {
            MicStatus::Idle | MicStatus::Denied | MicStatus::Unavailable => self,
            _ => MicStatus::Released,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MicStatus::Idle => "idle",
            MicStatus::Requested => "requested",
            MicStatus::Granted => "granted",
            MicStatus::Denied => "denied",
            MicStatus::Unavailable => "unavailable",
            MicStatus::Released => "released",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoudnessParams {
    pub live_smoothing: f32,
    pub idle_smoothing: f32,
    pub idle_base: f32,
    pub idle_amplitude: f32,
    pub idle_omega: f32,
}

impl Default for LoudnessParams {
    fn default() -> Self {
        Self {
            live_smoothing: LIVE_SMOOTHING,
            idle_smoothing: IDLE_SMOOTHING,
            idle_base: IDLE_LEVEL_BASE,
            idle_amplitude: IDLE_LEVEL_AMPLITUDE,
            idle_omega: IDLE_LEVEL_OMEGA,
        }
    }
}

/// Exponentially smoothed loudness in [0, 1]. Starts at 0.
#[derive(Clone, Debug)]
pub struct LoudnessSampler {
    params: LoudnessParams,
    smoothed: f32,
}

impl LoudnessSampler {
    pub fn new(params: LoudnessParams) -> Self {
        Self {
            params,
            smoothed: 0.0,
        }
    }

    pub fn level(&self) -> f32 {
        self.smoothed
    }

    /// Advance one frame. `spectrum` is a normalized magnitude spectrum, or
    /// `None` when no audio source is available.
    pub fn sample(&mut self, spectrum: Option<&[f32]>, time: f32) -> f32 {
        let (target, alpha) = match spectrum {
            Some(bins) if !bins.is_empty() => (band_level(bins), self.params.live_smoothing),
            _ => (self.idle_level(time), self.params.idle_smoothing),
        };
        let alpha = alpha.clamp(0.0, 1.0);
        // A single non-finite bin would otherwise poison every later frame.
        let target = if target.is_finite() { target.clamp(0.0, 1.0) } else { 0.0 };
        self.smoothed = (self.smoothed + (target - self.smoothed) * alpha).clamp(0.0, 1.0);
        self.smoothed
    }

    fn idle_level(&self, time: f32) -> f32 {
        self.params.idle_base + self.params.idle_amplitude * (time * self.params.idle_omega).sin()
    }
}

impl Default for LoudnessSampler {
    fn default() -> Self {
        Self::new(LoudnessParams::default())
    }
}

/// Average of bins `[2, min(len, 128))`; 0 when the slice is too short.
pub fn band_level(bins: &[f32]) -> f32 {
    let take = bins.len().min(BAND_TAKE_BINS);
    if take <= BAND_SKIP_BINS {
        return 0.0;
    }
    let sum: f32 = bins[BAND_SKIP_BINS..take].iter().sum();
    sum / (take - BAND_SKIP_BINS) as f32
}

/// Root mean square; an empty slice yields 0.
pub fn compute_rms(data: &[f32]) -> f32 {
    let sum: f32 = data.iter().map(|v| v * v).sum();
    (sum / data.len().max(1) as f32).sqrt()
}

/// Browser analyser frequency bytes (0..=255) to [0, 1].
pub fn frequency_bytes_to_unit(src: &[u8], dst: &mut Vec<f32>) {
    dst.clear();
    dst.extend(src.iter().map(|b| *b as f32 / 255.0));
}

/// Browser analyser time-domain bytes (128 = silence) to [-1, 1].
pub fn time_domain_bytes_to_signed(src: &[u8], dst: &mut Vec<f32>) {
    dst.clear();
    dst.extend(src.iter().map(|b| (*b as f32 - 128.0) / 128.0));
}

/// Smoothed time-domain RMS driving the halo layer.
#[derive(Clone, Debug, Default)]
pub struct RmsMeter {
    level: f32,
}

impl RmsMeter {
    pub fn update(&mut self, samples: &[f32]) -> f32 {
        let rms = compute_rms(samples);
        let rms = if rms.is_finite() { rms } else { 0.0 };
        self.level = self.level * RMS_KEEP + rms * (1.0 - RMS_KEEP);
        self.level
    }

    /// Decay toward silence when no signal is available.
    pub fn release(&mut self) -> f32 {
        self.level *= RMS_KEEP;
        self.level
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn halo_amp(&self) -> f32 {
        (self.level * HALO_MIC_BOOST).min(1.0)
    }
}
