//! Thin outer ring and its feather copy.

use glam::Vec3;
use std::f32::consts::TAU;

use crate::config::{HaloConfig, RingMode};
use crate::constants::{
    INNER_EMISSIVE_BASE, INNER_EMISSIVE_SPAN, RING_EMISSIVE_BASE, RING_EMISSIVE_SPAN,
    SPECTRUM_BIN_TRAVEL, SPECTRUM_IDLE_BUMP,
};
use crate::layout::ring_angles;
use crate::sink::InstanceSink;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingParams {
    pub mode: RingMode,
    pub radius: f32,
    pub pulse_strength: f32,
    pub pulse_speed: f32,
    pub wave_speed: f32,
    pub wave_cycles: f32,
    pub audio_gain: f32,
    pub feather_scale: f32,
}

impl RingParams {
    pub fn from_config(cfg: &HaloConfig) -> Self {
        Self {
            mode: cfg.ring_mode,
            radius: cfg.ring_radius,
            pulse_strength: cfg.pulse_strength,
            pulse_speed: cfg.pulse_speed,
            wave_speed: cfg.wave_speed,
            wave_cycles: cfg.wave_cycles,
            audio_gain: cfg.audio_gain,
            feather_scale: cfg.feather_scale,
        }
    }
}

/// Slow breathing shared by every ring particle.
pub fn global_pulse(time: f32, strength: f32, speed: f32) -> f32 {
    let lfo = 0.5 + 0.5 * (time * speed * TAU).sin();
    1.0 + strength * (0.35 + 0.65 * lfo)
}

/// Travelling wave in [0, 1] around the circle.
#[inline]
pub fn angular_wave(theta: f32, time: f32, cycles: f32, speed: f32) -> f32 {
    0.5 + 0.5 * (theta * cycles - time * speed).sin()
}

/// Bin an angle reads in spectrum mode; the index drifts with `wave_phase`.
pub fn spectrum_bin_index(theta: f32, bins: usize, wave_phase: f32) -> usize {
    if bins == 0 {
        return 0;
    }
    let raw = (theta / TAU * bins as f32 + wave_phase * SPECTRUM_BIN_TRAVEL).floor();
    (raw as i64).rem_euclid(bins as i64) as usize
}

pub fn ring_emissive(level: f32) -> f32 {
    RING_EMISSIVE_BASE + RING_EMISSIVE_SPAN * level
}

pub fn swarm_emissive(level: f32) -> f32 {
    INNER_EMISSIVE_BASE + INNER_EMISSIVE_SPAN * level
}

pub struct RingLayer {
    angles: Vec<f32>,
    params: RingParams,
}

impl RingLayer {
    pub fn new(count: usize, params: RingParams) -> Self {
        Self {
            angles: ring_angles(count.max(1)),
            params,
        }
    }

    pub fn from_config(cfg: &HaloConfig) -> Self {
        Self::new(cfg.ring_count, RingParams::from_config(cfg))
    }

    pub fn angles(&self) -> &[f32] {
        &self.angles
    }

    pub fn params(&self) -> &RingParams {
        &self.params
    }

    pub fn feather_enabled(&self) -> bool {
        self.params.feather_scale > 0.0
    }

    /// Instances written per frame: the ring, then its feather copy.
    pub fn instance_count(&self) -> usize {
        if self.feather_enabled() {
            self.angles.len() * 2
        } else {
            self.angles.len()
        }
    }

    /// Write ring transforms. Feather copies land at `N..2N`.
    pub fn animate<S: InstanceSink + ?Sized>(
        &self,
        level: f32,
        spectrum: Option<&[f32]>,
        time: f32,
        sink: &mut S,
    ) {
        let p = &self.params;
        let l = level.clamp(0.0, 1.0);
        let pulse = global_pulse(time, p.pulse_strength, p.pulse_speed);
        let wave_phase = time * p.wave_speed;
        let n = self.angles.len();
        let bins = spectrum.filter(|b| !b.is_empty());

        for (i, &theta) in self.angles.iter().enumerate() {
            let wave = angular_wave(theta, time, p.wave_cycles, p.wave_speed);
            let (r, scale) = match p.mode {
                RingMode::Halo => {
                    let offset = p.audio_gain * (0.2 * l + 0.6 * l * wave);
                    (p.radius * pulse * (1.0 + 0.18 * offset), 1.0)
                }
                RingMode::Spectrum => {
                    let amp = match bins {
                        Some(b) => b[spectrum_bin_index(theta, b.len(), wave_phase)],
                        None => SPECTRUM_IDLE_BUMP,
                    };
                    let offset = p.audio_gain * (0.15 * l + 0.55 * amp * wave);
                    (p.radius * pulse * (1.0 + 0.25 * offset), 1.0 + 0.5 * offset)
                }
            };
            let (s, c) = theta.sin_cos();
            sink.set_instance_transform(i, Vec3::new(c * r, s * r, 0.0), scale);
            if self.feather_enabled() {
                let fr = r * p.feather_scale;
                sink.set_instance_transform(n + i, Vec3::new(c * fr, s * fr, 0.0), scale);
            }
        }
    }
}
