//! Per-frame driver tying loudness, ring and swarm together.
//!
//! Front-ends own one `HaloScene` inside their frame context and call
//! [`HaloScene::frame`] once per animation tick with whatever audio the
//! platform captured.

use crate::config::HaloConfig;
use crate::geometry::{build_halo_geometry, HaloGeometry};
use crate::loudness::{LoudnessSampler, RmsMeter};
use crate::recruit::{Swarm, SwarmStats};
use crate::ring::{ring_emissive, swarm_emissive, RingLayer};
use crate::sink::InstanceSink;

/// Monotonic scene time accumulated from frame deltas.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
    time: f32,
    frames: u64,
}

impl FrameClock {
    pub fn tick(&mut self, dt: f32) -> f32 {
        if dt.is_finite() && dt > 0.0 {
            self.time += dt;
        }
        self.frames += 1;
        self.time
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Audio captured for one frame. Both slices are optional; `None` means the
/// source is unavailable and the idle branch runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameAudio<'a> {
    /// Normalized magnitude spectrum in [0, 1].
    pub spectrum: Option<&'a [f32]>,
    /// Time-domain samples in [-1, 1].
    pub waveform: Option<&'a [f32]>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameOutput {
    pub time: f32,
    pub level: f32,
    pub ring_emissive: f32,
    pub swarm_emissive: f32,
    pub halo_mic_amp: f32,
    pub swarm: SwarmStats,
}

pub struct HaloScene {
    config: HaloConfig,
    clock: FrameClock,
    loudness: LoudnessSampler,
    rms: RmsMeter,
    ring: RingLayer,
    swarm: Swarm,
    halo_geometry: HaloGeometry,
}

impl HaloScene {
    pub fn new(config: HaloConfig) -> Self {
        let config = config.sanitized();
        let ring = RingLayer::from_config(&config);
        let swarm = Swarm::from_config(&config);
        let halo_geometry = build_halo_geometry(
            config.halo_rings,
            config.halo_points_per_ring,
            config.halo_base_radius,
        );
        log::info!(
            "[scene] ring={} swarm={} halo points={}",
            ring.instance_count(),
            swarm.len(),
            halo_geometry.count
        );
        Self {
            config,
            clock: FrameClock::default(),
            loudness: LoudnessSampler::default(),
            rms: RmsMeter::default(),
            ring,
            swarm,
            halo_geometry,
        }
    }

    pub fn config(&self) -> &HaloConfig {
        &self.config
    }

    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    pub fn level(&self) -> f32 {
        self.loudness.level()
    }

    pub fn ring(&self) -> &RingLayer {
        &self.ring
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    pub fn halo_geometry(&self) -> &HaloGeometry {
        &self.halo_geometry
    }

    pub fn ring_instance_count(&self) -> usize {
        self.ring.instance_count()
    }

    pub fn swarm_instance_count(&self) -> usize {
        self.swarm.len()
    }

    pub fn frame<R, S>(
        &mut self,
        dt: f32,
        audio: FrameAudio<'_>,
        ring_sink: &mut R,
        swarm_sink: &mut S,
    ) -> FrameOutput
    where
        R: InstanceSink + ?Sized,
        S: InstanceSink + ?Sized,
    {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let time = self.clock.tick(dt);
        let level = self.loudness.sample(audio.spectrum, time);
        match audio.waveform {
            Some(w) if !w.is_empty() => self.rms.update(w),
            _ => self.rms.release(),
        };

        self.ring.animate(level, audio.spectrum, time, ring_sink);
        let swarm = self.swarm.step(level, time, dt, swarm_sink);

        FrameOutput {
            time,
            level,
            ring_emissive: ring_emissive(level),
            swarm_emissive: swarm_emissive(level),
            halo_mic_amp: self.rms.halo_amp(),
            swarm,
        }
    }
}

impl Default for HaloScene {
    fn default() -> Self {
        Self::new(HaloConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::InstanceBuffer;

    #[test]
    fn clock_ignores_negative_and_nan() {
        let mut c = FrameClock::default();
        c.tick(0.5);
        c.tick(-1.0);
        c.tick(f32::NAN);
        assert_eq!(c.time(), 0.5);
        assert_eq!(c.frames(), 3);
    }

    #[test]
    fn idle_frames_keep_level_in_idle_band() {
        let mut scene = HaloScene::default();
        let mut ring = InstanceBuffer::with_len(scene.ring_instance_count());
        let mut swarm = InstanceBuffer::with_len(scene.swarm_instance_count());
        let mut out = FrameOutput::default();
        for _ in 0..600 {
            out = scene.frame(1.0 / 60.0, FrameAudio::default(), &mut ring, &mut swarm);
        }
        assert!(out.level > 0.05 && out.level < 0.2, "level {}", out.level);
        assert_eq!(
            out.swarm.active + out.swarm.vanished + out.swarm.respawning,
            scene.swarm_instance_count()
        );
        assert_eq!(out.halo_mic_amp, 0.0);
    }
}
