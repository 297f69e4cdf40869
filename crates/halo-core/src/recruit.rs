//! Loudness-driven recruitment of the inner swarm.
//!
//! Every particle carries a fixed rank in [0, 1). As the shaped loudness
//! rises past a particle's rank the particle activates and is pulled from
//! its base radius toward a small core radius. Particles that collapse
//! inside the (jittered) vanish radius disappear for a while and fade back
//! in, so the center never piles up into a dense flickering blob.
//!
//! ```text
//!   ACTIVE --(a > gate && targetR <= vanishR)--> VANISHED
//!   VANISHED --(cooldown expires)--> RESPAWNING
//!   RESPAWNING --(fade timer expires)--> ACTIVE
//! ```

use glam::{Vec2, Vec3};

use crate::config::HaloConfig;
use crate::constants::{FLOW_OFFSET_SCALE, RECRUIT_SIZE_BOOST};
use crate::layout::ParticleLayout;
use crate::sink::InstanceSink;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticlePhase {
    Active,
    Vanished,
    Respawning,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub base: Vec2,
    pub base_radius: f32,
    pub base_angle: f32,
    pub rank: f32,
    pub vanish_jitter: f32,
    pub cooldown: f32,
    pub respawn_timer: f32,
}

impl Particle {
    pub fn new(base: Vec2, rank: f32, vanish_jitter: f32) -> Self {
        Self {
            base,
            base_radius: base.length(),
            base_angle: base.y.atan2(base.x),
            rank,
            vanish_jitter,
            cooldown: 0.0,
            respawn_timer: 0.0,
        }
    }

    pub fn phase(&self) -> ParticlePhase {
        if self.cooldown > 0.0 {
            ParticlePhase::Vanished
        } else if self.respawn_timer > 0.0 {
            ParticlePhase::Respawning
        } else {
            ParticlePhase::Active
        }
    }
}

/// Per-frame recruitment parameters, resolved from [`HaloConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecruitParams {
    pub ring_radius: f32,
    pub gamma: f32,
    pub softness: f32,
    pub gravity: f32,
    pub min_core_frac: f32,
    pub vanish_radius_frac: f32,
    pub vanish_guard_frac: f32,
    pub vanish_jitter_frac: f32,
    pub vanish_gate: f32,
    pub reappear_delay: f32,
    pub respawn_fade_in: f32,
    pub flow_speed: f32,
    pub audio_jitter: f32,
    pub wave_speed: f32,
    pub wave_cycles: f32,
}

impl RecruitParams {
    pub fn from_config(cfg: &HaloConfig) -> Self {
        Self {
            ring_radius: cfg.ring_radius,
            gamma: cfg.gamma_loudness,
            softness: cfg.activation_softness,
            gravity: cfg.gravity_strength,
            min_core_frac: cfg.min_core_radius_frac,
            vanish_radius_frac: cfg.vanish_radius_frac,
            vanish_guard_frac: cfg.vanish_guard_frac,
            vanish_jitter_frac: cfg.vanish_jitter_frac,
            vanish_gate: cfg.vanish_gate,
            reappear_delay: cfg.reappear_delay,
            respawn_fade_in: cfg.respawn_fade_in,
            flow_speed: cfg.inner_flow_speed,
            audio_jitter: cfg.inner_audio_jitter,
            wave_speed: cfg.wave_speed,
            wave_cycles: cfg.wave_cycles,
        }
    }

    /// Floor radius fully recruited particles are pulled toward.
    pub fn min_radius(&self) -> f32 {
        self.min_core_frac.max(0.0) * self.ring_radius
    }

    /// Per-particle vanish threshold including the guard band.
    pub fn vanish_radius(&self, jitter: f32) -> f32 {
        let base = self.vanish_radius_frac * self.ring_radius;
        base * (1.0 + jitter * self.vanish_jitter_frac) + self.vanish_guard_frac * self.ring_radius
    }
}

impl Default for RecruitParams {
    fn default() -> Self {
        Self::from_config(&HaloConfig::default())
    }
}

/// Clamped Hermite step. A zero-width band degrades to a hard step at `edge0`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let width = edge1 - edge0;
    if width <= f32::EPSILON {
        return if x >= edge0 { 1.0 } else { 0.0 };
    }
    let t = ((x - edge0) / width).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Recruitment progress of a particle with `rank` at shaped loudness `loud`.
#[inline]
pub fn activation(rank: f32, softness: f32, loud: f32) -> f32 {
    let s = softness.max(0.0);
    smoothstep(rank - s, rank + s, loud)
}

#[inline]
pub fn shape_loudness(level: f32, gamma: f32) -> f32 {
    level.clamp(0.0, 1.0).powf(gamma)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwarmStats {
    pub active: usize,
    pub vanished: usize,
    pub respawning: usize,
}

pub struct Swarm {
    particles: Vec<Particle>,
    params: RecruitParams,
}

impl Swarm {
    pub fn new(layout: &ParticleLayout, params: RecruitParams) -> Self {
        let particles = layout
            .base
            .iter()
            .zip(&layout.rank)
            .zip(&layout.jitter)
            .map(|((base, rank), jitter)| Particle::new(*base, *rank, *jitter))
            .collect();
        Self { particles, params }
    }

    pub fn from_config(cfg: &HaloConfig) -> Self {
        let layout = ParticleLayout::generate(cfg.inner_count, cfg.inner_disc_radius());
        Self::new(&layout, RecruitParams::from_config(cfg))
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn params(&self) -> &RecruitParams {
        &self.params
    }

    pub fn phase(&self, index: usize) -> Option<ParticlePhase> {
        self.particles.get(index).map(Particle::phase)
    }

    /// Advance every particle by `dt` seconds at smoothed loudness `level`
    /// and write its transform into `sink`.
    pub fn step<S: InstanceSink + ?Sized>(
        &mut self,
        level: f32,
        time: f32,
        dt: f32,
        sink: &mut S,
    ) -> SwarmStats {
        let p = self.params;
        let dt = dt.max(0.0);
        let l0 = level.clamp(0.0, 1.0);
        let loud = shape_loudness(l0, p.gamma);
        let phase = time * p.flow_speed;
        let min_r = p.min_radius();
        let pull = p.gravity.clamp(0.0, 1.0);
        let mut stats = SwarmStats::default();

        for (i, part) in self.particles.iter_mut().enumerate() {
            let rest = part.base.extend(0.0);

            if part.cooldown > 0.0 {
                part.cooldown -= dt;
                if part.cooldown <= 0.0 {
                    part.cooldown = 0.0;
                    part.respawn_timer = p.respawn_fade_in;
                }
                sink.set_instance_transform(i, rest, 0.0);
                stats.vanished += 1;
                continue;
            }

            let a = activation(part.rank, p.softness, loud);
            let target_r = part.base_radius + (min_r - part.base_radius) * (pull * a);

            // Only settled particles may vanish; a fade-in always completes.
            let settled = part.respawn_timer <= 0.0;
            if settled && a > p.vanish_gate && target_r <= p.vanish_radius(part.vanish_jitter) {
                part.cooldown = p.reappear_delay;
                sink.set_instance_transform(i, rest, 0.0);
                stats.vanished += 1;
                continue;
            }

            let flowed = flow_position(part, time, phase, l0, &p);
            let ang = flowed.y.atan2(flowed.x);
            let pos = Vec3::new(ang.cos() * target_r, ang.sin() * target_r, 0.0);

            let mut scale = 1.0 + RECRUIT_SIZE_BOOST * a * (0.3 + 0.7 * l0);
            if part.respawn_timer > 0.0 {
                part.respawn_timer = (part.respawn_timer - dt).max(0.0);
                scale *= (1.0 - part.respawn_timer / p.respawn_fade_in).clamp(0.0, 1.0);
                stats.respawning += 1;
            } else {
                stats.active += 1;
            }
            sink.set_instance_transform(i, pos, scale);
        }
        stats
    }
}

// Organic drift: two sinusoidal flow fields plus a loudness-weighted
// tangential jitter riding the travelling wave.
fn flow_position(part: &Particle, time: f32, phase: f32, level: f32, p: &RecruitParams) -> Vec2 {
    let (bx, by) = (part.base.x, part.base.y);
    let theta = part.base_angle;
    let wave = (theta * p.wave_cycles - time * p.wave_speed).sin() * 0.5 + 0.5;

    let nx = 0.32 * (0.85 * bx + 1.2 * by + phase).sin()
        + 0.18 * (1.6 * by - 0.6 * bx + phase * 0.7).cos();
    let ny = 0.32 * (0.95 * bx - 1.0 * by + phase).cos()
        + 0.18 * (1.2 * bx + 0.8 * by + phase * 0.6).sin();

    let j = p.audio_jitter * level * (0.25 + 0.75 * wave);
    Vec2::new(
        bx + nx * FLOW_OFFSET_SCALE - j * theta.sin(),
        by + ny * FLOW_OFFSET_SCALE + j * theta.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothstep_edges() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_width_band_is_a_step() {
        assert_eq!(smoothstep(0.3, 0.3, 0.299), 0.0);
        assert_eq!(smoothstep(0.3, 0.3, 0.3), 1.0);
        assert_eq!(activation(0.5, 0.0, 0.49), 0.0);
        assert_eq!(activation(0.5, 0.0, 0.5), 1.0);
    }

    #[test]
    fn vanish_radius_includes_jitter_and_guard() {
        let p = RecruitParams::default();
        let center = p.vanish_radius(0.0);
        assert!(p.vanish_radius(0.4) > center);
        assert!(p.vanish_radius(-0.4) < center);
        assert!(center > p.vanish_radius_frac * p.ring_radius);
    }

    #[test]
    fn min_radius_is_positive() {
        let p = RecruitParams::default();
        assert!(p.min_radius() > 0.0);
    }
}
