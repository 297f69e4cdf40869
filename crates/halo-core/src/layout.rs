//! Deterministic particle layouts.
//!
//! The swarm is scattered uniformly by area inside a disc (`r = R * sqrt(u)`
//! keeps the center from clustering) and every particle gets a fixed
//! recruitment rank and vanish jitter. The same `(count, radius)` always
//! yields bit-identical output.

use glam::Vec2;
use std::f32::consts::TAU;

use crate::constants::{INNER_JITTER_SEED, INNER_POSITION_SEED, INNER_RANK_SEED};
use crate::rng::Mulberry32;

/// Seeds for the three independent layout streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutSeeds {
    pub position: u32,
    pub rank: u32,
    pub jitter: u32,
}

impl Default for LayoutSeeds {
    fn default() -> Self {
        Self {
            position: INNER_POSITION_SEED,
            rank: INNER_RANK_SEED,
            jitter: INNER_JITTER_SEED,
        }
    }
}

/// Static per-particle attributes of the swarm.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleLayout {
    pub base: Vec<Vec2>,
    pub rank: Vec<f32>,
    pub jitter: Vec<f32>,
}

impl ParticleLayout {
    pub fn generate(count: usize, radius: f32) -> Self {
        Self::generate_with_seeds(count, radius, LayoutSeeds::default())
    }

    pub fn generate_with_seeds(count: usize, radius: f32, seeds: LayoutSeeds) -> Self {
        let base = sample_disc(count, radius, seeds.position);

        let mut rank_rng = Mulberry32::new(seeds.rank);
        let rank = (0..count).map(|_| rank_rng.next_f32()).collect();

        let mut jitter_rng = Mulberry32::new(seeds.jitter);
        let jitter = (0..count).map(|_| jitter_rng.next_centered()).collect();

        Self { base, rank, jitter }
    }

    pub fn len(&self) -> usize {
        self.base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }
}

/// Uniform-area points inside a disc of `radius` centered at the origin.
pub fn sample_disc(count: usize, radius: f32, seed: u32) -> Vec<Vec2> {
    let mut rng = Mulberry32::new(seed);
    (0..count)
        .map(|_| {
            let u = rng.next_f32();
            let v = rng.next_f32();
            let r = radius * u.sqrt();
            let t = v * TAU;
            Vec2::new(t.cos() * r, t.sin() * r)
        })
        .collect()
}

/// `count` evenly spaced angles starting at 0.
pub fn ring_angles(count: usize) -> Vec<f32> {
    (0..count)
        .map(|i| (i as f32 / count as f32) * TAU)
        .collect()
}
