// Host-side tests for the deterministic swarm layout.

use halo_core::layout::{ring_angles, sample_disc, LayoutSeeds, ParticleLayout};
use halo_core::Mulberry32;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::{FRAC_PI_2, PI};

#[test]
fn same_count_and_radius_give_identical_layouts() {
    let a = ParticleLayout::generate(1800, 1.96);
    let b = ParticleLayout::generate(1800, 1.96);
    assert_eq!(a, b, "layout must be bit-identical across runs");
}

#[test]
fn smaller_layout_is_a_prefix_of_larger() {
    let small = ParticleLayout::generate(10, 1.0);
    let large = ParticleLayout::generate(20, 1.0);
    assert_eq!(&large.base[..10], &small.base[..]);
    assert_eq!(&large.rank[..10], &small.rank[..]);
    assert_eq!(&large.jitter[..10], &small.jitter[..]);
}

#[test]
fn different_seeds_change_positions() {
    let seeds = LayoutSeeds {
        position: 1,
        ..LayoutSeeds::default()
    };
    let a = ParticleLayout::generate(32, 1.0);
    let b = ParticleLayout::generate_with_seeds(32, 1.0, seeds);
    assert_ne!(a.base, b.base);
    assert_eq!(a.rank, b.rank, "rank stream is independent of position seed");
}

#[test]
fn points_stay_inside_disc_for_random_sizes() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let n = rng.gen_range(1..400);
        let r = rng.gen_range(0.05f32..5.0);
        let layout = ParticleLayout::generate(n, r);
        assert_eq!(layout.len(), n);
        for p in &layout.base {
            assert!(p.length() <= r * (1.0 + 1e-5), "{} outside radius {}", p.length(), r);
        }
    }
}

#[test]
fn radial_distribution_is_uniform_by_area() {
    let pts = sample_disc(20_000, 1.0, 987_654);
    let inner = pts.iter().filter(|p| p.length() < 0.5).count() as f32 / pts.len() as f32;
    assert!((inner - 0.25).abs() < 0.02, "fraction inside R/2 was {inner}");
}

#[test]
fn ranks_and_jitter_are_in_range() {
    let layout = ParticleLayout::generate(5000, 2.0);
    assert!(layout.rank.iter().all(|r| (0.0..1.0).contains(r)));
    assert!(layout.jitter.iter().all(|j| (-0.5..0.5).contains(j)));
    let mean: f32 = layout.rank.iter().sum::<f32>() / layout.rank.len() as f32;
    assert!((mean - 0.5).abs() < 0.03, "rank mean {mean}");
}

#[test]
fn ring_angles_are_evenly_spaced() {
    let a = ring_angles(4);
    let expected = [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2];
    for (got, want) in a.iter().zip(expected) {
        assert!((got - want).abs() < 1e-6);
    }
}

#[test]
fn mulberry_known_sequence_is_stable() {
    let mut a = Mulberry32::new(42);
    let mut b = Mulberry32::new(42);
    let first: Vec<u32> = (0..8).map(|_| a.next_raw()).collect();
    let second: Vec<u32> = (0..8).map(|_| b.next_raw()).collect();
    assert_eq!(first, second);
    assert!(first.windows(2).all(|w| w[0] != w[1]));
}
