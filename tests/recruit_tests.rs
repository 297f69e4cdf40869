// Host-side tests for the recruitment vanish/respawn state machine.

use glam::Vec2;
use halo_core::layout::ParticleLayout;
use halo_core::recruit::{activation, RecruitParams};
use halo_core::{InstanceBuffer, ParticlePhase, Swarm};

const DT: f32 = 1.0 / 60.0;

fn single(base: Vec2, rank: f32) -> Swarm {
    let layout = ParticleLayout {
        base: vec![base],
        rank: vec![rank],
        jitter: vec![0.0],
    };
    Swarm::new(&layout, RecruitParams::default())
}

fn first_loudness_reaching_half(rank: f32) -> f32 {
    (0..=1000)
        .map(|i| i as f32 / 1000.0)
        .find(|&x| activation(rank, 0.12, x) >= 0.5)
        .unwrap_or(f32::INFINITY)
}

#[test]
fn low_rank_recruits_before_high_rank() {
    let low = first_loudness_reaching_half(0.0);
    let high = first_loudness_reaching_half(0.9);
    assert!(low < high, "rank 0 at {low}, rank 0.9 at {high}");
}

#[test]
fn zero_softness_is_an_immediate_step() {
    assert_eq!(activation(0.3, 0.0, 0.2999), 0.0);
    assert_eq!(activation(0.3, 0.0, 0.3), 1.0);
    assert_eq!(activation(0.3, 0.0, 0.9), 1.0);
}

#[test]
fn all_particles_start_active() {
    let swarm = Swarm::from_config(&Default::default());
    assert!(!swarm.is_empty());
    assert!((0..swarm.len()).all(|i| swarm.phase(i) == Some(ParticlePhase::Active)));
    assert_eq!(swarm.phase(swarm.len()), None);
}

#[test]
fn vanished_particle_hides_then_fades_back_in() {
    let mut swarm = single(Vec2::new(0.1, 0.0), 0.5);
    let params = *swarm.params();
    let mut sink = InstanceBuffer::with_len(1);

    swarm.step(1.0, 0.0, DT, &mut sink);
    assert_eq!(swarm.phase(0), Some(ParticlePhase::Vanished));
    assert_eq!(sink.instances()[0].scale, 0.0);
    assert_eq!(sink.instances()[0].pos, [0.1, 0.0, 0.0], "vanished particles rest at base");

    // Silence from here on: the particle must not re-trigger.
    let mut t = DT;
    let mut hidden_frames = 0;
    while swarm.phase(0) == Some(ParticlePhase::Vanished) {
        swarm.step(0.0, t, DT, &mut sink);
        assert_eq!(sink.instances()[0].scale, 0.0);
        hidden_frames += 1;
        t += DT;
        assert!(hidden_frames < 1000, "cooldown never expired");
    }
    let expected = (params.reappear_delay / DT).round() as i32;
    assert!(
        (hidden_frames - expected).abs() <= 1,
        "hidden for {hidden_frames} frames, expected about {expected}"
    );
    assert_eq!(swarm.phase(0), Some(ParticlePhase::Respawning));

    let mut prev = 0.0;
    let mut ramp_frames = 0;
    loop {
        swarm.step(0.0, t, DT, &mut sink);
        let s = sink.instances()[0].scale;
        assert!(s >= prev - 1e-6, "fade-in must be monotonic ({prev} -> {s})");
        prev = s;
        ramp_frames += 1;
        t += DT;
        if swarm.phase(0) == Some(ParticlePhase::Active) {
            break;
        }
        assert!(ramp_frames < 1000, "fade never finished");
    }
    assert!((prev - 1.0).abs() < 1e-5, "steady scale at silence is 1, got {prev}");
    let expected_ramp = (params.respawn_fade_in / DT).round() as i32;
    assert!((ramp_frames - expected_ramp).abs() <= 1);
}

#[test]
fn sustained_loudness_lets_the_fade_in_finish() {
    let mut swarm = single(Vec2::new(0.1, 0.0), 0.5);
    let params = *swarm.params();
    let mut sink = InstanceBuffer::with_len(1);

    swarm.step(1.0, 0.0, DT, &mut sink);
    assert_eq!(swarm.phase(0), Some(ParticlePhase::Vanished));

    let mut prev_phase = ParticlePhase::Vanished;
    let mut prev_scale = 0.0;
    let mut max_scale: f32 = 0.0;
    let mut first_active = None;
    for frame in 1..240 {
        swarm.step(1.0, frame as f32 * DT, DT, &mut sink);
        let phase = swarm.phase(0).unwrap();
        let s = sink.instances()[0].scale;
        assert!(
            !(prev_phase == ParticlePhase::Respawning && phase == ParticlePhase::Vanished),
            "fade-in interrupted at frame {frame}"
        );
        if prev_phase == ParticlePhase::Respawning {
            assert!(s >= prev_scale - 1e-6, "fade-in must be monotonic ({prev_scale} -> {s})");
        }
        if phase == ParticlePhase::Active && first_active.is_none() {
            assert!(s > 0.0, "particle is visible once the fade completes");
            first_active = Some(frame);
        }
        max_scale = max_scale.max(s);
        prev_phase = phase;
        prev_scale = s;
    }

    let reached = first_active.expect("particle never returned to active");
    let expected = ((params.reappear_delay + params.respawn_fade_in) / DT).round() as i32;
    assert!(
        (reached - expected).abs() <= 2,
        "active at frame {reached}, expected about {expected}"
    );
    assert!(max_scale > 1.0, "recruited particle shows its boosted size, got {max_scale}");
}

#[test]
fn outer_particles_are_pulled_in_but_never_vanish() {
    let mut swarm = single(Vec2::new(1.8, 0.0), 0.0);
    let params = *swarm.params();
    let mut sink = InstanceBuffer::with_len(1);
    for frame in 0..120 {
        swarm.step(1.0, frame as f32 * DT, DT, &mut sink);
    }
    assert_eq!(swarm.phase(0), Some(ParticlePhase::Active));
    let p = sink.instances()[0];
    let r = Vec2::new(p.pos[0], p.pos[1]).length();
    let expected = 1.8 + (params.min_radius() - 1.8) * params.gravity;
    assert!((r - expected).abs() < 1e-4, "radius {r}, expected {expected}");
    assert!(p.scale > 1.0, "recruited particles grow");
}

#[test]
fn silent_high_rank_particle_keeps_its_radius() {
    let mut swarm = single(Vec2::new(0.0, 1.2), 0.95);
    let mut sink = InstanceBuffer::with_len(1);
    swarm.step(0.0, 3.0, DT, &mut sink);
    let p = sink.instances()[0];
    assert!((Vec2::new(p.pos[0], p.pos[1]).length() - 1.2).abs() < 1e-5);
    assert_eq!(p.scale, 1.0);
}

#[test]
fn zero_dt_keeps_vanished_particles_hidden() {
    let mut swarm = single(Vec2::new(0.05, 0.05), 0.2);
    let mut sink = InstanceBuffer::with_len(1);
    swarm.step(1.0, 0.0, DT, &mut sink);
    for _ in 0..100 {
        swarm.step(0.0, 0.0, 0.0, &mut sink);
    }
    assert_eq!(swarm.phase(0), Some(ParticlePhase::Vanished));
}
