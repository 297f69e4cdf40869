// Host-side tests driving the whole scene frame by frame.

use halo_core::{FrameAudio, HaloConfig, HaloScene, InstanceBuffer, RingMode};

fn buffers(scene: &HaloScene) -> (InstanceBuffer, InstanceBuffer) {
    (
        InstanceBuffer::with_len(scene.ring_instance_count()),
        InstanceBuffer::with_len(scene.swarm_instance_count()),
    )
}

#[test]
fn loud_input_brightens_and_collapses_the_core() {
    let mut scene = HaloScene::default();
    let (mut ring, mut swarm) = buffers(&scene);
    let spectrum = vec![1.0f32; 512];
    let waveform = vec![0.5f32; 1024];
    let audio = FrameAudio {
        spectrum: Some(&spectrum),
        waveform: Some(&waveform),
    };

    let first = scene.frame(1.0 / 60.0, audio, &mut ring, &mut swarm);
    let mut last = first;
    for _ in 0..120 {
        last = scene.frame(1.0 / 60.0, audio, &mut ring, &mut swarm);
    }
    assert!(last.level > 0.99);
    assert!(last.ring_emissive > first.ring_emissive);
    assert!(last.swarm_emissive > first.swarm_emissive);
    assert!(last.swarm.vanished > 0, "inner particles should collapse and vanish");
    assert!(last.halo_mic_amp > 0.99);
    assert!((last.time - 121.0 / 60.0).abs() < 1e-4);
}

#[test]
fn vanished_particles_render_at_zero_scale() {
    let mut scene = HaloScene::default();
    let (mut ring, mut swarm) = buffers(&scene);
    let spectrum = vec![1.0f32; 512];
    for _ in 0..60 {
        scene.frame(
            1.0 / 60.0,
            FrameAudio {
                spectrum: Some(&spectrum),
                waveform: None,
            },
            &mut ring,
            &mut swarm,
        );
    }
    let hidden = swarm.instances().iter().filter(|i| i.scale == 0.0).count();
    let vanished = scene
        .swarm()
        .particles()
        .iter()
        .filter(|p| p.cooldown > 0.0)
        .count();
    assert!(vanished > 0);
    assert!(hidden >= vanished);
}

#[test]
fn spectrum_mode_writes_every_ring_instance() {
    let cfg = HaloConfig {
        ring_mode: RingMode::Spectrum,
        ..HaloConfig::default()
    };
    let mut scene = HaloScene::new(cfg);
    let (mut ring, mut swarm) = buffers(&scene);
    let spectrum: Vec<f32> = (0..512).map(|i| (i % 7) as f32 / 7.0).collect();
    scene.frame(
        0.02,
        FrameAudio {
            spectrum: Some(&spectrum),
            waveform: None,
        },
        &mut ring,
        &mut swarm,
    );
    assert!(ring.instances().iter().all(|i| i.scale >= 1.0));
    assert!(ring
        .instances()
        .iter()
        .all(|i| (i.pos[0] * i.pos[0] + i.pos[1] * i.pos[1]).sqrt() > 1.9));
}

#[test]
fn halo_geometry_follows_config() {
    let cfg = HaloConfig {
        halo_rings: 2,
        halo_points_per_ring: 50,
        ..HaloConfig::default()
    };
    let scene = HaloScene::new(cfg);
    assert_eq!(scene.halo_geometry().count, 100);
}
