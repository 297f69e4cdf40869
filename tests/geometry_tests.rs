// Host-side tests for the voice halo point buffers.

use halo_core::{build_halo_geometry, HALO_RING_SPACING};

#[test]
fn buffer_sizes_match_ring_layout() {
    let geo = build_halo_geometry(3, 10, 2.0);
    assert_eq!(geo.count, 30);
    assert_eq!(geo.positions.len(), 90);
    assert_eq!(geo.ring_idx.len(), 30);
    assert_eq!(geo.angles.len(), 30);
}

#[test]
fn zero_and_negative_counts_clamp_to_one_point() {
    for (rings, ppr) in [(0, 0), (-3, 5), (4, -1)] {
        let geo = build_halo_geometry(rings, ppr, 1.0);
        let expected = rings.max(1) as usize * ppr.max(1) as usize;
        assert_eq!(geo.count, expected, "rings={rings} ppr={ppr}");
        assert_eq!(geo.positions.len(), expected * 3);
    }
    assert_eq!(build_halo_geometry(0, 0, 1.0).count, 1);
}

#[test]
fn points_sit_on_their_ring_radius() {
    let geo = build_halo_geometry(3, 16, 2.6);
    for i in 0..geo.count {
        let x = geo.positions[i * 3];
        let y = geo.positions[i * 3 + 1];
        let want = 2.6 + geo.ring_idx[i] * HALO_RING_SPACING;
        assert!(((x * x + y * y).sqrt() - want).abs() < 1e-5);
        assert!((y.atan2(x).rem_euclid(std::f32::consts::TAU) - geo.angles[i]).abs() < 1e-4);
    }
}
