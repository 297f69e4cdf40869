// Host-side tests for loudness sampling and the RMS helpers.

use halo_core::loudness::{band_level, LoudnessParams};
use halo_core::{compute_rms, LoudnessSampler, MicStatus, RmsMeter};

#[test]
fn rms_of_known_signals() {
    assert_eq!(compute_rms(&[0.0; 32]), 0.0);
    assert!((compute_rms(&[1.0; 32]) - 1.0).abs() < 1e-6);
    let alt = compute_rms(&[0.0, 1.0, 0.0, 1.0]);
    assert!((alt - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    assert_eq!(compute_rms(&[]), 0.0);
}

#[test]
fn step_to_full_loudness_approaches_one_without_overshoot() {
    let mut s = LoudnessSampler::default();
    let loud = vec![1.0f32; 512];
    let mut prev = s.level();
    assert_eq!(prev, 0.0);
    for frame in 0..200 {
        let l = s.sample(Some(&loud), frame as f32 / 60.0);
        assert!(l >= prev, "level must rise monotonically");
        assert!((0.0..=1.0).contains(&l));
        prev = l;
    }
    assert!(prev > 0.99, "level only reached {prev}");
}

#[test]
fn first_live_frame_moves_a_tenth_of_the_way() {
    let mut s = LoudnessSampler::default();
    let l = s.sample(Some(&[1.0; 256]), 0.0);
    assert!((l - 0.1).abs() < 1e-6);
}

#[test]
fn no_source_follows_idle_oscillation() {
    let mut s = LoudnessSampler::default();
    let p = LoudnessParams::default();
    let lo = p.idle_base - p.idle_amplitude;
    let hi = p.idle_base + p.idle_amplitude;
    for frame in 0..3000 {
        let l = s.sample(None, frame as f32 / 60.0);
        if frame > 600 {
            assert!(l >= lo - 0.01 && l <= hi + 0.01, "idle level {l} left the band");
        }
    }
}

#[test]
fn empty_spectrum_counts_as_no_source() {
    let mut a = LoudnessSampler::default();
    let mut b = LoudnessSampler::default();
    for frame in 0..10 {
        let t = frame as f32 * 0.1;
        assert_eq!(a.sample(Some(&[]), t), b.sample(None, t));
    }
}

#[test]
fn out_of_range_bins_are_clamped() {
    let mut s = LoudnessSampler::default();
    for _ in 0..500 {
        s.sample(Some(&[5.0; 256]), 0.0);
    }
    assert!(s.level() <= 1.0);
}

#[test]
fn non_finite_bins_do_not_stick() {
    let mut s = LoudnessSampler::default();
    let mut bad = vec![0.5f32; 256];
    bad[10] = f32::NAN;
    assert_eq!(s.sample(Some(&bad), 0.0), 0.0);
    bad[10] = f32::INFINITY;
    assert!(s.sample(Some(&bad), 0.0).is_finite());
    let l = s.sample(Some(&[1.0; 256]), 0.0);
    assert!((l - 0.1).abs() < 1e-6, "recovered to {l}");

    let mut meter = RmsMeter::default();
    assert_eq!(meter.update(&[f32::NAN, 0.5]), 0.0);
    assert!(meter.update(&[1.0; 16]) > 0.0);
}

#[test]
fn mic_outcomes_other_than_idle_are_final() {
    assert!(MicStatus::Idle.may_request());
    for s in [
        MicStatus::Requested,
        MicStatus::Granted,
        MicStatus::Denied,
        MicStatus::Unavailable,
        MicStatus::Released,
    ] {
        assert!(!s.may_request(), "{} must not prompt again", s.label());
    }
    assert_eq!(MicStatus::Granted.after_release(), MicStatus::Released);
    assert_eq!(MicStatus::Requested.after_release(), MicStatus::Released);
    assert_eq!(MicStatus::Idle.after_release(), MicStatus::Idle);
    assert_eq!(MicStatus::Denied.after_release(), MicStatus::Denied);
    assert_eq!(MicStatus::Unavailable.after_release(), MicStatus::Unavailable);
}

#[test]
fn band_average_uses_low_mid_slice() {
    let mut bins = vec![0.0f32; 1024];
    for (i, b) in bins.iter_mut().enumerate() {
        *b = if (2..128).contains(&i) { 0.25 } else { 1.0 };
    }
    assert!((band_level(&bins) - 0.25).abs() < 1e-6);
    assert!((band_level(&bins[..10]) - 0.25).abs() < 1e-6);
}

#[test]
fn rms_meter_drives_halo_amplitude() {
    let mut m = RmsMeter::default();
    m.update(&[0.1; 64]);
    assert!((m.level() - 0.02).abs() < 1e-6);
    assert!((m.halo_amp() - 0.06).abs() < 1e-6);
    for _ in 0..200 {
        m.update(&[0.9; 64]);
    }
    assert_eq!(m.halo_amp(), 1.0, "halo amplitude saturates at 1");
}
