// Host-side tests for the startup self-checks.

use halo_core::diagnostics::all_passed;
use halo_core::{run_self_checks, Capabilities, HALO_WGSL, POINTS_WGSL};

#[test]
fn everything_passes_with_capabilities_present() {
    let checks = run_self_checks(Capabilities {
        render_context: true,
        mic_api: true,
    });
    for c in &checks {
        assert!(c.pass, "{} failed: {}", c.name, c.details);
    }
    assert!(all_passed(&checks));
}

#[test]
fn missing_capabilities_are_flagged() {
    let checks = run_self_checks(Capabilities::default());
    let failed: Vec<&str> = checks.iter().filter(|c| !c.pass).map(|c| c.name).collect();
    assert_eq!(failed, vec!["Rendering context", "Microphone API"]);
}

#[test]
fn shaders_expose_entry_points() {
    for src in [POINTS_WGSL, HALO_WGSL] {
        assert!(src.contains("@vertex"));
        assert!(src.contains("fn vs_main"));
        assert!(src.contains("@fragment"));
        assert!(src.contains("fn fs_main"));
    }
}

#[test]
fn rms_check_covers_the_alternating_signal() {
    let checks = run_self_checks(Capabilities::default());
    let rms = checks
        .iter()
        .find(|c| c.name == "RMS helper")
        .expect("RMS helper check present");
    assert!(rms.pass, "{}", rms.details);
    assert!(rms.details.contains("alternating=0.7071"), "{}", rms.details);
}
