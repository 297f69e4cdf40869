//! Startup self-checks shown in the diagnostics panel / native log.
//!
//! Checks are display-only: a failure never stops the visualization.

use smallvec::SmallVec;

use crate::geometry::build_halo_geometry;
use crate::layout::ParticleLayout;
use crate::loudness::compute_rms;
use crate::{HALO_WGSL, POINTS_WGSL};

#[derive(Clone, Debug, PartialEq)]
pub struct CheckResult {
    pub name: &'static str,
    pub pass: bool,
    pub details: String,
}

impl CheckResult {
    fn new(name: &'static str, pass: bool, details: impl Into<String>) -> Self {
        Self {
            name,
            pass,
            details: details.into(),
        }
    }
}

/// Platform capabilities probed by the front-end before running checks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub render_context: bool,
    pub mic_api: bool,
}

pub type CheckList = SmallVec<[CheckResult; 8]>;

pub fn run_self_checks(caps: Capabilities) -> CheckList {
    let mut out = CheckList::new();

    out.push(CheckResult::new(
        "Rendering context",
        caps.render_context,
        if caps.render_context {
            "GPU adapter available"
        } else {
            "No GPU adapter / surface"
        },
    ));

    out.push(check_shader("Points shader", POINTS_WGSL));
    out.push(check_shader("Halo shader", HALO_WGSL));

    out.push(CheckResult::new(
        "Microphone API",
        caps.mic_api,
        if caps.mic_api {
            "Audio input API present"
        } else {
            "No audio input API"
        },
    ));

    let geo = build_halo_geometry(3, 10, 2.0);
    let geo_ok = geo.count == 30
        && geo.positions.len() == 90
        && geo.ring_idx.len() == 30
        && geo.angles.len() == 30;
    out.push(CheckResult::new(
        "Halo geometry",
        geo_ok,
        format!(
            "count={} positions={} ring_idx={} angles={}",
            geo.count,
            geo.positions.len(),
            geo.ring_idx.len(),
            geo.angles.len()
        ),
    ));

    let zeros = compute_rms(&[0.0; 8]);
    let ones = compute_rms(&[1.0; 8]);
    let alternating = compute_rms(&[0.0, 1.0, 0.0, 1.0]);
    let rms_ok = zeros.abs() < 1e-6
        && (ones - 1.0).abs() < 1e-6
        && (alternating - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6;
    out.push(CheckResult::new(
        "RMS helper",
        rms_ok,
        format!("zeros={zeros:.3} ones={ones:.3} alternating={alternating:.4}"),
    ));

    let a = ParticleLayout::generate(64, 1.0);
    let b = ParticleLayout::generate(64, 1.0);
    let inside = a.base.iter().all(|p| p.length() <= 1.0 + 1e-5);
    out.push(CheckResult::new(
        "Layout determinism",
        a == b && inside,
        format!("identical={} contained={inside}", a == b),
    ));

    for c in out.iter().filter(|c| !c.pass) {
        log::warn!("[diagnostics] {} failed: {}", c.name, c.details);
    }
    out
}

fn check_shader(name: &'static str, src: &str) -> CheckResult {
    let ok = !src.trim().is_empty() && src.contains("fn vs_main") && src.contains("fn fs_main");
    CheckResult::new(name, ok, format!("{} bytes", src.len()))
}

pub fn all_passed(checks: &[CheckResult]) -> bool {
    checks.iter().all(|c| c.pass)
}
