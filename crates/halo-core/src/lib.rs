pub mod camera;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod geometry;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod layout;
pub mod loudness;
pub mod recruit;
pub mod ring;
pub mod rng;
pub mod scene;
pub mod sink;
pub mod spectrum;

pub static POINTS_WGSL: &str = include_str!("../shaders/points.wgsl");
pub static HALO_WGSL: &str = include_str!("../shaders/halo.wgsl");

pub use camera::Camera;
pub use config::{parse_hex_color, HaloConfig, RingMode};
pub use constants::*;
pub use diagnostics::{run_self_checks, Capabilities, CheckResult};
pub use error::HaloError;
pub use geometry::{build_halo_geometry, HaloGeometry};
pub use layout::ParticleLayout;
pub use loudness::{compute_rms, LoudnessSampler, MicStatus, RmsMeter};
pub use recruit::{ParticlePhase, Swarm};
pub use rng::Mulberry32;
pub use scene::{FrameAudio, FrameOutput, HaloScene};
pub use sink::{InstanceBuffer, InstanceSink};
pub use spectrum::SpectrumAnalyzer;
