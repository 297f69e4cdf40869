//! Command-line overrides for the halo configuration.

use clap::Parser;
use halo_core::{
    HaloConfig, RingMode, DEFAULT_ACTIVATION_SOFTNESS, DEFAULT_GAMMA_LOUDNESS,
    DEFAULT_GRAVITY_STRENGTH, DEFAULT_INNER_COUNT, DEFAULT_RING_COUNT,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "halo-native")]
#[command(about = "Audio-reactive particle halo driven by the microphone", long_about = None)]
pub struct Args {
    /// Particles on the thin outer ring
    #[arg(long, value_name = "N", default_value_t = DEFAULT_RING_COUNT)]
    pub ring_count: usize,

    /// Particles in the recruitable inner swarm
    #[arg(long, value_name = "N", default_value_t = DEFAULT_INNER_COUNT)]
    pub inner_count: usize,

    /// Pull toward the core at full activation (0..1)
    #[arg(long, default_value_t = DEFAULT_GRAVITY_STRENGTH)]
    pub gravity: f32,

    /// Loudness shaping exponent
    #[arg(long, default_value_t = DEFAULT_GAMMA_LOUDNESS)]
    pub gamma: f32,

    /// Half-width of the activation band around each particle's rank
    #[arg(long, default_value_t = DEFAULT_ACTIVATION_SOFTNESS)]
    pub softness: f32,

    /// Ring reaction: halo (default) or spectrum
    #[arg(long, value_name = "MODE", default_value = "halo")]
    pub ring_mode: RingMode,

    /// Skip microphone capture and run the idle animation
    #[arg(long)]
    pub no_mic: bool,

    /// Run the self-checks, print them and exit
    #[arg(long)]
    pub diagnostics: bool,
}

impl Args {
    pub fn to_config(&self) -> HaloConfig {
        HaloConfig {
            ring_count: self.ring_count,
            inner_count: self.inner_count,
            gravity_strength: self.gravity,
            gamma_loudness: self.gamma,
            activation_softness: self.softness,
            ring_mode: self.ring_mode,
            auto_start_mic: !self.no_mic,
            ..HaloConfig::default()
        }
        .sanitized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_core_config() {
        let args = Args::parse_from(["halo-native"]);
        assert_eq!(args.to_config(), HaloConfig::default());
    }

    #[test]
    fn overrides_are_sanitized() {
        let args = Args::parse_from([
            "halo-native",
            "--inner-count",
            "0",
            "--gravity",
            "3.0",
            "--ring-mode",
            "spectrum",
            "--no-mic",
        ]);
        let cfg = args.to_config();
        assert_eq!(cfg.inner_count, 1);
        assert_eq!(cfg.gravity_strength, 1.0);
        assert_eq!(cfg.ring_mode, RingMode::Spectrum);
        assert!(!cfg.auto_start_mic);
    }
}
