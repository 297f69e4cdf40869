//! Configuration surface for the halo scene.
//!
//! Every field has a default in `constants.rs`. Front-ends may override
//! fields before construction; `sanitized()` then clamps anything malformed
//! (logging a warning per clamp) and the result is read-only.

use std::str::FromStr;

use crate::constants::*;
use crate::error::HaloError;

/// How the thin ring reacts to audio.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RingMode {
    /// Radius follows the smoothed level shaped by a travelling wave.
    #[default]
    Halo,
    /// Each angle reads a travelling FFT bin.
    Spectrum,
}

impl FromStr for RingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "halo" => Ok(RingMode::Halo),
            "spectrum" => Ok(RingMode::Spectrum),
            other => Err(format!("unknown ring mode '{other}' (expected halo|spectrum)")),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HaloConfig {
    // counts
    pub ring_count: usize,
    pub inner_count: usize,
    // sizes / colors
    pub ring_radius: f32,
    pub ring_size: f32,
    pub inner_size: f32,
    pub ring_color: String,
    pub inner_color: String,
    pub ring_glow: String,
    pub inner_glow: String,
    // ring motion
    pub ring_mode: RingMode,
    pub pulse_strength: f32,
    pub pulse_speed: f32,
    pub wave_speed: f32,
    pub wave_cycles: f32,
    pub audio_gain: f32,
    pub feather_scale: f32,
    pub feather_size_mult: f32,
    // swarm motion
    pub inner_flow_speed: f32,
    pub inner_audio_jitter: f32,
    // recruitment
    pub gravity_strength: f32,
    pub min_core_radius_frac: f32,
    pub activation_softness: f32,
    pub gamma_loudness: f32,
    // vanish / respawn
    pub vanish_radius_frac: f32,
    pub vanish_guard_frac: f32,
    pub vanish_jitter_frac: f32,
    pub vanish_gate: f32,
    pub reappear_delay: f32,
    pub respawn_fade_in: f32,
    // voice halo
    pub halo_rings: i32,
    pub halo_points_per_ring: i32,
    pub halo_base_radius: f32,
    pub halo_amplitude: f32,
    pub halo_thickness: f32,
    // mic
    pub auto_start_mic: bool,
}

impl Default for HaloConfig {
    fn default() -> Self {
        Self {
            ring_count: DEFAULT_RING_COUNT,
            inner_count: DEFAULT_INNER_COUNT,
            ring_radius: DEFAULT_RING_RADIUS,
            ring_size: DEFAULT_RING_SIZE,
            inner_size: DEFAULT_INNER_SIZE,
            ring_color: DEFAULT_RING_COLOR.to_string(),
            inner_color: DEFAULT_INNER_COLOR.to_string(),
            ring_glow: DEFAULT_RING_GLOW.to_string(),
            inner_glow: DEFAULT_INNER_GLOW.to_string(),
            ring_mode: RingMode::Halo,
            pulse_strength: DEFAULT_PULSE_STRENGTH,
            pulse_speed: DEFAULT_PULSE_SPEED,
            wave_speed: DEFAULT_WAVE_SPEED,
            wave_cycles: DEFAULT_WAVE_CYCLES,
            audio_gain: DEFAULT_AUDIO_GAIN,
            feather_scale: DEFAULT_FEATHER_SCALE,
            feather_size_mult: DEFAULT_FEATHER_SIZE_MULT,
            inner_flow_speed: DEFAULT_INNER_FLOW_SPEED,
            inner_audio_jitter: DEFAULT_INNER_AUDIO_JITTER,
            gravity_strength: DEFAULT_GRAVITY_STRENGTH,
            min_core_radius_frac: DEFAULT_MIN_CORE_RADIUS_FRAC,
            activation_softness: DEFAULT_ACTIVATION_SOFTNESS,
            gamma_loudness: DEFAULT_GAMMA_LOUDNESS,
            vanish_radius_frac: DEFAULT_VANISH_RADIUS_FRAC,
            vanish_guard_frac: DEFAULT_VANISH_GUARD_FRAC,
            vanish_jitter_frac: DEFAULT_VANISH_JITTER_FRAC,
            vanish_gate: DEFAULT_VANISH_GATE,
            reappear_delay: DEFAULT_REAPPEAR_DELAY_SEC,
            respawn_fade_in: DEFAULT_RESPAWN_FADE_IN_SEC,
            halo_rings: DEFAULT_HALO_RINGS,
            halo_points_per_ring: DEFAULT_HALO_POINTS_PER_RING,
            halo_base_radius: DEFAULT_HALO_BASE_RADIUS,
            halo_amplitude: DEFAULT_HALO_AMPLITUDE,
            halo_thickness: DEFAULT_HALO_THICKNESS,
            auto_start_mic: true,
        }
    }
}

impl HaloConfig {
    /// Clamp malformed values to safe ones. Never fails.
    pub fn sanitized(mut self) -> Self {
        fn at_least_one(name: &str, v: &mut usize) {
            if *v == 0 {
                log::warn!("[config] {name}=0; clamping to 1");
                *v = 1;
            }
        }
        fn positive(name: &str, v: &mut f32, fallback: f32) {
            if !v.is_finite() || *v <= 0.0 {
                log::warn!("[config] {name}={v} is not positive; using {fallback}");
                *v = fallback;
            }
        }
        fn non_negative(name: &str, v: &mut f32) {
            if !v.is_finite() || *v < 0.0 {
                log::warn!("[config] {name}={v} is negative; clamping to 0");
                *v = 0.0;
            }
        }
        fn within(name: &str, v: &mut f32, lo: f32, hi: f32) {
            let c = if v.is_finite() { v.clamp(lo, hi) } else { lo };
            if c != *v {
                log::warn!("[config] {name}={v} outside [{lo}, {hi}]; clamping to {c}");
                *v = c;
            }
        }

        at_least_one("ring_count", &mut self.ring_count);
        at_least_one("inner_count", &mut self.inner_count);
        if self.halo_rings < 1 {
            log::warn!("[config] halo_rings={}; clamping to 1", self.halo_rings);
            self.halo_rings = 1;
        }
        if self.halo_points_per_ring < 1 {
            log::warn!(
                "[config] halo_points_per_ring={}; clamping to 1",
                self.halo_points_per_ring
            );
            self.halo_points_per_ring = 1;
        }

        positive("ring_radius", &mut self.ring_radius, DEFAULT_RING_RADIUS);
        positive("ring_size", &mut self.ring_size, DEFAULT_RING_SIZE);
        positive("inner_size", &mut self.inner_size, DEFAULT_INNER_SIZE);
        positive("halo_base_radius", &mut self.halo_base_radius, DEFAULT_HALO_BASE_RADIUS);
        positive("gamma_loudness", &mut self.gamma_loudness, DEFAULT_GAMMA_LOUDNESS);
        positive("reappear_delay", &mut self.reappear_delay, DEFAULT_REAPPEAR_DELAY_SEC);
        positive("respawn_fade_in", &mut self.respawn_fade_in, DEFAULT_RESPAWN_FADE_IN_SEC);
        self.reappear_delay = self.reappear_delay.max(MIN_TIMER_SEC);
        self.respawn_fade_in = self.respawn_fade_in.max(MIN_TIMER_SEC);

        non_negative("pulse_strength", &mut self.pulse_strength);
        non_negative("audio_gain", &mut self.audio_gain);
        non_negative("feather_scale", &mut self.feather_scale);
        non_negative("feather_size_mult", &mut self.feather_size_mult);
        non_negative("inner_audio_jitter", &mut self.inner_audio_jitter);
        non_negative("halo_amplitude", &mut self.halo_amplitude);
        non_negative("halo_thickness", &mut self.halo_thickness);
        non_negative("vanish_radius_frac", &mut self.vanish_radius_frac);
        non_negative("vanish_guard_frac", &mut self.vanish_guard_frac);
        non_negative("vanish_jitter_frac", &mut self.vanish_jitter_frac);

        within("gravity_strength", &mut self.gravity_strength, 0.0, 1.0);
        within(
            "min_core_radius_frac",
            &mut self.min_core_radius_frac,
            MIN_CORE_RADIUS_FRAC_FLOOR,
            1.0,
        );
        within(
            "activation_softness",
            &mut self.activation_softness,
            0.0,
            MAX_ACTIVATION_SOFTNESS,
        );
        within("vanish_gate", &mut self.vanish_gate, 0.0, 1.0);

        for v in [
            &mut self.pulse_speed,
            &mut self.wave_speed,
            &mut self.wave_cycles,
            &mut self.inner_flow_speed,
        ] {
            if !v.is_finite() {
                log::warn!("[config] non-finite motion parameter; using 0");
                *v = 0.0;
            }
        }
        self
    }

    /// Disc radius the swarm is scattered in.
    pub fn inner_disc_radius(&self) -> f32 {
        self.ring_radius * INNER_DISC_FRAC
    }

    pub fn ring_rgb(&self) -> [f32; 3] {
        color_or_white(&self.ring_color)
    }

    pub fn ring_glow_rgb(&self) -> [f32; 3] {
        color_or_white(&self.ring_glow)
    }

    pub fn inner_rgb(&self) -> [f32; 3] {
        color_or_white(&self.inner_color)
    }

    pub fn inner_glow_rgb(&self) -> [f32; 3] {
        color_or_white(&self.inner_glow)
    }
}

/// Parse `#rrggbb` (leading `#` optional) into linear-ish [0, 1] channels.
pub fn parse_hex_color(s: &str) -> Result<[f32; 3], HaloError> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(HaloError::InvalidColor(s.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|_| HaloError::InvalidColor(s.to_string()))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

fn color_or_white(s: &str) -> [f32; 3] {
    parse_hex_color(s).unwrap_or_else(|e| {
        log::warn!("[config] {e}; using white");
        [1.0, 1.0, 1.0]
    })
}
