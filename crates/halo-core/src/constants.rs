// Shared visual/audio tuning constants used by both web and native frontends.

// Counts
pub const DEFAULT_RING_COUNT: usize = 720; // thin outer ring
pub const DEFAULT_INNER_COUNT: usize = 1800; // recruitable swarm inside the ring

// Scene layout
pub const DEFAULT_RING_RADIUS: f32 = 2.0;
pub const INNER_DISC_FRAC: f32 = 0.98; // swarm disc radius as a fraction of the ring radius
pub const DEFAULT_RING_SIZE: f32 = 0.028;
pub const DEFAULT_INNER_SIZE: f32 = 0.022;

// Palette (#rrggbb)
pub const DEFAULT_RING_COLOR: &str = "#cfe7ff";
pub const DEFAULT_INNER_COLOR: &str = "#b8d9ff";
pub const DEFAULT_RING_GLOW: &str = "#a7d0ff";
pub const DEFAULT_INNER_GLOW: &str = "#9ac7ff";
pub const RING_OPACITY: f32 = 0.96;
pub const INNER_OPACITY: f32 = 0.96;

// Ring motion
pub const DEFAULT_PULSE_STRENGTH: f32 = 0.08;
pub const DEFAULT_PULSE_SPEED: f32 = 0.7; // Hz
pub const DEFAULT_WAVE_SPEED: f32 = 1.6; // rad/s
pub const DEFAULT_WAVE_CYCLES: f32 = 3.0; // bumps around the circle
pub const DEFAULT_AUDIO_GAIN: f32 = 0.85;
pub const DEFAULT_FEATHER_SCALE: f32 = 1.06; // 0 disables the feather ring
pub const DEFAULT_FEATHER_SIZE_MULT: f32 = 1.8;
pub const SPECTRUM_BIN_TRAVEL: f32 = 18.0; // bins per radian of wave phase
pub const SPECTRUM_IDLE_BUMP: f32 = 0.15;

// Emissive lift: intensity = base + span * level
pub const RING_EMISSIVE_BASE: f32 = 0.7;
pub const RING_EMISSIVE_SPAN: f32 = 0.8;
pub const INNER_EMISSIVE_BASE: f32 = 0.55;
pub const INNER_EMISSIVE_SPAN: f32 = 0.75;

// Swarm motion
pub const DEFAULT_INNER_FLOW_SPEED: f32 = 0.65;
pub const DEFAULT_INNER_AUDIO_JITTER: f32 = 0.5;
pub const FLOW_OFFSET_SCALE: f32 = 0.07; // world units per unit of flow field

// Recruitment
pub const DEFAULT_GRAVITY_STRENGTH: f32 = 0.9;
pub const DEFAULT_MIN_CORE_RADIUS_FRAC: f32 = 0.06;
pub const MIN_CORE_RADIUS_FRAC_FLOOR: f32 = 1e-3; // core radius stays strictly positive
pub const DEFAULT_ACTIVATION_SOFTNESS: f32 = 0.12;
pub const MAX_ACTIVATION_SOFTNESS: f32 = 0.5;
pub const DEFAULT_GAMMA_LOUDNESS: f32 = 0.9;
pub const RECRUIT_SIZE_BOOST: f32 = 0.5;

// Vanish / respawn
pub const DEFAULT_VANISH_RADIUS_FRAC: f32 = 0.10;
pub const DEFAULT_VANISH_GUARD_FRAC: f32 = 0.01;
pub const DEFAULT_VANISH_JITTER_FRAC: f32 = 0.5;
pub const DEFAULT_VANISH_GATE: f32 = 0.4; // activation above which a collapsed particle vanishes
pub const DEFAULT_REAPPEAR_DELAY_SEC: f32 = 0.6;
pub const DEFAULT_RESPAWN_FADE_IN_SEC: f32 = 0.45;
pub const MIN_TIMER_SEC: f32 = 1e-3;

// Loudness sampling
pub const LIVE_SMOOTHING: f32 = 0.1;
pub const IDLE_SMOOTHING: f32 = 0.05;
pub const IDLE_LEVEL_BASE: f32 = 0.12;
pub const IDLE_LEVEL_AMPLITUDE: f32 = 0.05;
pub const IDLE_LEVEL_OMEGA: f32 = 0.8; // rad/s
pub const BAND_SKIP_BINS: usize = 2; // dc-ish bins
pub const BAND_TAKE_BINS: usize = 128; // voice-dominant low/mid bins

// RMS meter (halo layer)
pub const RMS_KEEP: f32 = 0.8;
pub const HALO_MIC_BOOST: f32 = 3.0;

// Analyser (matches the browser AnalyserNode settings used on the web)
pub const ANALYSER_FFT_SIZE: usize = 1024;
pub const ANALYSER_SMOOTHING: f32 = 0.75;
pub const ANALYSER_MIN_DB: f32 = -100.0;
pub const ANALYSER_MAX_DB: f32 = -30.0;

// Voice halo (shader-animated concentric rings)
pub const DEFAULT_HALO_RINGS: i32 = 1;
pub const DEFAULT_HALO_POINTS_PER_RING: i32 = 360;
pub const DEFAULT_HALO_BASE_RADIUS: f32 = 2.6;
pub const DEFAULT_HALO_AMPLITUDE: f32 = 0.35;
pub const DEFAULT_HALO_THICKNESS: f32 = 0.06;
pub const HALO_RING_SPACING: f32 = 0.08;
pub const HALO_POINT_SIZE: f32 = 0.02;

// Layout seeds
pub const INNER_POSITION_SEED: u32 = 987_654;
pub const INNER_RANK_SEED: u32 = 24_681_357;
pub const INNER_JITTER_SEED: u32 = 13_572_468;

// Camera
pub const CAMERA_Z: f32 = 6.0;
pub const CAMERA_FOVY_DEG: f32 = 45.0;

// Clear color
pub const CLEAR_RGB: [f64; 3] = [0.02, 0.025, 0.045];
