// Page contract and frame-loop limits for the web front-end.

pub const CANVAS_ID: &str = "halo-canvas";
pub const DIAGNOSTICS_ID: &str = "diagnostics";
pub const HINT_SELECTOR: &str = ".hint";

// Frames after a hidden tab can report huge deltas; clamp so timers tick sanely.
pub const MAX_FRAME_DT_SEC: f32 = 0.1;
