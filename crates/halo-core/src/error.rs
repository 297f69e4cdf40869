use thiserror::Error;

use crate::loudness::MicStatus;

/// Errors raised by the core. None of them are fatal to the visualization.
#[derive(Debug, Error)]
pub enum HaloError {
    #[error("invalid color {0:?}: expected #rrggbb")]
    InvalidColor(String),
    #[error("microphone permission denied: {0}")]
    MicDenied(String),
    #[error("microphone unavailable: {0}")]
    MicUnavailable(String),
}

impl HaloError {
    /// Status the loudness sampler should report after this failure.
    pub fn mic_status(&self) -> MicStatus {
        match self {
            HaloError::MicDenied(_) => MicStatus::Denied,
            HaloError::MicUnavailable(_) => MicStatus::Unavailable,
            HaloError::InvalidColor(_) => MicStatus::Idle,
        }
    }
}
