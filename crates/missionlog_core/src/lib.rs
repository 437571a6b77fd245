//! Core domain logic for MissionLog.
//! Owns the capture journal: record model, local store, display fallbacks,
//! feed/streak queries and the mission capture flow.

pub mod db;
pub mod display;
pub mod imaging;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use display::{
    display_emoji, display_mission, display_note, display_title, emotion_label, steps_text,
    CaptureCard,
};
pub use imaging::{prepare_capture_photo, PhotoError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::capture::{Capture, CaptureId, CaptureValidationError};
pub use model::emotion::Emotion;
pub use model::mission::{mission_catalog, Mission, DEFAULT_MISSION};
pub use repo::capture_repo::{
    CaptureRepository, PersistenceError, RepoResult, SqliteCaptureRepository,
};
pub use service::capture_flow::{CaptureFlow, FlowError, FlowState};
pub use service::feed_service::{
    day_completion_status, streak_count, window_days, Dashboard, DayStripEntry, FeedService,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
