//! Closed emotion palette offered by the emoji picker.
//!
//! Storage keeps the raw token as text; this enum is the checked type used
//! where a user selection enters core.

use serde::{Deserialize, Serialize};

/// One of the six supported emotion tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Happy,
    Anxious,
    Neutral,
    Unhappy,
    Upset,
    Awkward,
}

impl Emotion {
    /// Palette in picker order.
    pub const ALL: [Emotion; 6] = [
        Emotion::Happy,
        Emotion::Anxious,
        Emotion::Neutral,
        Emotion::Unhappy,
        Emotion::Upset,
        Emotion::Awkward,
    ];

    /// Emoji token persisted in `Capture::emoji`.
    pub fn token(self) -> &'static str {
        match self {
            Self::Happy => "😄",
            Self::Anxious => "😰",
            Self::Neutral => "🙂",
            Self::Unhappy => "🙁",
            Self::Upset => "😡",
            Self::Awkward => "😬",
        }
    }

    /// Semantic word shown next to the emoji.
    pub fn label(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Anxious => "anxious",
            Self::Neutral => "neutral",
            Self::Unhappy => "unhappy",
            Self::Upset => "upset",
            Self::Awkward => "awkward",
        }
    }

    /// Maps a stored token back to the palette.
    ///
    /// Returns `None` for anything outside the six supported tokens.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|emotion| emotion.token() == token)
    }
}
