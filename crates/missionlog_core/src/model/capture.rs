//! Capture domain model.
//!
//! # Responsibility
//! - Define the record written when a daily mission is completed.
//! - Own identity and creation-time defaults.
//!
//! # Invariants
//! - `id` is stable, never nil and never reused for another capture.
//! - `created_at` is fixed at construction and kept at millisecond precision
//!   so it survives a storage round-trip unchanged.
//! - No field is validated beyond identity; `emoji` stays free-form text.
//!
//! # See also
//! - docs/architecture/data-model.md

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every persisted capture.
pub type CaptureId = Uuid;

/// Validation failure for capture identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureValidationError {
    /// The all-zero UUID is reserved and never identifies a capture.
    NilId,
}

impl Display for CaptureValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "capture id must not be nil"),
        }
    }
}

impl Error for CaptureValidationError {}

/// One completed mission instance.
///
/// Display fallbacks (untitled, empty note, missing emoji) are derived on
/// read by [`crate::display`] and never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub id: CaptureId,
    /// Required but may be empty.
    pub title: String,
    /// Name of the mission prompt this capture fulfills.
    pub mission: Option<String>,
    pub note: Option<String>,
    /// Emotion token. Expected to come from `Emotion::ALL`, not enforced.
    pub emoji: Option<String>,
    pub steps: Option<u32>,
    /// Prepared (square, compressed) photo bytes.
    pub image: Option<Vec<u8>>,
    /// Sole ordering and grouping key.
    pub created_at: DateTime<Utc>,
}

impl Capture {
    /// Creates a capture with a generated id and `created_at = now`.
    ///
    /// # Invariants
    /// - All optional fields start as `None`.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            mission: None,
            note: None,
            emoji: None,
            steps: None,
            image: None,
            created_at: Utc::now().trunc_subsecs(3),
        }
    }

    /// Creates a capture with caller-provided identity and timestamp.
    ///
    /// Used when reading back persisted rows and by tests that need a fixed
    /// timeline.
    ///
    /// # Errors
    /// - Returns `CaptureValidationError::NilId` for `Uuid::nil()`.
    pub fn with_id(
        id: CaptureId,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CaptureValidationError> {
        let capture = Self {
            id,
            title: title.into(),
            mission: None,
            note: None,
            emoji: None,
            steps: None,
            image: None,
            created_at: created_at.trunc_subsecs(3),
        };
        capture.validate()?;
        Ok(capture)
    }

    /// Checks identity invariants.
    pub fn validate(&self) -> Result<(), CaptureValidationError> {
        if self.id.is_nil() {
            return Err(CaptureValidationError::NilId);
        }
        Ok(())
    }

    /// Returns whether a photo is attached.
    pub fn has_image(&self) -> bool {
        self.image.as_ref().is_some_and(|bytes| !bytes.is_empty())
    }
}
