//! Write path for one mission capture attempt.
//!
//! # Responsibility
//! - Collect note, emotion and photo for a mission without touching storage.
//! - Commit the assembled capture on save, or drop it on discard.
//!
//! # Invariants
//! - Only `save` talks to the store; `begin` and `discard` never do.
//! - A failed save leaves the flow `Composing` with the draft intact.
//! - `steps` is never set here; step counts are attached elsewhere.

use crate::imaging::{prepare_capture_photo, PhotoError};
use crate::model::capture::{Capture, CaptureId};
use crate::model::emotion::Emotion;
use crate::model::mission::DEFAULT_MISSION;
use crate::repo::capture_repo::{CaptureRepository, PersistenceError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Observable lifecycle state of a [`CaptureFlow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Composing,
    Saved(CaptureId),
    Discarded,
}

impl Display for FlowState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Composing => write!(f, "composing"),
            Self::Saved(_) => write!(f, "saved"),
            Self::Discarded => write!(f, "discarded"),
        }
    }
}

#[derive(Debug)]
pub enum FlowError {
    /// Operation is not allowed in the current state.
    InvalidTransition {
        state: FlowState,
        action: &'static str,
    },
    Photo(PhotoError),
    /// Store write failed; the draft is kept and `save` may be retried.
    Persistence(PersistenceError),
}

impl FlowError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

impl Display for FlowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTransition { state, action } => {
                write!(f, "cannot {action} while capture flow is {state}")
            }
            Self::Photo(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "failed to save capture: {err}"),
        }
    }
}

impl Error for FlowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTransition { .. } => None,
            Self::Photo(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<PhotoError> for FlowError {
    fn from(value: PhotoError) -> Self {
        Self::Photo(value)
    }
}

impl From<PersistenceError> for FlowError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

#[derive(Debug, Clone, Default)]
struct Draft {
    mission: String,
    note: String,
    emotion: Option<Emotion>,
    photo: Option<Vec<u8>>,
}

impl Draft {
    fn to_capture(&self) -> Capture {
        let mut capture = Capture::new(self.mission.clone());
        capture.mission = Some(self.mission.clone());
        capture.note = if self.note.trim().is_empty() {
            None
        } else {
            Some(self.note.clone())
        };
        capture.emoji = self.emotion.map(|emotion| emotion.token().to_string());
        capture.image = self.photo.clone();
        capture
    }
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    Composing(Draft),
    Saved(CaptureId),
    Discarded,
}

/// State machine for a single capture attempt.
///
/// `Idle -> Composing -> Saved | Discarded`. Create a new flow for every
/// attempt; terminal states do not restart.
#[derive(Debug, Clone)]
pub struct CaptureFlow {
    state: State,
}

impl Default for CaptureFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureFlow {
    pub fn new() -> Self {
        Self { state: State::Idle }
    }

    pub fn state(&self) -> FlowState {
        match &self.state {
            State::Idle => FlowState::Idle,
            State::Composing(_) => FlowState::Composing,
            State::Saved(id) => FlowState::Saved(*id),
            State::Discarded => FlowState::Discarded,
        }
    }

    /// Opens the capture sheet for `mission`. Nothing is persisted.
    ///
    /// A blank mission falls back to [`DEFAULT_MISSION`].
    pub fn begin(&mut self, mission: impl Into<String>) -> Result<(), FlowError> {
        if !matches!(self.state, State::Idle) {
            return Err(self.invalid("begin"));
        }
        let mission = mission.into();
        let mission = match mission.trim() {
            "" => DEFAULT_MISSION.title.to_string(),
            trimmed => trimmed.to_string(),
        };
        self.state = State::Composing(Draft {
            mission,
            ..Draft::default()
        });
        Ok(())
    }

    pub fn set_note(&mut self, note: impl Into<String>) -> Result<(), FlowError> {
        self.draft_mut("set note")?.note = note.into();
        Ok(())
    }

    pub fn select_emotion(&mut self, emotion: Emotion) -> Result<(), FlowError> {
        self.draft_mut("select emotion")?.emotion = Some(emotion);
        Ok(())
    }

    pub fn clear_emotion(&mut self) -> Result<(), FlowError> {
        self.draft_mut("clear emotion")?.emotion = None;
        Ok(())
    }

    /// Crops and compresses raw camera bytes and attaches them to the draft.
    ///
    /// A photo that fails to decode leaves any previous photo in place.
    pub fn attach_photo(&mut self, raw: &[u8]) -> Result<(), FlowError> {
        let draft = self.draft_mut("attach photo")?;
        let prepared = prepare_capture_photo(raw)?;
        draft.photo = Some(prepared);
        Ok(())
    }

    pub fn remove_photo(&mut self) -> Result<(), FlowError> {
        self.draft_mut("remove photo")?.photo = None;
        Ok(())
    }

    pub fn mission(&self) -> Option<&str> {
        self.draft().map(|draft| draft.mission.as_str())
    }

    pub fn note(&self) -> Option<&str> {
        self.draft().map(|draft| draft.note.as_str())
    }

    pub fn emotion(&self) -> Option<Emotion> {
        self.draft().and_then(|draft| draft.emotion)
    }

    pub fn has_photo(&self) -> bool {
        self.draft().is_some_and(|draft| draft.photo.is_some())
    }

    /// Commits the draft as a new capture.
    ///
    /// # Errors
    /// - `InvalidTransition` unless composing.
    /// - `Persistence` when the store write fails; the flow stays composing.
    pub fn save<R: CaptureRepository + ?Sized>(
        &mut self,
        repo: &R,
    ) -> Result<CaptureId, FlowError> {
        let capture = match &self.state {
            State::Composing(draft) => draft.to_capture(),
            _ => return Err(self.invalid("save")),
        };

        match repo.create_capture(&capture) {
            Ok(id) => {
                info!(
                    "event=capture_flow_save module=flow status=ok capture_id={} has_note={} has_emotion={} has_image={}",
                    id,
                    capture.note.is_some(),
                    capture.emoji.is_some(),
                    capture.has_image()
                );
                self.state = State::Saved(id);
                Ok(id)
            }
            Err(err) => {
                warn!(
                    "event=capture_flow_save module=flow status=error retryable=true error={}",
                    err
                );
                Err(FlowError::Persistence(err))
            }
        }
    }

    /// Cancels the attempt. The store is not touched.
    pub fn discard(&mut self) -> Result<(), FlowError> {
        if !matches!(self.state, State::Composing(_)) {
            return Err(self.invalid("discard"));
        }
        self.state = State::Discarded;
        info!("event=capture_flow_discard module=flow status=ok");
        Ok(())
    }

    fn draft(&self) -> Option<&Draft> {
        match &self.state {
            State::Composing(draft) => Some(draft),
            _ => None,
        }
    }

    fn draft_mut(&mut self, action: &'static str) -> Result<&mut Draft, FlowError> {
        let state = self.state();
        match &mut self.state {
            State::Composing(draft) => Ok(draft),
            _ => Err(FlowError::InvalidTransition { state, action }),
        }
    }

    fn invalid(&self, action: &'static str) -> FlowError {
        FlowError::InvalidTransition {
            state: self.state(),
            action,
        }
    }
}
