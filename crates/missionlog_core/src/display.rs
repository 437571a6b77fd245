//! Derived display text for captures.
//!
//! Every function here is pure and total. Fallbacks are computed on read
//! and never persisted, so the stored record stays minimal.

use crate::model::capture::{Capture, CaptureId};
use crate::model::emotion::Emotion;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const UNTITLED_CAPTURE: &str = "Untitled Capture";
pub const EMPTY_NOTE: &str = "No note yet.";
pub const DEFAULT_EMOJI: &str = "🙂";
pub const DEFAULT_MISSION_LABEL: &str = "Mission";
pub const NO_EMOTION_LABEL: &str = "none selected";
pub const NO_STEPS: &str = "—";

pub fn display_title(capture: &Capture) -> &str {
    if capture.title.is_empty() {
        UNTITLED_CAPTURE
    } else {
        capture.title.as_str()
    }
}

pub fn display_note(capture: &Capture) -> &str {
    match capture.note.as_deref().map(str::trim) {
        Some(note) if !note.is_empty() => note,
        _ => EMPTY_NOTE,
    }
}

pub fn display_emoji(capture: &Capture) -> &str {
    capture.emoji.as_deref().unwrap_or(DEFAULT_EMOJI)
}

/// Mission name, falling back to the title and then a generic label.
pub fn display_mission(capture: &Capture) -> &str {
    match capture.mission.as_deref().map(str::trim) {
        Some(mission) if !mission.is_empty() => mission,
        _ if !capture.title.is_empty() => capture.title.as_str(),
        _ => DEFAULT_MISSION_LABEL,
    }
}

/// Semantic word for an emoji token; unknown or missing maps to
/// `"none selected"`.
pub fn emotion_label(emoji: Option<&str>) -> &'static str {
    emoji
        .and_then(Emotion::from_token)
        .map_or(NO_EMOTION_LABEL, Emotion::label)
}

pub fn steps_text(steps: Option<u32>) -> String {
    match steps {
        Some(count) if count > 0 => count.to_string(),
        _ => NO_STEPS.to_string(),
    }
}

/// Feed card projection with every fallback already applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureCard {
    pub id: CaptureId,
    pub title: String,
    pub mission: String,
    pub note: String,
    pub emoji: String,
    pub emotion: &'static str,
    pub steps: String,
    pub has_image: bool,
    pub created_at: DateTime<Utc>,
}

impl CaptureCard {
    pub fn from_capture(capture: &Capture) -> Self {
        Self {
            id: capture.id,
            title: display_title(capture).to_string(),
            mission: display_mission(capture).to_string(),
            note: display_note(capture).to_string(),
            emoji: display_emoji(capture).to_string(),
            emotion: emotion_label(capture.emoji.as_deref()),
            steps: steps_text(capture.steps),
            has_image: capture.has_image(),
            created_at: capture.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(title: &str) -> Capture {
        Capture::new(title)
    }

    #[test]
    fn title_falls_back_only_when_empty() {
        assert_eq!(display_title(&capture("")), "Untitled Capture");
        assert_eq!(display_title(&capture(" ")), " ");
        assert_eq!(display_title(&capture("Square")), "Square");
    }

    #[test]
    fn note_is_trimmed_and_blank_notes_fall_back() {
        let mut item = capture("Square");
        assert_eq!(display_note(&item), "No note yet.");

        item.note = Some(" \n\t".to_string());
        assert_eq!(display_note(&item), "No note yet.");

        item.note = Some("  flower pot by the corner \n".to_string());
        assert_eq!(display_note(&item), "flower pot by the corner");
    }

    #[test]
    fn emoji_defaults_to_neutral_face() {
        let mut item = capture("Square");
        assert_eq!(display_emoji(&item), "🙂");
        item.emoji = Some("😡".to_string());
        assert_eq!(display_emoji(&item), "😡");
    }

    #[test]
    fn mission_falls_back_to_title_then_placeholder() {
        let mut item = capture("");
        assert_eq!(display_mission(&item), "Mission");

        item.title = "Triangle".to_string();
        item.mission = Some("   ".to_string());
        assert_eq!(display_mission(&item), "Triangle");

        item.mission = Some(" Square ".to_string());
        assert_eq!(display_mission(&item), "Square");
    }

    #[test]
    fn emotion_label_covers_palette_and_unknowns() {
        let expected = [
            ("😄", "happy"),
            ("😰", "anxious"),
            ("🙂", "neutral"),
            ("🙁", "unhappy"),
            ("😡", "upset"),
            ("😬", "awkward"),
        ];
        for (token, label) in expected {
            assert_eq!(emotion_label(Some(token)), label, "token {token}");
        }
        assert_eq!(emotion_label(None), "none selected");
        assert_eq!(emotion_label(Some("🤖")), "none selected");
        assert_eq!(emotion_label(Some("")), "none selected");
    }

    #[test]
    fn steps_text_requires_positive_count() {
        assert_eq!(steps_text(Some(4120)), "4120");
        assert_eq!(steps_text(Some(1)), "1");
        assert_eq!(steps_text(Some(0)), "—");
        assert_eq!(steps_text(None), "—");
    }

    #[test]
    fn card_applies_every_fallback() {
        let card = CaptureCard::from_capture(&capture(""));
        assert_eq!(card.title, "Untitled Capture");
        assert_eq!(card.mission, "Mission");
        assert_eq!(card.note, "No note yet.");
        assert_eq!(card.emoji, "🙂");
        assert_eq!(card.emotion, "none selected");
        assert_eq!(card.steps, "—");
        assert!(!card.has_image);
    }
}
