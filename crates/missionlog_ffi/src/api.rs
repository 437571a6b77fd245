//! FFI use-case API for the mobile UI shell.
//!
//! # Responsibility
//! - Expose journal, dashboard and capture-save calls to the UI via FRB.
//! - Validate user selections (emotion tokens) at the boundary.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures are reported in response envelopes, never thrown.
//! - All calls share one process-wide database path.

use chrono::Local;
use missionlog_core::db::open_db;
use missionlog_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    mission_catalog as mission_catalog_inner, ping as ping_inner, CaptureCard, CaptureFlow,
    CaptureId, CaptureRepository, Emotion, FeedService, FlowError, SqliteCaptureRepository,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "missionlog.sqlite3";
const DB_PATH_ENV: &str = "MISSIONLOG_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and an error message otherwise.
/// Repeating the call with the same `level + log_dir` is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the capture database location for this process.
///
/// Must run before the first store call to take effect. Returns an empty
/// string on success, or an error message when a different path is already
/// active.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "db path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "db path already configured at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// Mission offered on the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionItem {
    pub title: String,
    pub image_name: String,
    /// Headline such as `Capture something Square today!`.
    pub prompt: String,
}

/// Feed card with display fallbacks already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureCardItem {
    pub capture_id: String,
    pub title: String,
    pub mission: String,
    pub note: String,
    pub emoji: String,
    pub emotion: String,
    pub steps: String,
    pub has_image: bool,
    /// Creation time in epoch milliseconds.
    pub created_at_ms: i64,
}

/// One cell of the home day strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayStripItem {
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    pub day_of_month: u32,
    pub weekday: String,
    pub is_completed: bool,
    pub is_selected: bool,
}

/// Home dashboard envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardResponse {
    pub ok: bool,
    pub streak: u32,
    pub days: Vec<DayStripItem>,
    pub message: String,
}

/// Feed envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureFeedResponse {
    pub ok: bool,
    pub items: Vec<CaptureCardItem>,
    pub message: String,
}

/// Generic action envelope for write calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureActionResponse {
    pub ok: bool,
    /// Created capture id, when the action created one.
    pub capture_id: Option<String>,
    pub message: String,
}

impl CaptureActionResponse {
    fn success(message: impl Into<String>, capture_id: Option<String>) -> Self {
        Self {
            ok: true,
            capture_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            capture_id: None,
            message: message.into(),
        }
    }
}

/// Lists the selectable missions.
#[flutter_rust_bridge::frb(sync)]
pub fn mission_catalog() -> Vec<MissionItem> {
    mission_catalog_inner()
        .iter()
        .map(|mission| MissionItem {
            title: mission.title.to_string(),
            image_name: mission.image_name.to_string(),
            prompt: mission.prompt(),
        })
        .collect()
}

/// Saves one mission capture.
///
/// `emoji` must be one of the six palette tokens when present; `photo`
/// holds raw camera bytes and is cropped and compressed before storage.
/// A blank `mission` is saved under the default mission.
#[flutter_rust_bridge::frb(sync)]
pub fn capture_save(
    mission: String,
    note: String,
    emoji: Option<String>,
    photo: Option<Vec<u8>>,
) -> CaptureActionResponse {
    let emotion = match emoji.as_deref() {
        Some(token) => match Emotion::from_token(token) {
            Some(emotion) => Some(emotion),
            None => {
                return CaptureActionResponse::failure(format!(
                    "capture_save failed: unsupported emotion `{token}`"
                ))
            }
        },
        None => None,
    };

    let result = with_capture_repo(|repo| {
        save_mission_capture(repo, &mission, note, emotion, photo.as_deref())
            .map_err(|err| err.to_string())
    });

    match result {
        Ok(id) => CaptureActionResponse::success("Capture saved.", Some(id.to_string())),
        Err(err) => CaptureActionResponse::failure(format!("capture_save failed: {err}")),
    }
}

/// Returns every capture, most recent first.
#[flutter_rust_bridge::frb(sync)]
pub fn capture_feed() -> CaptureFeedResponse {
    let result = with_capture_repo(|repo| {
        FeedService::new(repo)
            .feed_cards()
            .map_err(|err| err.to_string())
    });

    match result {
        Ok(cards) => {
            let message = if cards.is_empty() {
                "No captures yet. Create one from Today's Mission.".to_string()
            } else {
                format!("{} capture(s).", cards.len())
            };
            CaptureFeedResponse {
                ok: true,
                items: cards.into_iter().map(to_card_item).collect(),
                message,
            }
        }
        Err(err) => CaptureFeedResponse {
            ok: false,
            items: Vec::new(),
            message: format!("capture_feed failed: {err}"),
        },
    }
}

/// Builds the home dashboard for today on the device calendar.
#[flutter_rust_bridge::frb(sync)]
pub fn home_dashboard() -> DashboardResponse {
    let today = Local::now().date_naive();
    let result = with_capture_repo(|repo| {
        FeedService::new(repo)
            .dashboard(today)
            .map_err(|err| err.to_string())
    });

    match result {
        Ok(dashboard) => DashboardResponse {
            ok: true,
            streak: dashboard.streak,
            days: dashboard
                .day_strip
                .into_iter()
                .map(|day| DayStripItem {
                    date: day.date.format("%Y-%m-%d").to_string(),
                    day_of_month: day.day_of_month,
                    weekday: day.weekday,
                    is_completed: day.is_completed,
                    is_selected: day.is_selected,
                })
                .collect(),
            message: String::new(),
        },
        Err(err) => DashboardResponse {
            ok: false,
            streak: 0,
            days: Vec::new(),
            message: format!("home_dashboard failed: {err}"),
        },
    }
}

/// Deletes every capture. The UI must confirm with the user first.
#[flutter_rust_bridge::frb(sync)]
pub fn captures_reset() -> CaptureActionResponse {
    match with_capture_repo(|repo| repo.delete_all_captures().map_err(|err| err.to_string())) {
        Ok(removed) => CaptureActionResponse::success(format!("Removed {removed} capture(s)."), None),
        Err(err) => CaptureActionResponse::failure(format!("captures_reset failed: {err}")),
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_capture_repo<T>(
    f: impl FnOnce(&SqliteCaptureRepository<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("capture DB open failed: {err}"))?;
    let repo = SqliteCaptureRepository::try_new(&conn)
        .map_err(|err| format!("capture repo init failed: {err}"))?;
    f(&repo)
}

fn save_mission_capture(
    repo: &SqliteCaptureRepository<'_>,
    mission: &str,
    note: String,
    emotion: Option<Emotion>,
    photo: Option<&[u8]>,
) -> Result<CaptureId, FlowError> {
    let mut flow = CaptureFlow::new();
    flow.begin(mission)?;
    flow.set_note(note)?;
    if let Some(emotion) = emotion {
        flow.select_emotion(emotion)?;
    }
    if let Some(bytes) = photo {
        flow.attach_photo(bytes)?;
    }
    flow.save(repo)
}

fn to_card_item(card: CaptureCard) -> CaptureCardItem {
    CaptureCardItem {
        capture_id: card.id.to_string(),
        title: card.title,
        mission: card.mission,
        note: card.note,
        emoji: card.emoji,
        emotion: card.emotion.to_string(),
        steps: card.steps,
        has_image: card.has_image,
        created_at_ms: card.created_at.timestamp_millis(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        capture_feed, capture_save, core_version, home_dashboard, init_logging, mission_catalog,
        ping,
    };

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn mission_catalog_includes_prompts() {
        let missions = mission_catalog();
        assert_eq!(missions.len(), 4);
        assert_eq!(missions[0].prompt, "Capture something Square today!");
    }

    #[test]
    fn capture_save_rejects_unknown_emotion() {
        let response = capture_save(
            "Square".to_string(),
            "note".to_string(),
            Some("🐸".to_string()),
            None,
        );
        assert!(!response.ok);
        assert!(response.message.contains("unsupported emotion"));
    }

    #[test]
    fn capture_save_rejects_empty_emotion_token() {
        let response = capture_save(
            "Square".to_string(),
            "note".to_string(),
            Some(String::new()),
            None,
        );
        assert!(!response.ok);
        assert!(response.message.contains("unsupported emotion"));
        assert!(response.capture_id.is_none());
    }

    #[test]
    fn blank_mission_is_saved_under_default_mission() {
        for mission in [String::new(), "   ".to_string()] {
            let response = capture_save(mission, String::new(), None, None);
            assert!(response.ok, "{}", response.message);
            let capture_id = response.capture_id.expect("save should return capture_id");

            let feed = capture_feed();
            assert!(feed.ok, "{}", feed.message);
            let card = feed
                .items
                .iter()
                .find(|item| item.capture_id == capture_id)
                .expect("saved capture should be listed");
            assert_eq!(card.title, "Default");
            assert_eq!(card.mission, "Default");
        }
    }

    #[test]
    fn capture_save_rejects_undecodable_photo() {
        let response = capture_save(
            "Square".to_string(),
            String::new(),
            None,
            Some(b"not a photo".to_vec()),
        );
        assert!(!response.ok);
        assert!(response.capture_id.is_none());
    }

    #[test]
    fn saved_capture_appears_in_feed_with_fallbacks() {
        let response = capture_save(
            "Triangle".to_string(),
            "   ".to_string(),
            Some("😡".to_string()),
            None,
        );
        assert!(response.ok, "{}", response.message);
        let capture_id = response.capture_id.expect("save should return capture_id");

        let feed = capture_feed();
        assert!(feed.ok, "{}", feed.message);
        let card = feed
            .items
            .iter()
            .find(|item| item.capture_id == capture_id)
            .expect("saved capture should be listed");
        assert_eq!(card.title, "Triangle");
        assert_eq!(card.mission, "Triangle");
        assert_eq!(card.note, "No note yet.");
        assert_eq!(card.emotion, "upset");
        assert_eq!(card.steps, "—");
    }

    #[test]
    fn home_dashboard_has_seven_days_and_one_selected() {
        let dashboard = home_dashboard();
        assert!(dashboard.ok, "{}", dashboard.message);
        assert_eq!(dashboard.days.len(), 7);
        assert_eq!(dashboard.days.iter().filter(|day| day.is_selected).count(), 1);
        assert!(dashboard.days[0].is_completed);
        assert!(dashboard.streak == 25 || dashboard.streak == 26);
    }
}
