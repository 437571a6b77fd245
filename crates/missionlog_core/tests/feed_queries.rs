use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use missionlog_core::db::open_db_in_memory;
use missionlog_core::{
    display_mission, emotion_label, window_days, Capture, CaptureId, CaptureRepository,
    FeedService, PersistenceError, RepoResult, SqliteCaptureRepository,
};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn capture_at(title: &str, created_at: DateTime<Utc>) -> Capture {
    Capture::with_id(Uuid::new_v4(), title, created_at).unwrap()
}

fn plus_ten() -> FixedOffset {
    FixedOffset::east_opt(10 * 3600).unwrap()
}

/// Store stub that only knows capture times; full record reads fail.
struct TimesOnlyRepo {
    times: Vec<DateTime<Utc>>,
}

impl CaptureRepository for TimesOnlyRepo {
    fn create_capture(&self, capture: &Capture) -> RepoResult<CaptureId> {
        Ok(capture.id)
    }

    fn get_capture(&self, _id: CaptureId) -> RepoResult<Option<Capture>> {
        Err(record_read_error())
    }

    fn list_captures(&self) -> RepoResult<Vec<Capture>> {
        Err(record_read_error())
    }

    fn list_capture_times(&self) -> RepoResult<Vec<DateTime<Utc>>> {
        Ok(self.times.clone())
    }

    fn count_captures(&self) -> RepoResult<u64> {
        Ok(self.times.len() as u64)
    }

    fn delete_all_captures(&self) -> RepoResult<usize> {
        Ok(0)
    }
}

fn record_read_error() -> PersistenceError {
    PersistenceError::InvalidData("record bodies are not readable".to_string())
}

#[test]
fn streak_moves_from_base_after_first_capture() {
    let conn = open_db_in_memory().unwrap();
    let service = FeedService::new(SqliteCaptureRepository::try_new(&conn).unwrap());
    assert_eq!(service.streak().unwrap(), 25);

    let repo = SqliteCaptureRepository::try_new(&conn).unwrap();
    repo.create_capture(&Capture::new("Square")).unwrap();
    assert_eq!(service.streak().unwrap(), 26);

    repo.create_capture(&Capture::new("Triangle")).unwrap();
    assert_eq!(service.streak().unwrap(), 26);
}

#[test]
fn has_capture_on_date_uses_given_calendar() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCaptureRepository::try_new(&conn).unwrap();
    repo.create_capture(&capture_at("late", utc(2025, 8, 26, 15)))
        .unwrap();
    let service = FeedService::new(repo);

    assert!(service
        .has_capture_on_date_in(date(2025, 8, 26), &Utc)
        .unwrap());
    assert!(!service
        .has_capture_on_date_in(date(2025, 8, 27), &Utc)
        .unwrap());

    assert!(!service
        .has_capture_on_date_in(date(2025, 8, 26), &plus_ten())
        .unwrap());
    assert!(service
        .has_capture_on_date_in(date(2025, 8, 27), &plus_ten())
        .unwrap());
}

#[test]
fn empty_store_has_no_capture_on_any_date() {
    let conn = open_db_in_memory().unwrap();
    let service = FeedService::new(SqliteCaptureRepository::try_new(&conn).unwrap());
    assert!(!service.has_capture_on_date(date(2025, 8, 26)).unwrap());
}

#[test]
fn day_strip_on_empty_store_only_marks_yesterday() {
    let conn = open_db_in_memory().unwrap();
    let service = FeedService::new(SqliteCaptureRepository::try_new(&conn).unwrap());

    let strip = service.day_strip_in(date(2025, 8, 26), &Utc).unwrap();
    assert_eq!(strip.len(), 7);

    let completed: Vec<_> = strip.iter().map(|day| day.is_completed).collect();
    assert_eq!(completed, [true, false, false, false, false, false, false]);

    let selected: Vec<_> = strip.iter().filter(|day| day.is_selected).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].date, date(2025, 8, 26));

    let labels: Vec<_> = strip
        .iter()
        .map(|day| (day.day_of_month, day.weekday.as_str()))
        .collect();
    assert_eq!(
        labels,
        [
            (25, "Mon"),
            (26, "Tue"),
            (27, "Wed"),
            (28, "Thu"),
            (29, "Fri"),
            (30, "Sat"),
            (31, "Sun"),
        ]
    );
}

#[test]
fn today_is_completed_by_any_capture_and_future_days_by_date_match() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCaptureRepository::try_new(&conn).unwrap();
    // An old capture outside the window still completes "today".
    repo.create_capture(&capture_at("old", utc(2025, 7, 1, 9)))
        .unwrap();
    repo.create_capture(&capture_at("ahead", utc(2025, 8, 28, 9)))
        .unwrap();
    let service = FeedService::new(repo);

    let reference = date(2025, 8, 26);
    let strip = service.day_strip_in(reference, &Utc).unwrap();
    let completed: Vec<_> = strip.iter().map(|day| day.is_completed).collect();
    assert_eq!(completed, [true, true, false, true, false, false, false]);

    assert!(service
        .day_completion_status_in(date(2025, 8, 28), reference, &Utc)
        .unwrap());
    assert!(!service
        .day_completion_status_in(date(2025, 8, 29), reference, &Utc)
        .unwrap());
}

#[test]
fn dashboard_reads_one_consistent_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCaptureRepository::try_new(&conn).unwrap();
    repo.create_capture(&capture_at("today", utc(2025, 8, 26, 9)))
        .unwrap();
    let service = FeedService::new(repo);

    let dashboard = service.dashboard_in(date(2025, 8, 26), &Utc).unwrap();
    assert_eq!(dashboard.streak, 26);
    assert_eq!(dashboard.capture_count, 1);
    assert_eq!(
        dashboard.day_strip.iter().map(|day| day.date).collect::<Vec<_>>(),
        window_days(date(2025, 8, 26))
    );
}

#[test]
fn feed_cards_follow_listing_order_with_fallbacks() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCaptureRepository::try_new(&conn).unwrap();

    let mut older = capture_at("", utc(2025, 8, 25, 9));
    older.emoji = Some("😡".to_string());
    let mut newer = capture_at("Square", utc(2025, 8, 26, 9));
    newer.note = Some("  pot  ".to_string());
    newer.steps = Some(0);
    repo.create_capture(&older).unwrap();
    repo.create_capture(&newer).unwrap();
    let service = FeedService::new(repo);

    let listed = service.list_reverse_chronological().unwrap();
    assert_eq!(listed[0].id, newer.id);
    assert_eq!(emotion_label(listed[1].emoji.as_deref()), "upset");
    assert_eq!(display_mission(&listed[1]), "Mission");

    let cards = service.feed_cards().unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].title, "Square");
    assert_eq!(cards[0].note, "pot");
    assert_eq!(cards[0].steps, "—");
    assert_eq!(cards[1].title, "Untitled Capture");
    assert_eq!(cards[1].emotion, "upset");
}

#[test]
fn delete_all_resets_feed_and_streak() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCaptureRepository::try_new(&conn).unwrap();
    repo.create_capture(&Capture::new("Square")).unwrap();
    repo.delete_all_captures().unwrap();

    let service = FeedService::new(repo);
    assert!(service.list_reverse_chronological().unwrap().is_empty());
    assert_eq!(service.streak().unwrap(), 25);
}

#[test]
fn calendar_queries_read_capture_times_only() {
    let service = FeedService::new(TimesOnlyRepo {
        times: vec![utc(2025, 8, 28, 9), utc(2025, 8, 26, 9)],
    });
    let today = date(2025, 8, 26);

    assert!(service.has_capture_on_date_in(today, &Utc).unwrap());
    assert!(service
        .day_completion_status_in(date(2025, 8, 28), today, &Utc)
        .unwrap());

    let dashboard = service.dashboard_in(today, &Utc).unwrap();
    assert_eq!(dashboard.capture_count, 2);
    assert_eq!(dashboard.streak, 26);
    let completed: Vec<_> = dashboard
        .day_strip
        .iter()
        .map(|day| day.is_completed)
        .collect();
    assert_eq!(completed, [true, true, false, true, false, false, false]);
    assert_eq!(service.day_strip_in(today, &Utc).unwrap(), dashboard.day_strip);

    assert!(service.feed_cards().is_err());
}
