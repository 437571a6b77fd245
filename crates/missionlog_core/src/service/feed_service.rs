//! Read-side queries for the journal feed and home dashboard.
//!
//! # Responsibility
//! - List captures most-recent-first and project them into feed cards.
//! - Answer local-calendar questions ("any capture on this day?") from
//!   capture timestamps alone; photo blobs are never loaded for them.
//! - Build the fixed 7-day strip anchored on a reference day.
//!
//! # Invariants
//! - Day membership is decided in the caller's time zone (`Local` by
//!   default), never in UTC.
//! - The strip always spans `reference - 1 ..= reference + 5`.
//! - The day before `reference` is always shown completed and `reference`
//!   is completed when any capture exists at all. Both rules are
//!   placeholders carried over from the shipped dashboard, as is the
//!   25/26 streak counter.

use crate::display::CaptureCard;
use crate::model::capture::Capture;
use crate::repo::capture_repo::{CaptureRepository, RepoResult};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;

/// Streak shown before the first capture exists.
pub const STREAK_BASE: u32 = 25;
const WINDOW_DAYS_BEFORE: i64 = 1;
const WINDOW_DAYS_AFTER: i64 = 5;

/// One cell of the home-screen day strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayStripEntry {
    pub date: NaiveDate,
    pub day_of_month: u32,
    /// Short English weekday (`Mon`..`Sun`).
    pub weekday: String,
    pub is_completed: bool,
    /// True only for the reference day.
    pub is_selected: bool,
}

/// Home dashboard read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub streak: u32,
    pub day_strip: Vec<DayStripEntry>,
    pub capture_count: usize,
}

/// Returns the strip dates, ascending, from the day before `reference`
/// through five days after it.
///
/// Dates past the end of the supported calendar are skipped.
pub fn window_days(reference: NaiveDate) -> Vec<NaiveDate> {
    (-WINDOW_DAYS_BEFORE..=WINDOW_DAYS_AFTER)
        .filter_map(|offset| reference.checked_add_signed(Duration::days(offset)))
        .collect()
}

/// Completion policy for one strip cell.
pub fn day_completion_status(
    date: NaiveDate,
    reference: NaiveDate,
    has_any_captures: bool,
    has_capture_on_date: bool,
) -> bool {
    if reference.pred_opt() == Some(date) {
        return true;
    }
    if date == reference {
        return has_any_captures;
    }
    has_capture_on_date
}

/// Placeholder streak counter: 25 before the first capture, 26 after.
pub fn streak_count(has_captures: bool) -> u32 {
    if has_captures {
        STREAK_BASE + 1
    } else {
        STREAK_BASE
    }
}

/// Returns whether any of `times` falls on `date` in `tz`.
pub fn times_include_date<Tz: TimeZone>(
    times: &[DateTime<Utc>],
    date: NaiveDate,
    tz: &Tz,
) -> bool {
    times
        .iter()
        .any(|created_at| created_at.with_timezone(tz).date_naive() == date)
}

/// Builds the day strip from one snapshot of capture times.
pub fn build_day_strip<Tz: TimeZone>(
    times: &[DateTime<Utc>],
    reference: NaiveDate,
    tz: &Tz,
) -> Vec<DayStripEntry> {
    let has_any_captures = !times.is_empty();
    window_days(reference)
        .into_iter()
        .map(|date| {
            let on_date = times_include_date(times, date, tz);
            DayStripEntry {
                date,
                day_of_month: date.day(),
                weekday: date.format("%a").to_string(),
                is_completed: day_completion_status(date, reference, has_any_captures, on_date),
                is_selected: date == reference,
            }
        })
        .collect()
}

/// Feed and dashboard queries over a capture repository.
pub struct FeedService<R: CaptureRepository> {
    repo: R,
}

impl<R: CaptureRepository> FeedService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// All captures, most recent first. Equal timestamps keep insertion
    /// order.
    pub fn list_reverse_chronological(&self) -> RepoResult<Vec<Capture>> {
        self.repo.list_captures()
    }

    /// Feed listing with display fallbacks applied.
    pub fn feed_cards(&self) -> RepoResult<Vec<CaptureCard>> {
        Ok(self
            .repo
            .list_captures()?
            .iter()
            .map(CaptureCard::from_capture)
            .collect())
    }

    /// Local-calendar variant of [`Self::has_capture_on_date_in`].
    pub fn has_capture_on_date(&self, date: NaiveDate) -> RepoResult<bool> {
        self.has_capture_on_date_in(date, &Local)
    }

    pub fn has_capture_on_date_in<Tz: TimeZone>(
        &self,
        date: NaiveDate,
        tz: &Tz,
    ) -> RepoResult<bool> {
        let times = self.repo.list_capture_times()?;
        Ok(times_include_date(&times, date, tz))
    }

    pub fn day_completion_status_in<Tz: TimeZone>(
        &self,
        date: NaiveDate,
        reference: NaiveDate,
        tz: &Tz,
    ) -> RepoResult<bool> {
        let times = self.repo.list_capture_times()?;
        Ok(day_completion_status(
            date,
            reference,
            !times.is_empty(),
            times_include_date(&times, date, tz),
        ))
    }

    /// Current streak placeholder.
    pub fn streak(&self) -> RepoResult<u32> {
        Ok(streak_count(self.repo.count_captures()? > 0))
    }

    pub fn day_strip(&self, reference: NaiveDate) -> RepoResult<Vec<DayStripEntry>> {
        self.day_strip_in(reference, &Local)
    }

    pub fn day_strip_in<Tz: TimeZone>(
        &self,
        reference: NaiveDate,
        tz: &Tz,
    ) -> RepoResult<Vec<DayStripEntry>> {
        let times = self.repo.list_capture_times()?;
        Ok(build_day_strip(&times, reference, tz))
    }

    pub fn dashboard(&self, reference: NaiveDate) -> RepoResult<Dashboard> {
        self.dashboard_in(reference, &Local)
    }

    /// Streak, strip and count computed from a single snapshot.
    pub fn dashboard_in<Tz: TimeZone>(
        &self,
        reference: NaiveDate,
        tz: &Tz,
    ) -> RepoResult<Dashboard> {
        let times = self.repo.list_capture_times()?;
        Ok(Dashboard {
            streak: streak_count(!times.is_empty()),
            day_strip: build_day_strip(&times, reference, tz),
            capture_count: times.len(),
        })
    }
}
