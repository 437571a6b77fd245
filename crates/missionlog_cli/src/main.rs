//! CLI smoke and inspection entry point.
//!
//! # Responsibility
//! - Verify `missionlog_core` linkage with a deterministic ping/version probe.
//! - Given a database path, print today's day strip and the capture feed.

use chrono::Local;
use missionlog_core::db::open_db;
use missionlog_core::{FeedService, SqliteCaptureRepository};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("missionlog_core ping={}", missionlog_core::ping());
    println!("missionlog_core version={}", missionlog_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match print_journal(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("missionlog: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_journal(db_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(db_path)?;
    let service = FeedService::new(SqliteCaptureRepository::try_new(&conn)?);
    let dashboard = service.dashboard(Local::now().date_naive())?;

    println!("streak={} captures={}", dashboard.streak, dashboard.capture_count);
    for day in &dashboard.day_strip {
        println!(
            "{}{:>3} {} {}",
            if day.is_selected { '>' } else { ' ' },
            day.day_of_month,
            day.weekday,
            if day.is_completed { "done" } else { "-" }
        );
    }

    for card in service.feed_cards()? {
        println!(
            "{} | {} | {} {} | steps {} | {}",
            card.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            card.mission,
            card.emoji,
            card.emotion,
            card.steps,
            card.note
        );
    }
    Ok(())
}
