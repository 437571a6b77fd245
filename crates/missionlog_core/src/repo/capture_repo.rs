//! Capture store contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert, list and bulk-delete capture records.
//! - Verify a connection carries the capture schema before use.
//!
//! # Invariants
//! - Listing order is `created_at DESC`, ties in insertion order.
//! - There is no update path; `delete_all_captures` is the only removal.
//! - Results are owned snapshots; later writes never alter a returned `Vec`.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::capture::{Capture, CaptureId, CaptureValidationError};
use chrono::{DateTime, Utc};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

const CAPTURE_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    mission,
    note,
    emoji,
    steps,
    image,
    created_at
FROM captures";

const REQUIRED_COLUMNS: &[&str] = &[
    "seq",
    "uuid",
    "title",
    "mission",
    "note",
    "emoji",
    "steps",
    "image",
    "created_at",
];

pub type RepoResult<T> = Result<T, PersistenceError>;

/// Failure reading or writing the capture store.
#[derive(Debug)]
pub enum PersistenceError {
    Validation(CaptureValidationError),
    Db(DbError),
    NotFound(CaptureId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "capture not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted capture data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CaptureValidationError> for PersistenceError {
    fn from(value: CaptureValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for PersistenceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Capture store operations.
pub trait CaptureRepository {
    /// Persists a new capture and returns its id.
    fn create_capture(&self, capture: &Capture) -> RepoResult<CaptureId>;
    /// Gets one capture by id.
    fn get_capture(&self, id: CaptureId) -> RepoResult<Option<Capture>>;
    /// Returns every capture, most recent first.
    fn list_captures(&self) -> RepoResult<Vec<Capture>>;
    /// Returns every `created_at`, in `list_captures` order, without loading
    /// record bodies.
    fn list_capture_times(&self) -> RepoResult<Vec<DateTime<Utc>>>;
    /// Returns the number of stored captures.
    fn count_captures(&self) -> RepoResult<u64>;
    /// Removes every capture and returns how many were removed.
    fn delete_all_captures(&self) -> RepoResult<usize>;
}

impl<R: CaptureRepository + ?Sized> CaptureRepository for &R {
    fn create_capture(&self, capture: &Capture) -> RepoResult<CaptureId> {
        (**self).create_capture(capture)
    }

    fn get_capture(&self, id: CaptureId) -> RepoResult<Option<Capture>> {
        (**self).get_capture(id)
    }

    fn list_captures(&self) -> RepoResult<Vec<Capture>> {
        (**self).list_captures()
    }

    fn list_capture_times(&self) -> RepoResult<Vec<DateTime<Utc>>> {
        (**self).list_capture_times()
    }

    fn count_captures(&self) -> RepoResult<u64> {
        (**self).count_captures()
    }

    fn delete_all_captures(&self) -> RepoResult<usize> {
        (**self).delete_all_captures()
    }
}

/// SQLite-backed capture store.
pub struct SqliteCaptureRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCaptureRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema was
    ///   tampered with after migration.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CaptureRepository for SqliteCaptureRepository<'_> {
    fn create_capture(&self, capture: &Capture) -> RepoResult<CaptureId> {
        capture.validate()?;

        let result = self.conn.execute(
            "INSERT INTO captures (
                uuid,
                title,
                mission,
                note,
                emoji,
                steps,
                image,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                capture.id.to_string(),
                capture.title.as_str(),
                capture.mission.as_deref(),
                capture.note.as_deref(),
                capture.emoji.as_deref(),
                capture.steps.map(i64::from),
                capture.image.as_deref(),
                capture.created_at.timestamp_millis(),
            ],
        );

        match result {
            Ok(_) => {
                info!(
                    "event=capture_create module=repo status=ok capture_id={} has_image={}",
                    capture.id,
                    capture.has_image()
                );
                Ok(capture.id)
            }
            Err(err) => {
                error!(
                    "event=capture_create module=repo status=error capture_id={} error={}",
                    capture.id, err
                );
                Err(err.into())
            }
        }
    }

    fn get_capture(&self, id: CaptureId) -> RepoResult<Option<Capture>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CAPTURE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_capture_row(row)?));
        }

        Ok(None)
    }

    fn list_captures(&self) -> RepoResult<Vec<Capture>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CAPTURE_SELECT_SQL} ORDER BY created_at DESC, seq ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut captures = Vec::new();
        while let Some(row) = rows.next()? {
            captures.push(parse_capture_row(row)?);
        }

        Ok(captures)
    }

    fn list_capture_times(&self) -> RepoResult<Vec<DateTime<Utc>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT created_at FROM captures ORDER BY created_at DESC, seq ASC;")?;
        let mut rows = stmt.query([])?;
        let mut times = Vec::new();
        while let Some(row) = rows.next()? {
            times.push(parse_created_at(row.get("created_at")?)?);
        }

        Ok(times)
    }

    fn count_captures(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM captures;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| PersistenceError::InvalidData(format!("negative row count `{count}`")))
    }

    fn delete_all_captures(&self) -> RepoResult<usize> {
        let started_at = Instant::now();
        match self.conn.execute("DELETE FROM captures;", []) {
            Ok(removed) => {
                info!(
                    "event=capture_delete_all module=repo status=ok removed={} duration_ms={}",
                    removed,
                    started_at.elapsed().as_millis()
                );
                Ok(removed)
            }
            Err(err) => {
                error!(
                    "event=capture_delete_all module=repo status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(PersistenceError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'captures';",
            [],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if !table_exists {
        return Err(PersistenceError::MissingRequiredTable("captures"));
    }

    let mut stmt = conn.prepare("PRAGMA table_info(captures);")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    for column in REQUIRED_COLUMNS {
        if !columns.iter().any(|name| name == column) {
            return Err(PersistenceError::MissingRequiredColumn {
                table: "captures",
                column: *column,
            });
        }
    }

    Ok(())
}

fn parse_capture_row(row: &Row<'_>) -> RepoResult<Capture> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        PersistenceError::InvalidData(format!("invalid uuid value `{uuid_text}` in captures.uuid"))
    })?;

    let steps = match row.get::<_, Option<i64>>("steps")? {
        Some(value) => Some(u32::try_from(value).map_err(|_| {
            PersistenceError::InvalidData(format!("invalid step count `{value}` in captures.steps"))
        })?),
        None => None,
    };

    let created_at = parse_created_at(row.get("created_at")?)?;

    let mut capture = Capture::with_id(id, row.get::<_, String>("title")?, created_at)?;
    capture.mission = row.get("mission")?;
    capture.note = row.get("note")?;
    capture.emoji = row.get("emoji")?;
    capture.steps = steps;
    capture.image = row.get("image")?;
    Ok(capture)
}

fn parse_created_at(created_ms: i64) -> RepoResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(created_ms).ok_or_else(|| {
        PersistenceError::InvalidData(format!(
            "invalid timestamp `{created_ms}` in captures.created_at"
        ))
    })
}
