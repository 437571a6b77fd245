//! Repository layer for capture persistence.
//!
//! # Responsibility
//! - Define the capture store contract used by services and the flow.
//! - Keep SQLite query details out of service orchestration.
//!
//! # Invariants
//! - Writes call `Capture::validate()` before any SQL mutation.
//! - Reads reject invalid persisted rows instead of masking them.

pub mod capture_repo;
