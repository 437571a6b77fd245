//! Domain model for daily mission captures.
//!
//! # Responsibility
//! - Define the canonical capture record persisted by core.
//! - Define the closed emotion palette and mission catalog used at input
//!   boundaries.
//!
//! # Invariants
//! - Every capture is identified by a stable `CaptureId`.
//! - Captures are never updated in place; deletion is the only mutation.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod capture;
pub mod emotion;
pub mod mission;
