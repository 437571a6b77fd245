//! Use-case services over the capture store.
//!
//! # Responsibility
//! - `capture_flow`: the write path for one mission attempt.
//! - `feed_service`: read-side feed, day-strip and streak queries.

pub mod capture_flow;
pub mod feed_service;
