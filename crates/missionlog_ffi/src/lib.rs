//! Mobile-facing bridge over `missionlog_core`.

pub mod api;
