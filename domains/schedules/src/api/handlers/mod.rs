//! HTTP handlers for the Schedules domain

pub mod schedules;
