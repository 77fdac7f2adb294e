//! HTTP handlers for the Apps domain

pub mod installations;
