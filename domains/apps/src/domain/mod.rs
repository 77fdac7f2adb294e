//! Domain layer for the Apps domain

pub mod entities;
