//! SQLite 저장소.

pub mod profits;
pub mod report;
pub mod sqlite;
