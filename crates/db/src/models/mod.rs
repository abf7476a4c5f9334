//! Database models for the kanban service.
//!
//! Each module owns one table (plus its request types) and exposes
//! associated async functions over a [`sqlx::SqlitePool`]. Queries use the
//! runtime API so no prepared-statement cache is required at build time.

pub mod board;
pub mod card;
pub mod comment;
pub mod label;
pub mod list;
