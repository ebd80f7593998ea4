//! SQLite backend for the contribution engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
