//! # Storage Module
//!
//! Handles all data persistence for the trip planner.
//!
//! The domain layer only sees the traits in [`traits`]; the CSV
//! implementation in [`csv`] keeps every table in one local data directory.
//! Another backend (an embedded database, a browser key-value store) only
//! needs to provide a [`Connection`] and its repositories.

pub mod csv;
pub mod traits;

pub use self::csv::CsvConnection;
pub use traits::{ActivityStorage, Connection, PositionWriteOutcome, TripScopedStorage, TripStorage};
