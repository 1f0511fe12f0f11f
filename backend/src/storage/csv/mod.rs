//! # CSV Storage
//!
//! File-backed implementation of the storage traits: one CSV table per
//! record type inside a single data directory, rewritten atomically.

pub mod activity_repository;
pub mod connection;
pub mod records;
pub mod scoped_repository;
pub mod table;
pub mod trip_repository;

#[cfg(test)]
pub mod test_utils;

pub use activity_repository::ActivityRepository;
pub use connection::CsvConnection;
pub use records::{AccommodationRepository, DocumentRepository, FlightRepository, NoteRepository};
pub use scoped_repository::{CsvEntity, CsvRepository};
pub use trip_repository::TripRepository;
