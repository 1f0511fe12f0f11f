use anyhow::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::activity_repository::ActivityRepository;
use super::records::{AccommodationRepository, DocumentRepository, FlightRepository, NoteRepository};
use super::trip_repository::TripRepository;
use crate::storage::traits::Connection;

/// CsvConnection owns the data directory and hands out repositories over it
///
/// Every table lives directly in the base directory:
///
/// ```text
/// data/
/// ├── config.yaml
/// ├── trips.csv
/// ├── flights.csv
/// ├── accommodations.csv
/// ├── activities.csv
/// ├── notes.csv
/// └── documents.csv
/// ```
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: Arc<PathBuf>,
    /// Serialises read-modify-write cycles across all tables
    write_lock: Arc<Mutex<()>>,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: Arc::new(base_path),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of a table file inside the data directory
    pub fn table_path(&self, file_name: &str) -> PathBuf {
        self.base_directory.join(file_name)
    }

    /// Acquire the connection-wide write lock
    pub async fn lock_for_write(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Mint a new record id such as "activity::8c1f..."
    pub fn generate_id(prefix: &str) -> String {
        format!("{}::{}", prefix, Uuid::new_v4().simple())
    }
}

impl Connection for CsvConnection {
    type TripRepository = TripRepository;
    type FlightRepository = FlightRepository;
    type AccommodationRepository = AccommodationRepository;
    type ActivityRepository = ActivityRepository;
    type NoteRepository = NoteRepository;
    type DocumentRepository = DocumentRepository;

    fn create_trip_repository(&self) -> Self::TripRepository {
        TripRepository::new(self.clone())
    }

    fn create_flight_repository(&self) -> Self::FlightRepository {
        FlightRepository::new(self.clone())
    }

    fn create_accommodation_repository(&self) -> Self::AccommodationRepository {
        AccommodationRepository::new(self.clone())
    }

    fn create_activity_repository(&self) -> Self::ActivityRepository {
        ActivityRepository::new(self.clone())
    }

    fn create_note_repository(&self) -> Self::NoteRepository {
        NoteRepository::new(self.clone())
    }

    fn create_document_repository(&self) -> Self::DocumentRepository {
        DocumentRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("data");

        let connection = CsvConnection::new(&nested).unwrap();

        assert!(nested.exists());
        assert_eq!(connection.table_path("trips.csv"), nested.join("trips.csv"));
    }

    #[test]
    fn test_generated_ids_are_prefixed_and_unique() {
        let first = CsvConnection::generate_id("trip");
        let second = CsvConnection::generate_id("trip");

        assert!(first.starts_with("trip::"));
        assert_ne!(first, second);
    }
}
