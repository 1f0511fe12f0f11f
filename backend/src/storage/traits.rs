//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;
use shared::{Activity, ActivityChange, Accommodation, Document, EntityId, Flight, Note, Trip, TripScoped};

/// Trait defining the interface for trip storage operations
#[async_trait]
pub trait TripStorage: Send + Sync {
    /// Store a new trip, assigning it a fresh id
    async fn store_trip(&self, trip: &Trip) -> Result<EntityId>;

    /// Retrieve a specific trip by ID
    async fn get_trip(&self, trip_id: &str) -> Result<Option<Trip>>;

    /// List all trips in insertion order
    async fn list_trips(&self) -> Result<Vec<Trip>>;

    /// Replace an existing trip
    /// Returns true if the trip was found and updated, false otherwise
    async fn update_trip(&self, trip: &Trip) -> Result<bool>;

    /// Delete a trip record (owned records are not touched)
    async fn delete_trip(&self, trip_id: &str) -> Result<bool>;
}

/// Trait defining the interface for records owned by a trip
///
/// Implemented once per record type (flights, stays, activities, notes,
/// documents); the domain layer only ever addresses records through their
/// owning trip or their own id.
#[async_trait]
pub trait TripScopedStorage<T>: Send + Sync
where
    T: TripScoped + Clone + Send + Sync + 'static,
{
    /// List every record of a trip in insertion order
    async fn list_by_trip(&self, trip_id: &str) -> Result<Vec<T>>;

    /// Retrieve a specific record by ID
    async fn get(&self, id: &str) -> Result<Option<T>>;

    /// Store a new record; any id on the input is replaced by a fresh one
    async fn create(&self, record: &T) -> Result<EntityId>;

    /// Replace an existing record
    /// Returns true if the record was found and updated, false otherwise
    async fn update(&self, record: &T) -> Result<bool>;

    /// Apply `change` to a stored record and write it back in one step
    /// Returns the written record, or None if no record has this id
    async fn modify(&self, id: &str, change: &(dyn for<'c> Fn(&'c mut T) + Send + Sync)) -> Result<Option<T>>;

    /// Delete a single record
    /// Returns true if the record was found and deleted, false otherwise
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Delete every record owned by a trip
    /// Returns the number of records actually deleted
    async fn delete_all_by_trip(&self, trip_id: &str) -> Result<u32>;
}

/// Result of writing a batch of activity position changes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionWriteOutcome {
    /// Changes that were written
    pub applied: Vec<ActivityChange>,
    /// Activity ids that no longer exist and were skipped
    pub dropped_ids: Vec<EntityId>,
}

/// Activity storage adds an atomic batch update for planner moves
#[async_trait]
pub trait ActivityStorage: TripScopedStorage<Activity> {
    /// Write new (date, order) pairs for several activities at once
    ///
    /// Either every surviving change is written or none is. Changes for ids
    /// that are no longer stored are dropped and reported, never failing
    /// the batch.
    async fn apply_position_changes(&self, changes: &[ActivityChange]) -> Result<PositionWriteOutcome>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type (CSV files, an
/// embedded database, ...) and provides factory methods for creating
/// repositories. This allows the domain layer to work with any storage
/// backend without knowing the implementation details.
pub trait Connection: Send + Sync + Clone + 'static {
    type TripRepository: TripStorage + Clone + 'static;
    type FlightRepository: TripScopedStorage<Flight> + Clone + 'static;
    type AccommodationRepository: TripScopedStorage<Accommodation> + Clone + 'static;
    type ActivityRepository: ActivityStorage + Clone + 'static;
    type NoteRepository: TripScopedStorage<Note> + Clone + 'static;
    type DocumentRepository: TripScopedStorage<Document> + Clone + 'static;

    fn create_trip_repository(&self) -> Self::TripRepository;
    fn create_flight_repository(&self) -> Self::FlightRepository;
    fn create_accommodation_repository(&self) -> Self::AccommodationRepository;
    fn create_activity_repository(&self) -> Self::ActivityRepository;
    fn create_note_repository(&self) -> Self::NoteRepository;
    fn create_document_repository(&self) -> Self::DocumentRepository;
}
