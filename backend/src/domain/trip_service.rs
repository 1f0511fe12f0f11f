//! Trip service domain logic for the trip planner.
//!
//! This module contains the business logic for trips as a whole: creating,
//! editing and listing trips, the overview counters, and removing a trip
//! together with everything it owns.
//!
//! ## Key Responsibilities
//!
//! - **Trip CRUD**: Creating, reading, updating, and deleting trips
//! - **Search**: Case-insensitive filtering on name or destination
//! - **Cascade Delete**: Removing flights, stays, activities, notes and documents
//! - **Overview**: Counting bookings and upcoming items for the overview cards
//!
//! ## Business Rules
//!
//! - Trip name and destination cannot be empty
//! - New trips start in the `planning` state unless told otherwise
//! - Every update bumps `updated_at`; `created_at` never changes
//! - Owned records are deleted before the trip itself

use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use log::{info, warn};
use shared::{Trip, TripOverview};

use super::commands::trips::{CreateTripCommand, DeleteTripResult, TripListQuery};
use super::date_range::parse_date_time;
use super::models::PlannerError;
use crate::storage::{Connection, TripScopedStorage, TripStorage};

/// Service for managing trips
#[derive(Clone)]
pub struct TripService<C: Connection> {
    trip_repository: C::TripRepository,
    flight_repository: C::FlightRepository,
    accommodation_repository: C::AccommodationRepository,
    activity_repository: C::ActivityRepository,
    note_repository: C::NoteRepository,
    document_repository: C::DocumentRepository,
}

impl<C: Connection> TripService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            trip_repository: connection.create_trip_repository(),
            flight_repository: connection.create_flight_repository(),
            accommodation_repository: connection.create_accommodation_repository(),
            activity_repository: connection.create_activity_repository(),
            note_repository: connection.create_note_repository(),
            document_repository: connection.create_document_repository(),
        }
    }

    /// Create a new trip
    pub async fn create_trip(&self, command: CreateTripCommand) -> Result<Trip> {
        info!("Creating trip: {} ({})", command.name, command.destination);

        let name = required("Trip name", &command.name)?;
        let destination = required("Destination", &command.destination)?;
        if command.end_date < command.start_date {
            warn!(
                "Trip {} ends ({}) before it starts ({}); planner will be empty",
                name, command.end_date, command.start_date
            );
        }

        let now = Utc::now().to_rfc3339();
        let mut trip = Trip {
            id: String::new(),
            name,
            destination,
            start_date: command.start_date,
            end_date: command.end_date,
            status: command.status.unwrap_or_default(),
            description: non_empty(command.description),
            budget: non_empty(command.budget),
            cover_image: non_empty(command.cover_image),
            created_at: now.clone(),
            updated_at: now,
        };
        trip.id = self.trip_repository.store_trip(&trip).await?;

        info!("Successfully created trip: {}", trip.id);
        Ok(trip)
    }

    /// Replace a trip's editable fields
    pub async fn update_trip(&self, trip: Trip) -> Result<Trip> {
        info!("Updating trip: {}", trip.id);

        let existing = self.require_trip(&trip.id).await?;
        let updated = Trip {
            name: required("Trip name", &trip.name)?,
            destination: required("Destination", &trip.destination)?,
            description: non_empty(trip.description),
            budget: non_empty(trip.budget),
            cover_image: non_empty(trip.cover_image),
            created_at: existing.created_at,
            updated_at: Utc::now().to_rfc3339(),
            ..trip
        };

        if !self.trip_repository.update_trip(&updated).await? {
            return Err(PlannerError::TripNotFound(updated.id).into());
        }

        info!("Successfully updated trip: {}", updated.id);
        Ok(updated)
    }

    pub async fn get_trip(&self, trip_id: &str) -> Result<Option<Trip>> {
        self.trip_repository.get_trip(trip_id).await
    }

    /// Get a trip, failing with [`PlannerError::TripNotFound`] when absent
    pub async fn require_trip(&self, trip_id: &str) -> Result<Trip> {
        self.trip_repository
            .get_trip(trip_id)
            .await?
            .ok_or_else(|| PlannerError::TripNotFound(trip_id.to_string()).into())
    }

    /// List trips, newest first
    pub async fn list_trips(&self, query: TripListQuery) -> Result<Vec<Trip>> {
        let mut trips = self.trip_repository.list_trips().await?;

        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            trips.retain(|trip| {
                trip.name.to_lowercase().contains(&needle) || trip.destination.to_lowercase().contains(&needle)
            });
        }

        trips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(trips)
    }

    /// Delete a trip and every record it owns
    pub async fn delete_trip(&self, trip_id: &str) -> Result<DeleteTripResult> {
        info!("Deleting trip and owned records: {}", trip_id);

        let result = DeleteTripResult {
            trip_id: trip_id.to_string(),
            flights_deleted: self.flight_repository.delete_all_by_trip(trip_id).await?,
            accommodations_deleted: self.accommodation_repository.delete_all_by_trip(trip_id).await?,
            activities_deleted: self.activity_repository.delete_all_by_trip(trip_id).await?,
            notes_deleted: self.note_repository.delete_all_by_trip(trip_id).await?,
            documents_deleted: self.document_repository.delete_all_by_trip(trip_id).await?,
            trip_deleted: self.trip_repository.delete_trip(trip_id).await?,
        };

        if result.trip_deleted {
            info!("Successfully deleted trip {}: {:?}", trip_id, result);
        } else {
            warn!("Trip {} was not found; removed orphaned records: {:?}", trip_id, result);
        }
        Ok(result)
    }

    /// Counters for the overview cards
    ///
    /// Flights departing after `now` and activities dated after `now` count
    /// as upcoming.
    pub async fn trip_overview(&self, trip_id: &str, now: NaiveDateTime) -> Result<TripOverview> {
        self.require_trip(trip_id).await?;

        let flights = self.flight_repository.list_by_trip(trip_id).await?;
        let accommodations = self.accommodation_repository.list_by_trip(trip_id).await?;
        let activities = self.activity_repository.list_by_trip(trip_id).await?;
        let notes = self.note_repository.list_by_trip(trip_id).await?;

        Ok(TripOverview {
            flight_count: flights.len(),
            upcoming_flight_count: flights
                .iter()
                .filter(|flight| parse_date_time(&flight.departure_time).is_some_and(|departs| departs > now))
                .count(),
            stay_count: accommodations.len(),
            confirmed_stay_count: accommodations.iter().filter(|a| a.is_confirmed).count(),
            activity_count: activities.len(),
            upcoming_activity_count: activities
                .iter()
                .filter(|activity| activity.date.and_hms_opt(0, 0, 0).is_some_and(|day| day > now))
                .count(),
            has_note: notes.iter().any(|note| !note.content.trim().is_empty()),
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PlannerError::EmptyField(field).into());
    }
    Ok(trimmed.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
