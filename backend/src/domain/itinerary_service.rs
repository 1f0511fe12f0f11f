//! Flights, stays and the day-by-day planner of a trip.
//!
//! ## Key Responsibilities
//!
//! - **Flight and Stay CRUD**: Adding, editing, confirming and removing bookings
//! - **Itinerary Loading**: Bundling flights, stays and activities in display order
//! - **Planner**: Projecting the bundle onto the trip's calendar days
//!
//! Activities are managed by `ActivityService`; they are only read here.

use anyhow::Result;
use chrono::Utc;
use log::{info, warn};
use shared::{Accommodation, Flight, PlannerDay, TripItinerary};

use super::models::PlannerError;
use super::timeline::build_planner;
use crate::storage::{Connection, TripScopedStorage, TripStorage};

/// Service for a trip's bookings and planner view
#[derive(Clone)]
pub struct ItineraryService<C: Connection> {
    trip_repository: C::TripRepository,
    flight_repository: C::FlightRepository,
    accommodation_repository: C::AccommodationRepository,
    activity_repository: C::ActivityRepository,
}

impl<C: Connection> ItineraryService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            trip_repository: connection.create_trip_repository(),
            flight_repository: connection.create_flight_repository(),
            accommodation_repository: connection.create_accommodation_repository(),
            activity_repository: connection.create_activity_repository(),
        }
    }

    async fn ensure_trip(&self, trip_id: &str) -> Result<()> {
        match self.trip_repository.get_trip(trip_id).await? {
            Some(_) => Ok(()),
            None => Err(PlannerError::TripNotFound(trip_id.to_string()).into()),
        }
    }

    /// Add a flight to a trip
    pub async fn add_flight(&self, mut flight: Flight) -> Result<Flight> {
        info!(
            "Adding flight {} {} to trip {}",
            flight.airline, flight.flight_number, flight.trip_id
        );

        validate_flight(&flight)?;
        self.ensure_trip(&flight.trip_id).await?;
        if flight.departure_date().is_none() {
            warn!("Flight departure time '{}' has no calendar date", flight.departure_time);
        }

        flight.created_at = Utc::now().to_rfc3339();
        flight.id = self.flight_repository.create(&flight).await?;

        info!("Successfully added flight: {}", flight.id);
        Ok(flight)
    }

    pub async fn update_flight(&self, flight: Flight) -> Result<Flight> {
        info!("Updating flight: {}", flight.id);

        validate_flight(&flight)?;
        if !self.flight_repository.update(&flight).await? {
            return Err(PlannerError::RecordNotFound(flight.id).into());
        }
        Ok(flight)
    }

    /// Mark a flight booked or back to an option
    pub async fn set_flight_confirmed(&self, flight_id: &str, is_confirmed: bool) -> Result<Flight> {
        info!("Setting flight {} confirmed={}", flight_id, is_confirmed);

        let flight = self
            .flight_repository
            .modify(flight_id, &|flight: &mut Flight| flight.is_confirmed = is_confirmed)
            .await?
            .ok_or_else(|| PlannerError::RecordNotFound(flight_id.to_string()))?;
        Ok(flight)
    }

    pub async fn delete_flight(&self, flight_id: &str) -> Result<bool> {
        info!("Deleting flight: {}", flight_id);
        self.flight_repository.delete(flight_id).await
    }

    /// Flights of a trip by departure time
    pub async fn list_flights(&self, trip_id: &str) -> Result<Vec<Flight>> {
        let mut flights = self.flight_repository.list_by_trip(trip_id).await?;
        flights.sort_by(|a, b| a.departure_time.cmp(&b.departure_time));
        Ok(flights)
    }

    /// Add a stay to a trip
    pub async fn add_accommodation(&self, mut accommodation: Accommodation) -> Result<Accommodation> {
        info!(
            "Adding accommodation {} to trip {}",
            accommodation.name, accommodation.trip_id
        );

        validate_accommodation(&accommodation)?;
        self.ensure_trip(&accommodation.trip_id).await?;
        if accommodation.check_out <= accommodation.check_in {
            warn!(
                "Accommodation {} checks out on or before check-in; it will not appear on the planner",
                accommodation.name
            );
        }

        accommodation.created_at = Utc::now().to_rfc3339();
        accommodation.id = self.accommodation_repository.create(&accommodation).await?;

        info!("Successfully added accommodation: {}", accommodation.id);
        Ok(accommodation)
    }

    pub async fn update_accommodation(&self, accommodation: Accommodation) -> Result<Accommodation> {
        info!("Updating accommodation: {}", accommodation.id);

        validate_accommodation(&accommodation)?;
        if !self.accommodation_repository.update(&accommodation).await? {
            return Err(PlannerError::RecordNotFound(accommodation.id).into());
        }
        Ok(accommodation)
    }

    pub async fn set_accommodation_confirmed(&self, accommodation_id: &str, is_confirmed: bool) -> Result<Accommodation> {
        info!("Setting accommodation {} confirmed={}", accommodation_id, is_confirmed);

        let accommodation = self
            .accommodation_repository
            .modify(accommodation_id, &|accommodation: &mut Accommodation| accommodation.is_confirmed = is_confirmed)
            .await?
            .ok_or_else(|| PlannerError::RecordNotFound(accommodation_id.to_string()))?;
        Ok(accommodation)
    }

    pub async fn delete_accommodation(&self, accommodation_id: &str) -> Result<bool> {
        info!("Deleting accommodation: {}", accommodation_id);
        self.accommodation_repository.delete(accommodation_id).await
    }

    /// Stays of a trip by check-in date
    pub async fn list_accommodations(&self, trip_id: &str) -> Result<Vec<Accommodation>> {
        let mut accommodations = self.accommodation_repository.list_by_trip(trip_id).await?;
        accommodations.sort_by_key(|a| a.check_in);
        Ok(accommodations)
    }

    /// Everything the planner and the budget need, in display order
    pub async fn load_itinerary(&self, trip_id: &str) -> Result<TripItinerary> {
        let mut activities = self.activity_repository.list_by_trip(trip_id).await?;
        activities.sort_by_key(|a| (a.date, a.order));

        Ok(TripItinerary {
            flights: self.list_flights(trip_id).await?,
            accommodations: self.list_accommodations(trip_id).await?,
            activities,
        })
    }

    /// Day-by-day planner for a stored trip
    pub async fn planner(&self, trip_id: &str) -> Result<Vec<PlannerDay>> {
        let trip = self
            .trip_repository
            .get_trip(trip_id)
            .await?
            .ok_or_else(|| PlannerError::TripNotFound(trip_id.to_string()))?;
        let itinerary = self.load_itinerary(trip_id).await?;
        Ok(build_planner(&trip, &itinerary))
    }
}

fn validate_flight(flight: &Flight) -> Result<()> {
    if flight.airline.trim().is_empty() {
        return Err(PlannerError::EmptyField("Airline").into());
    }
    if flight.price < 0.0 {
        return Err(PlannerError::NegativeAmount("Flight price").into());
    }
    Ok(())
}

fn validate_accommodation(accommodation: &Accommodation) -> Result<()> {
    if accommodation.name.trim().is_empty() {
        return Err(PlannerError::EmptyField("Accommodation name").into());
    }
    if accommodation.price < 0.0 {
        return Err(PlannerError::NegativeAmount("Accommodation price").into());
    }
    Ok(())
}
