/// Test utilities module for automatic cleanup and consistent test infrastructure
///
/// This module provides RAII-based cleanup that guarantees test data is removed
/// even if tests panic or fail, plus small builders for sample records.

use anyhow::Result;
use chrono::NaiveDate;
use shared::{Accommodation, AccommodationType, Activity, CurrencyCode, Flight, Note, Trip, TripStatus};
use std::path::PathBuf;
use tempfile::TempDir;

use super::connection::CsvConnection;

/// RAII Test Environment that automatically cleans up on drop
pub struct TestEnvironment {
    /// The temporary directory - kept alive to prevent auto-cleanup until drop
    _temp_dir: TempDir,
    /// The CSV connection for the test
    pub connection: CsvConnection,
    /// Base directory path for manual inspection if needed
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = CsvConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("test dates are valid")
}

pub fn sample_trip(name: &str, start: &str, end: &str) -> Trip {
    Trip {
        id: String::new(),
        name: name.to_string(),
        destination: "Tokyo".to_string(),
        start_date: date(start),
        end_date: date(end),
        status: TripStatus::Planning,
        description: None,
        budget: None,
        cover_image: None,
        created_at: "2024-01-01T00:00:00+00:00".to_string(),
        updated_at: "2024-01-01T00:00:00+00:00".to_string(),
    }
}

pub fn sample_flight(trip_id: &str, departure_time: &str, price: f64, is_confirmed: bool) -> Flight {
    Flight {
        id: String::new(),
        trip_id: trip_id.to_string(),
        airline: "Emirates".to_string(),
        flight_number: "EK773".to_string(),
        departure_airport: "CPT".to_string(),
        arrival_airport: "DXB".to_string(),
        departure_time: departure_time.to_string(),
        arrival_time: departure_time.to_string(),
        price,
        currency: CurrencyCode::usd(),
        stops: Vec::new(),
        booking_link: None,
        notes: None,
        is_confirmed,
        created_at: "2024-01-01T00:00:00+00:00".to_string(),
    }
}

pub fn sample_accommodation(trip_id: &str, check_in: &str, check_out: &str, price: f64, is_confirmed: bool) -> Accommodation {
    Accommodation {
        id: String::new(),
        trip_id: trip_id.to_string(),
        name: "Shinjuku Hotel".to_string(),
        accommodation_type: AccommodationType::Hotel,
        location: "Tokyo".to_string(),
        check_in: date(check_in),
        check_out: date(check_out),
        price,
        currency: CurrencyCode::usd(),
        platform: None,
        booking_link: None,
        notes: None,
        is_confirmed,
        created_at: "2024-01-01T00:00:00+00:00".to_string(),
    }
}

pub fn sample_activity(trip_id: &str, name: &str, day: &str, order: i64) -> Activity {
    Activity {
        id: String::new(),
        trip_id: trip_id.to_string(),
        name: name.to_string(),
        date: date(day),
        link: None,
        notes: None,
        duration: None,
        cost: None,
        currency: CurrencyCode::usd(),
        is_confirmed: false,
        order,
        created_at: "2024-01-01T00:00:00+00:00".to_string(),
    }
}

pub fn sample_note(trip_id: &str, content: &str) -> Note {
    Note {
        id: String::new(),
        trip_id: trip_id.to_string(),
        content: content.to_string(),
        updated_at: "2024-01-01T00:00:00+00:00".to_string(),
    }
}
