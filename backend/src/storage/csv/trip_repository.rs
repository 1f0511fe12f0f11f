//! # CSV Trip Repository
//!
//! Trips live in `trips.csv` at the root of the data directory:
//!
//! ```csv
//! id,name,destination,start_date,end_date,status,description,budget,cover_image,created_at,updated_at
//! trip::41ab...,Japan 2024,Tokyo,2024-04-01,2024-04-14,booked,,"R45,000",,2024-01-10T09:00:00+00:00,2024-01-12T18:30:00+00:00
//! ```

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};
use shared::{EntityId, Trip, TripStatus};
use std::path::PathBuf;

use super::connection::CsvConnection;
use super::table::{append_row, read_table, write_rows, Unparsed};
use crate::storage::traits::TripStorage;

const TRIPS_TABLE: &str = "trips.csv";

/// CSV record structure for trips
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TripRecord {
    id: String,
    name: String,
    destination: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: String,
    description: Option<String>,
    budget: Option<String>,
    cover_image: Option<String>,
    created_at: String,
    updated_at: String,
}

impl From<&Trip> for TripRecord {
    fn from(trip: &Trip) -> Self {
        TripRecord {
            id: trip.id.clone(),
            name: trip.name.clone(),
            destination: trip.destination.clone(),
            start_date: trip.start_date,
            end_date: trip.end_date,
            status: trip.status.to_string(),
            description: trip.description.clone(),
            budget: trip.budget.clone(),
            cover_image: trip.cover_image.clone(),
            created_at: trip.created_at.clone(),
            updated_at: trip.updated_at.clone(),
        }
    }
}

impl TryFrom<TripRecord> for Trip {
    type Error = anyhow::Error;

    fn try_from(record: TripRecord) -> Result<Self> {
        let status = record
            .status
            .parse::<TripStatus>()
            .map_err(|e| anyhow::anyhow!("Failed to parse trip status: {}", e))?;

        Ok(Trip {
            id: record.id,
            name: record.name,
            destination: record.destination,
            start_date: record.start_date,
            end_date: record.end_date,
            status,
            description: record.description,
            budget: record.budget,
            cover_image: record.cover_image,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// CSV-based trip repository
#[derive(Clone)]
pub struct TripRepository {
    connection: CsvConnection,
}

impl TripRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn trips_file_path(&self) -> PathBuf {
        self.connection.table_path(TRIPS_TABLE)
    }

    fn read_trips(&self) -> Result<Vec<Trip>> {
        Ok(self.read_trips_for_write()?.0)
    }

    fn read_trips_for_write(&self) -> Result<(Vec<Trip>, Unparsed)> {
        let table = read_table::<TripRecord>(&self.trips_file_path())?;
        Ok(table.convert(TRIPS_TABLE, Trip::try_from))
    }

    fn write_trips(&self, trips: &[Trip], unparsed: &Unparsed) -> Result<()> {
        let records: Vec<TripRecord> = trips.iter().map(TripRecord::from).collect();
        write_rows(&self.trips_file_path(), &records, unparsed)
    }
}

#[async_trait]
impl TripStorage for TripRepository {
    async fn store_trip(&self, trip: &Trip) -> Result<EntityId> {
        let _guard = self.connection.lock_for_write().await;

        let id = CsvConnection::generate_id("trip");
        let mut stored = trip.clone();
        stored.id = id.clone();

        append_row(&self.trips_file_path(), &TripRecord::from(&stored))?;

        info!("Stored trip {} ({})", id, stored.name);
        Ok(id)
    }

    async fn get_trip(&self, trip_id: &str) -> Result<Option<Trip>> {
        let trips = self.read_trips()?;
        Ok(trips.into_iter().find(|trip| trip.id == trip_id))
    }

    async fn list_trips(&self) -> Result<Vec<Trip>> {
        self.read_trips()
    }

    async fn update_trip(&self, trip: &Trip) -> Result<bool> {
        let _guard = self.connection.lock_for_write().await;

        let (mut trips, unparsed) = self.read_trips_for_write()?;
        let Some(existing) = trips.iter_mut().find(|existing| existing.id == trip.id) else {
            return Ok(false);
        };
        *existing = trip.clone();

        self.write_trips(&trips, &unparsed)?;
        info!("Updated trip {}", trip.id);
        Ok(true)
    }

    async fn delete_trip(&self, trip_id: &str) -> Result<bool> {
        let _guard = self.connection.lock_for_write().await;

        let (mut trips, unparsed) = self.read_trips_for_write()?;
        let before = trips.len();
        trips.retain(|trip| trip.id != trip_id);

        if trips.len() == before {
            return Ok(false);
        }

        self.write_trips(&trips, &unparsed)?;
        info!("Deleted trip {}", trip_id);
        Ok(true)
    }
}
