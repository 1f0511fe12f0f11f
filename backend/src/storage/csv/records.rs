//! # CSV Row Layouts
//!
//! Flat row structs for every trip-owned table, with conversions to and from
//! the shared records.
//!
//! ```csv
//! id,trip_id,airline,flight_number,departure_airport,arrival_airport,departure_time,arrival_time,price,currency,stops,booking_link,notes,is_confirmed,created_at
//! flight::9f1c...,trip::41ab...,KLM,KL592,CPT,AMS,2024-03-01T22:15,2024-03-02T08:40,900.0,EUR,"[{""airport"":""JNB"",""duration"":90}]",,,true,2024-01-10T09:00:00+00:00
//! ```
//!
//! Flight stops are the only nested data and are stored as a JSON column.

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{Accommodation, AccommodationType, Activity, CurrencyCode, Document, Flight, FlightStop, Note};

use super::scoped_repository::{CsvEntity, CsvRepository};

pub type FlightRepository = CsvRepository<Flight>;
pub type AccommodationRepository = CsvRepository<Accommodation>;
pub type NoteRepository = CsvRepository<Note>;
pub type DocumentRepository = CsvRepository<Document>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightRow {
    id: String,
    trip_id: String,
    airline: String,
    flight_number: String,
    departure_airport: String,
    arrival_airport: String,
    departure_time: String,
    arrival_time: String,
    price: f64,
    currency: String,
    stops: String,
    booking_link: Option<String>,
    notes: Option<String>,
    is_confirmed: bool,
    created_at: String,
}

impl CsvEntity for Flight {
    const TABLE: &'static str = "flights.csv";
    const ID_PREFIX: &'static str = "flight";

    type Row = FlightRow;

    fn to_row(&self) -> Result<FlightRow> {
        Ok(FlightRow {
            id: self.id.clone(),
            trip_id: self.trip_id.clone(),
            airline: self.airline.clone(),
            flight_number: self.flight_number.clone(),
            departure_airport: self.departure_airport.clone(),
            arrival_airport: self.arrival_airport.clone(),
            departure_time: self.departure_time.clone(),
            arrival_time: self.arrival_time.clone(),
            price: self.price,
            currency: self.currency.to_string(),
            stops: serde_json::to_string(&self.stops)?,
            booking_link: self.booking_link.clone(),
            notes: self.notes.clone(),
            is_confirmed: self.is_confirmed,
            created_at: self.created_at.clone(),
        })
    }

    fn from_row(row: FlightRow) -> Result<Self> {
        let stops: Vec<FlightStop> = if row.stops.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&row.stops)
                .map_err(|e| anyhow::anyhow!("Invalid stops for flight {}: {}", row.id, e))?
        };

        Ok(Flight {
            id: row.id,
            trip_id: row.trip_id,
            airline: row.airline,
            flight_number: row.flight_number,
            departure_airport: row.departure_airport,
            arrival_airport: row.arrival_airport,
            departure_time: row.departure_time,
            arrival_time: row.arrival_time,
            price: row.price,
            currency: CurrencyCode::new(row.currency),
            stops,
            booking_link: row.booking_link,
            notes: row.notes,
            is_confirmed: row.is_confirmed,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccommodationRow {
    id: String,
    trip_id: String,
    name: String,
    accommodation_type: String,
    location: String,
    check_in: NaiveDate,
    check_out: NaiveDate,
    price: f64,
    currency: String,
    platform: Option<String>,
    booking_link: Option<String>,
    notes: Option<String>,
    is_confirmed: bool,
    created_at: String,
}

impl CsvEntity for Accommodation {
    const TABLE: &'static str = "accommodations.csv";
    const ID_PREFIX: &'static str = "accommodation";

    type Row = AccommodationRow;

    fn to_row(&self) -> Result<AccommodationRow> {
        Ok(AccommodationRow {
            id: self.id.clone(),
            trip_id: self.trip_id.clone(),
            name: self.name.clone(),
            accommodation_type: self.accommodation_type.to_string(),
            location: self.location.clone(),
            check_in: self.check_in,
            check_out: self.check_out,
            price: self.price,
            currency: self.currency.to_string(),
            platform: self.platform.clone(),
            booking_link: self.booking_link.clone(),
            notes: self.notes.clone(),
            is_confirmed: self.is_confirmed,
            created_at: self.created_at.clone(),
        })
    }

    fn from_row(row: AccommodationRow) -> Result<Self> {
        let accommodation_type = row
            .accommodation_type
            .parse::<AccommodationType>()
            .map_err(|e| anyhow::anyhow!("Failed to parse accommodation type: {}", e))?;

        Ok(Accommodation {
            id: row.id,
            trip_id: row.trip_id,
            name: row.name,
            accommodation_type,
            location: row.location,
            check_in: row.check_in,
            check_out: row.check_out,
            price: row.price,
            currency: CurrencyCode::new(row.currency),
            platform: row.platform,
            booking_link: row.booking_link,
            notes: row.notes,
            is_confirmed: row.is_confirmed,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRow {
    id: String,
    trip_id: String,
    name: String,
    date: NaiveDate,
    link: Option<String>,
    notes: Option<String>,
    duration: Option<u32>,
    cost: Option<f64>,
    currency: String,
    is_confirmed: bool,
    order: i64,
    created_at: String,
}

impl CsvEntity for Activity {
    const TABLE: &'static str = "activities.csv";
    const ID_PREFIX: &'static str = "activity";

    type Row = ActivityRow;

    fn to_row(&self) -> Result<ActivityRow> {
        Ok(ActivityRow {
            id: self.id.clone(),
            trip_id: self.trip_id.clone(),
            name: self.name.clone(),
            date: self.date,
            link: self.link.clone(),
            notes: self.notes.clone(),
            duration: self.duration,
            cost: self.cost,
            currency: self.currency.to_string(),
            is_confirmed: self.is_confirmed,
            order: self.order,
            created_at: self.created_at.clone(),
        })
    }

    fn from_row(row: ActivityRow) -> Result<Self> {
        Ok(Activity {
            id: row.id,
            trip_id: row.trip_id,
            name: row.name,
            date: row.date,
            link: row.link,
            notes: row.notes,
            duration: row.duration,
            cost: row.cost,
            currency: CurrencyCode::new(row.currency),
            is_confirmed: row.is_confirmed,
            order: row.order,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteRow {
    id: String,
    trip_id: String,
    content: String,
    updated_at: String,
}

impl CsvEntity for Note {
    const TABLE: &'static str = "notes.csv";
    const ID_PREFIX: &'static str = "note";

    type Row = NoteRow;

    fn to_row(&self) -> Result<NoteRow> {
        Ok(NoteRow {
            id: self.id.clone(),
            trip_id: self.trip_id.clone(),
            content: self.content.clone(),
            updated_at: self.updated_at.clone(),
        })
    }

    fn from_row(row: NoteRow) -> Result<Self> {
        Ok(Note {
            id: row.id,
            trip_id: row.trip_id,
            content: row.content,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRow {
    id: String,
    trip_id: String,
    name: String,
    description: Option<String>,
    mime_type: String,
    file: String,
    created_at: String,
}

impl CsvEntity for Document {
    const TABLE: &'static str = "documents.csv";
    const ID_PREFIX: &'static str = "document";

    type Row = DocumentRow;

    fn to_row(&self) -> Result<DocumentRow> {
        Ok(DocumentRow {
            id: self.id.clone(),
            trip_id: self.trip_id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            mime_type: self.mime_type.clone(),
            file: self.file.clone(),
            created_at: self.created_at.clone(),
        })
    }

    fn from_row(row: DocumentRow) -> Result<Self> {
        Ok(Document {
            id: row.id,
            trip_id: row.trip_id,
            name: row.name,
            description: row.description,
            mime_type: row.mime_type,
            file: row.file,
            created_at: row.created_at,
        })
    }
}
