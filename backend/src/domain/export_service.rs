//! Export service domain logic for the trip planner.
//!
//! This module turns one trip and everything it owns into a portable JSON
//! document, and reads such a document back as a brand-new trip.
//!
//! ## File format
//!
//! `{ version, exportedAt, trip, flights[], accommodations[], activities[], notes[] }`
//! with camelCase field names. Nested records keep their original `tripId`
//! in the file; on import they are re-owned by the new trip and receive
//! fresh ids from the store.

use anyhow::{Context, Result};
use chrono::Utc;
use log::{error, info, warn};
use serde_json::Value;
use shared::{Trip, TripExport, TripScoped};
use std::fs;
use std::path::{Path, PathBuf};

use super::models::{ImportError, PlannerError};
use crate::storage::{Connection, TripScopedStorage, TripStorage};

pub const EXPORT_VERSION: u32 = 1;

/// File name for a trip export: whitespace runs become `_`
pub fn export_file_name(trip: &Trip) -> String {
    let mut stem = String::with_capacity(trip.name.len());
    let mut in_whitespace = false;
    for c in trip.name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                stem.push('_');
            }
            in_whitespace = true;
        } else {
            stem.push(c);
            in_whitespace = false;
        }
    }
    format!("{}_export.json", stem)
}

/// Pretty-printed JSON for an export document
pub fn export_to_json(export: &TripExport) -> Result<String> {
    serde_json::to_string_pretty(export).context("Failed to serialize trip export")
}

/// Validate and decode an export document
pub fn parse_export(json: &str) -> Result<TripExport, ImportError> {
    let value: Value = serde_json::from_str(json).map_err(|e| ImportError::InvalidFormat(e.to_string()))?;

    let version = value
        .get("version")
        .and_then(Value::as_u64)
        .filter(|version| *version > 0)
        .ok_or_else(|| ImportError::InvalidFormat("missing version".to_string()))?;
    if version > u64::from(EXPORT_VERSION) {
        return Err(ImportError::UnsupportedVersion(version));
    }
    if value.get("trip").map_or(true, Value::is_null) {
        return Err(ImportError::InvalidFormat("missing trip".to_string()));
    }

    serde_json::from_value(value).map_err(|e| ImportError::InvalidFormat(e.to_string()))
}

/// Export service that handles trip export and import
#[derive(Clone)]
pub struct ExportService<C: Connection> {
    trip_repository: C::TripRepository,
    flight_repository: C::FlightRepository,
    accommodation_repository: C::AccommodationRepository,
    activity_repository: C::ActivityRepository,
    note_repository: C::NoteRepository,
}

impl<C: Connection> ExportService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            trip_repository: connection.create_trip_repository(),
            flight_repository: connection.create_flight_repository(),
            accommodation_repository: connection.create_accommodation_repository(),
            activity_repository: connection.create_activity_repository(),
            note_repository: connection.create_note_repository(),
        }
    }

    /// Collect a trip and its flights, stays, activities and notes
    pub async fn export_trip(&self, trip_id: &str) -> Result<TripExport> {
        info!("📄 EXPORT: Exporting trip {}", trip_id);

        let trip = self
            .trip_repository
            .get_trip(trip_id)
            .await?
            .ok_or_else(|| PlannerError::TripNotFound(trip_id.to_string()))?;

        let export = TripExport {
            version: EXPORT_VERSION,
            exported_at: Utc::now().to_rfc3339(),
            trip,
            flights: self.flight_repository.list_by_trip(trip_id).await?,
            accommodations: self.accommodation_repository.list_by_trip(trip_id).await?,
            activities: self.activity_repository.list_by_trip(trip_id).await?,
            notes: self.note_repository.list_by_trip(trip_id).await?,
        };

        info!(
            "✅ EXPORT: Trip {} has {} flights, {} stays, {} activities, {} notes",
            trip_id,
            export.flights.len(),
            export.accommodations.len(),
            export.activities.len(),
            export.notes.len()
        );
        Ok(export)
    }

    /// Write a trip export into a directory, or the user's Documents
    /// folder when none is given. Returns the written file path.
    pub async fn export_to_directory(&self, trip_id: &str, directory: Option<&str>) -> Result<PathBuf> {
        info!("📁 EXPORT: Exporting trip {} to directory {:?}", trip_id, directory);

        let export_dir = match directory.map(sanitize_path).filter(|path| !path.is_empty()) {
            Some(path) => PathBuf::from(path),
            None => dirs::document_dir()
                .or_else(dirs::home_dir)
                .ok_or_else(|| anyhow::anyhow!("Could not determine default export directory"))?,
        };

        let export = self.export_trip(trip_id).await?;
        let json = export_to_json(&export)?;
        let file_path = export_dir.join(export_file_name(&export.trip));

        fs::create_dir_all(&export_dir).map_err(|e| {
            error!("❌ EXPORT: Failed to create export directory {:?}: {}", export_dir, e);
            anyhow::anyhow!("Failed to create export directory: {}", e)
        })?;
        fs::write(&file_path, json).map_err(|e| {
            error!("❌ EXPORT: Failed to write export file to {:?}: {}", file_path, e);
            anyhow::anyhow!("Failed to write export file: {}", e)
        })?;

        info!("✅ EXPORT: Wrote trip {} to {}", trip_id, file_path.display());
        Ok(file_path)
    }

    /// Import an export document as a new trip
    ///
    /// The trip is renamed `<name> (imported)` and gets fresh timestamps;
    /// every nested record is re-owned by it.
    pub async fn import_trip_json(&self, json: &str) -> Result<Trip> {
        info!("📥 IMPORT: Importing trip from JSON ({} bytes)", json.len());

        let export = parse_export(json).map_err(|e| {
            warn!("❌ IMPORT: Rejected export file: {}", e);
            e
        })?;

        let now = Utc::now().to_rfc3339();
        let mut trip = Trip {
            id: String::new(),
            name: format!("{} (imported)", export.trip.name),
            created_at: now.clone(),
            updated_at: now,
            ..export.trip
        };
        trip.id = self.trip_repository.store_trip(&trip).await?;

        for flight in export.flights {
            self.flight_repository.create(&reowned(flight, &trip.id)).await?;
        }
        for accommodation in export.accommodations {
            self.accommodation_repository.create(&reowned(accommodation, &trip.id)).await?;
        }
        for activity in export.activities {
            self.activity_repository.create(&reowned(activity, &trip.id)).await?;
        }
        for note in export.notes {
            self.note_repository.create(&reowned(note, &trip.id)).await?;
        }

        info!("✅ IMPORT: Imported trip {} as {}", trip.name, trip.id);
        Ok(trip)
    }

    pub async fn import_trip_file(&self, path: &Path) -> Result<Trip> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read export file {}", path.display()))?;
        self.import_trip_json(&json).await
    }
}

fn reowned<T: TripScoped>(mut record: T, trip_id: &str) -> T {
    record.set_id(String::new());
    record.set_trip_id(trip_id.to_string());
    record
}

/// Strip surrounding quotes and whitespace from a user-entered path
fn sanitize_path(path: &str) -> String {
    let trimmed = path.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .or_else(|| trimmed.strip_prefix('\'').and_then(|p| p.strip_suffix('\'')))
        .unwrap_or(trimmed);
    unquoted.trim().to_string()
}
