//! # Trip Planner Backend
//!
//! Contains all non-UI logic for the trip planner.
//!
//! This crate serves as the orchestration layer that brings together:
//! - **Domain**: Planner projection, activity reordering, budgets and trip management
//! - **Storage**: CSV tables in a local data directory
//! - **Config / Logging**: Application settings and log output
//!
//! ## Architecture
//!
//! ```text
//! Presentation layer (any UI)
//!     ↓
//! AppState (services wired over one connection)
//!     ↓
//! Domain Layer (business logic, services)
//!     ↓
//! Storage Layer (CSV tables)
//! ```

pub mod config;
pub mod domain;
pub mod logging;
pub mod storage;

use anyhow::Result;
use log::info;
use shared::{Trip, VisitedMap};
use std::sync::Arc;

pub use config::PlannerConfig;
pub use domain::*;
pub use storage::CsvConnection;

use domain::commands::trips::TripListQuery;
use domain::destination_map::visited_map;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub config: PlannerConfig,
    pub connection: CsvConnection,
    pub trip_service: TripService<CsvConnection>,
    pub itinerary_service: ItineraryService<CsvConnection>,
    pub activity_service: ActivityService<CsvConnection>,
    pub budget_service: BudgetService<CsvConnection>,
    pub note_service: NoteService<CsvConnection>,
    pub document_service: DocumentService<CsvConnection>,
    pub export_service: ExportService<CsvConnection>,
    pub rate_provider: Arc<FixedRateProvider>,
}

impl AppState {
    /// Wire every service over one connection
    ///
    /// Exchange rates start out unavailable; push a snapshot through
    /// `rate_provider` once one is fetched.
    pub fn new(config: PlannerConfig, connection: CsvConnection) -> Self {
        let trip_service = TripService::new(&connection);
        let itinerary_service = ItineraryService::new(&connection);
        let rate_provider = Arc::new(FixedRateProvider::empty());
        let budget_service = BudgetService::new(
            trip_service.clone(),
            itinerary_service.clone(),
            rate_provider.clone(),
            config.base_currency.clone(),
        );

        Self {
            activity_service: ActivityService::new(&connection),
            note_service: NoteService::new(&connection),
            document_service: DocumentService::new(&connection),
            export_service: ExportService::new(&connection),
            trip_service,
            itinerary_service,
            budget_service,
            rate_provider,
            config,
            connection,
        }
    }

    /// Autosaver for a trip's note using the configured delay
    pub fn note_autosaver(&self, trip_id: &str) -> NoteAutosaver<CsvConnection> {
        self.note_service.autosaver(trip_id, self.config.autosave_delay())
    }

    /// Map of every stored trip seen from the configured home
    pub async fn visited_map(&self) -> Result<Option<VisitedMap>> {
        let trips: Vec<Trip> = self.trip_service.list_trips(TripListQuery::default()).await?;
        Ok(visited_map(&trips, &self.config.home_destination))
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: PlannerConfig) -> Result<AppState> {
    info!("Setting up data directory: {}", config.data_directory.display());
    let connection = CsvConnection::new(&config.data_directory)?;

    info!("Setting up application state");
    Ok(AppState::new(config, connection))
}
