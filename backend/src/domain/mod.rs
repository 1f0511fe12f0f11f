//! # Domain Module
//!
//! Contains all business logic for the trip planner.
//!
//! This module encapsulates how trips, bookings and activities are modeled,
//! projected onto the calendar and costed. It operates independently of any
//! specific UI framework or storage mechanism.
//!
//! ## Module Organization
//!
//! - **date_range**: Calendar-day expansion of a trip's date range
//! - **timeline**: Which flights, stays and activities fall on a given day
//! - **reorder**: Drag-and-drop moves of activities as a minimal diff
//! - **budget_service**: Per-currency breakdowns and base-currency totals
//! - **exchange_rates**: Rate providers consumed by the budget service
//! - **trip_service**: Trip CRUD, search, overview and cascade delete
//! - **itinerary_service**: Flights, stays and the day-by-day planner
//! - **activity_service**: Activity CRUD and persisted moves
//! - **note_service**: Per-trip note with debounced autosave
//! - **document_service**: Documents attached to a trip
//! - **export_service**: JSON export and import of whole trips
//! - **destination_map**: Known places and the visited-destinations map
//!
//! ## Core Concepts
//!
//! - **Planner Day**: One calendar day of a trip with its fixed items and ordered activities
//! - **Order Index**: Rank of an activity among others sharing its date, never a global key
//! - **Half-open Stay**: A stay occupies check-in up to, not including, check-out
//! - **Base Currency**: The single currency all costs are normalized into
//!
//! ## Business Rules
//!
//! - An inverted trip date range yields no planner days, never an error
//! - Moves write only the activities whose date or order changed
//! - Missing exchange rates degrade base totals to zero; native totals stay exact
//! - Deleting a trip deletes everything it owns, documents included

pub mod activity_service;
pub mod budget_service;
pub mod commands;
pub mod date_range;
pub mod destination_map;
pub mod document_service;
pub mod exchange_rates;
pub mod export_service;
pub mod itinerary_service;
pub mod models;
pub mod note_service;
pub mod reorder;
pub mod timeline;
pub mod trip_service;

pub use activity_service::ActivityService;
pub use budget_service::BudgetService;
pub use document_service::DocumentService;
pub use exchange_rates::{ExchangeRateProvider, FixedRateProvider, UnavailableRateProvider};
pub use export_service::ExportService;
pub use itinerary_service::ItineraryService;
pub use note_service::{NoteAutosaver, NoteService};
pub use trip_service::TripService;
