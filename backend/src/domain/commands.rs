//! Domain-level command and query types
//! These structs are inputs and results of the services inside the domain
//! layer. Presentation code builds them from user input; the records they
//! carry come from the `shared` crate.

pub mod trips {
    use chrono::NaiveDate;
    use shared::{TripStatus, EntityId};

    /// Input for creating a new trip.
    #[derive(Debug, Clone)]
    pub struct CreateTripCommand {
        pub name: String,
        pub destination: String,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub status: Option<TripStatus>,
        pub description: Option<String>,
        pub budget: Option<String>,
        pub cover_image: Option<String>,
    }

    /// Query parameters for listing trips.
    #[derive(Debug, Clone, Default)]
    pub struct TripListQuery {
        /// Case-insensitive match on name or destination
        pub search: Option<String>,
    }

    /// Result of deleting a trip and everything it owns.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct DeleteTripResult {
        pub trip_id: EntityId,
        pub trip_deleted: bool,
        pub flights_deleted: u32,
        pub accommodations_deleted: u32,
        pub activities_deleted: u32,
        pub notes_deleted: u32,
        pub documents_deleted: u32,
    }
}

pub mod activities {
    use chrono::NaiveDate;
    use shared::{ActivityChange, CurrencyCode, EntityId};

    /// Input for adding an activity to a trip.
    #[derive(Debug, Clone)]
    pub struct CreateActivityCommand {
        pub trip_id: EntityId,
        pub name: String,
        pub date: NaiveDate,
        pub link: Option<String>,
        pub notes: Option<String>,
        pub duration: Option<u32>,
        pub cost: Option<f64>,
        pub currency: CurrencyCode,
        pub is_confirmed: bool,
        /// Explicit rank; appended to the end of the day when None
        pub order: Option<i64>,
    }

    /// Drag-and-drop move of one activity.
    #[derive(Debug, Clone)]
    pub struct MoveActivityCommand {
        pub trip_id: EntityId,
        pub activity_id: EntityId,
        pub destination_date: NaiveDate,
        pub destination_index: usize,
    }

    /// Result of a persisted move.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct MoveActivityResult {
        /// Changes that reached the store
        pub applied: Vec<ActivityChange>,
        /// Ids referenced by the move that no longer exist
        pub dropped_ids: Vec<EntityId>,
    }
}

pub mod documents {
    use shared::EntityId;

    /// Input for attaching a document to a trip.
    #[derive(Debug, Clone)]
    pub struct AddDocumentCommand {
        pub trip_id: EntityId,
        pub name: String,
        pub description: Option<String>,
        pub mime_type: String,
        pub file: String,
    }
}
