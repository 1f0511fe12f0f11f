use shared::EntityId;

/// Rejections raised by the planner services
///
/// Storage failures are not represented here; they propagate as the
/// underlying `anyhow::Error`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlannerError {
    #[error("Trip not found: {0}")]
    TripNotFound(EntityId),
    #[error("Record not found: {0}")]
    RecordNotFound(EntityId),
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
    #[error("{0} cannot be negative")]
    NegativeAmount(&'static str),
}

/// A move was requested for an activity the engine does not know
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReorderError {
    #[error("Activity not found: {0}")]
    UnknownActivity(EntityId),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ImportError {
    #[error("Invalid export file format: {0}")]
    InvalidFormat(String),
    #[error("Unsupported export version: {0}")]
    UnsupportedVersion(u64),
}
