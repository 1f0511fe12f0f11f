//! Domain-only types: errors raised by services and the internal move plan.

pub mod errors;
pub mod exchange_rates;
pub mod reorder_plan;

pub use errors::{ImportError, PlannerError, ReorderError};
pub use exchange_rates::{ExchangeRates, RateQuote};
pub use reorder_plan::{DayPosition, ReorderPlan};
