//! Budget aggregation for a trip.
//!
//! Costs are summed per original currency (split by category and by booking
//! state) and converted into one base currency for the grand total.
//!
//! ## Degraded cases
//!
//! - No rate snapshot: native breakdowns stay complete, base totals read 0
//! - Currency missing from the snapshot: that item contributes 0 to base totals
//! - Unparseable budget target: treated as no target

use anyhow::Result;
use log::{debug, info, warn};
use shared::{
    BudgetComparison, BudgetStatus, BudgetSummary, CostSplit, CurrencyBreakdown, CurrencyCode, TripItinerary,
};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::exchange_rates::ExchangeRateProvider;
use super::itinerary_service::ItineraryService;
use super::models::ExchangeRates;
use super::trip_service::TripService;
use crate::storage::Connection;

#[derive(Clone, Copy)]
enum Category {
    Flights,
    Accommodations,
    Activities,
}

/// Parse the leading number out of a free-text budget
///
/// Every character other than digits and `.` is removed first, so
/// "$1,500 total" reads 1500. Returns None when no number remains.
pub fn parse_budget_target(budget: &str) -> Option<f64> {
    let cleaned: String = budget
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    // Longest prefix with at most one decimal point
    let mut seen_point = false;
    let mut end = 0;
    for (index, c) in cleaned.char_indices() {
        if c == '.' {
            if seen_point {
                break;
            }
            seen_point = true;
        }
        end = index + 1;
    }
    let number = &cleaned[..end];

    if !number.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    number.parse::<f64>().ok()
}

/// Compare a base-currency total against a declared target
pub fn compare_to_target(target: f64, total_in_base: f64) -> BudgetComparison {
    let status = if target < total_in_base {
        BudgetStatus::OverBudget
    } else {
        BudgetStatus::UnderBudget
    };
    BudgetComparison {
        target,
        total_in_base,
        remaining: target - total_in_base,
        status,
    }
}

/// Aggregate every cost of an itinerary
pub fn summarize_budget(
    itinerary: &TripItinerary,
    rates: Option<&ExchangeRates>,
    base_currency: &CurrencyCode,
    budget_target: Option<&str>,
) -> BudgetSummary {
    let mut by_currency: BTreeMap<CurrencyCode, CurrencyBreakdown> = BTreeMap::new();
    let mut total_in_base = 0.0;
    let mut confirmed_in_base = 0.0;

    let line_items = itinerary
        .flights
        .iter()
        .map(|f| (Category::Flights, f.price, &f.currency, f.is_confirmed))
        .chain(
            itinerary
                .accommodations
                .iter()
                .map(|a| (Category::Accommodations, a.price, &a.currency, a.is_confirmed)),
        )
        .chain(
            itinerary
                .activities
                .iter()
                .map(|a| (Category::Activities, a.cost.unwrap_or(0.0), &a.currency, a.is_confirmed)),
        );

    for (category, amount, currency, is_confirmed) in line_items {
        let breakdown = by_currency.entry(currency.clone()).or_default();
        breakdown.overall.add(amount, is_confirmed);
        category_split(breakdown, category).add(amount, is_confirmed);

        let converted = match rates {
            Some(rates) => rates.convert(amount, currency, base_currency).unwrap_or_else(|| {
                warn!("No exchange rate for {} -> {}; counting 0", currency, base_currency);
                0.0
            }),
            None => 0.0,
        };
        total_in_base += converted;
        if is_confirmed {
            confirmed_in_base += converted;
        }
    }

    let target = budget_target
        .and_then(parse_budget_target)
        .map(|target| compare_to_target(target, total_in_base));

    BudgetSummary {
        base_currency: base_currency.clone(),
        by_currency,
        rates_available: rates.is_some(),
        total_in_base,
        confirmed_in_base,
        target,
    }
}

fn category_split(breakdown: &mut CurrencyBreakdown, category: Category) -> &mut CostSplit {
    match category {
        Category::Flights => &mut breakdown.flights,
        Category::Accommodations => &mut breakdown.accommodations,
        Category::Activities => &mut breakdown.activities,
    }
}

/// Service producing budget summaries for stored trips
#[derive(Clone)]
pub struct BudgetService<C: Connection> {
    trip_service: TripService<C>,
    itinerary_service: ItineraryService<C>,
    rate_provider: Arc<dyn ExchangeRateProvider>,
    base_currency: CurrencyCode,
}

impl<C: Connection> BudgetService<C> {
    pub fn new(
        trip_service: TripService<C>,
        itinerary_service: ItineraryService<C>,
        rate_provider: Arc<dyn ExchangeRateProvider>,
        base_currency: CurrencyCode,
    ) -> Self {
        Self {
            trip_service,
            itinerary_service,
            rate_provider,
            base_currency,
        }
    }

    pub fn base_currency(&self) -> &CurrencyCode {
        &self.base_currency
    }

    /// Budget summary of one trip in the configured base currency
    pub async fn trip_budget(&self, trip_id: &str) -> Result<BudgetSummary> {
        info!("Calculating budget for trip: {}", trip_id);

        let trip = self.trip_service.require_trip(trip_id).await?;
        let itinerary = self.itinerary_service.load_itinerary(trip_id).await?;
        let rates = self.rate_provider.get_rates().await;
        if rates.is_none() {
            debug!("Exchange rates not available; base totals will read 0");
        }

        let summary = summarize_budget(&itinerary, rates.as_ref(), &self.base_currency, trip.budget.as_deref());

        info!(
            "Budget for trip {}: {:.2} {} across {} currencies",
            trip_id,
            summary.total_in_base,
            self.base_currency,
            summary.by_currency.len()
        );
        Ok(summary)
    }
}
