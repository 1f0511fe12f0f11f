//! Exchange-rate snapshot used by the budget aggregator.
use serde::{Deserialize, Serialize};
use shared::CurrencyCode;
use std::collections::HashMap;

/// How the numbers in a rate table are quoted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateQuote {
    /// Units of a common base per 1 unit of the currency.
    /// `{USD: 18.0, ZAR: 1.0}`: one dollar buys 18 rand.
    #[default]
    BasePerUnit,
    /// Units of the currency per 1 unit of a common anchor.
    /// `{USD: 1.0, ZAR: 18.0}`: one dollar buys 18 rand.
    UnitsPerAnchor,
}

/// Rate table keyed by currency code
///
/// With [`RateQuote::BasePerUnit`] conversion is
/// `amount * rate[from] / rate[to]`; with [`RateQuote::UnitsPerAnchor`] it is
/// `amount * rate[to] / rate[from]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRates {
    quote: RateQuote,
    rates: HashMap<CurrencyCode, f64>,
}

impl ExchangeRates {
    /// Empty table quoted as base units per 1 unit of each currency
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty table quoted as currency units per 1 anchor unit
    pub fn units_per_anchor() -> Self {
        Self {
            quote: RateQuote::UnitsPerAnchor,
            rates: HashMap::new(),
        }
    }

    pub fn with_rate(mut self, currency: impl Into<CurrencyCode>, rate: f64) -> Self {
        self.set_rate(currency, rate);
        self
    }

    pub fn set_rate(&mut self, currency: impl Into<CurrencyCode>, rate: f64) {
        self.rates.insert(currency.into(), rate);
    }

    pub fn quote(&self) -> RateQuote {
        self.quote
    }

    pub fn rate(&self, currency: &CurrencyCode) -> Option<f64> {
        self.rates.get(currency).copied()
    }

    /// Convert an amount, or None when either currency has no usable rate
    pub fn convert(&self, amount: f64, from: &CurrencyCode, to: &CurrencyCode) -> Option<f64> {
        if from == to {
            return Some(amount);
        }
        let from_rate = self.rate(from)?;
        let to_rate = self.rate(to)?;

        let (numerator, denominator) = match self.quote {
            RateQuote::BasePerUnit => (from_rate, to_rate),
            RateQuote::UnitsPerAnchor => (to_rate, from_rate),
        };
        if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
            return None;
        }
        Some(amount * numerator / denominator)
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
