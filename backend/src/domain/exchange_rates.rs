//! Exchange-rate providers consumed by the budget service.
//!
//! A provider either has a rate snapshot or reports that none is available
//! yet; the budget service degrades to native-currency totals in that case.

use async_trait::async_trait;
use log::debug;
use std::sync::RwLock;

use super::models::ExchangeRates;

#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Current rate snapshot, or None while rates are not loaded
    async fn get_rates(&self) -> Option<ExchangeRates>;
}

/// Provider holding a snapshot in memory, replaceable at runtime
#[derive(Debug, Default)]
pub struct FixedRateProvider {
    rates: RwLock<Option<ExchangeRates>>,
}

impl FixedRateProvider {
    pub fn new(rates: ExchangeRates) -> Self {
        Self {
            rates: RwLock::new(Some(rates)),
        }
    }

    /// Provider that starts without rates
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn set_rates(&self, rates: ExchangeRates) {
        debug!("Replacing exchange-rate snapshot");
        if let Ok(mut guard) = self.rates.write() {
            *guard = Some(rates);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.rates.write() {
            *guard = None;
        }
    }
}

#[async_trait]
impl ExchangeRateProvider for FixedRateProvider {
    async fn get_rates(&self) -> Option<ExchangeRates> {
        self.rates.read().ok().and_then(|guard| guard.clone())
    }
}

/// Provider for the "not yet loaded" state
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableRateProvider;

#[async_trait]
impl ExchangeRateProvider for UnavailableRateProvider {
    async fn get_rates(&self) -> Option<ExchangeRates> {
        None
    }
}
