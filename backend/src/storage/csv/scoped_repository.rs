//! # CSV Trip-Scoped Repository
//!
//! Generic file-backed repository for every record type owned by a trip.
//! Each record type maps to one table in the data directory and to a flat
//! CSV row struct; see `records.rs` for the row layouts.

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{EntityId, TripScoped};
use std::marker::PhantomData;
use std::path::PathBuf;

use super::connection::CsvConnection;
use super::table::{append_row, read_table, write_rows, Unparsed};
use crate::storage::traits::TripScopedStorage;

/// Mapping between a shared record type and its CSV table
pub trait CsvEntity: TripScoped + Clone + Send + Sync + 'static {
    /// Table file name inside the data directory
    const TABLE: &'static str;
    /// Prefix of ids minted for this record type
    const ID_PREFIX: &'static str;

    type Row: Serialize + DeserializeOwned + Send;

    fn to_row(&self) -> Result<Self::Row>;
    fn from_row(row: Self::Row) -> Result<Self>;
}

/// CSV-based repository for one trip-owned record type
pub struct CsvRepository<T> {
    pub(super) connection: CsvConnection,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for CsvRepository<T> {
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: CsvEntity> CsvRepository<T> {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            connection,
            _record: PhantomData,
        }
    }

    pub(super) fn table_path(&self) -> PathBuf {
        self.connection.table_path(T::TABLE)
    }

    /// Load the whole table, skipping rows that cannot be converted
    pub(super) fn load_all(&self) -> Result<Vec<T>> {
        Ok(self.load_for_write()?.0)
    }

    /// Load the table along with the rows a rewrite has to carry over
    pub(super) fn load_for_write(&self) -> Result<(Vec<T>, Unparsed)> {
        Ok(read_table::<T::Row>(&self.table_path())?.convert(T::TABLE, T::from_row))
    }

    /// Replace the whole table
    pub(super) fn save_all(&self, records: &[T], unparsed: &Unparsed) -> Result<()> {
        let rows = records
            .iter()
            .map(T::to_row)
            .collect::<Result<Vec<_>>>()?;
        write_rows(&self.table_path(), &rows, unparsed)
    }
}

#[async_trait]
impl<T: CsvEntity> TripScopedStorage<T> for CsvRepository<T> {
    async fn list_by_trip(&self, trip_id: &str) -> Result<Vec<T>> {
        let records = self.load_all()?;
        Ok(records
            .into_iter()
            .filter(|record| record.trip_id() == trip_id)
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<T>> {
        let records = self.load_all()?;
        Ok(records.into_iter().find(|record| record.id() == id))
    }

    async fn create(&self, record: &T) -> Result<EntityId> {
        let _guard = self.connection.lock_for_write().await;

        let id = CsvConnection::generate_id(T::ID_PREFIX);
        let mut stored = record.clone();
        stored.set_id(id.clone());

        append_row(&self.table_path(), &stored.to_row()?)?;

        info!("Stored {} record {} for trip {}", T::ID_PREFIX, id, stored.trip_id());
        Ok(id)
    }

    async fn update(&self, record: &T) -> Result<bool> {
        let _guard = self.connection.lock_for_write().await;

        let (mut records, unparsed) = self.load_for_write()?;
        let Some(existing) = records.iter_mut().find(|existing| existing.id() == record.id()) else {
            debug!("No {} record {} to update", T::ID_PREFIX, record.id());
            return Ok(false);
        };
        *existing = record.clone();

        self.save_all(&records, &unparsed)?;
        info!("Updated {} record {}", T::ID_PREFIX, record.id());
        Ok(true)
    }

    async fn modify(&self, id: &str, change: &(dyn for<'c> Fn(&'c mut T) + Send + Sync)) -> Result<Option<T>> {
        let _guard = self.connection.lock_for_write().await;

        let (mut records, unparsed) = self.load_for_write()?;
        let Some(existing) = records.iter_mut().find(|existing| existing.id() == id) else {
            debug!("No {} record {} to modify", T::ID_PREFIX, id);
            return Ok(None);
        };
        change(existing);
        let modified = existing.clone();

        self.save_all(&records, &unparsed)?;
        info!("Modified {} record {}", T::ID_PREFIX, id);
        Ok(Some(modified))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let _guard = self.connection.lock_for_write().await;

        let (mut records, unparsed) = self.load_for_write()?;
        let before = records.len();
        records.retain(|record| record.id() != id);

        if records.len() == before {
            return Ok(false);
        }

        self.save_all(&records, &unparsed)?;
        info!("Deleted {} record {}", T::ID_PREFIX, id);
        Ok(true)
    }

    async fn delete_all_by_trip(&self, trip_id: &str) -> Result<u32> {
        let _guard = self.connection.lock_for_write().await;

        let (mut records, unparsed) = self.load_for_write()?;
        let before = records.len();
        records.retain(|record| record.trip_id() != trip_id);
        let deleted = (before - records.len()) as u32;

        if deleted > 0 {
            self.save_all(&records, &unparsed)?;
        }

        info!("Deleted {} {} records for trip {}", deleted, T::ID_PREFIX, trip_id);
        Ok(deleted)
    }
}
