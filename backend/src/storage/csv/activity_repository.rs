//! # CSV Activity Repository
//!
//! Activities use the generic trip-scoped repository plus one extra
//! operation: the batch position update written by planner moves.

use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use shared::{Activity, ActivityChange};

use super::scoped_repository::CsvRepository;
use crate::storage::traits::{ActivityStorage, PositionWriteOutcome};

pub type ActivityRepository = CsvRepository<Activity>;

#[async_trait]
impl ActivityStorage for CsvRepository<Activity> {
    async fn apply_position_changes(&self, changes: &[ActivityChange]) -> Result<PositionWriteOutcome> {
        if changes.is_empty() {
            return Ok(PositionWriteOutcome::default());
        }

        let _guard = self.connection.lock_for_write().await;

        let (mut activities, unparsed) = self.load_for_write()?;
        let mut outcome = PositionWriteOutcome::default();

        for change in changes {
            match activities.iter_mut().find(|activity| activity.id == change.activity_id) {
                Some(activity) => {
                    activity.date = change.date;
                    activity.order = change.order;
                    outcome.applied.push(change.clone());
                }
                None => {
                    warn!("Activity {} no longer exists, dropping its position change", change.activity_id);
                    outcome.dropped_ids.push(change.activity_id.clone());
                }
            }
        }

        if !outcome.applied.is_empty() {
            // One rename covers the whole batch
            self.save_all(&activities, &unparsed)?;
        }

        info!(
            "Applied {} activity position changes ({} dropped)",
            outcome.applied.len(),
            outcome.dropped_ids.len()
        );
        Ok(outcome)
    }
}
