//! Trip notes and their debounced autosave.
//!
//! A trip has at most one note: the first save creates it and later saves
//! update it in place.
//!
//! [`NoteAutosaver`] turns a stream of edits into occasional writes. Every
//! edit arms a delayed save task and aborts the one before it; only the
//! content present when the delay elapses is written. Dropping or
//! cancelling the autosaver abandons a pending save without writing it.

use anyhow::Result;
use chrono::Utc;
use log::{debug, error, info};
use shared::{AutosaveStatus, EntityId, Note};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::models::PlannerError;
use crate::storage::{Connection, TripScopedStorage, TripStorage};

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(1500);

/// Service for trip notes
#[derive(Clone)]
pub struct NoteService<C: Connection> {
    trip_repository: C::TripRepository,
    note_repository: C::NoteRepository,
}

impl<C: Connection> NoteService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            trip_repository: connection.create_trip_repository(),
            note_repository: connection.create_note_repository(),
        }
    }

    /// The trip's note, if one was ever saved
    pub async fn get_note(&self, trip_id: &str) -> Result<Option<Note>> {
        let notes = self.note_repository.list_by_trip(trip_id).await?;
        Ok(notes.into_iter().next())
    }

    /// Create the trip's note or overwrite its content
    pub async fn save_note(&self, trip_id: &str, content: &str) -> Result<Note> {
        debug!("Saving note for trip {} ({} chars)", trip_id, content.len());

        let now = Utc::now().to_rfc3339();
        match self.get_note(trip_id).await? {
            Some(mut note) => {
                note.content = content.to_string();
                note.updated_at = now;
                if !self.note_repository.update(&note).await? {
                    return Err(PlannerError::RecordNotFound(note.id).into());
                }
                Ok(note)
            }
            None => {
                if self.trip_repository.get_trip(trip_id).await?.is_none() {
                    return Err(PlannerError::TripNotFound(trip_id.to_string()).into());
                }
                let mut note = Note {
                    id: String::new(),
                    trip_id: trip_id.to_string(),
                    content: content.to_string(),
                    updated_at: now,
                };
                note.id = self.note_repository.create(&note).await?;
                info!("Created note {} for trip {}", note.id, trip_id);
                Ok(note)
            }
        }
    }

    /// Autosaver for one trip's note
    pub fn autosaver(&self, trip_id: &str, delay: Duration) -> NoteAutosaver<C> {
        NoteAutosaver::new(self.clone(), trip_id.to_string(), delay)
    }
}

/// Debounced writer for one trip's note
pub struct NoteAutosaver<C: Connection> {
    note_service: NoteService<C>,
    trip_id: EntityId,
    delay: Duration,
    latest: Arc<Mutex<Option<String>>>,
    pending: Option<JoinHandle<()>>,
    status: Arc<watch::Sender<AutosaveStatus>>,
}

impl<C: Connection> NoteAutosaver<C> {
    pub fn new(note_service: NoteService<C>, trip_id: EntityId, delay: Duration) -> Self {
        let (status, _) = watch::channel(AutosaveStatus::Idle);
        Self {
            note_service,
            trip_id,
            delay,
            latest: Arc::new(Mutex::new(None)),
            pending: None,
            status: Arc::new(status),
        }
    }

    pub fn status(&self) -> AutosaveStatus {
        self.status.borrow().clone()
    }

    /// Receiver that observes every status change
    pub fn subscribe(&self) -> watch::Receiver<AutosaveStatus> {
        self.status.subscribe()
    }

    /// Record an edit and re-arm the delayed save
    ///
    /// Must be called inside a tokio runtime.
    pub fn edit(&mut self, content: impl Into<String>) {
        set_latest(&self.latest, Some(content.into()));
        self.disarm();
        self.status.send_replace(AutosaveStatus::Pending);

        let note_service = self.note_service.clone();
        let trip_id = self.trip_id.clone();
        let delay = self.delay;
        let latest = Arc::clone(&self.latest);
        let status = Arc::clone(&self.status);

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(content) = set_latest(&latest, None) {
                debug!("Autosave delay elapsed for trip {}", trip_id);
                let outcome = note_service.save_note(&trip_id, &content).await;
                let _ = publish(&status, &trip_id, outcome);
            }
        }));
    }

    /// Write pending content now, skipping the remaining delay
    ///
    /// Returns None when nothing was pending.
    pub async fn flush(&mut self) -> Result<Option<Note>> {
        self.disarm();
        let Some(content) = set_latest(&self.latest, None) else {
            return Ok(None);
        };

        let outcome = self.note_service.save_note(&self.trip_id, &content).await;
        let note = publish(&self.status, &self.trip_id, outcome)?;
        Ok(Some(note))
    }

    /// Manual save of the given content, bypassing the debounce
    pub async fn save_now(&mut self, content: impl Into<String>) -> Result<Note> {
        set_latest(&self.latest, Some(content.into()));
        self.flush()
            .await?
            .ok_or_else(|| anyhow::anyhow!("No note content to save"))
    }

    /// Abandon any pending save without writing it
    pub fn cancel(&mut self) {
        self.disarm();
        if set_latest(&self.latest, None).is_some() {
            info!("Abandoned pending note save for trip {}", self.trip_id);
        }
        self.status.send_replace(AutosaveStatus::Idle);
    }

    pub fn has_pending(&self) -> bool {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn disarm(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<C: Connection> Drop for NoteAutosaver<C> {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// Replace the pending content, returning what was there
fn set_latest(latest: &Mutex<Option<String>>, value: Option<String>) -> Option<String> {
    let mut guard = latest.lock().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *guard, value)
}

fn publish(status: &watch::Sender<AutosaveStatus>, trip_id: &str, outcome: Result<Note>) -> Result<Note> {
    match &outcome {
        Ok(note) => {
            status.send_replace(AutosaveStatus::Saved(note.updated_at.clone()));
        }
        Err(e) => {
            error!("Failed to save note for trip {}: {}", trip_id, e);
            status.send_replace(AutosaveStatus::Failed(e.to_string()));
        }
    }
    outcome
}
