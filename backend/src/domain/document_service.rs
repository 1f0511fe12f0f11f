//! Documents attached to a trip (tickets, passports, vouchers).
//!
//! The file payload is opaque to the planner and stored as given.

use anyhow::Result;
use chrono::Utc;
use log::info;
use shared::Document;

use super::commands::documents::AddDocumentCommand;
use super::models::PlannerError;
use crate::storage::{Connection, TripScopedStorage, TripStorage};

#[derive(Clone)]
pub struct DocumentService<C: Connection> {
    trip_repository: C::TripRepository,
    document_repository: C::DocumentRepository,
}

impl<C: Connection> DocumentService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            trip_repository: connection.create_trip_repository(),
            document_repository: connection.create_document_repository(),
        }
    }

    pub async fn add_document(&self, command: AddDocumentCommand) -> Result<Document> {
        info!("Adding document '{}' to trip {}", command.name, command.trip_id);

        let name = command.name.trim();
        if name.is_empty() {
            return Err(PlannerError::EmptyField("Document name").into());
        }
        if self.trip_repository.get_trip(&command.trip_id).await?.is_none() {
            return Err(PlannerError::TripNotFound(command.trip_id).into());
        }

        let mut document = Document {
            id: String::new(),
            trip_id: command.trip_id,
            name: name.to_string(),
            description: command.description.filter(|d| !d.trim().is_empty()),
            mime_type: command.mime_type,
            file: command.file,
            created_at: Utc::now().to_rfc3339(),
        };
        document.id = self.document_repository.create(&document).await?;

        info!("Successfully added document: {}", document.id);
        Ok(document)
    }

    /// Documents of a trip, newest first
    pub async fn list_documents(&self, trip_id: &str) -> Result<Vec<Document>> {
        let mut documents = self.document_repository.list_by_trip(trip_id).await?;
        documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(documents)
    }

    pub async fn get_document(&self, document_id: &str) -> Result<Option<Document>> {
        self.document_repository.get(document_id).await
    }

    pub async fn delete_document(&self, document_id: &str) -> Result<bool> {
        info!("Deleting document: {}", document_id);
        self.document_repository.delete(document_id).await
    }
}
