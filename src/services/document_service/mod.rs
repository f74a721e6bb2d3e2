use crate::api::error::AppError;
use crate::config::{StorageKeyStrategy, UploadConfig};
use crate::entities::{documents, prelude::*};
use crate::services::storage::StorageService;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use std::sync::Arc;

pub mod delete;
pub mod status;
pub mod upload;

/// Operations over document records and their blobs.
///
/// No locking is done across requests: two uploads of the same filename under
/// [`StorageKeyStrategy::Filename`] race on one blob and the last writer wins.
pub struct DocumentService {
    db: DatabaseConnection,
    storage: Arc<dyn StorageService>,
    config: UploadConfig,
}

impl DocumentService {
    pub fn new(
        db: DatabaseConnection,
        storage: Arc<dyn StorageService>,
        config: UploadConfig,
    ) -> Self {
        Self {
            db,
            storage,
            config,
        }
    }

    /// Name of the blob backing `doc`.
    pub fn storage_key(&self, doc: &documents::Model) -> String {
        match self.config.storage_key_strategy {
            StorageKeyStrategy::Filename => doc.filename.clone(),
            StorageKeyStrategy::RecordId => doc.id.to_string(),
        }
    }

    /// All active documents in insertion order.
    pub async fn list_documents(&self) -> Result<Vec<documents::Model>, AppError> {
        let docs = Documents::find()
            .order_by_asc(documents::Column::Id)
            .all(&self.db)
            .await?;
        Ok(docs)
    }

    pub async fn find_document(&self, id: i32) -> Result<documents::Model, AppError> {
        Documents::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }
}
