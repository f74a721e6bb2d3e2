use crate::api::error::AppError;
use crate::config::StorageKeyStrategy;
use crate::entities::{documents, documents::DocumentStatus, prelude::*};
use crate::utils::validation::{validate_file_size, validate_filename};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

use super::DocumentService;

impl DocumentService {
    /// Stores one uploaded file and records it as `pending`.
    ///
    /// Validation failures leave both the upload directory and the table untouched.
    pub async fn upload_document(
        &self,
        filename: &str,
        data: &[u8],
    ) -> Result<documents::Model, AppError> {
        validate_filename(filename)?;
        validate_file_size(
            data.len(),
            self.config.max_file_size,
            &self.config.max_file_size_label(),
        )?;

        let doc = match self.config.storage_key_strategy {
            StorageKeyStrategy::Filename => {
                self.storage.upload_file(filename, data).await?;
                self.insert_pending(filename).await?
            }
            StorageKeyStrategy::RecordId => {
                // The key is the id, so the row has to exist before the blob.
                let doc = self.insert_pending(filename).await?;
                if let Err(e) = self.storage.upload_file(&doc.id.to_string(), data).await {
                    if let Err(cleanup) = Documents::delete_by_id(doc.id).exec(&self.db).await {
                        tracing::error!(
                            "Failed to drop record {} after blob write failure: {}",
                            doc.id,
                            cleanup
                        );
                    }
                    return Err(e.into());
                }
                doc
            }
        };

        tracing::info!(
            "📄 Stored '{}' as document {} ({} bytes)",
            doc.filename,
            doc.id,
            data.len()
        );

        Ok(doc)
    }

    async fn insert_pending(&self, filename: &str) -> Result<documents::Model, AppError> {
        let doc = documents::ActiveModel {
            filename: Set(filename.to_string()),
            status: Set(DocumentStatus::Pending),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        Ok(doc.insert(&self.db).await?)
    }
}
