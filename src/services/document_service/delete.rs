use crate::api::error::AppError;
use crate::entities::{documents, prelude::*};
use sea_orm::{EntityTrait, QueryOrder, TransactionTrait};

use super::DocumentService;

impl DocumentService {
    /// Deletes one document and its blob. Returns the removed record.
    ///
    /// A blob that is already gone is fine; any other I/O error stops before
    /// the record is touched.
    pub async fn remove_document(&self, id: i32) -> Result<documents::Model, AppError> {
        let doc = self.find_document(id).await?;

        let key = self.storage_key(&doc);
        if !self.storage.delete_file(&key).await? {
            tracing::warn!("Blob '{}' for document {} was already missing", key, doc.id);
        }

        Documents::delete_by_id(doc.id).exec(&self.db).await?;

        tracing::info!("🗑️  Removed document {} ('{}')", doc.id, doc.filename);
        Ok(doc)
    }

    /// Deletes every document and blob regardless of status. Returns how many
    /// records were removed.
    pub async fn cancel_all(&self) -> Result<usize, AppError> {
        let txn = self.db.begin().await?;

        let docs = Documents::find()
            .order_by_asc(documents::Column::Id)
            .all(&txn)
            .await?;

        for doc in &docs {
            let key = self.storage_key(doc);
            if !self.storage.delete_file(&key).await? {
                tracing::warn!("Blob '{}' for document {} was already missing", key, doc.id);
            }
            Documents::delete_by_id(doc.id).exec(&txn).await?;
        }

        txn.commit().await?;

        tracing::info!("🧹 Cancelled upload set, removed {} document(s)", docs.len());
        Ok(docs.len())
    }
}
