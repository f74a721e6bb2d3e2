use crate::api::error::AppError;
use crate::entities::{documents, documents::DocumentStatus, prelude::*};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveEnum, ColumnTrait, EntityTrait, QueryFilter};

use super::DocumentService;

impl DocumentService {
    /// Marks every pending document as saved. Returns how many changed, so a
    /// repeated submit reports zero.
    pub async fn submit_all(&self) -> Result<u64, AppError> {
        let res = Documents::update_many()
            .col_expr(
                documents::Column::Status,
                Expr::value(DocumentStatus::Saved.to_value()),
            )
            .filter(documents::Column::Status.eq(DocumentStatus::Pending.to_value()))
            .exec(&self.db)
            .await?;

        tracing::info!("✅ Submitted upload set, {} document(s) marked saved", res.rows_affected);
        Ok(res.rows_affected)
    }
}
