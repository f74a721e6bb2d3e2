use crate::config::UploadConfig;
use crate::services::storage::{LocalStorageService, StorageService};
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(config: &UploadConfig) -> anyhow::Result<Arc<LocalStorageService>> {
    info!(
        "💾 Local Storage: {} (keys by {:?})",
        config.upload_dir.display(),
        config.storage_key_strategy
    );

    let storage = LocalStorageService::new(&config.upload_dir);
    storage.ensure_ready().await?;

    info!("✅ Upload directory '{}' is ready", config.upload_dir.display());

    Ok(Arc::new(storage))
}
