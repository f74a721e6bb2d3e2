use async_trait::async_trait;
use file_upload_service::api::error::AppError;
use file_upload_service::config::{StorageKeyStrategy, UploadConfig};
use file_upload_service::entities::documents::DocumentStatus;
use file_upload_service::infrastructure::database;
use file_upload_service::services::document_service::DocumentService;
use file_upload_service::services::storage::StorageService;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// In-memory blob store. Keys listed in `broken` fail on every operation.
struct MockStorageService {
    files: Mutex<HashMap<String, Vec<u8>>>,
    broken: Mutex<Vec<String>>,
}

impl MockStorageService {
    fn new() -> Self {
        Self {
            files: Mutex::new(HashMap::new()),
            broken: Mutex::new(Vec::new()),
        }
    }

    fn break_key(&self, key: &str) {
        self.broken.lock().unwrap().push(key.to_string());
    }

    fn check(&self, key: &str) -> anyhow::Result<()> {
        if self.broken.lock().unwrap().iter().any(|k| k == key) {
            return Err(anyhow::anyhow!("I/O error on '{}'", key));
        }
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.files.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_ready(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn upload_file(&self, key: &str, data: &[u8]) -> anyhow::Result<()> {
        self.check(key)?;
        self.files
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn get_file(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        self.check(key)?;
        self.files
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Key not found"))
    }

    async fn delete_file(&self, key: &str) -> anyhow::Result<bool> {
        self.check(key)?;
        Ok(self.files.lock().unwrap().remove(key).is_some())
    }

    async fn file_exists(&self, key: &str) -> anyhow::Result<bool> {
        self.check(key)?;
        Ok(self.files.lock().unwrap().contains_key(key))
    }
}

async fn setup_service(
    strategy: StorageKeyStrategy,
) -> (DocumentService, Arc<MockStorageService>, TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let config = UploadConfig {
        storage_key_strategy: strategy,
        ..UploadConfig::with_root(tmp.path())
    };
    let db = database::setup_database(&config).await.unwrap();
    let storage = Arc::new(MockStorageService::new());
    let service = DocumentService::new(db, storage.clone(), config);
    (service, storage, tmp)
}

#[tokio::test]
async fn test_upload_creates_pending_record_and_blob() {
    let (service, storage, _tmp) = setup_service(StorageKeyStrategy::Filename).await;

    let doc = service.upload_document("a.txt", b"alpha").await.unwrap();
    assert_eq!(doc.filename, "a.txt");
    assert_eq!(doc.status, DocumentStatus::Pending);
    assert_eq!(service.storage_key(&doc), "a.txt");
    assert_eq!(storage.get_file("a.txt").await.unwrap(), b"alpha");
}

#[tokio::test]
async fn test_validation_failures_have_no_side_effects() {
    let (service, storage, _tmp) = setup_service(StorageKeyStrategy::Filename).await;

    let err = service.upload_document("", b"x").await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "No file uploaded"));

    let too_big = vec![0u8; 500 * 1024 + 1];
    let err = service.upload_document("big.bin", &too_big).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "File exceeds 500KB limit"));

    assert!(service.list_documents().await.unwrap().is_empty());
    assert!(storage.keys().is_empty());
}

#[tokio::test]
async fn test_failed_blob_write_under_filename_keys_creates_no_record() {
    let (service, storage, _tmp) = setup_service(StorageKeyStrategy::Filename).await;
    storage.break_key("bad.txt");

    let err = service.upload_document("bad.txt", b"x").await.unwrap_err();
    assert!(matches!(err, AppError::Anyhow(_)));
    assert!(service.list_documents().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_blob_write_under_record_id_keys_drops_the_record() {
    let (service, storage, _tmp) = setup_service(StorageKeyStrategy::RecordId).await;

    // First insert gets id 1.
    storage.break_key("1");

    let err = service.upload_document("doc.txt", b"x").await.unwrap_err();
    assert!(matches!(err, AppError::Anyhow(_)));
    assert!(service.list_documents().await.unwrap().is_empty());
    assert!(storage.keys().is_empty());
}

#[tokio::test]
async fn test_remove_unknown_id_is_not_found() {
    let (service, _storage, _tmp) = setup_service(StorageKeyStrategy::Filename).await;

    let err = service.remove_document(42).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref m) if m == "File not found"));
}

#[tokio::test]
async fn test_remove_tolerates_missing_blob() {
    let (service, storage, _tmp) = setup_service(StorageKeyStrategy::Filename).await;

    let doc = service.upload_document("a.txt", b"alpha").await.unwrap();
    storage.delete_file("a.txt").await.unwrap();

    let removed = service.remove_document(doc.id).await.unwrap();
    assert_eq!(removed.id, doc.id);
    assert!(service.list_documents().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_stops_on_unexpected_io_error() {
    let (service, storage, _tmp) = setup_service(StorageKeyStrategy::Filename).await;

    let doc = service.upload_document("stuck.txt", b"data").await.unwrap();
    storage.break_key("stuck.txt");

    assert!(service.remove_document(doc.id).await.is_err());

    let docs = service.list_documents().await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, doc.id);
}

#[tokio::test]
async fn test_submit_reports_changes_once() {
    let (service, _storage, _tmp) = setup_service(StorageKeyStrategy::Filename).await;

    service.upload_document("a.txt", b"a").await.unwrap();
    service.upload_document("b.txt", b"b").await.unwrap();

    assert_eq!(service.submit_all().await.unwrap(), 2);
    assert_eq!(service.submit_all().await.unwrap(), 0);

    service.upload_document("c.txt", b"c").await.unwrap();
    assert_eq!(service.submit_all().await.unwrap(), 1);

    let docs = service.list_documents().await.unwrap();
    assert!(docs.iter().all(|d| d.status == DocumentStatus::Saved));
}

#[tokio::test]
async fn test_cancel_removes_everything() {
    let (service, storage, _tmp) = setup_service(StorageKeyStrategy::RecordId).await;

    service.upload_document("a.txt", b"a").await.unwrap();
    service.submit_all().await.unwrap();
    service.upload_document("a.txt", b"a again").await.unwrap();
    assert_eq!(storage.keys().len(), 2);

    assert_eq!(service.cancel_all().await.unwrap(), 2);
    assert!(service.list_documents().await.unwrap().is_empty());
    assert!(storage.keys().is_empty());

    assert_eq!(service.cancel_all().await.unwrap(), 0);
}

#[tokio::test]
async fn test_cancel_is_rolled_back_on_io_error() {
    let (service, storage, _tmp) = setup_service(StorageKeyStrategy::Filename).await;

    service.upload_document("a.txt", b"a").await.unwrap();
    service.upload_document("b.txt", b"b").await.unwrap();
    storage.break_key("b.txt");

    assert!(service.cancel_all().await.is_err());

    // Record deletions are transactional; the blob already deleted stays deleted.
    assert_eq!(service.list_documents().await.unwrap().len(), 2);
    assert_eq!(storage.keys(), vec!["b.txt".to_string()]);
}
