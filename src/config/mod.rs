use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// How a document record maps to its blob in the upload directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKeyStrategy {
    /// Blob is stored under the client-supplied filename. Same-name uploads share one blob.
    #[default]
    Filename,
    /// Blob is stored under the record id.
    RecordId,
}

impl FromStr for StorageKeyStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "filename" => Ok(Self::Filename),
            "record_id" | "id" => Ok(Self::RecordId),
            other => Err(anyhow::anyhow!("unknown storage key strategy '{}'", other)),
        }
    }
}

/// Runtime configuration for the upload service
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Database connection URL (default: "sqlite://database.db?mode=rwc")
    pub database_url: String,

    /// Connection pool size (default: 5)
    pub db_max_connections: u32,

    /// Directory holding uploaded blobs (default: "static/uploads")
    pub upload_dir: PathBuf,

    /// Maximum file size in bytes (default: 500 KB)
    pub max_file_size: usize,

    /// Extra request body bytes allowed for multipart framing (default: 64 KB)
    pub multipart_overhead: usize,

    pub storage_key_strategy: StorageKeyStrategy,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://database.db?mode=rwc".to_string(),
            db_max_connections: 5,
            upload_dir: PathBuf::from("static").join("uploads"),
            max_file_size: 500 * 1024, // 500 KB
            multipart_overhead: 64 * 1024,
            storage_key_strategy: StorageKeyStrategy::Filename,
        }
    }
}

impl UploadConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),

            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.db_max_connections),

            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),

            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            multipart_overhead: env::var("MULTIPART_OVERHEAD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.multipart_overhead),

            storage_key_strategy: env::var("STORAGE_KEY_STRATEGY")
                .ok()
                .and_then(|v| match v.parse() {
                    Ok(strategy) => Some(strategy),
                    Err(e) => {
                        tracing::warn!("Ignoring STORAGE_KEY_STRATEGY: {}", e);
                        None
                    }
                })
                .unwrap_or(default.storage_key_strategy),
        }
    }

    /// Config rooted in a scratch directory, used by tests and local tooling
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            database_url: format!("sqlite://{}?mode=rwc", root.join("database.db").display()),
            upload_dir: root.join("uploads"),
            ..Self::default()
        }
    }

    /// Upper bound for a whole `/upload` request body
    pub fn request_body_limit(&self) -> usize {
        self.max_file_size + self.multipart_overhead
    }

    /// Human readable size limit, e.g. "500KB"
    pub fn max_file_size_label(&self) -> String {
        if self.max_file_size % (1024 * 1024) == 0 {
            format!("{}MB", self.max_file_size / 1024 / 1024)
        } else {
            format!("{}KB", self.max_file_size / 1024)
        }
    }
}
