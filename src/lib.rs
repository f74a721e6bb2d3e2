pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod services;
pub mod utils;

use crate::config::UploadConfig;
use crate::services::document_service::DocumentService;
use crate::services::storage::StorageService;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{delete, get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::documents::get_files,
        api::handlers::documents::upload_file,
        api::handlers::documents::remove_file,
        api::handlers::documents::submit_all,
        api::handlers::documents::cancel_upload,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            entities::documents::DocumentStatus,
            api::handlers::documents::DocumentResponse,
            api::handlers::documents::UploadResponse,
            api::handlers::documents::MessageResponse,
            api::handlers::documents::ErrorResponse,
            api::handlers::documents::UploadForm,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "files", description = "Document upload endpoints"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: Arc<dyn StorageService>,
    pub document_service: Arc<DocumentService>,
    pub config: UploadConfig,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        storage: Arc<dyn StorageService>,
        config: UploadConfig,
    ) -> Self {
        let document_service = Arc::new(DocumentService::new(
            db.clone(),
            storage.clone(),
            config.clone(),
        ));

        Self {
            db,
            storage,
            document_service,
            config,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let upload_dir = state.config.upload_dir.clone();
    let body_limit = state.config.request_body_limit();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(api::handlers::index::index))
        .route("/health", get(api::handlers::health::health_check))
        .route("/get_files", get(api::handlers::documents::get_files))
        .route(
            "/upload",
            post(api::handlers::documents::upload_file).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            "/remove/:id",
            delete(api::handlers::documents::remove_file),
        )
        .route("/submit", post(api::handlers::documents::submit_all))
        .route("/cancel", post(api::handlers::documents::cancel_upload))
        .nest_service("/static/uploads", ServeDir::new(upload_dir))
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .with_state(state)
}
