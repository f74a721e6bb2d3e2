use crate::config::UploadConfig;
use crate::entities::documents;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::time::Duration;
use tracing::info;

pub async fn setup_database(config: &UploadConfig) -> anyhow::Result<DatabaseConnection> {
    info!("📂 Database: {}", config.database_url);

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.max_connections(config.db_max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;

    info!("✅ Database connected successfully");

    run_migrations(&db).await?;

    Ok(db)
}

/// Creates the `documents` table when it does not exist yet.
pub async fn run_migrations(db: &DatabaseConnection) -> anyhow::Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    info!("🔄 Running auto-migrations...");

    let stmt = schema
        .create_table_from_entity(documents::Entity)
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&stmt)).await?;
    info!("   - Table 'documents' checked/created");

    Ok(())
}
