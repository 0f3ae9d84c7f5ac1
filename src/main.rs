//! CampusEvents maintenance entry point
//!
//! Derived counters on events and clubs are caches over source rows and
//! can always be reconstructed by re-aggregating. This binary connects
//! to the database, applies migrations, and rebuilds every counter.
//! Useful after imports, manual fixes, or a suspected drift.

use tracing::info;

use CampusEvents::{
    config::Settings,
    database::{connection::create_pool, run_migrations, DatabaseService},
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    logging::init_logging(&settings.logging)?;

    info!("Starting CampusEvents stats rebuild...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&settings.database).await?;

    // Run database migrations
    run_migrations(&db_pool).await?;

    // Initialize services
    let database_service = DatabaseService::new(db_pool);
    let services = ServiceFactory::new(database_service, settings);

    // Rebuild every derived counter from source rows
    let summary = services.stats.rebuild_all().await?;

    info!(
        events = summary.events,
        clubs = summary.clubs,
        "Stats rebuild finished"
    );

    Ok(())
}
