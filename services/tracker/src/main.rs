use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use common::database::{DatabaseConfig, init_pool};

use tracker::{
    repositories::{LocationRepository, ResponseRepository, SummaryRepository, UserRepository},
    routes, schema,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting tracker service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Bootstrap schema and seed data
    schema::init_schema(&pool).await?;

    let user_repository = UserRepository::new(pool.clone());
    let location_repository = LocationRepository::new(pool.clone());
    let response_repository = ResponseRepository::new(pool.clone());
    let summary_repository = SummaryRepository::new(pool.clone());

    schema::seed_defaults(&location_repository, &user_repository).await?;

    info!("Tracker service initialized successfully");

    let app_state = AppState {
        db_pool: pool,
        user_repository,
        location_repository,
        response_repository,
        summary_repository,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("Tracker service listening on 0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
