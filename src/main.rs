use rusty_game_rental::{
    adapters::mock::{
        catalog_service::CatalogService as MockCatalogService,
        member_directory::MemberDirectory as MockMemberDirectory, notifier::Notifier as MockNotifier,
    },
    adapters::postgres::{
        interest_queue::InterestQueue as PostgresInterestQueue,
        item_repository::ItemRepository as PostgresItemRepository,
        loan_repository::LoanRepository as PostgresLoanRepository,
    },
    api::{handlers::AppState, router::create_router},
    application::rental::ServiceDependencies,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rusty_game_rental=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection URL
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/game_rental".into());

    tracing::info!("Database URL: {}", database_url);

    // Initialize database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    // Initialize adapters
    // Member directory, catalog and notifier are mock implementations until
    // the surrounding contexts expose real services.
    let item_repository = Arc::new(PostgresItemRepository::new(pool.clone()));
    let loan_repository = Arc::new(PostgresLoanRepository::new(pool.clone()));
    let interest_queue = Arc::new(PostgresInterestQueue::new(pool.clone()));
    let member_directory = Arc::new(MockMemberDirectory::new());
    let catalog_service = Arc::new(MockCatalogService::new());
    let notifier = Arc::new(MockNotifier::new());

    // Create service dependencies
    let service_deps = ServiceDependencies {
        item_repository,
        loan_repository,
        interest_queue,
        member_directory,
        catalog_service,
        notifier,
    };

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
