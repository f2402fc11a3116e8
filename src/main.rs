mod auth;
mod db;
mod error;
mod middleware;
mod notification;
mod project;
mod routes;
mod state;
mod task;
mod user;

use db::{create_pool, run_migrations};
use notification::{run_notification_worker, NotificationDispatcher, NotificationRepository};
use project::{ProjectRepository, ProjectService};
use routes::create_router;
use state::{AppState, Config};
use std::sync::Arc;
use task::{TaskRepository, TaskService};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user::UserRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,taskverse=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    tracing::info!("Connecting to database...");
    let db = create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    run_migrations(&db).await?;

    // SSE fan-out for delivered notifications
    let (notification_tx, _) = broadcast::channel(100);

    // Fire-and-forget hand-off to the notification worker
    let (dispatcher, dispatch_rx) = NotificationDispatcher::channel();

    // Create repositories
    let user_repository = UserRepository::new(db.clone());
    let project_repository = ProjectRepository::new(db.clone());
    let task_repository = TaskRepository::new(db.clone());
    let notification_repository = NotificationRepository::new(db.clone());

    // Create services
    let task_service = TaskService::new(
        project_repository.clone(),
        task_repository.clone(),
        dispatcher.clone(),
    );
    let project_service = ProjectService::new(project_repository.clone());

    // Start the notification worker
    tokio::spawn(run_notification_worker(
        dispatch_rx,
        notification_repository.clone(),
        notification_tx.clone(),
    ));

    // Create application state
    let state = AppState {
        db: db.clone(),
        config: config.clone(),
        notification_tx,
        user_repository,
        project_repository,
        notification_repository,
        dispatcher,
        task_service,
        project_service,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
