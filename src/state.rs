use crate::db::DbPool;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::notification::{NotificationDispatcher, NotificationRepository};
use crate::project::{ProjectRepository, ProjectService};
use crate::task::TaskService;
use crate::user::UserRepository;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub notification_tx: broadcast::Sender<String>,
    pub user_repository: UserRepository,
    pub project_repository: ProjectRepository,
    pub notification_repository: NotificationRepository,
    pub dispatcher: NotificationDispatcher,
    pub task_service: TaskService,
    pub project_service: ProjectService,
}

#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a number"),
        }
    }
}
