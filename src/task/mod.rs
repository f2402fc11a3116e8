pub mod task_dto;
pub mod task_handlers;
pub mod task_models;
pub mod task_repository;
pub mod task_service;

pub use task_dto::CreateTaskRequest;
pub use task_handlers::{create_task, get_task, get_tasks};
pub use task_models::{Task, TaskStatus};
pub use task_repository::TaskRepository;
pub use task_service::{NotifyQueue, ProjectLookup, Requester, TaskService, TaskStore};
