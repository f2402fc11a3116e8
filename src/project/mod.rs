pub mod project_dto;
pub mod project_handlers;
pub mod project_models;
pub mod project_repository;
pub mod project_service;

pub use project_dto::{AddMemberRequest, CreateProjectRequest};
pub use project_handlers::{add_member, create_project, get_project, get_projects};
pub use project_models::Project;
pub use project_repository::ProjectRepository;
pub use project_service::ProjectService;
