use super::project_dto::CreateProjectRequest;
use super::project_models::Project;
use super::project_repository::ProjectRepository;
use crate::error::{AppError, Result};
use uuid::Uuid;

/// Service layer for project membership and lifecycle.
#[derive(Clone)]
pub struct ProjectService {
    repo: ProjectRepository,
}

impl ProjectService {
    pub fn new(repo: ProjectRepository) -> Self {
        Self { repo }
    }

    pub async fn create_project(
        &self,
        creator_id: Uuid,
        payload: CreateProjectRequest,
    ) -> Result<Project> {
        self.repo
            .create(creator_id, &payload.name, payload.description.as_deref())
            .await
            .map_err(|e| match e {
                AppError::Database(sqlx::Error::Database(ref db)) if db.is_unique_violation() => {
                    AppError::Conflict("Project name already taken".to_string())
                }
                other => other,
            })
    }

    pub async fn list_projects(&self, user_id: Uuid) -> Result<Vec<Project>> {
        self.repo.find_all_for_user(user_id).await
    }

    /// Members only; everyone else gets a membership error rather than
    /// an existence probe.
    pub async fn get_project(&self, user_id: Uuid, project_id: Uuid) -> Result<Project> {
        let project = self
            .repo
            .find_by_id(project_id)
            .await?
            .ok_or(AppError::ProjectNotFound(project_id))?;

        if !self.repo.is_member(project_id, user_id).await? {
            return Err(AppError::NotAProjectMember);
        }

        Ok(project)
    }

    pub async fn add_member(
        &self,
        requester_id: Uuid,
        project_id: Uuid,
        new_member_id: Uuid,
    ) -> Result<()> {
        if self.repo.find_by_id(project_id).await?.is_none() {
            return Err(AppError::ProjectNotFound(project_id));
        }

        if !self.repo.is_member(project_id, requester_id).await? {
            return Err(AppError::NotAProjectMember);
        }

        self.repo.add_member(project_id, new_member_id).await
    }
}
