use uuid::Uuid;
use validator::Validate;

use super::task_dto::CreateTaskRequest;
use super::task_models::Task;
use super::task_repository::TaskRepository;
use crate::error::{AppError, Result};
use crate::notification::NotificationDispatcher;
use crate::project::{Project, ProjectRepository};

/// Identity of the caller, passed explicitly rather than read from
/// ambient request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requester {
    Anonymous,
    User(Uuid),
}

impl From<Option<Uuid>> for Requester {
    fn from(user_id: Option<Uuid>) -> Self {
        match user_id {
            Some(id) => Requester::User(id),
            None => Requester::Anonymous,
        }
    }
}

/// Project lookups the task workflow depends on.
pub trait ProjectLookup: Send + Sync {
    fn find_by_id(&self, id: Uuid) -> impl std::future::Future<Output = Result<Option<Project>>> + Send;
    fn is_member(&self, project_id: Uuid, user_id: Uuid) -> impl std::future::Future<Output = Result<bool>> + Send;
}

/// Task persistence the workflow depends on.
pub trait TaskStore: Send + Sync {
    fn insert(&self, owner_id: Uuid, name: &str, project_id: Option<Uuid>) -> impl std::future::Future<Output = Result<Task>> + Send;
    fn find_all_for_user(&self, user_id: Uuid) -> impl std::future::Future<Output = Result<Vec<Task>>> + Send;
    fn find_by_id(&self, id: Uuid, user_id: Uuid) -> impl std::future::Future<Output = Result<Option<Task>>> + Send;
}

/// Hand-off to the asynchronous notification queue. Never blocks and
/// never fails the caller; a dropped job is logged by the implementation.
pub trait NotifyQueue: Send + Sync {
    fn enqueue(&self, task_id: Uuid, user_id: Uuid);
}

impl ProjectLookup for ProjectRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>> {
        ProjectRepository::find_by_id(self, id).await
    }

    async fn is_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool> {
        ProjectRepository::is_member(self, project_id, user_id).await
    }
}

impl TaskStore for TaskRepository {
    async fn insert(&self, owner_id: Uuid, name: &str, project_id: Option<Uuid>) -> Result<Task> {
        TaskRepository::insert(self, owner_id, name, project_id).await
    }

    async fn find_all_for_user(&self, user_id: Uuid) -> Result<Vec<Task>> {
        TaskRepository::find_all_for_user(self, user_id).await
    }

    async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<Task>> {
        TaskRepository::find_by_id(self, id, user_id).await
    }
}

impl NotifyQueue for NotificationDispatcher {
    fn enqueue(&self, task_id: Uuid, user_id: Uuid) {
        NotificationDispatcher::enqueue(self, task_id, user_id)
    }
}

/// Service layer for task-related business logic.
#[derive(Clone)]
pub struct TaskService<P = ProjectRepository, T = TaskRepository, Q = NotificationDispatcher> {
    projects: P,
    tasks: T,
    queue: Q,
}

impl<P, T, Q> TaskService<P, T, Q>
where
    P: ProjectLookup,
    T: TaskStore,
    Q: NotifyQueue,
{
    pub fn new(projects: P, tasks: T, queue: Q) -> Self {
        Self {
            projects,
            tasks,
            queue,
        }
    }

    /// Create a task for `requester`, optionally scoped to a project.
    ///
    /// Order of checks: authentication, then payload validation, then
    /// project existence and membership. Nothing is persisted until all
    /// checks pass.
    ///
    /// After the insert, exactly one notification job `(task_id,
    /// user_id)` is handed to the queue. The hand-off is non-blocking
    /// and not transactional with the insert: if the queue is gone, the
    /// task still exists and the dropped job is logged. A project
    /// deleted between the membership check and the insert surfaces as
    /// a foreign-key database error.
    pub async fn create_task(
        &self,
        requester: Requester,
        payload: CreateTaskRequest,
    ) -> Result<Task> {
        let Requester::User(user_id) = requester else {
            return Err(AppError::AuthenticationRequired);
        };

        payload
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let project = match payload.project_id {
            Some(project_id) => {
                let project = self
                    .projects
                    .find_by_id(project_id)
                    .await?
                    .ok_or(AppError::ProjectNotFound(project_id))?;

                if !self.projects.is_member(project.id, user_id).await? {
                    return Err(AppError::NotAProjectMember);
                }

                Some(project)
            }
            None => None,
        };

        let task = self
            .tasks
            .insert(user_id, &payload.name, project.map(|p| p.id))
            .await?;

        self.queue.enqueue(task.id, user_id);

        Ok(task)
    }

    pub async fn list_tasks(&self, user_id: Uuid) -> Result<Vec<Task>> {
        self.tasks.find_all_for_user(user_id).await
    }

    pub async fn get_task(&self, user_id: Uuid, task_id: Uuid) -> Result<Task> {
        self.tasks
            .find_by_id(task_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::task_models::TaskStatus;
    use chrono::Utc;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct FakeProjects {
        projects: Arc<Mutex<Vec<Project>>>,
        members: Arc<Mutex<HashSet<(Uuid, Uuid)>>>,
        membership_checks: Arc<AtomicUsize>,
    }

    impl FakeProjects {
        fn with_project(self, project: Project) -> Self {
            self.projects.lock().unwrap().push(project);
            self
        }

        fn with_member(self, project_id: Uuid, user_id: Uuid) -> Self {
            self.members.lock().unwrap().insert((project_id, user_id));
            self
        }
    }

    impl ProjectLookup for FakeProjects {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>> {
            Ok(self
                .projects
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == id)
                .cloned())
        }

        async fn is_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool> {
            self.membership_checks.fetch_add(1, Ordering::SeqCst);
            Ok(self.members.lock().unwrap().contains(&(project_id, user_id)))
        }
    }

    #[derive(Clone, Default)]
    struct FakeTasks {
        rows: Arc<Mutex<Vec<Task>>>,
    }

    impl TaskStore for FakeTasks {
        async fn insert(&self, owner_id: Uuid, name: &str, project_id: Option<Uuid>) -> Result<Task> {
            let now = Utc::now();
            let task = Task {
                id: Uuid::new_v4(),
                user_id: owner_id,
                project_id,
                name: name.to_string(),
                status: TaskStatus::Pending.to_string(),
                job_id: None,
                result: None,
                created_at: now,
                updated_at: now,
            };
            self.rows.lock().unwrap().push(task.clone());
            Ok(task)
        }

        async fn find_all_for_user(&self, user_id: Uuid) -> Result<Vec<Task>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<Task>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|t| t.id == id && t.user_id == user_id)
                .cloned())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingQueue {
        jobs: Arc<Mutex<Vec<(Uuid, Uuid)>>>,
    }

    impl NotifyQueue for RecordingQueue {
        fn enqueue(&self, task_id: Uuid, user_id: Uuid) {
            self.jobs.lock().unwrap().push((task_id, user_id));
        }
    }

    fn project(name: &str) -> Project {
        let now = Utc::now();
        Project {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn service(
        projects: FakeProjects,
        tasks: FakeTasks,
        queue: RecordingQueue,
    ) -> TaskService<FakeProjects, FakeTasks, RecordingQueue> {
        TaskService::new(projects, tasks, queue)
    }

    fn request(name: &str, project_id: Option<Uuid>) -> CreateTaskRequest {
        CreateTaskRequest {
            name: name.to_string(),
            project_id,
        }
    }

    #[tokio::test]
    async fn anonymous_requester_is_rejected_before_any_mutation() {
        let tasks = FakeTasks::default();
        let queue = RecordingQueue::default();
        let svc = service(FakeProjects::default(), tasks.clone(), queue.clone());

        let err = svc
            .create_task(Requester::Anonymous, request("Write report", None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AuthenticationRequired));
        assert!(tasks.rows.lock().unwrap().is_empty());
        assert!(queue.jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn anonymous_requester_beats_payload_validation() {
        let svc = service(
            FakeProjects::default(),
            FakeTasks::default(),
            RecordingQueue::default(),
        );

        let err = svc
            .create_task(Requester::Anonymous, request("", None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::AuthenticationRequired));
    }

    #[tokio::test]
    async fn unknown_project_is_rejected_before_any_mutation() {
        let user = Uuid::new_v4();
        let missing = Uuid::new_v4();
        let tasks = FakeTasks::default();
        let queue = RecordingQueue::default();
        let svc = service(FakeProjects::default(), tasks.clone(), queue.clone());

        let err = svc
            .create_task(Requester::User(user), request("Y", Some(missing)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ProjectNotFound(id) if id == missing));
        assert!(tasks.rows.lock().unwrap().is_empty());
        assert!(queue.jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_member_is_rejected_before_any_mutation() {
        let outsider = Uuid::new_v4();
        let p1 = project("P1");
        let projects = FakeProjects::default().with_project(p1.clone());
        let tasks = FakeTasks::default();
        let queue = RecordingQueue::default();
        let svc = service(projects, tasks.clone(), queue.clone());

        let err = svc
            .create_task(Requester::User(outsider), request("X", Some(p1.id)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotAProjectMember));
        assert!(tasks.rows.lock().unwrap().is_empty());
        assert!(queue.jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn member_creates_pending_task_and_enqueues_one_job() {
        let u1 = Uuid::new_v4();
        let p1 = project("P1");
        let projects = FakeProjects::default()
            .with_project(p1.clone())
            .with_member(p1.id, u1);
        let tasks = FakeTasks::default();
        let queue = RecordingQueue::default();
        let svc = service(projects, tasks.clone(), queue.clone());

        let task = svc
            .create_task(Requester::User(u1), request("Write report", Some(p1.id)))
            .await
            .unwrap();

        assert_eq!(task.name, "Write report");
        assert_eq!(task.user_id, u1);
        assert_eq!(task.project_id, Some(p1.id));
        assert_eq!(task.status, TaskStatus::Pending.to_string());
        assert_eq!(tasks.rows.lock().unwrap().len(), 1);
        assert_eq!(*queue.jobs.lock().unwrap(), vec![(task.id, u1)]);
    }

    #[tokio::test]
    async fn omitting_project_skips_the_membership_check() {
        let u1 = Uuid::new_v4();
        let projects = FakeProjects::default();
        let queue = RecordingQueue::default();
        let svc = service(projects.clone(), FakeTasks::default(), queue.clone());

        let task = svc
            .create_task(Requester::User(u1), request("Standalone", None))
            .await
            .unwrap();

        assert_eq!(task.project_id, None);
        assert_eq!(projects.membership_checks.load(Ordering::SeqCst), 0);
        assert_eq!(*queue.jobs.lock().unwrap(), vec![(task.id, u1)]);
    }

    #[tokio::test]
    async fn empty_name_is_rejected_for_authenticated_requesters() {
        let u1 = Uuid::new_v4();
        let tasks = FakeTasks::default();
        let svc = service(
            FakeProjects::default(),
            tasks.clone(),
            RecordingQueue::default(),
        );

        let err = svc
            .create_task(Requester::User(u1), request("", None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(tasks.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_task_returns_not_found_for_foreign_tasks() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let tasks = FakeTasks::default();
        let svc = service(
            FakeProjects::default(),
            tasks.clone(),
            RecordingQueue::default(),
        );

        let task = svc
            .create_task(Requester::User(owner), request("Mine", None))
            .await
            .unwrap();

        assert!(svc.get_task(owner, task.id).await.is_ok());
        assert!(matches!(
            svc.get_task(other, task.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
