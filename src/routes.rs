use crate::{
    auth, middleware::auth_middleware, notification, project, state::AppState, task, user,
};
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::auth_handlers::register,
        auth::auth_handlers::login,
        user::user_handlers::me,
        project::project_handlers::create_project,
        project::project_handlers::get_projects,
        project::project_handlers::get_project,
        project::project_handlers::add_member,
        task::task_handlers::create_task,
        task::task_handlers::get_tasks,
        task::task_handlers::get_task,
        notification::notification_handlers::get_notifications,
        notification::notification_handlers::notification_stream,
        notification::notification_handlers::mark_notification_read,
    ),
    components(
        schemas(
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            user::User,
            user::UserResponse,
            project::Project,
            project::CreateProjectRequest,
            project::AddMemberRequest,
            task::Task,
            task::TaskStatus,
            task::CreateTaskRequest,
            notification::Notification,
            notification::NotificationKind,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User endpoints"),
        (name = "projects", description = "Project and membership endpoints"),
        (name = "tasks", description = "Task endpoints"),
        (name = "notifications", description = "Notification endpoints")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let user_routes = Router::new()
        .route("/me", get(user::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let project_routes = Router::new()
        .route("/", get(project::get_projects).post(project::create_project))
        .route("/:id", get(project::get_project))
        .route("/:id/members", post(project::add_member))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Task creation performs its own authentication step, so this
    // router is not behind the rejecting layer; the read handlers
    // authenticate through the `AuthUser` extractor instead.
    let task_routes = Router::new()
        .route("/", get(task::get_tasks).post(task::create_task))
        .route("/:id", get(task::get_task));

    let notification_routes = Router::new()
        .route("/", get(notification::get_notifications))
        .route("/stream", get(notification::notification_stream))
        .route("/:id/read", patch(notification::mark_notification_read))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine all routes
    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/projects", project_routes)
        .nest("/tasks", task_routes)
        .nest("/notifications", notification_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
