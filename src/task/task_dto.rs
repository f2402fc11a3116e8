use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub project_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_name_must_not_be_empty() {
        let payload = CreateTaskRequest {
            name: String::new(),
            project_id: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn task_name_is_capped_at_255_chars() {
        let payload = CreateTaskRequest {
            name: "x".repeat(256),
            project_id: None,
        };
        assert!(payload.validate().is_err());

        let payload = CreateTaskRequest {
            name: "x".repeat(255),
            project_id: None,
        };
        assert!(payload.validate().is_ok());
    }
}
