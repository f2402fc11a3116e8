use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::user::UserResponse;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 255))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_rejects_bad_email() {
        let payload = RegisterRequest {
            username: "alice".into(),
            email: "not-an-email".into(),
            password: "hunter22".into(),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn register_request_rejects_short_password() {
        let payload = RegisterRequest {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "abc".into(),
        };
        assert!(payload.validate().is_err());
    }
}
