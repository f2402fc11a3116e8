use crate::{auth::verify_jwt, error::AppError, state::AppState};
use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

fn bearer_user_id(auth_header: Option<&str>, secret: &str) -> Option<Uuid> {
    let token = auth_header?.strip_prefix("Bearer ")?;
    let claims = verify_jwt(token, secret).ok()?;
    Uuid::parse_str(&claims.sub).ok()
}

/// Rejecting auth layer: routes behind it always see a valid user id
/// in the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let user_id = bearer_user_id(auth_header, &state.config.jwt_secret)
        .ok_or(AppError::AuthenticationRequired)?;

    req.extensions_mut().insert(user_id);

    Ok(next.run(req).await)
}

/// Rejecting bearer check as an extractor, for routes that cannot sit
/// behind `auth_middleware` as a whole.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok());

        bearer_user_id(auth_header, &state.config.jwt_secret)
            .map(AuthUser)
            .ok_or(AppError::AuthenticationRequired)
    }
}

/// Non-rejecting variant of the bearer check. The task-creation
/// workflow performs its own authentication step, so its route cannot
/// sit behind `auth_middleware`; this extractor hands the handler
/// whatever identity the request carried, if any.
pub struct MaybeAuthUser(pub Option<Uuid>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok());

        Ok(MaybeAuthUser(bearer_user_id(
            auth_header,
            &state.config.jwt_secret,
        )))
    }
}
