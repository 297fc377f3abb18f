use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::{
    claims::Claims,
    repo_types::Role,
    services::{cookie_value, JwtKeys},
};
use crate::{error::AppError, state::AppState};

/// Any signed-in user, read from the session cookie or a Bearer header.
pub struct AuthUser(pub Claims);

/// A signed-in user whose token carries the ADMIN role.
pub struct AdminUser(pub Claims);

fn bearer_token(parts: &Parts) -> Option<String> {
    let auth = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;
    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .map(str::to_string)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie_value(&parts.headers, &state.config.cookie.name)
            .or_else(|| bearer_token(parts))
            .ok_or_else(AppError::unauthorized)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(&token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::unauthorized()
        })?;

        Ok(AuthUser(claims))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if claims.role != Role::Admin {
            warn!(user_id = %claims.sub, "non-admin hit admin route");
            return Err(AppError::unauthorized());
        }
        Ok(AdminUser(claims))
    }
}
