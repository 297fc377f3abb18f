use axum::{
    extract::{FromRef, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, MessageResponse, PublicUser, RegisterRequest},
        extractors::AuthUser,
        repo_types::{Role, User},
        services::{
            expired_cookie, hash_password, is_valid_email, session_cookie, verify_password,
            JwtKeys,
        },
    },
    error::{is_unique_violation, AppError, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

fn signed_in(
    state: &AppState,
    user: User,
    status: StatusCode,
    message: &str,
) -> AppResult<impl IntoResponse> {
    let keys = JwtKeys::from_ref(state);
    let token = keys.sign(&user).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::Internal(e)
    })?;
    let cookie = session_cookie(&state.config.cookie, &token, keys.ttl);

    Ok((
        status,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            message: message.into(),
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    payload.email = payload.email.trim().to_lowercase();
    let name = payload.name.trim();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::bad_request("Invalid email"));
    }

    if name.is_empty() {
        return Err(AppError::bad_request("Name is required"));
    }

    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(AppError::bad_request("Password too short"));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = match User::create(&state.db, &payload.email, name, &hash, Role::Buyer).await {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            warn!(email = %payload.email, "email registered concurrently");
            return Err(AppError::Conflict("Email already registered".into()));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    signed_in(&state, user, StatusCode::CREATED, "Registration successful")
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    payload.email = payload.email.trim().to_lowercase();

    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(AppError::bad_request("Email and password are required"));
    }

    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(AppError::Unauthorized("Invalid credentials".into()));
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    info!(user_id = %user.id, role = ?user.role, "user logged in");
    signed_in(&state, user, StatusCode::OK, "Login successful")
}

pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, expired_cookie(&state.config.cookie))],
        Json(MessageResponse {
            message: "Logged out successfully".into(),
        }),
    )
}

#[instrument(skip(state, claims), fields(user_id = %claims.sub))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> AppResult<Json<PublicUser>> {
    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod me_tests {
    use super::*;

    #[test]
    fn public_user_serialization_hides_password() {
        let user = User {
            id: uuid::Uuid::new_v4(),
            email: "test@example.com".to_string(),
            name: "Test".to_string(),
            password_hash: "secret-hash".to_string(),
            role: Role::Buyer,
            created_at: time::OffsetDateTime::now_utc(),
        };

        let json = serde_json::to_string(&PublicUser::from(user)).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("\"role\":\"BUYER\""));
        assert!(!json.contains("secret-hash"));
    }

    #[tokio::test]
    async fn logout_expires_cookie() {
        let res = logout(State(AppState::fake())).await.into_response();
        let cookie = res
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .expect("set-cookie");
        assert!(cookie.contains("Max-Age=0"));
    }
}
