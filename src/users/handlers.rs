use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::{
        extractors::AdminUser,
        repo_types::{Role, User},
    },
    error::AppResult,
    state::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserSummary {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<UserSummary>,
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/users", get(list_users))
}

#[instrument(skip(state, _admin))]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<UserList>> {
    let users = User::list_all(&state.db).await?;
    Ok(Json(UserList {
        users: users.into_iter().map(UserSummary::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_uses_camel_case_and_drops_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "buyer1@example.com".into(),
            name: "Buyer 1".into(),
            password_hash: "$argon2id$v=19$...".into(),
            role: Role::Buyer,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(UserSummary::from(user)).unwrap();
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00Z");
        assert_eq!(json["role"], "BUYER");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }
}
