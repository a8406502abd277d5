use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
use argon2::Argon2;
use axum::{
    extract::{Path, State},
    response::Json,
    routing::{delete, get},
    Router,
};
use boh_models::{NewUser, User};
use tracing::{info, instrument};

use super::AppState;
use crate::error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", delete(delete_user))
}

#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All staff accounts", body = [User]),
        (status = 503, description = "Service unavailable", body = crate::ApiErrorResponse),
    ),
    tag = "users"
)]
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.store.list_users().await?))
}

#[utoipa::path(
    post,
    path = "/users",
    request_body = NewUser,
    responses(
        (status = 200, description = "User created successfully", body = User),
        (status = 400, description = "Invalid user", body = crate::ApiErrorResponse),
        (status = 503, description = "Service unavailable", body = crate::ApiErrorResponse),
    ),
    tag = "users"
)]
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> Result<Json<User>, ApiError> {
    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(ApiError::InvalidArgument("Name required".to_string()));
    }
    // Email is optional; the new-user form never collects one.
    if !payload.email.is_empty() && !payload.email.contains('@') {
        return Err(ApiError::InvalidArgument("Invalid email".to_string()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::InvalidArgument("Password required".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|e| ApiError::InternalError(format!("Failed to hash password: {e}")))?
        .to_string();

    let user = state.store.create_user(payload, password_hash).await?;
    info!(user_id = %user.id, auth = %user.auth, "user created");
    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "User still referenced", body = crate::ApiErrorResponse),
        (status = 404, description = "User not found", body = crate::ApiErrorResponse),
    ),
    params(
        ("id" = String, Path, description = "User ID")
    ),
    tag = "users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<()>, ApiError> {
    state.store.delete_user(&user_id).await?;
    info!(%user_id, "user deleted");
    Ok(Json(()))
}

#[cfg(test)]
mod tests {
    use boh_models::AuthLevel;

    use super::*;
    use crate::handlers::test_support::{new_user, setup};

    #[tokio::test]
    async fn test_create_user() {
        let (state, _) = setup().await;
        let payload = NewUser {
            auth: AuthLevel::Kitchen,
            ..new_user("Grace")
        };

        let Json(user) = create_user(State(state.clone()), Json(payload))
            .await
            .unwrap();
        assert_eq!(user.first_name, "Grace");
        assert_eq!(user.auth, AuthLevel::Kitchen);

        let Json(users) = list_users(State(state)).await.unwrap();
        assert_eq!(users.len(), 2);
    }

    #[tokio::test]
    async fn test_create_user_invalid_email() {
        let (state, _) = setup().await;
        let payload = NewUser {
            email: "not-an-email".to_string(),
            ..new_user("Grace")
        };
        let response = create_user(State(state), Json(payload)).await;
        assert!(matches!(response, Err(ApiError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_create_user_without_email() {
        let (state, _) = setup().await;
        let payload = NewUser {
            email: String::new(),
            ..new_user("Bo")
        };

        let Json(user) = create_user(State(state), Json(payload)).await.unwrap();
        assert_eq!(user.first_name, "Bo");
        assert_eq!(user.email, "");
    }

    #[test]
    fn test_password_is_not_serialized() {
        let user = User {
            id: "u1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Line".to_string(),
            alias: None,
            auth: AuthLevel::Admin,
            email: "ada@example.com".to_string(),
            birth_date: None,
            phone_number: String::new(),
            status: String::new(),
            profile_image_id: None,
            created_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["auth"], "admin");
    }

    #[tokio::test]
    async fn test_delete_user() {
        let (state, user) = setup().await;
        delete_user(State(state.clone()), Path(user.id.clone()))
            .await
            .unwrap();
        let again = delete_user(State(state), Path(user.id)).await;
        assert!(matches!(again, Err(ApiError::NotFound(_))));
    }
}
