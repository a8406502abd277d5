use axum::{extract::State, response::Json, routing::get, Router};
use boh_models::{Department, NewDepartment, NewRole, Role};
use tracing::instrument;

use super::AppState;
use crate::error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/departments", get(list_departments).post(create_department))
        .route("/roles", get(list_roles).post(create_role))
}

#[utoipa::path(
    get,
    path = "/departments",
    responses(
        (status = 200, description = "All departments", body = [Department]),
    ),
    tag = "roles"
)]
#[instrument(skip(state))]
pub async fn list_departments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Department>>, ApiError> {
    Ok(Json(state.store.list_departments().await?))
}

#[utoipa::path(
    post,
    path = "/departments",
    request_body = NewDepartment,
    responses(
        (status = 200, description = "Department created", body = Department),
        (status = 400, description = "Invalid department", body = crate::ApiErrorResponse),
    ),
    tag = "roles"
)]
#[instrument(skip(state))]
pub async fn create_department(
    State(state): State<AppState>,
    Json(payload): Json<NewDepartment>,
) -> Result<Json<Department>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::InvalidArgument("Name required".to_string()));
    }
    Ok(Json(state.store.create_department(payload).await?))
}

#[utoipa::path(
    get,
    path = "/roles",
    responses(
        (status = 200, description = "All roles with their department", body = [Role]),
    ),
    tag = "roles"
)]
#[instrument(skip(state))]
pub async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<Role>>, ApiError> {
    Ok(Json(state.store.list_roles().await?))
}

#[utoipa::path(
    post,
    path = "/roles",
    request_body = NewRole,
    responses(
        (status = 200, description = "Role created", body = Role),
        (status = 400, description = "Invalid role or unknown department", body = crate::ApiErrorResponse),
    ),
    tag = "roles"
)]
#[instrument(skip(state))]
pub async fn create_role(
    State(state): State<AppState>,
    Json(payload): Json<NewRole>,
) -> Result<Json<Role>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::InvalidArgument("Name required".to_string()));
    }
    Ok(Json(state.store.create_role(payload).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::setup;

    #[tokio::test]
    async fn test_create_role_in_department() {
        let (state, _) = setup().await;
        let Json(kitchen) = create_department(
            State(state.clone()),
            Json(NewDepartment {
                name: "Kitchen".to_string(),
                description: String::new(),
            }),
        )
        .await
        .unwrap();

        let Json(role) = create_role(
            State(state.clone()),
            Json(NewRole {
                name: "Sous Chef".to_string(),
                description: "Runs the pass".to_string(),
                department_id: kitchen.id.clone(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(role.department, kitchen);

        let Json(roles) = list_roles(State(state)).await.unwrap();
        assert_eq!(roles, vec![role]);
    }

    #[tokio::test]
    async fn test_create_role_unknown_department() {
        let (state, _) = setup().await;
        let response = create_role(
            State(state),
            Json(NewRole {
                name: "Barback".to_string(),
                description: String::new(),
                department_id: "missing".to_string(),
            }),
        )
        .await;
        assert!(matches!(response, Err(ApiError::InvalidArgument(_))));
    }
}
