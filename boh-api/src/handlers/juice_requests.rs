use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, put},
    Router,
};
use boh_models::{JuiceRequest, JuiceRequestUpdate, NewJuiceRequest};
use tracing::{info, instrument};

use super::AppState;
use crate::error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/juice-requests",
            get(list_juice_requests).post(create_juice_request),
        )
        .route(
            "/juice-requests/{id}",
            put(update_juice_request).delete(delete_juice_request),
        )
}

fn validate_amounts(amounts: [f64; 3]) -> Result<(), ApiError> {
    if amounts.iter().any(|a| !a.is_finite() || *a < 0.0) {
        return Err(ApiError::InvalidArgument("Invalid amount".to_string()));
    }
    if amounts.iter().all(|a| *a == 0.0) {
        return Err(ApiError::InvalidArgument(
            "At least one juice amount required".to_string(),
        ));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/juice-requests",
    responses(
        (status = 200, description = "Juice requests, newest first", body = [JuiceRequest]),
    ),
    tag = "juice-requests"
)]
#[instrument(skip(state))]
pub async fn list_juice_requests(
    State(state): State<AppState>,
) -> Result<Json<Vec<JuiceRequest>>, ApiError> {
    Ok(Json(state.store.list_juice_requests().await?))
}

#[utoipa::path(
    post,
    path = "/juice-requests",
    request_body = NewJuiceRequest,
    responses(
        (status = 200, description = "Juice request created", body = JuiceRequest),
        (status = 400, description = "Invalid amounts or unknown user", body = crate::ApiErrorResponse),
    ),
    tag = "juice-requests"
)]
#[instrument(skip(state))]
pub async fn create_juice_request(
    State(state): State<AppState>,
    Json(payload): Json<NewJuiceRequest>,
) -> Result<Json<JuiceRequest>, ApiError> {
    validate_amounts(payload.amounts())?;
    let request = state.store.create_juice_request(payload).await?;
    info!(request_id = %request.id, "juice request created");
    Ok(Json(request))
}

#[utoipa::path(
    put,
    path = "/juice-requests/{id}",
    request_body = JuiceRequestUpdate,
    responses(
        (status = 200, description = "Juice request updated", body = JuiceRequest),
        (status = 404, description = "Juice request not found", body = crate::ApiErrorResponse),
    ),
    params(
        ("id" = String, Path, description = "Juice request ID")
    ),
    tag = "juice-requests"
)]
#[instrument(skip(state))]
pub async fn update_juice_request(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    Json(payload): Json<JuiceRequestUpdate>,
) -> Result<Json<JuiceRequest>, ApiError> {
    validate_amounts(payload.amounts())?;
    Ok(Json(
        state
            .store
            .update_juice_request(&request_id, payload)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/juice-requests/{id}",
    responses(
        (status = 200, description = "Juice request deleted"),
        (status = 404, description = "Juice request not found", body = crate::ApiErrorResponse),
    ),
    params(
        ("id" = String, Path, description = "Juice request ID")
    ),
    tag = "juice-requests"
)]
#[instrument(skip(state))]
pub async fn delete_juice_request(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> Result<Json<()>, ApiError> {
    state.store.delete_juice_request(&request_id).await?;
    Ok(Json(()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::setup;

    fn lemons(user_id: &str, amount: f64) -> NewJuiceRequest {
        NewJuiceRequest {
            request_from_id: user_id.to_string(),
            lemon_amount: amount,
            orange_amount: 0.0,
            grapefruit_amount: 0.0,
            notes: Some("for service".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_update_juice_request() {
        let (state, user) = setup().await;
        let Json(created) = create_juice_request(State(state.clone()), Json(lemons(&user.id, 2.0)))
            .await
            .unwrap();
        assert_eq!(created.lemon_amount, 2.0);

        let Json(updated) = update_juice_request(
            State(state.clone()),
            Path(created.id.clone()),
            Json(JuiceRequestUpdate {
                lemon_amount: 1.0,
                orange_amount: 3.0,
                grapefruit_amount: 0.0,
                notes: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.orange_amount, 3.0);
        assert_eq!(updated.notes, None);

        let Json(requests) = list_juice_requests(State(state)).await.unwrap();
        assert_eq!(requests, vec![updated]);
    }

    #[tokio::test]
    async fn test_create_juice_request_rejects_empty_or_negative() {
        let (state, user) = setup().await;
        let empty = create_juice_request(State(state.clone()), Json(lemons(&user.id, 0.0))).await;
        assert!(matches!(empty, Err(ApiError::InvalidArgument(_))));

        let negative = create_juice_request(State(state), Json(lemons(&user.id, -1.0))).await;
        assert!(matches!(negative, Err(ApiError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_juice_request() {
        let (state, _) = setup().await;
        let response = delete_juice_request(State(state), Path("missing".to_string())).await;
        assert!(matches!(response, Err(ApiError::NotFound(_))));
    }
}
