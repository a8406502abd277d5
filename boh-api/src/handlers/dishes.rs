use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, put},
    Router,
};
use bigdecimal::{BigDecimal, Zero};
use boh_models::{DeletedDish, Dish, NewDish, UpdateDish};
use tracing::{info, instrument};

use super::AppState;
use crate::error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dishes", get(list_active_dishes).post(create_dish))
        .route("/dishes/{id}", put(update_dish).delete(delete_dish))
}

/// A stored dish always has a name, an advertised description and a
/// price that is not negative.
fn validate_dish(
    name: &str,
    advertised_description: &str,
    price: &BigDecimal,
) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::InvalidArgument("Name required".to_string()));
    }
    if advertised_description.trim().is_empty() {
        return Err(ApiError::InvalidArgument(
            "Advertised description required".to_string(),
        ));
    }
    if *price < BigDecimal::zero() {
        return Err(ApiError::InvalidArgument("Invalid price".to_string()));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/dishes",
    responses(
        (status = 200, description = "Dishes not marked deleted", body = [Dish]),
        (status = 503, description = "Service unavailable", body = crate::ApiErrorResponse),
    ),
    tag = "dishes"
)]
#[instrument(skip(state))]
pub async fn list_active_dishes(
    State(state): State<AppState>,
) -> Result<Json<Vec<Dish>>, ApiError> {
    Ok(Json(state.store.active_dishes().await?))
}

#[utoipa::path(
    post,
    path = "/dishes",
    request_body = NewDish,
    responses(
        (status = 200, description = "Dish created successfully", body = Dish),
        (status = 400, description = "Invalid dish", body = crate::ApiErrorResponse),
        (status = 503, description = "Service unavailable", body = crate::ApiErrorResponse),
    ),
    tag = "dishes"
)]
#[instrument(skip(state, payload))]
pub async fn create_dish(
    State(state): State<AppState>,
    Json(payload): Json<NewDish>,
) -> Result<Json<Dish>, ApiError> {
    validate_dish(
        &payload.name,
        &payload.advertised_description,
        &payload.price,
    )?;
    let dish = state.store.create_dish(payload).await?;
    info!(dish_id = %dish.id, name = %dish.name, "dish created");
    Ok(Json(dish))
}

#[utoipa::path(
    put,
    path = "/dishes/{id}",
    request_body = UpdateDish,
    responses(
        (status = 200, description = "Dish updated successfully", body = Dish),
        (status = 400, description = "Invalid dish", body = crate::ApiErrorResponse),
        (status = 404, description = "Dish not found", body = crate::ApiErrorResponse),
        (status = 503, description = "Service unavailable", body = crate::ApiErrorResponse),
    ),
    params(
        ("id" = String, Path, description = "Dish ID")
    ),
    tag = "dishes"
)]
#[instrument(skip(state, payload))]
pub async fn update_dish(
    State(state): State<AppState>,
    Path(dish_id): Path<String>,
    Json(payload): Json<UpdateDish>,
) -> Result<Json<Dish>, ApiError> {
    validate_dish(
        &payload.name,
        &payload.advertised_description,
        &payload.price,
    )?;
    let dish = state.store.update_dish(&dish_id, payload).await?;
    info!(dish_id = %dish.id, "dish updated");
    Ok(Json(dish))
}

#[utoipa::path(
    delete,
    path = "/dishes/{id}",
    responses(
        (status = 200, description = "Dish removed from the active list", body = DeletedDish),
        (status = 404, description = "Dish not found", body = crate::ApiErrorResponse),
        (status = 503, description = "Service unavailable", body = crate::ApiErrorResponse),
    ),
    params(
        ("id" = String, Path, description = "Dish ID")
    ),
    tag = "dishes"
)]
#[instrument(skip(state))]
pub async fn delete_dish(
    State(state): State<AppState>,
    Path(dish_id): Path<String>,
) -> Result<Json<DeletedDish>, ApiError> {
    state.store.delete_dish(&dish_id).await?;
    info!(%dish_id, "dish deleted");
    Ok(Json(DeletedDish { id: dish_id }))
}

#[cfg(test)]
mod tests {
    use boh_models::IdSelection;

    use super::*;
    use crate::handlers::test_support::setup;

    fn burger(user_id: &str) -> NewDish {
        NewDish {
            name: "Burger".to_string(),
            description: String::new(),
            advertised_description: "Juicy burger".to_string(),
            price: BigDecimal::from(12),
            image_id: None,
            allergens: IdSelection::Cleared,
            menu: IdSelection::Ids(vec!["m1".to_string()]),
            menu_section: None,
            last_edited_by_id: user_id.to_string(),
        }
    }

    fn as_update(dish: &NewDish) -> UpdateDish {
        UpdateDish {
            name: dish.name.clone(),
            description: dish.description.clone(),
            advertised_description: dish.advertised_description.clone(),
            price: dish.price.clone(),
            image_id: dish.image_id.clone(),
            allergens: IdSelection::Unset,
            menu: IdSelection::Unset,
            menu_section: None,
            last_edited_by_id: dish.last_edited_by_id.clone(),
        }
    }

    #[tokio::test]
    async fn test_create_dish() {
        let (state, user) = setup().await;

        let Json(dish) = create_dish(State(state.clone()), Json(burger(&user.id)))
            .await
            .unwrap();

        assert!(!dish.id.is_empty());
        assert_eq!(dish.name, "Burger");
        assert_eq!(dish.price, BigDecimal::from(12));
        assert!(dish.allergens.is_empty());
        assert_eq!(dish.menus.len(), 1);
        assert_eq!(dish.menus[0].name, "lunch");
        assert_eq!(dish.last_edited_by_id, user.id);

        let Json(active) = list_active_dishes(State(state)).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, dish.id);
    }

    #[tokio::test]
    async fn test_create_dish_missing_advertised_description() {
        let (state, user) = setup().await;
        let payload = NewDish {
            advertised_description: "  ".to_string(),
            ..burger(&user.id)
        };

        let response = create_dish(State(state.clone()), Json(payload)).await;

        assert!(matches!(response, Err(ApiError::InvalidArgument(_))));
        let Json(active) = list_active_dishes(State(state)).await.unwrap();
        assert!(active.is_empty());
    }

    #[tokio::test]
    async fn test_create_dish_negative_price() {
        let (state, user) = setup().await;
        let payload = NewDish {
            price: BigDecimal::from(-1),
            ..burger(&user.id)
        };

        let response = create_dish(State(state), Json(payload)).await;
        assert!(matches!(response, Err(ApiError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_create_dish_unknown_menu() {
        let (state, user) = setup().await;
        let payload = NewDish {
            menu: IdSelection::Ids(vec!["m9".to_string()]),
            ..burger(&user.id)
        };

        let response = create_dish(State(state), Json(payload)).await;
        match response {
            Err(ApiError::InvalidArgument(msg)) => assert!(msg.contains("m9")),
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_dish_unknown_user() {
        let (state, _) = setup().await;
        let response = create_dish(State(state), Json(burger("nobody"))).await;
        assert!(matches!(response, Err(ApiError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_dish_on_two_menus() {
        let (state, user) = setup().await;
        let payload = NewDish {
            menu: IdSelection::Ids(vec!["m1".to_string(), "m2".to_string(), "m1".to_string()]),
            ..burger(&user.id)
        };

        let Json(dish) = create_dish(State(state), Json(payload)).await.unwrap();
        let menu_ids: Vec<_> = dish.menus.iter().map(|m| m.id.as_str()).collect();
        // ordered by menu name, duplicates collapsed
        assert_eq!(menu_ids, ["m2", "m1"]);
    }

    #[tokio::test]
    async fn test_update_dish_keeps_links_when_unset() {
        let (state, user) = setup().await;
        let created = burger(&user.id);
        let payload = NewDish {
            allergens: IdSelection::Ids(vec!["allergen-gluten".to_string()]),
            ..created.clone()
        };
        let Json(dish) = create_dish(State(state.clone()), Json(payload)).await.unwrap();

        let update = UpdateDish {
            name: "Cheeseburger".to_string(),
            ..as_update(&created)
        };
        let Json(updated) = update_dish(State(state), Path(dish.id.clone()), Json(update))
            .await
            .unwrap();

        assert_eq!(updated.name, "Cheeseburger");
        assert_eq!(updated.menus.len(), 1);
        assert_eq!(updated.allergens.len(), 1);
        assert_eq!(updated.allergens[0].name, "gluten");
        assert!(updated.last_edited >= dish.last_edited);
    }

    #[tokio::test]
    async fn test_update_dish_cleared_removes_links() {
        let (state, user) = setup().await;
        let created = burger(&user.id);
        let Json(dish) = create_dish(State(state.clone()), Json(created.clone()))
            .await
            .unwrap();

        let update = UpdateDish {
            menu: IdSelection::Cleared,
            ..as_update(&created)
        };
        let Json(updated) = update_dish(State(state), Path(dish.id), Json(update))
            .await
            .unwrap();
        assert!(updated.menus.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_dish() {
        let (state, user) = setup().await;
        let response = update_dish(
            State(state),
            Path("missing".to_string()),
            Json(as_update(&burger(&user.id))),
        )
        .await;
        assert!(matches!(response, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_dish_removes_it_from_active_list() {
        let (state, user) = setup().await;
        let Json(dish) = create_dish(State(state.clone()), Json(burger(&user.id)))
            .await
            .unwrap();

        let Json(deleted) = delete_dish(State(state.clone()), Path(dish.id.clone()))
            .await
            .unwrap();
        assert_eq!(deleted.id, dish.id);

        let Json(active) = list_active_dishes(State(state.clone())).await.unwrap();
        assert!(active.is_empty());

        let again = delete_dish(State(state.clone()), Path(dish.id.clone())).await;
        assert!(matches!(again, Err(ApiError::NotFound(_))));

        let update = update_dish(
            State(state),
            Path(dish.id),
            Json(as_update(&burger(&user.id))),
        )
        .await;
        assert!(matches!(update, Err(ApiError::NotFound(_))));
    }
}
