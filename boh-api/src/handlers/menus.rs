use axum::{extract::State, response::Json, routing::get, Router};
use boh_models::{Allergen, Menu, MenuType};
use tracing::instrument;

use super::AppState;
use crate::error::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/menus", get(list_menus))
        .route("/menus/food", get(list_food_menus))
        .route("/allergens", get(list_allergens))
}

#[utoipa::path(
    get,
    path = "/menus",
    responses(
        (status = 200, description = "All menus with their sections", body = [Menu]),
        (status = 503, description = "Service unavailable", body = crate::ApiErrorResponse),
    ),
    tag = "menus"
)]
#[instrument(skip(state))]
pub async fn list_menus(State(state): State<AppState>) -> Result<Json<Vec<Menu>>, ApiError> {
    Ok(Json(state.store.list_menus(None).await?))
}

#[utoipa::path(
    get,
    path = "/menus/food",
    responses(
        (status = 200, description = "Food menus with their sections", body = [Menu]),
        (status = 503, description = "Service unavailable", body = crate::ApiErrorResponse),
    ),
    tag = "menus"
)]
#[instrument(skip(state))]
pub async fn list_food_menus(
    State(state): State<AppState>,
) -> Result<Json<Vec<Menu>>, ApiError> {
    Ok(Json(state.store.list_menus(Some(MenuType::Food)).await?))
}

#[utoipa::path(
    get,
    path = "/allergens",
    responses(
        (status = 200, description = "All allergens", body = [Allergen]),
        (status = 503, description = "Service unavailable", body = crate::ApiErrorResponse),
    ),
    tag = "menus"
)]
#[instrument(skip(state))]
pub async fn list_allergens(
    State(state): State<AppState>,
) -> Result<Json<Vec<Allergen>>, ApiError> {
    Ok(Json(state.store.list_allergens().await?))
}

#[cfg(test)]
mod tests {
    use boh_models::{MenuSection, MenuType};
    use chrono::Utc;

    use super::*;
    use crate::handlers::test_support::{menu, setup};
    use crate::store::{MemoryStore, Store};

    #[tokio::test]
    async fn test_list_food_menus_skips_drink_menus() {
        let store = MemoryStore::new();
        store.add_menu(menu("m1", "lunch")).await;
        store
            .add_menu(Menu {
                menu_type: MenuType::Drink,
                ..menu("d1", "cocktails")
            })
            .await;
        let state = AppState::new(store);

        let Json(all) = list_menus(State(state.clone())).await.unwrap();
        assert_eq!(all.len(), 2);

        let Json(food) = list_food_menus(State(state)).await.unwrap();
        assert_eq!(food.len(), 1);
        assert_eq!(food[0].id, "m1");
    }

    #[tokio::test]
    async fn test_menu_sections_are_ordered_by_arrangement() {
        let now = Utc::now();
        let section = |id: &str, arrangement: i32| MenuSection {
            id: id.to_string(),
            name: id.to_string(),
            menu_id: "m1".to_string(),
            arrangement_in_menu: arrangement,
            created_at: now,
            last_edited: now,
        };
        let store = MemoryStore::new();
        store
            .add_menu(Menu {
                sections: vec![section("mains", 2), section("starters", 1)],
                ..menu("m1", "lunch")
            })
            .await;

        let menus = store.list_menus(Some(MenuType::Food)).await.unwrap();
        let names: Vec<_> = menus[0].sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(names, ["starters", "mains"]);
    }

    #[tokio::test]
    async fn test_list_allergens_sorted_by_name() {
        let (state, _) = setup().await;
        let Json(allergens) = list_allergens(State(state)).await.unwrap();
        assert_eq!(allergens.len(), 10);
        assert_eq!(allergens.first().unwrap().name, "allium");
        assert_eq!(allergens.last().unwrap().name, "treenut");
    }

    #[tokio::test]
    async fn test_list_allergens_includes_added() {
        let now = Utc::now();
        let store = MemoryStore::new();
        for name in ["soy", "celery"] {
            store
                .add_allergen(Allergen {
                    id: format!("allergen-{name}"),
                    name: name.to_string(),
                    description: None,
                    created_at: now,
                    last_edited: now,
                })
                .await;
        }

        let Json(allergens) = list_allergens(State(AppState::new(store))).await.unwrap();
        let names: Vec<_> = allergens.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["celery", "soy"]);
    }
}
