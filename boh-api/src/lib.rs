//! API resolvers for the back-of-house tool: menus, allergens, dishes,
//! staff, roles and juice requests.

use axum::Router;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod error;
pub mod handlers;
pub mod models;
pub mod schema;
pub mod store;

use handlers::{
    dishes_router, juice_requests_router, menus_router, roles_router, users_router, ApiDoc,
    AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Error message
    pub error: String,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(menus_router())
        .merge(dishes_router())
        .merge(users_router())
        .merge(roles_router())
        .merge(juice_requests_router())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(CorsLayer::permissive())
}
