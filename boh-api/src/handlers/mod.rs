pub mod dishes;
pub mod juice_requests;
pub mod menus;
pub mod roles;
pub mod users;

// Re-export routers for easier importing
pub use dishes::router as dishes_router;
pub use juice_requests::router as juice_requests_router;
pub use menus::router as menus_router;
pub use roles::router as roles_router;
pub use users::router as users_router;

use std::sync::Arc;

use utoipa::OpenApi;

use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: impl Store + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        menus::list_menus,
        menus::list_food_menus,
        menus::list_allergens,
        dishes::list_active_dishes,
        dishes::create_dish,
        dishes::update_dish,
        dishes::delete_dish,
        users::list_users,
        users::create_user,
        users::delete_user,
        roles::list_departments,
        roles::create_department,
        roles::list_roles,
        roles::create_role,
        juice_requests::list_juice_requests,
        juice_requests::create_juice_request,
        juice_requests::update_juice_request,
        juice_requests::delete_juice_request,
    ),
    components(
        schemas(
            boh_models::Menu,
            boh_models::MenuType,
            boh_models::MenuSection,
            boh_models::Allergen,
            boh_models::Dish,
            boh_models::NewDish,
            boh_models::UpdateDish,
            boh_models::DeletedDish,
            boh_models::User,
            boh_models::NewUser,
            boh_models::AuthLevel,
            boh_models::Department,
            boh_models::NewDepartment,
            boh_models::Role,
            boh_models::NewRole,
            boh_models::JuiceRequest,
            boh_models::NewJuiceRequest,
            boh_models::JuiceRequestUpdate,
            crate::ApiErrorResponse
        )
    ),
    tags(
        (name = "menus", description = "Menu and allergen reference data"),
        (name = "dishes", description = "Dish management endpoints"),
        (name = "users", description = "Staff account endpoints"),
        (name = "roles", description = "Role and department endpoints"),
        (name = "juice-requests", description = "Juice prep request endpoints")
    ),
    info(
        title = "Back of House API",
        description = "Resolvers for the back-of-house management tool",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;
