//! Persistence behind the resolvers.
//!
//! Handlers only see [`Store`]; `BOH_STORE` picks Postgres or the in-memory
//! tables at startup.

use async_trait::async_trait;
use boh_models::{
    Allergen, Department, Dish, JuiceRequest, JuiceRequestUpdate, Menu, MenuType, NewDepartment,
    NewDish, NewJuiceRequest, NewRole, NewUser, Role, UpdateDish, User,
};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

pub mod memory;
pub mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    InvalidReference(String),
    #[error("stored value for {0} is not valid")]
    Corrupt(String),
    #[error("could not connect to database")]
    Connection(#[from] diesel::ConnectionError),
    #[error("error while executing database query")]
    Database(DieselError),
}

impl From<DieselError> for StoreError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::NotFound => StoreError::NotFound("record".to_string()),
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                StoreError::InvalidReference(info.message().to_string())
            }
            e => StoreError::Database(e),
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Menus ordered by name, each with its sections in arrangement order.
    async fn list_menus(&self, menu_type: Option<MenuType>) -> Result<Vec<Menu>, StoreError>;

    async fn list_allergens(&self) -> Result<Vec<Allergen>, StoreError>;

    /// Dishes not marked deleted, oldest first.
    async fn active_dishes(&self) -> Result<Vec<Dish>, StoreError>;

    async fn create_dish(&self, dish: NewDish) -> Result<Dish, StoreError>;

    async fn update_dish(&self, id: &str, dish: UpdateDish) -> Result<Dish, StoreError>;

    /// Soft delete. A dish that is already deleted is `NotFound`.
    async fn delete_dish(&self, id: &str) -> Result<(), StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn create_user(&self, user: NewUser, password_hash: String) -> Result<User, StoreError>;

    async fn delete_user(&self, id: &str) -> Result<(), StoreError>;

    async fn list_departments(&self) -> Result<Vec<Department>, StoreError>;

    async fn create_department(&self, department: NewDepartment)
    -> Result<Department, StoreError>;

    async fn list_roles(&self) -> Result<Vec<Role>, StoreError>;

    async fn create_role(&self, role: NewRole) -> Result<Role, StoreError>;

    /// Newest first.
    async fn list_juice_requests(&self) -> Result<Vec<JuiceRequest>, StoreError>;

    async fn create_juice_request(
        &self,
        request: NewJuiceRequest,
    ) -> Result<JuiceRequest, StoreError>;

    async fn update_juice_request(
        &self,
        id: &str,
        update: JuiceRequestUpdate,
    ) -> Result<JuiceRequest, StoreError>;

    async fn delete_juice_request(&self, id: &str) -> Result<(), StoreError>;
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Sorted, deduplicated copy of `ids`.
pub(crate) fn distinct(ids: &[String]) -> Vec<String> {
    let mut ids = ids.to_vec();
    ids.sort();
    ids.dedup();
    ids
}
