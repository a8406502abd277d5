//! Wire types shared by the API resolvers and the Food Notes client.
//!
//! Field names are camelCase on the wire so the JSON matches what the
//! browser front end already sends.

pub mod dishes;
pub mod juice_requests;
pub mod menus;
pub mod selection;
pub mod users;

pub use dishes::{DeletedDish, Dish, NewDish, UpdateDish};
pub use juice_requests::{JuiceRequest, JuiceRequestUpdate, NewJuiceRequest};
pub use menus::{Allergen, Menu, MenuSection, MenuType};
pub use selection::IdSelection;
pub use users::{AuthLevel, Department, NewDepartment, NewRole, NewUser, Role, User};
