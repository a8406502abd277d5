//! Food Notes: the kitchen's view of every active dish, grouped by menu,
//! with the editor used to create and update dishes.

pub mod api_client;
pub mod cloudinary;
pub mod config;
pub mod editor;
pub mod error;
pub mod filter;
pub mod form;
pub mod grouping;
pub mod icons;
pub mod page;
pub mod ports;
pub mod session;

pub use api_client::ApiClient;
pub use cloudinary::{CloudinaryConfig, CloudinaryStore, NoImageStore};
pub use config::ClientConfig;
pub use editor::{CloseOutcome, ClosePolicy, DishEditor, EditorMode};
pub use error::{ClientError, SubmitError, UploadError, ValidationError};
pub use filter::MenuFilter;
pub use form::{DirtyTracking, DishFields, DishForm, PendingImage};
pub use grouping::dishes_for_menu;
pub use page::{FoodNotesPage, PageView};
pub use session::Session;
