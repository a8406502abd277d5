use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{Allergen, IdSelection, Menu, MenuSection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    /// Unique identifier for the dish
    pub id: String,
    pub name: String,
    /// Internal description, how staff would describe it to a guest
    pub description: String,
    /// How the dish reads on the printed menu
    pub advertised_description: String,
    #[schema(value_type = String)]
    pub price: BigDecimal,
    /// Public id of the image in image storage
    pub image_id: Option<String>,
    #[serde(default)]
    pub allergens: Vec<Allergen>,
    /// Menus the dish appears on, zero or more
    #[serde(default, rename = "menu")]
    pub menus: Vec<Menu>,
    pub menu_section: Option<MenuSection>,
    pub created_at: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
    pub last_edited_by_id: String,
}

impl Dish {
    pub fn is_on_menu(&self, menu_id: &str) -> bool {
        self.menus.iter().any(|m| m.id == menu_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewDish {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub advertised_description: String,
    #[schema(value_type = String)]
    pub price: BigDecimal,
    pub image_id: Option<String>,
    #[serde(default, skip_serializing_if = "IdSelection::is_unset")]
    #[schema(value_type = Option<Vec<String>>)]
    pub allergens: IdSelection,
    #[serde(default, skip_serializing_if = "IdSelection::is_unset")]
    #[schema(value_type = Option<Vec<String>>)]
    pub menu: IdSelection,
    pub menu_section: Option<String>,
    /// Id of the acting user
    pub last_edited_by_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDish {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub advertised_description: String,
    #[schema(value_type = String)]
    pub price: BigDecimal,
    pub image_id: Option<String>,
    /// Absent leaves links untouched, `null` removes all of them
    #[serde(default, skip_serializing_if = "IdSelection::is_unset")]
    #[schema(value_type = Option<Vec<String>>)]
    pub allergens: IdSelection,
    #[serde(default, skip_serializing_if = "IdSelection::is_unset")]
    #[schema(value_type = Option<Vec<String>>)]
    pub menu: IdSelection,
    pub menu_section: Option<String>,
    pub last_edited_by_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeletedDish {
    pub id: String,
}
