use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MenuType {
    Food,
    Drink,
}

impl MenuType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuType::Food => "food",
            MenuType::Drink => "drink",
        }
    }
}

impl fmt::Display for MenuType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown menu type {0:?}")]
pub struct UnknownMenuType(pub String);

impl FromStr for MenuType {
    type Err = UnknownMenuType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "food" => Ok(MenuType::Food),
            "drink" => Ok(MenuType::Drink),
            _ => Err(UnknownMenuType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    /// Unique identifier for the menu
    pub id: String,
    /// Display name, stored lowercase (e.g. "lunch")
    pub name: String,
    pub description: String,
    pub menu_type: MenuType,
    /// Sections of the menu ordered by `arrangementInMenu`. Empty when the
    /// menu is embedded in a dish.
    #[serde(default, rename = "menuSection")]
    pub sections: Vec<MenuSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuSection {
    pub id: String,
    pub name: String,
    pub menu_id: String,
    /// Ordering key within the owning menu
    pub arrangement_in_menu: i32,
    pub created_at: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Allergen {
    pub id: String,
    /// Display name, also the key for the allergen's icon
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
}
