use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::schema::{
    allergens, departments, dish_allergens, dish_menus, dishes, juice_requests, menu_sections,
    menus, roles, users,
};
use crate::store::StoreError;

#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = menus)]
pub struct MenuRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub menu_type: String,
}

impl MenuRow {
    pub fn into_menu(
        self,
        sections: Vec<boh_models::MenuSection>,
    ) -> Result<boh_models::Menu, StoreError> {
        Ok(boh_models::Menu {
            menu_type: self
                .menu_type
                .parse()
                .map_err(|_| StoreError::Corrupt(format!("menus.menu_type of {}", self.id)))?,
            id: self.id,
            name: self.name,
            description: self.description,
            sections,
        })
    }
}

#[derive(Queryable, Selectable, Identifiable, Associations, Insertable, Debug, Clone, PartialEq)]
#[diesel(belongs_to(MenuRow, foreign_key = menu_id))]
#[diesel(table_name = menu_sections)]
pub struct MenuSectionRow {
    pub id: String,
    pub name: String,
    pub menu_id: String,
    pub arrangement_in_menu: i32,
    pub created_at: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
}

impl From<MenuSectionRow> for boh_models::MenuSection {
    fn from(r: MenuSectionRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            menu_id: r.menu_id,
            arrangement_in_menu: r.arrangement_in_menu,
            created_at: r.created_at,
            last_edited: r.last_edited,
        }
    }
}

#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = allergens)]
pub struct AllergenRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
}

impl From<AllergenRow> for boh_models::Allergen {
    fn from(r: AllergenRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            created_at: r.created_at,
            last_edited: r.last_edited,
        }
    }
}

#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = dishes)]
pub struct DishRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub advertised_description: String,
    pub price: BigDecimal,
    pub image_id: Option<String>,
    pub menu_section_id: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
    pub last_edited_by_id: String,
}

impl DishRow {
    pub fn into_dish(
        self,
        allergens: Vec<boh_models::Allergen>,
        menus: Vec<boh_models::Menu>,
        menu_section: Option<boh_models::MenuSection>,
    ) -> boh_models::Dish {
        boh_models::Dish {
            id: self.id,
            name: self.name,
            description: self.description,
            advertised_description: self.advertised_description,
            price: self.price,
            image_id: self.image_id,
            allergens,
            menus,
            menu_section,
            created_at: self.created_at,
            last_edited: self.last_edited,
            last_edited_by_id: self.last_edited_by_id,
        }
    }
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = dishes, treat_none_as_null = true)]
pub struct DishChanges {
    pub name: String,
    pub description: String,
    pub advertised_description: String,
    pub price: BigDecimal,
    pub image_id: Option<String>,
    pub menu_section_id: Option<String>,
    pub last_edited: DateTime<Utc>,
    pub last_edited_by_id: String,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Insertable, Debug, PartialEq)]
#[diesel(belongs_to(DishRow, foreign_key = dish_id))]
#[diesel(table_name = dish_menus, primary_key(dish_id, menu_id))]
pub struct DishMenu {
    pub dish_id: String,
    pub menu_id: String,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Insertable, Debug, PartialEq)]
#[diesel(belongs_to(DishRow, foreign_key = dish_id))]
#[diesel(table_name = dish_allergens, primary_key(dish_id, allergen_id))]
pub struct DishAllergen {
    pub dish_id: String,
    pub allergen_id: String,
}

#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = users)]
pub struct UserRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub alias: Option<String>,
    pub password_hash: String,
    pub auth: String,
    pub email: String,
    pub birth_date: Option<NaiveDate>,
    pub phone_number: String,
    pub status: String,
    pub profile_image_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for boh_models::User {
    type Error = StoreError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            auth: r
                .auth
                .parse()
                .map_err(|_| StoreError::Corrupt(format!("users.auth of {}", r.id)))?,
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            alias: r.alias,
            email: r.email,
            birth_date: r.birth_date,
            phone_number: r.phone_number,
            status: r.status,
            profile_image_id: r.profile_image_id,
            created_at: r.created_at,
        })
    }
}

#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = departments)]
pub struct DepartmentRow {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<DepartmentRow> for boh_models::Department {
    fn from(r: DepartmentRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
        }
    }
}

#[derive(Queryable, Selectable, Identifiable, Associations, Insertable, Debug, PartialEq)]
#[diesel(belongs_to(DepartmentRow, foreign_key = department_id))]
#[diesel(table_name = roles)]
pub struct RoleRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub department_id: String,
}

impl RoleRow {
    pub fn into_role(self, department: DepartmentRow) -> boh_models::Role {
        boh_models::Role {
            id: self.id,
            name: self.name,
            description: self.description,
            department: department.into(),
        }
    }
}

#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = juice_requests)]
pub struct JuiceRequestRow {
    pub id: String,
    pub request_from_id: String,
    pub lemon_amount: f64,
    pub orange_amount: f64,
    pub grapefruit_amount: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
}

impl From<JuiceRequestRow> for boh_models::JuiceRequest {
    fn from(r: JuiceRequestRow) -> Self {
        Self {
            id: r.id,
            request_from_id: r.request_from_id,
            lemon_amount: r.lemon_amount,
            orange_amount: r.orange_amount,
            grapefruit_amount: r.grapefruit_amount,
            notes: r.notes,
            created_at: r.created_at,
            last_edited: r.last_edited,
        }
    }
}
