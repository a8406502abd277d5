use async_trait::async_trait;
use boh_models::{
    Allergen, Department, Dish, IdSelection, JuiceRequest, JuiceRequestUpdate, Menu, MenuType,
    NewDepartment, NewDish, NewJuiceRequest, NewRole, NewUser, Role, UpdateDish, User,
};
use chrono::Utc;
use tokio::sync::RwLock;

use super::{distinct, new_id, Store, StoreError};
use crate::models::{
    AllergenRow, DepartmentRow, DishAllergen, DishMenu, DishRow, JuiceRequestRow, MenuRow,
    MenuSectionRow, RoleRow, UserRow,
};

/// Allergens every kitchen starts with. Mirrors the seed migration.
pub const DEFAULT_ALLERGENS: [&str; 10] = [
    "allium",
    "dairy",
    "egg",
    "fish",
    "gluten",
    "peanut",
    "sesame",
    "shellfish",
    "soy",
    "treenut",
];

#[derive(Default)]
struct Tables {
    menus: Vec<MenuRow>,
    menu_sections: Vec<MenuSectionRow>,
    allergens: Vec<AllergenRow>,
    dishes: Vec<DishRow>,
    dish_menus: Vec<DishMenu>,
    dish_allergens: Vec<DishAllergen>,
    users: Vec<UserRow>,
    departments: Vec<DepartmentRow>,
    roles: Vec<RoleRow>,
    juice_requests: Vec<JuiceRequestRow>,
}

impl Tables {
    fn menu(&self, row: &MenuRow, with_sections: bool) -> Result<Menu, StoreError> {
        let mut sections: Vec<&MenuSectionRow> = if with_sections {
            self.menu_sections
                .iter()
                .filter(|s| s.menu_id == row.id)
                .collect()
        } else {
            vec![]
        };
        sections.sort_by(|a, b| {
            (a.arrangement_in_menu, &a.name).cmp(&(b.arrangement_in_menu, &b.name))
        });
        row.clone()
            .into_menu(sections.into_iter().cloned().map(Into::into).collect())
    }

    fn dish(&self, row: &DishRow) -> Result<Dish, StoreError> {
        let mut menus: Vec<&MenuRow> = self
            .dish_menus
            .iter()
            .filter(|link| link.dish_id == row.id)
            .filter_map(|link| self.menus.iter().find(|m| m.id == link.menu_id))
            .collect();
        menus.sort_by(|a, b| a.name.cmp(&b.name));
        let menus = menus
            .into_iter()
            .map(|m| self.menu(m, false))
            .collect::<Result<Vec<_>, _>>()?;

        let mut allergens: Vec<&AllergenRow> = self
            .dish_allergens
            .iter()
            .filter(|link| link.dish_id == row.id)
            .filter_map(|link| self.allergens.iter().find(|a| a.id == link.allergen_id))
            .collect();
        allergens.sort_by(|a, b| a.name.cmp(&b.name));
        let allergens = allergens.into_iter().cloned().map(Into::into).collect();

        let section = row.menu_section_id.as_ref().and_then(|id| {
            self.menu_sections
                .iter()
                .find(|s| &s.id == id)
                .cloned()
                .map(Into::into)
        });
        Ok(row.clone().into_dish(allergens, menus, section))
    }

    fn ensure_user(&self, id: &str) -> Result<(), StoreError> {
        if self.users.iter().any(|u| u.id == id) {
            Ok(())
        } else {
            Err(StoreError::InvalidReference(format!("unknown user id {id}")))
        }
    }

    fn ensure_section(&self, id: Option<&String>) -> Result<(), StoreError> {
        match id {
            Some(id) if !self.menu_sections.iter().any(|s| &s.id == id) => Err(
                StoreError::InvalidReference(format!("unknown menu section id {id}")),
            ),
            _ => Ok(()),
        }
    }

    fn check_links(
        &self,
        menus: &IdSelection,
        allergens: &IdSelection,
    ) -> Result<(), StoreError> {
        if let Some(missing) = menus
            .ids()
            .iter()
            .find(|id| !self.menus.iter().any(|m| &m.id == *id))
        {
            return Err(StoreError::InvalidReference(format!(
                "unknown menu id {missing}"
            )));
        }
        if let Some(missing) = allergens
            .ids()
            .iter()
            .find(|id| !self.allergens.iter().any(|a| &a.id == *id))
        {
            return Err(StoreError::InvalidReference(format!(
                "unknown allergen id {missing}"
            )));
        }
        Ok(())
    }

    fn set_links(&mut self, dish_id: &str, menus: &IdSelection, allergens: &IdSelection) {
        if !menus.is_unset() {
            self.dish_menus.retain(|link| link.dish_id != dish_id);
            self.dish_menus
                .extend(distinct(menus.ids()).into_iter().map(|menu_id| DishMenu {
                    dish_id: dish_id.to_string(),
                    menu_id,
                }));
        }
        if !allergens.is_unset() {
            self.dish_allergens.retain(|link| link.dish_id != dish_id);
            self.dish_allergens.extend(distinct(allergens.ids()).into_iter().map(
                |allergen_id| DishAllergen {
                    dish_id: dish_id.to_string(),
                    allergen_id,
                },
            ));
        }
    }
}

/// Store kept entirely in process memory. Used by tests and by
/// `BOH_STORE=memory` for local runs.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the default allergen list.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let allergens = DEFAULT_ALLERGENS
            .iter()
            .map(|name| AllergenRow {
                id: format!("allergen-{name}"),
                name: name.to_string(),
                description: None,
                created_at: now,
                last_edited: now,
            })
            .collect();
        Self {
            tables: RwLock::new(Tables {
                allergens,
                ..Tables::default()
            }),
        }
    }

    /// Inserts a menu and its sections as given, keeping their ids.
    pub async fn add_menu(&self, menu: Menu) {
        let mut tables = self.tables.write().await;
        tables
            .menu_sections
            .extend(menu.sections.into_iter().map(|s| MenuSectionRow {
                id: s.id,
                name: s.name,
                menu_id: s.menu_id,
                arrangement_in_menu: s.arrangement_in_menu,
                created_at: s.created_at,
                last_edited: s.last_edited,
            }));
        tables.menus.push(MenuRow {
            id: menu.id,
            name: menu.name,
            description: menu.description,
            menu_type: menu.menu_type.as_str().to_string(),
        });
    }

    pub async fn add_allergen(&self, allergen: Allergen) {
        self.tables.write().await.allergens.push(AllergenRow {
            id: allergen.id,
            name: allergen.name,
            description: allergen.description,
            created_at: allergen.created_at,
            last_edited: allergen.last_edited,
        });
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_menus(&self, menu_type: Option<MenuType>) -> Result<Vec<Menu>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&MenuRow> = tables
            .menus
            .iter()
            .filter(|m| menu_type.is_none_or(|t| m.menu_type == t.as_str()))
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        rows.into_iter().map(|m| tables.menu(m, true)).collect()
    }

    async fn list_allergens(&self) -> Result<Vec<Allergen>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows = tables.allergens.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn active_dishes(&self) -> Result<Vec<Dish>, StoreError> {
        let tables = self.tables.read().await;
        tables
            .dishes
            .iter()
            .filter(|d| !d.is_deleted)
            .map(|d| tables.dish(d))
            .collect()
    }

    async fn create_dish(&self, dish: NewDish) -> Result<Dish, StoreError> {
        let mut tables = self.tables.write().await;
        tables.ensure_user(&dish.last_edited_by_id)?;
        tables.ensure_section(dish.menu_section.as_ref())?;
        tables.check_links(&dish.menu, &dish.allergens)?;

        let now = Utc::now();
        let row = DishRow {
            id: new_id(),
            name: dish.name,
            description: dish.description,
            advertised_description: dish.advertised_description,
            price: dish.price,
            image_id: dish.image_id,
            menu_section_id: dish.menu_section,
            is_deleted: false,
            created_at: now,
            last_edited: now,
            last_edited_by_id: dish.last_edited_by_id,
        };
        tables.set_links(&row.id, &dish.menu, &dish.allergens);
        let created = tables.dish(&row)?;
        tables.dishes.push(row);
        Ok(created)
    }

    async fn update_dish(&self, id: &str, dish: UpdateDish) -> Result<Dish, StoreError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .dishes
            .iter()
            .position(|d| d.id == id && !d.is_deleted)
            .ok_or_else(|| StoreError::NotFound("dish".to_string()))?;
        tables.ensure_user(&dish.last_edited_by_id)?;
        tables.ensure_section(dish.menu_section.as_ref())?;
        tables.check_links(&dish.menu, &dish.allergens)?;

        tables.set_links(id, &dish.menu, &dish.allergens);
        let row = &mut tables.dishes[index];
        row.name = dish.name;
        row.description = dish.description;
        row.advertised_description = dish.advertised_description;
        row.price = dish.price;
        row.image_id = dish.image_id;
        row.menu_section_id = dish.menu_section;
        row.last_edited = Utc::now();
        row.last_edited_by_id = dish.last_edited_by_id;
        let row = row.clone();
        tables.dish(&row)
    }

    async fn delete_dish(&self, id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .dishes
            .iter_mut()
            .find(|d| d.id == id && !d.is_deleted)
            .ok_or_else(|| StoreError::NotFound("dish".to_string()))?;
        row.is_deleted = true;
        row.last_edited = Utc::now();
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows = tables.users.clone();
        rows.sort_by(|a, b| (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)));
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn create_user(&self, user: NewUser, password_hash: String) -> Result<User, StoreError> {
        let row = UserRow {
            id: new_id(),
            first_name: user.first_name,
            last_name: user.last_name,
            alias: user.alias,
            password_hash,
            auth: user.auth.as_str().to_string(),
            email: user.email,
            birth_date: user.birth_date,
            phone_number: user.phone_number,
            status: user.status,
            profile_image_id: user.profile_image_id,
            created_at: Utc::now(),
        };
        self.tables.write().await.users.push(row.clone());
        row.try_into()
    }

    async fn delete_user(&self, id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == id) {
            return Err(StoreError::NotFound("user".to_string()));
        }
        let referenced = tables.dishes.iter().any(|d| d.last_edited_by_id == id);
        if referenced {
            return Err(StoreError::InvalidReference(format!(
                "user {id} is still referenced by dishes"
            )));
        }
        tables.users.retain(|u| u.id != id);
        tables.juice_requests.retain(|r| r.request_from_id != id);
        Ok(())
    }

    async fn list_departments(&self) -> Result<Vec<Department>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows = tables.departments.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_department(
        &self,
        department: NewDepartment,
    ) -> Result<Department, StoreError> {
        let row = DepartmentRow {
            id: new_id(),
            name: department.name,
            description: department.description,
        };
        self.tables.write().await.departments.push(row.clone());
        Ok(row.into())
    }

    async fn list_roles(&self) -> Result<Vec<Role>, StoreError> {
        let tables = self.tables.read().await;
        let mut roles: Vec<Role> = tables
            .roles
            .iter()
            .filter_map(|role| {
                let department = tables
                    .departments
                    .iter()
                    .find(|d| d.id == role.department_id)?;
                Some(Role {
                    id: role.id.clone(),
                    name: role.name.clone(),
                    description: role.description.clone(),
                    department: department.clone().into(),
                })
            })
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn create_role(&self, role: NewRole) -> Result<Role, StoreError> {
        let mut tables = self.tables.write().await;
        let department = tables
            .departments
            .iter()
            .find(|d| d.id == role.department_id)
            .cloned()
            .ok_or_else(|| {
                StoreError::InvalidReference(format!(
                    "unknown department id {}",
                    role.department_id
                ))
            })?;
        let row = RoleRow {
            id: new_id(),
            name: role.name,
            description: role.description,
            department_id: department.id.clone(),
        };
        let created = Role {
            id: row.id.clone(),
            name: row.name.clone(),
            description: row.description.clone(),
            department: department.into(),
        };
        tables.roles.push(row);
        Ok(created)
    }

    async fn list_juice_requests(&self) -> Result<Vec<JuiceRequest>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows = tables.juice_requests.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_juice_request(
        &self,
        request: NewJuiceRequest,
    ) -> Result<JuiceRequest, StoreError> {
        let mut tables = self.tables.write().await;
        tables.ensure_user(&request.request_from_id)?;
        let now = Utc::now();
        let row = JuiceRequestRow {
            id: new_id(),
            request_from_id: request.request_from_id,
            lemon_amount: request.lemon_amount,
            orange_amount: request.orange_amount,
            grapefruit_amount: request.grapefruit_amount,
            notes: request.notes,
            created_at: now,
            last_edited: now,
        };
        tables.juice_requests.push(row.clone());
        Ok(row.into())
    }

    async fn update_juice_request(
        &self,
        id: &str,
        request: JuiceRequestUpdate,
    ) -> Result<JuiceRequest, StoreError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .juice_requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound("juice request".to_string()))?;
        row.lemon_amount = request.lemon_amount;
        row.orange_amount = request.orange_amount;
        row.grapefruit_amount = request.grapefruit_amount;
        row.notes = request.notes;
        row.last_edited = Utc::now();
        Ok(row.clone().into())
    }

    async fn delete_juice_request(&self, id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.juice_requests.len();
        tables.juice_requests.retain(|r| r.id != id);
        if tables.juice_requests.len() == before {
            return Err(StoreError::NotFound("juice request".to_string()));
        }
        Ok(())
    }
}
