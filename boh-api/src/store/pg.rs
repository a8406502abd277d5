use std::collections::HashMap;

use async_trait::async_trait;
use boh_models::{
    Allergen, Department, Dish, IdSelection, JuiceRequest, JuiceRequestUpdate, Menu, MenuSection,
    MenuType, NewDepartment, NewDish, NewJuiceRequest, NewRole, NewUser, Role, UpdateDish, User,
};
use chrono::Utc;
use diesel::{delete, insert_into, prelude::*, update};
use diesel_async::{
    async_connection_wrapper::AsyncConnectionWrapper, scoped_futures::ScopedFutureExt,
    AsyncConnection, AsyncPgConnection, RunQueryDsl,
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

use super::{distinct, new_id, Store, StoreError};
use crate::models::{
    AllergenRow, DepartmentRow, DishAllergen, DishChanges, DishMenu, DishRow, JuiceRequestRow,
    MenuRow, MenuSectionRow, RoleRow, UserRow,
};
use crate::schema::{
    allergens, departments, dish_allergens, dish_menus, dishes, juice_requests, menu_sections,
    menus, roles, users,
};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

pub async fn run_migrations(
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let conn = AsyncPgConnection::establish(database_url).await?;
    let mut async_wrapper: AsyncConnectionWrapper<AsyncPgConnection> =
        AsyncConnectionWrapper::from(conn);
    let applied = tokio::task::spawn_blocking(move || {
        async_wrapper
            .run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.len())
    })
    .await??;
    info!(applied, "database migrations complete");
    Ok(())
}

/// Postgres-backed store. Opens a connection per call.
#[derive(Clone)]
pub struct PgStore {
    database_url: String,
}

impl PgStore {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    async fn connect(&self) -> Result<AsyncPgConnection, StoreError> {
        Ok(AsyncPgConnection::establish(&self.database_url).await?)
    }
}

async fn ensure_user(conn: &mut AsyncPgConnection, id: &str) -> Result<(), StoreError> {
    let found: i64 = users::table
        .filter(users::id.eq(id))
        .count()
        .get_result(conn)
        .await?;
    if found == 0 {
        return Err(StoreError::InvalidReference(format!("unknown user id {id}")));
    }
    Ok(())
}

async fn ensure_section(conn: &mut AsyncPgConnection, id: &str) -> Result<(), StoreError> {
    let found: i64 = menu_sections::table
        .filter(menu_sections::id.eq(id))
        .count()
        .get_result(conn)
        .await?;
    if found == 0 {
        return Err(StoreError::InvalidReference(format!(
            "unknown menu section id {id}"
        )));
    }
    Ok(())
}

fn first_missing(wanted: &[String], found: &[String]) -> Option<String> {
    wanted.iter().find(|id| !found.contains(id)).cloned()
}

async fn set_dish_menus(
    conn: &mut AsyncPgConnection,
    dish_id: &str,
    selection: &IdSelection,
) -> Result<(), StoreError> {
    if selection.is_unset() {
        return Ok(());
    }
    let ids = distinct(selection.ids());
    let found: Vec<String> = menus::table
        .filter(menus::id.eq_any(&ids))
        .select(menus::id)
        .load(conn)
        .await?;
    if let Some(missing) = first_missing(&ids, &found) {
        return Err(StoreError::InvalidReference(format!("unknown menu id {missing}")));
    }

    delete(dish_menus::table.filter(dish_menus::dish_id.eq(dish_id)))
        .execute(conn)
        .await?;
    let links: Vec<DishMenu> = ids
        .into_iter()
        .map(|menu_id| DishMenu {
            dish_id: dish_id.to_string(),
            menu_id,
        })
        .collect();
    if !links.is_empty() {
        insert_into(dish_menus::table)
            .values(&links)
            .execute(conn)
            .await?;
    }
    Ok(())
}

async fn set_dish_allergens(
    conn: &mut AsyncPgConnection,
    dish_id: &str,
    selection: &IdSelection,
) -> Result<(), StoreError> {
    if selection.is_unset() {
        return Ok(());
    }
    let ids = distinct(selection.ids());
    let found: Vec<String> = allergens::table
        .filter(allergens::id.eq_any(&ids))
        .select(allergens::id)
        .load(conn)
        .await?;
    if let Some(missing) = first_missing(&ids, &found) {
        return Err(StoreError::InvalidReference(format!(
            "unknown allergen id {missing}"
        )));
    }

    delete(dish_allergens::table.filter(dish_allergens::dish_id.eq(dish_id)))
        .execute(conn)
        .await?;
    let links: Vec<DishAllergen> = ids
        .into_iter()
        .map(|allergen_id| DishAllergen {
            dish_id: dish_id.to_string(),
            allergen_id,
        })
        .collect();
    if !links.is_empty() {
        insert_into(dish_allergens::table)
            .values(&links)
            .execute(conn)
            .await?;
    }
    Ok(())
}

/// Loads the menus, allergens and section of every row.
async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<DishRow>,
) -> Result<Vec<Dish>, StoreError> {
    let dish_menus = DishMenu::belonging_to(&rows)
        .inner_join(menus::table)
        .order(menus::name.asc())
        .select((DishMenu::as_select(), MenuRow::as_select()))
        .load::<(DishMenu, MenuRow)>(conn)
        .await?
        .grouped_by(&rows);
    let dish_allergens = DishAllergen::belonging_to(&rows)
        .inner_join(allergens::table)
        .order(allergens::name.asc())
        .select((DishAllergen::as_select(), AllergenRow::as_select()))
        .load::<(DishAllergen, AllergenRow)>(conn)
        .await?
        .grouped_by(&rows);

    let section_ids = distinct(
        &rows
            .iter()
            .filter_map(|r| r.menu_section_id.clone())
            .collect::<Vec<_>>(),
    );
    let sections: HashMap<String, MenuSection> = if section_ids.is_empty() {
        HashMap::new()
    } else {
        menu_sections::table
            .filter(menu_sections::id.eq_any(&section_ids))
            .select(MenuSectionRow::as_select())
            .load::<MenuSectionRow>(conn)
            .await?
            .into_iter()
            .map(|s| (s.id.clone(), s.into()))
            .collect()
    };

    rows.into_iter()
        .zip(dish_menus)
        .zip(dish_allergens)
        .map(|((row, menus), allergens)| {
            let menus = menus
                .into_iter()
                .map(|(_, m)| m.into_menu(vec![]))
                .collect::<Result<Vec<_>, _>>()?;
            let allergens = allergens.into_iter().map(|(_, a)| a.into()).collect();
            let section = row
                .menu_section_id
                .as_ref()
                .and_then(|id| sections.get(id).cloned());
            Ok(row.into_dish(allergens, menus, section))
        })
        .collect()
}

async fn hydrate_one(conn: &mut AsyncPgConnection, row: DishRow) -> Result<Dish, StoreError> {
    hydrate(conn, vec![row])
        .await?
        .pop()
        .ok_or_else(|| StoreError::NotFound("dish".to_string()))
}

#[async_trait]
impl Store for PgStore {
    async fn list_menus(&self, menu_type: Option<MenuType>) -> Result<Vec<Menu>, StoreError> {
        let conn = &mut self.connect().await?;
        let rows: Vec<MenuRow> = match menu_type {
            Some(menu_type) => {
                menus::table
                    .filter(menus::menu_type.eq(menu_type.as_str()))
                    .order(menus::name.asc())
                    .select(MenuRow::as_select())
                    .load(conn)
                    .await?
            }
            None => {
                menus::table
                    .order(menus::name.asc())
                    .select(MenuRow::as_select())
                    .load(conn)
                    .await?
            }
        };

        let sections = MenuSectionRow::belonging_to(&rows)
            .order((
                menu_sections::arrangement_in_menu.asc(),
                menu_sections::name.asc(),
            ))
            .select(MenuSectionRow::as_select())
            .load(conn)
            .await?
            .grouped_by(&rows);

        rows.into_iter()
            .zip(sections)
            .map(|(menu, sections)| menu.into_menu(sections.into_iter().map(Into::into).collect()))
            .collect()
    }

    async fn list_allergens(&self) -> Result<Vec<Allergen>, StoreError> {
        let conn = &mut self.connect().await?;
        let rows = allergens::table
            .order(allergens::name.asc())
            .select(AllergenRow::as_select())
            .load(conn)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn active_dishes(&self) -> Result<Vec<Dish>, StoreError> {
        let conn = &mut self.connect().await?;
        let rows = dishes::table
            .filter(dishes::is_deleted.eq(false))
            .order(dishes::created_at.asc())
            .select(DishRow::as_select())
            .load(conn)
            .await?;
        hydrate(conn, rows).await
    }

    async fn create_dish(&self, dish: NewDish) -> Result<Dish, StoreError> {
        let conn = &mut self.connect().await?;
        let row = conn
            .transaction::<_, StoreError, _>(move |conn| {
                async move {
                    ensure_user(conn, &dish.last_edited_by_id).await?;
                    if let Some(section_id) = &dish.menu_section {
                        ensure_section(conn, section_id).await?;
                    }

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
                    insert_into(dishes::table)
                        .values(&row)
                        .execute(conn)
                        .await?;
                    set_dish_menus(conn, &row.id, &dish.menu).await?;
                    set_dish_allergens(conn, &row.id, &dish.allergens).await?;
                    Ok(row)
                }
                .scope_boxed()
            })
            .await?;
        hydrate_one(conn, row).await
    }

    async fn update_dish(&self, id: &str, dish: UpdateDish) -> Result<Dish, StoreError> {
        let id = id.to_string();
        let conn = &mut self.connect().await?;
        let row = conn
            .transaction::<_, StoreError, _>(move |conn| {
                async move {
                    dishes::table
                        .find(&id)
                        .filter(dishes::is_deleted.eq(false))
                        .select(DishRow::as_select())
                        .first(conn)
                        .await
                        .optional()?
                        .ok_or_else(|| StoreError::NotFound("dish".to_string()))?;
                    ensure_user(conn, &dish.last_edited_by_id).await?;
                    if let Some(section_id) = &dish.menu_section {
                        ensure_section(conn, section_id).await?;
                    }

                    let changes = DishChanges {
                        name: dish.name,
                        description: dish.description,
                        advertised_description: dish.advertised_description,
                        price: dish.price,
                        image_id: dish.image_id,
                        menu_section_id: dish.menu_section,
                        last_edited: Utc::now(),
                        last_edited_by_id: dish.last_edited_by_id,
                    };
                    let row = update(dishes::table.find(&id))
                        .set(&changes)
                        .returning(DishRow::as_returning())
                        .get_result(conn)
                        .await?;
                    set_dish_menus(conn, &id, &dish.menu).await?;
                    set_dish_allergens(conn, &id, &dish.allergens).await?;
                    Ok(row)
                }
                .scope_boxed()
            })
            .await?;
        hydrate_one(conn, row).await
    }

    async fn delete_dish(&self, id: &str) -> Result<(), StoreError> {
        let conn = &mut self.connect().await?;
        let affected = update(
            dishes::table
                .find(id)
                .filter(dishes::is_deleted.eq(false)),
        )
        .set((dishes::is_deleted.eq(true), dishes::last_edited.eq(Utc::now())))
        .execute(conn)
        .await?;
        if affected == 0 {
            return Err(StoreError::NotFound("dish".to_string()));
        }
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let conn = &mut self.connect().await?;
        let rows = users::table
            .order((users::last_name.asc(), users::first_name.asc()))
            .select(UserRow::as_select())
            .load(conn)
            .await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn create_user(&self, user: NewUser, password_hash: String) -> Result<User, StoreError> {
        let conn = &mut self.connect().await?;
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
        insert_into(users::table).values(&row).execute(conn).await?;
        row.try_into()
    }

    async fn delete_user(&self, id: &str) -> Result<(), StoreError> {
        let conn = &mut self.connect().await?;
        let affected = delete(users::table.find(id)).execute(conn).await?;
        if affected == 0 {
            return Err(StoreError::NotFound("user".to_string()));
        }
        Ok(())
    }

    async fn list_departments(&self) -> Result<Vec<Department>, StoreError> {
        let conn = &mut self.connect().await?;
        let rows = departments::table
            .order(departments::name.asc())
            .select(DepartmentRow::as_select())
            .load(conn)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_department(
        &self,
        department: NewDepartment,
    ) -> Result<Department, StoreError> {
        let conn = &mut self.connect().await?;
        let row = DepartmentRow {
            id: new_id(),
            name: department.name,
            description: department.description,
        };
        insert_into(departments::table)
            .values(&row)
            .execute(conn)
            .await?;
        Ok(row.into())
    }

    async fn list_roles(&self) -> Result<Vec<Role>, StoreError> {
        let conn = &mut self.connect().await?;
        let rows = roles::table
            .inner_join(departments::table)
            .order(roles::name.asc())
            .select((RoleRow::as_select(), DepartmentRow::as_select()))
            .load::<(RoleRow, DepartmentRow)>(conn)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(role, department)| role.into_role(department))
            .collect())
    }

    async fn create_role(&self, role: NewRole) -> Result<Role, StoreError> {
        let conn = &mut self.connect().await?;
        let department = departments::table
            .find(&role.department_id)
            .select(DepartmentRow::as_select())
            .first(conn)
            .await
            .optional()?
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
        insert_into(roles::table).values(&row).execute(conn).await?;
        Ok(row.into_role(department))
    }

    async fn list_juice_requests(&self) -> Result<Vec<JuiceRequest>, StoreError> {
        let conn = &mut self.connect().await?;
        let rows = juice_requests::table
            .order(juice_requests::created_at.desc())
            .select(JuiceRequestRow::as_select())
            .load(conn)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_juice_request(
        &self,
        request: NewJuiceRequest,
    ) -> Result<JuiceRequest, StoreError> {
        let conn = &mut self.connect().await?;
        ensure_user(conn, &request.request_from_id).await?;
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
        insert_into(juice_requests::table)
            .values(&row)
            .execute(conn)
            .await?;
        Ok(row.into())
    }

    async fn update_juice_request(
        &self,
        id: &str,
        request: JuiceRequestUpdate,
    ) -> Result<JuiceRequest, StoreError> {
        let conn = &mut self.connect().await?;
        let row = update(juice_requests::table.find(id))
            .set((
                juice_requests::lemon_amount.eq(request.lemon_amount),
                juice_requests::orange_amount.eq(request.orange_amount),
                juice_requests::grapefruit_amount.eq(request.grapefruit_amount),
                juice_requests::notes.eq(request.notes),
                juice_requests::last_edited.eq(Utc::now()),
            ))
            .returning(JuiceRequestRow::as_returning())
            .get_result(conn)
            .await
            .optional()?
            .ok_or_else(|| StoreError::NotFound("juice request".to_string()))?;
        Ok(row.into())
    }

    async fn delete_juice_request(&self, id: &str) -> Result<(), StoreError> {
        let conn = &mut self.connect().await?;
        let affected = delete(juice_requests::table.find(id))
            .execute(conn)
            .await?;
        if affected == 0 {
            return Err(StoreError::NotFound("juice request".to_string()));
        }
        Ok(())
    }
}

/// These run against the database named by `DATABASE_URL`:
/// `cargo test -p boh-api -- --ignored`.
#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;

    use super::*;
    use crate::handlers::test_support::new_user;

    struct Fixture {
        store: PgStore,
        user_id: String,
        /// Named so that `lunch` sorts before `dinner`.
        lunch: String,
        dinner: String,
    }

    async fn fixture() -> Option<Fixture> {
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping");
            return None;
        };
        run_migrations(&database_url).await.unwrap();
        let store = PgStore::new(database_url);

        let suffix = new_id();
        let lunch = MenuRow {
            id: format!("lunch-{suffix}"),
            name: format!("a lunch {suffix}"),
            description: String::new(),
            menu_type: MenuType::Food.as_str().to_string(),
        };
        let dinner = MenuRow {
            id: format!("dinner-{suffix}"),
            name: format!("b dinner {suffix}"),
            ..lunch.clone()
        };
        let conn = &mut store.connect().await.unwrap();
        insert_into(menus::table)
            .values(&vec![lunch.clone(), dinner.clone()])
            .execute(conn)
            .await
            .unwrap();

        let user = store
            .create_user(new_user("Ada"), "hash".to_string())
            .await
            .unwrap();
        Some(Fixture {
            store,
            user_id: user.id,
            lunch: lunch.id,
            dinner: dinner.id,
        })
    }

    fn burger(f: &Fixture, menu: IdSelection) -> NewDish {
        NewDish {
            name: "Burger".to_string(),
            description: String::new(),
            advertised_description: "Juicy burger".to_string(),
            price: BigDecimal::from(12),
            image_id: None,
            allergens: IdSelection::Cleared,
            menu,
            menu_section: None,
            last_edited_by_id: f.user_id.clone(),
        }
    }

    fn as_update(dish: &Dish) -> UpdateDish {
        UpdateDish {
            name: dish.name.clone(),
            description: dish.description.clone(),
            advertised_description: dish.advertised_description.clone(),
            price: dish.price.clone(),
            image_id: dish.image_id.clone(),
            allergens: IdSelection::Unset,
            menu: IdSelection::Unset,
            menu_section: None,
            last_edited_by_id: dish.last_edited_by_id.clone(),
        }
    }

    fn menu_ids(dish: &Dish) -> Vec<&str> {
        dish.menus.iter().map(|m| m.id.as_str()).collect()
    }

    fn allergen_names(dish: &Dish) -> Vec<&str> {
        dish.allergens.iter().map(|a| a.name.as_str()).collect()
    }

    #[tokio::test]
    #[ignore]
    async fn test_dish_links_follow_selection() {
        let Some(f) = fixture().await else { return };

        let created = f
            .store
            .create_dish(burger(
                &f,
                IdSelection::Ids(vec![f.dinner.clone(), f.lunch.clone(), f.dinner.clone()]),
            ))
            .await
            .unwrap();
        assert_eq!(menu_ids(&created), [f.lunch.as_str(), f.dinner.as_str()]);
        assert!(created.allergens.is_empty());

        let updated = f
            .store
            .update_dish(
                &created.id,
                UpdateDish {
                    allergens: IdSelection::Ids(vec![
                        "allergen-gluten".to_string(),
                        "allergen-dairy".to_string(),
                    ]),
                    ..as_update(&created)
                },
            )
            .await
            .unwrap();
        assert_eq!(menu_ids(&updated), [f.lunch.as_str(), f.dinner.as_str()]);
        assert_eq!(allergen_names(&updated), ["dairy", "gluten"]);

        let updated = f
            .store
            .update_dish(
                &created.id,
                UpdateDish {
                    menu: IdSelection::Cleared,
                    ..as_update(&updated)
                },
            )
            .await
            .unwrap();
        assert!(updated.menus.is_empty());
        assert_eq!(allergen_names(&updated), ["dairy", "gluten"]);

        let updated = f
            .store
            .update_dish(
                &created.id,
                UpdateDish {
                    menu: IdSelection::Ids(vec![f.dinner.clone()]),
                    allergens: IdSelection::Cleared,
                    ..as_update(&updated)
                },
            )
            .await
            .unwrap();
        assert_eq!(menu_ids(&updated), [f.dinner.as_str()]);
        assert!(updated.allergens.is_empty());

        let active = f.store.active_dishes().await.unwrap();
        let listed = active.iter().find(|d| d.id == created.id).unwrap();
        assert_eq!(listed, &updated);
    }

    #[tokio::test]
    #[ignore]
    async fn test_soft_delete() {
        let Some(f) = fixture().await else { return };
        let dish = f
            .store
            .create_dish(burger(&f, IdSelection::Ids(vec![f.lunch.clone()])))
            .await
            .unwrap();

        f.store.delete_dish(&dish.id).await.unwrap();

        let active = f.store.active_dishes().await.unwrap();
        assert!(active.iter().all(|d| d.id != dish.id));
        assert!(matches!(
            f.store.delete_dish(&dish.id).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            f.store.update_dish(&dish.id, as_update(&dish)).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    #[ignore]
    async fn test_unknown_references() {
        let Some(f) = fixture().await else { return };

        let unknown_menu = f
            .store
            .create_dish(burger(&f, IdSelection::Ids(vec!["no-such-menu".to_string()])))
            .await;
        assert!(matches!(unknown_menu, Err(StoreError::InvalidReference(_))));

        let unknown_user = f
            .store
            .create_dish(NewDish {
                last_edited_by_id: "no-such-user".to_string(),
                ..burger(&f, IdSelection::Unset)
            })
            .await;
        assert!(matches!(unknown_user, Err(StoreError::InvalidReference(_))));

        f.store
            .create_dish(burger(&f, IdSelection::Unset))
            .await
            .unwrap();
        // dishes.last_edited_by_id still points at the user
        assert!(matches!(
            f.store.delete_user(&f.user_id).await,
            Err(StoreError::InvalidReference(_))
        ));
    }
}
