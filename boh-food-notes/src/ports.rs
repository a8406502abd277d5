//! Collaborators the Food Notes slice talks to.

use async_trait::async_trait;
use boh_models::{Allergen, DeletedDish, Dish, Menu, NewDish, UpdateDish};

use crate::error::{ClientError, UploadError};
use crate::form::PendingImage;

/// Static lists used to render filters and checkboxes.
#[async_trait]
pub trait ReferenceData: Send + Sync {
    async fn food_menus(&self) -> Result<Vec<Menu>, ClientError>;

    async fn allergens(&self) -> Result<Vec<Allergen>, ClientError>;
}

#[async_trait]
pub trait DishRepository: Send + Sync {
    /// Every dish not marked deleted.
    async fn active_dishes(&self) -> Result<Vec<Dish>, ClientError>;

    async fn create_dish(&self, dish: NewDish) -> Result<Dish, ClientError>;

    async fn update_dish(&self, id: &str, dish: UpdateDish) -> Result<Dish, ClientError>;

    async fn delete_dish(&self, id: &str) -> Result<DeletedDish, ClientError>;
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Stores the image and returns its public id.
    async fn upload(&self, image: &PendingImage) -> Result<String, UploadError>;
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::Mutex;

    use chrono::Utc;
    use reqwest::StatusCode;

    use super::*;

    /// In-process back end that records every mutation it receives.
    #[derive(Default)]
    pub struct FakeBackend {
        pub menus: Vec<Menu>,
        pub allergens: Vec<Allergen>,
        pub dishes: Mutex<Vec<Dish>>,
        pub created: Mutex<Vec<NewDish>>,
        pub updated: Mutex<Vec<(String, UpdateDish)>>,
        pub dish_fetches: Mutex<usize>,
        pub fail_mutations: bool,
    }

    impl FakeBackend {
        pub fn with_menus(menus: Vec<Menu>) -> Self {
            Self {
                menus,
                ..Default::default()
            }
        }

        fn refuse(&self) -> Result<(), ClientError> {
            if self.fail_mutations {
                return Err(ClientError::Status {
                    url: "fake".to_string(),
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "boom".to_string(),
                });
            }
            Ok(())
        }

        fn menus_for(&self, ids: &[String]) -> Vec<Menu> {
            self.menus
                .iter()
                .filter(|m| ids.contains(&m.id))
                .cloned()
                .collect()
        }
    }

    #[async_trait]
    impl ReferenceData for FakeBackend {
        async fn food_menus(&self) -> Result<Vec<Menu>, ClientError> {
            Ok(self.menus.clone())
        }

        async fn allergens(&self) -> Result<Vec<Allergen>, ClientError> {
            Ok(self.allergens.clone())
        }
    }

    #[async_trait]
    impl DishRepository for FakeBackend {
        async fn active_dishes(&self) -> Result<Vec<Dish>, ClientError> {
            *self.dish_fetches.lock().unwrap() += 1;
            Ok(self.dishes.lock().unwrap().clone())
        }

        async fn create_dish(&self, dish: NewDish) -> Result<Dish, ClientError> {
            self.created.lock().unwrap().push(dish.clone());
            self.refuse()?;
            let now = Utc::now();
            let created = Dish {
                id: format!("d{}", self.created.lock().unwrap().len()),
                name: dish.name,
                description: dish.description,
                advertised_description: dish.advertised_description,
                price: dish.price,
                image_id: dish.image_id,
                allergens: vec![],
                menus: self.menus_for(dish.menu.ids()),
                menu_section: None,
                created_at: now,
                last_edited: now,
                last_edited_by_id: dish.last_edited_by_id,
            };
            self.dishes.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn update_dish(&self, id: &str, dish: UpdateDish) -> Result<Dish, ClientError> {
            self.updated
                .lock()
                .unwrap()
                .push((id.to_string(), dish.clone()));
            self.refuse()?;
            let menus = self.menus_for(dish.menu.ids());
            let mut dishes = self.dishes.lock().unwrap();
            let existing = dishes
                .iter_mut()
                .find(|d| d.id == id)
                .ok_or_else(|| ClientError::Status {
                    url: "fake".to_string(),
                    status: StatusCode::NOT_FOUND,
                    message: format!("dish {id} not found"),
                })?;
            existing.name = dish.name;
            existing.description = dish.description;
            existing.advertised_description = dish.advertised_description;
            existing.price = dish.price;
            existing.image_id = dish.image_id;
            existing.menus = menus;
            existing.last_edited_by_id = dish.last_edited_by_id;
            Ok(existing.clone())
        }

        async fn delete_dish(&self, id: &str) -> Result<DeletedDish, ClientError> {
            self.refuse()?;
            self.dishes.lock().unwrap().retain(|d| d.id != id);
            Ok(DeletedDish { id: id.to_string() })
        }
    }

    /// Image store that hands out `img-<n>` or refuses every upload.
    #[derive(Default)]
    pub struct FakeImages {
        pub uploads: Mutex<Vec<String>>,
        pub fail: bool,
    }

    #[async_trait]
    impl ImageStore for FakeImages {
        async fn upload(&self, image: &PendingImage) -> Result<String, UploadError> {
            if self.fail {
                return Err(UploadError::Rejected {
                    status: StatusCode::BAD_REQUEST,
                    message: "bad image".to_string(),
                });
            }
            let mut uploads = self.uploads.lock().unwrap();
            uploads.push(image.file_name.clone());
            Ok(format!("img-{}", uploads.len()))
        }
    }
}
