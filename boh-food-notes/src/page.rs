use boh_models::{Allergen, Dish, Menu};
use tracing::{error, instrument, warn};

use crate::editor::{ClosePolicy, DishEditor};
use crate::error::{ClientError, SubmitError};
use crate::filter::MenuFilter;
use crate::form::DirtyTracking;
use crate::grouping::{capitalize, dishes_for_menu, menu_names};
use crate::icons::AllergenIcon;
use crate::ports::{DishRepository, ImageStore, ReferenceData};
use crate::session::Session;

pub const PAGE_TITLE: &str = "Food Notes";
pub const EMPTY_MENU_TEXT: &str = "No dishes in this menu";

#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    LoginRequired,
    Loading,
    Ready(FoodNotesView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoodNotesView {
    pub title: &'static str,
    pub show_new_dish: bool,
    pub filter_options: Vec<FilterOption>,
    pub sections: Vec<MenuSectionView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub menu_id: String,
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuSectionView {
    pub menu_id: String,
    pub heading: String,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Dishes(Vec<DishCard>),
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DishCard {
    pub dish: Dish,
    pub allergens: Vec<AllergenBadge>,
    pub can_edit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllergenBadge {
    pub name: String,
    pub icon: Option<AllergenIcon>,
}

/// State behind the Food Notes page: reference data, the active dish
/// list and the menu filter.
#[derive(Debug, Clone)]
pub struct FoodNotesPage {
    session: Session,
    menus: Option<Vec<Menu>>,
    allergens: Option<Vec<Allergen>>,
    dishes: Option<Vec<Dish>>,
    filter: MenuFilter,
}

impl FoodNotesPage {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            menus: None,
            allergens: None,
            dishes: None,
            filter: MenuFilter::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn allergens(&self) -> &[Allergen] {
        self.allergens.as_deref().unwrap_or_default()
    }

    pub fn menus(&self) -> &[Menu] {
        self.menus.as_deref().unwrap_or_default()
    }

    pub fn filter(&self) -> &MenuFilter {
        &self.filter
    }

    pub fn set_visible_menus(&mut self, menu_ids: Vec<String>) {
        self.filter.set_visible(menu_ids);
    }

    /// Fetches menus, allergens and dishes. Whatever arrived is kept even
    /// if a later fetch fails.
    #[instrument(skip_all)]
    pub async fn load(
        &mut self,
        reference: &dyn ReferenceData,
        dishes: &dyn DishRepository,
    ) -> Result<(), ClientError> {
        let menus = reference.food_menus().await?;
        self.filter.on_menus_loaded(&menus);
        self.menus = Some(menus);
        self.allergens = Some(reference.allergens().await?);
        self.refresh_dishes(dishes).await
    }

    pub async fn refresh_dishes(&mut self, dishes: &dyn DishRepository) -> Result<(), ClientError> {
        self.dishes = Some(dishes.active_dishes().await?);
        Ok(())
    }

    async fn refresh_after_mutation(&mut self, dishes: &dyn DishRepository) {
        if let Err(e) = self.refresh_dishes(dishes).await {
            warn!("failed to refresh dishes: {e:?}");
        }
    }

    pub fn view(&self) -> PageView {
        if !self.session.is_logged_in() {
            return PageView::LoginRequired;
        }
        let (Some(menus), Some(allergens), Some(dishes), Some(visible)) = (
            &self.menus,
            &self.allergens,
            &self.dishes,
            self.filter.visible(),
        ) else {
            return PageView::Loading;
        };

        let names = menu_names(menus);
        let can_edit = self.session.can_author_dishes();
        let sections = visible
            .iter()
            .filter_map(|menu_id| {
                let name = names.get(menu_id.as_str())?;
                let cards: Vec<_> = dishes_for_menu(dishes, menu_id)
                    .into_iter()
                    .map(|dish| card(dish, allergens, can_edit))
                    .collect();
                let body = if cards.is_empty() {
                    SectionBody::Empty(EMPTY_MENU_TEXT)
                } else {
                    SectionBody::Dishes(cards)
                };
                Some(MenuSectionView {
                    menu_id: menu_id.clone(),
                    heading: capitalize(name),
                    body,
                })
            })
            .collect();

        let filter_options = menus
            .iter()
            .map(|m| FilterOption {
                menu_id: m.id.clone(),
                label: capitalize(&m.name),
                checked: self.filter.is_visible(&m.id),
            })
            .collect();

        PageView::Ready(FoodNotesView {
            title: PAGE_TITLE,
            show_new_dish: can_edit,
            filter_options,
            sections,
        })
    }

    /// `None` unless the session may author dishes.
    pub fn new_dish_editor(
        &self,
        tracking: DirtyTracking,
        close_policy: ClosePolicy,
    ) -> Option<DishEditor> {
        self.session
            .can_author_dishes()
            .then(|| DishEditor::create(tracking, close_policy))
    }

    pub fn edit_dish_editor(
        &self,
        dish_id: &str,
        tracking: DirtyTracking,
        close_policy: ClosePolicy,
    ) -> Option<DishEditor> {
        if !self.session.can_author_dishes() {
            return None;
        }
        let dish = self.dishes.as_ref()?.iter().find(|d| d.id == dish_id)?;
        Some(DishEditor::edit(dish, tracking, close_policy))
    }

    /// Saves through `editor` and refetches the dish list on success.
    pub async fn submit(
        &mut self,
        editor: &mut DishEditor,
        images: &dyn ImageStore,
        dishes: &dyn DishRepository,
    ) -> Result<Dish, SubmitError> {
        let saved = editor.submit(&self.session, images, dishes).await?;
        self.refresh_after_mutation(dishes).await;
        Ok(saved)
    }

    #[instrument(skip(self, dishes))]
    pub async fn delete_dish(
        &mut self,
        dish_id: &str,
        dishes: &dyn DishRepository,
    ) -> Result<(), ClientError> {
        if let Err(e) = dishes.delete_dish(dish_id).await {
            error!("failed to delete dish: {e:?}");
            return Err(e);
        }
        self.refresh_after_mutation(dishes).await;
        Ok(())
    }
}

fn card(dish: &Dish, allergens: &[Allergen], can_edit: bool) -> DishCard {
    let badges = dish
        .allergens
        .iter()
        .map(|a| {
            let name = allergens
                .iter()
                .find(|known| known.id == a.id)
                .map_or(a.name.as_str(), |known| known.name.as_str());
            AllergenBadge {
                name: name.to_string(),
                icon: AllergenIcon::for_allergen(name),
            }
        })
        .collect();
    DishCard {
        dish: dish.clone(),
        allergens: badges,
        can_edit,
    }
}
