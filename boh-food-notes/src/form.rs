use std::path::Path;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Signed, Zero};
use boh_models::{Dish, IdSelection, NewDish, UpdateDish};

use crate::error::{RequiredField, ValidationError};
use crate::session::Session;

/// An image picked locally but not uploaded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl PendingImage {
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(content_type_for)
            .map(str::to_string);
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }
}

fn content_type_for(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// How the dirty flag follows edits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DirtyTracking {
    /// Re-derived from the current values on every read.
    #[default]
    Continuous,
    /// Once set by an edit, stays set until the form is cleared.
    Sticky,
}

impl FromStr for DirtyTracking {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "continuous" => Ok(DirtyTracking::Continuous),
            "sticky" => Ok(DirtyTracking::Sticky),
            other => Err(format!("unknown dirty tracking mode: {other}")),
        }
    }
}

/// Editable dish values. Selections are kept sorted so a reordered
/// checkbox group compares equal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DishFields {
    pub name: String,
    pub description: String,
    pub advertised_description: String,
    pub price: BigDecimal,
    pub allergens: Vec<String>,
    pub menus: Vec<String>,
    pub menu_section: Option<String>,
    /// Image already stored for the dish being edited.
    pub image_id: Option<String>,
}

impl From<&Dish> for DishFields {
    fn from(dish: &Dish) -> Self {
        Self {
            name: dish.name.clone(),
            description: dish.description.clone(),
            advertised_description: dish.advertised_description.clone(),
            price: dish.price.clone(),
            allergens: sorted(dish.allergens.iter().map(|a| a.id.clone()).collect()),
            menus: sorted(dish.menus.iter().map(|m| m.id.clone()).collect()),
            menu_section: dish.menu_section.as_ref().map(|s| s.id.clone()),
            image_id: dish.image_id.clone(),
        }
    }
}

fn sorted(mut ids: Vec<String>) -> Vec<String> {
    ids.sort();
    ids.dedup();
    ids
}

/// Unsaved values for a dish being created or edited.
#[derive(Debug, Clone)]
pub struct DishForm {
    fields: DishFields,
    baseline: DishFields,
    pending_image: Option<PendingImage>,
    tracking: DirtyTracking,
    touched: bool,
}

impl DishForm {
    /// An empty form for a new dish.
    pub fn new(tracking: DirtyTracking) -> Self {
        Self::with_baseline(DishFields::default(), tracking)
    }

    /// A form prefilled from `dish`; dirty means "differs from the dish".
    pub fn for_dish(dish: &Dish, tracking: DirtyTracking) -> Self {
        Self::with_baseline(DishFields::from(dish), tracking)
    }

    fn with_baseline(baseline: DishFields, tracking: DirtyTracking) -> Self {
        Self {
            fields: baseline.clone(),
            baseline,
            pending_image: None,
            tracking,
            touched: false,
        }
    }

    pub fn fields(&self) -> &DishFields {
        &self.fields
    }

    pub fn pending_image(&self) -> Option<&PendingImage> {
        self.pending_image.as_ref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.fields.name = name.into();
        self.mark();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.fields.description = description.into();
        self.mark();
    }

    pub fn set_advertised_description(&mut self, advertised: impl Into<String>) {
        self.fields.advertised_description = advertised.into();
        self.mark();
    }

    pub fn set_price(&mut self, price: BigDecimal) {
        self.fields.price = price;
        self.mark();
    }

    /// Replaces the allergen selection with the group's full membership.
    pub fn set_allergens(&mut self, ids: Vec<String>) {
        self.fields.allergens = sorted(ids);
        self.mark();
    }

    pub fn set_menus(&mut self, ids: Vec<String>) {
        self.fields.menus = sorted(ids);
        self.mark();
    }

    pub fn set_menu_section(&mut self, section_id: Option<String>) {
        self.fields.menu_section = section_id;
        self.mark();
    }

    /// `None` when the picker closed without a file.
    pub fn select_image(&mut self, image: Option<PendingImage>) {
        self.pending_image = image;
        self.mark();
    }

    /// Drops both the pending image and any stored one.
    pub fn remove_image(&mut self) {
        self.pending_image = None;
        self.fields.image_id = None;
        self.mark();
    }

    fn differs(&self) -> bool {
        self.pending_image.is_some() || self.fields != self.baseline
    }

    fn mark(&mut self) {
        if self.differs() {
            self.touched = true;
        }
    }

    pub fn is_dirty(&self) -> bool {
        match self.tracking {
            DirtyTracking::Continuous => self.differs(),
            DirtyTracking::Sticky => self.touched || self.differs(),
        }
    }

    /// Back to the baseline, discarding every edit.
    pub fn clear(&mut self) {
        self.fields = self.baseline.clone();
        self.pending_image = None;
        self.touched = false;
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.fields.name.trim().is_empty() {
            missing.push(RequiredField::Name);
        }
        if self.fields.advertised_description.trim().is_empty() {
            missing.push(RequiredField::AdvertisedDescription);
        }
        if self.fields.price.is_zero() {
            missing.push(RequiredField::Price);
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }
        if self.fields.price.is_negative() {
            return Err(ValidationError::NegativePrice);
        }
        Ok(())
    }

    /// `image_id` is the freshly uploaded image, or the stored one.
    pub fn new_dish(&self, image_id: Option<String>, session: &Session) -> NewDish {
        let f = &self.fields;
        NewDish {
            name: f.name.trim().to_string(),
            description: f.description.clone(),
            advertised_description: f.advertised_description.trim().to_string(),
            price: f.price.clone(),
            image_id,
            allergens: IdSelection::from_selected(f.allergens.clone()),
            menu: IdSelection::from_selected(f.menus.clone()),
            menu_section: f.menu_section.clone(),
            last_edited_by_id: session.user_id.clone(),
        }
    }

    pub fn update_dish(&self, image_id: Option<String>, session: &Session) -> UpdateDish {
        let f = &self.fields;
        UpdateDish {
            name: f.name.trim().to_string(),
            description: f.description.clone(),
            advertised_description: f.advertised_description.trim().to_string(),
            price: f.price.clone(),
            image_id,
            allergens: IdSelection::from_selected(f.allergens.clone()),
            menu: IdSelection::from_selected(f.menus.clone()),
            menu_section: f.menu_section.clone(),
            last_edited_by_id: session.user_id.clone(),
        }
    }
}
