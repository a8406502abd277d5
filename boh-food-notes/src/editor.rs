use std::str::FromStr;

use boh_models::Dish;
use tracing::{error, info, instrument};

use crate::error::SubmitError;
use crate::form::{DirtyTracking, DishForm};
use crate::ports::{DishRepository, ImageStore};
use crate::session::Session;

/// Whether a failed save still closes the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClosePolicy {
    /// Keep the editor open with the user's values after a failed save.
    #[default]
    OnSuccessOnly,
    /// Clear and close after every save attempt that passed validation.
    Always,
}

impl FromStr for ClosePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "on-success-only" | "on-success" => Ok(ClosePolicy::OnSuccessOnly),
            "always" => Ok(ClosePolicy::Always),
            other => Err(format!("unknown close policy: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit { dish_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    Kept,
}

/// The new/edit dish modal: a form plus its open/close lifecycle.
#[derive(Debug, Clone)]
pub struct DishEditor {
    form: DishForm,
    mode: EditorMode,
    tracking: DirtyTracking,
    close_policy: ClosePolicy,
    open: bool,
}

impl DishEditor {
    pub fn create(tracking: DirtyTracking, close_policy: ClosePolicy) -> Self {
        Self {
            form: DishForm::new(tracking),
            mode: EditorMode::Create,
            tracking,
            close_policy,
            open: false,
        }
    }

    pub fn edit(dish: &Dish, tracking: DirtyTracking, close_policy: ClosePolicy) -> Self {
        Self {
            form: DishForm::for_dish(dish, tracking),
            mode: EditorMode::Edit {
                dish_id: dish.id.clone(),
            },
            tracking,
            close_policy,
            open: false,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn form(&self) -> &DishForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut DishForm {
        &mut self.form
    }

    /// Closes a clean editor straight away. A dirty one closes, and loses
    /// its values, only when `confirm` agrees.
    pub fn request_close(&mut self, confirm: impl FnOnce() -> bool) -> CloseOutcome {
        if self.form.is_dirty() && !confirm() {
            return CloseOutcome::Kept;
        }
        self.close();
        CloseOutcome::Closed
    }

    fn close(&mut self) {
        self.form.clear();
        self.open = false;
    }

    /// Validates, uploads a pending image, then creates or updates the dish.
    ///
    /// Validation failures never close the editor. Other failures close it
    /// only under [`ClosePolicy::Always`].
    #[instrument(skip_all)]
    pub async fn submit(
        &mut self,
        session: &Session,
        images: &dyn ImageStore,
        dishes: &dyn DishRepository,
    ) -> Result<Dish, SubmitError> {
        self.form.validate()?;

        let result = self.save(session, images, dishes).await;
        match &result {
            Ok(dish) => {
                info!(dish_id = %dish.id, "dish saved");
                if let EditorMode::Edit { .. } = self.mode {
                    self.form = DishForm::for_dish(dish, self.tracking);
                }
                self.close();
            }
            Err(e) => {
                error!("failed to save dish: {e:?}");
                if self.close_policy == ClosePolicy::Always {
                    self.close();
                }
            }
        }
        result
    }

    async fn save(
        &self,
        session: &Session,
        images: &dyn ImageStore,
        dishes: &dyn DishRepository,
    ) -> Result<Dish, SubmitError> {
        let image_id = match self.form.pending_image() {
            Some(image) => Some(images.upload(image).await?),
            None => self.form.fields().image_id.clone(),
        };

        let dish = match &self.mode {
            EditorMode::Create => {
                dishes
                    .create_dish(self.form.new_dish(image_id, session))
                    .await?
            }
            EditorMode::Edit { dish_id } => {
                dishes
                    .update_dish(dish_id, self.form.update_dish(image_id, session))
                    .await?
            }
        };
        Ok(dish)
    }
}
