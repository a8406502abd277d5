use boh_models::Menu;

/// Which menus the Food Notes page shows.
///
/// Unset until the menu list first loads, then every menu is visible.
/// Later changes replace the whole selection; the checkbox group reports
/// its full membership on every change.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MenuFilter {
    visible: Option<Vec<String>>,
}

impl MenuFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every menu visible the first time menus arrive. Reloads keep
    /// whatever the user picked.
    pub fn on_menus_loaded(&mut self, menus: &[Menu]) {
        if self.visible.is_none() {
            self.visible = Some(menus.iter().map(|m| m.id.clone()).collect());
        }
    }

    pub fn set_visible(&mut self, menu_ids: Vec<String>) {
        self.visible = Some(menu_ids);
    }

    /// `None` while menus are still loading.
    pub fn visible(&self) -> Option<&[String]> {
        self.visible.as_deref()
    }

    pub fn is_visible(&self, menu_id: &str) -> bool {
        self.visible
            .as_ref()
            .is_some_and(|ids| ids.iter().any(|id| id == menu_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::fixtures::menu;

    #[test]
    fn test_unset_until_menus_load() {
        let filter = MenuFilter::new();
        assert_eq!(filter.visible(), None);
        assert!(!filter.is_visible("m1"));
    }

    #[test]
    fn test_first_load_shows_every_menu() {
        let mut filter = MenuFilter::new();
        filter.on_menus_loaded(&[menu("m1", "lunch"), menu("m2", "dinner")]);
        assert_eq!(
            filter.visible(),
            Some(&["m1".to_string(), "m2".to_string()][..])
        );
    }

    #[test]
    fn test_selection_replaced_wholesale_and_kept_on_reload() {
        let menus = [menu("m1", "lunch"), menu("m2", "dinner")];
        let mut filter = MenuFilter::new();
        filter.on_menus_loaded(&menus);

        filter.set_visible(vec!["m2".to_string()]);
        assert!(!filter.is_visible("m1"));
        assert!(filter.is_visible("m2"));

        filter.on_menus_loaded(&menus);
        assert_eq!(filter.visible(), Some(&["m2".to_string()][..]));

        filter.set_visible(vec![]);
        assert_eq!(filter.visible(), Some(&[][..]));
    }
}
