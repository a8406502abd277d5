use std::collections::HashMap;

use boh_models::{Dish, Menu};

/// Dishes that appear on `menu_id`, in the order of `dishes`.
///
/// A dish on several menus is returned for each of them; nothing is
/// deduplicated across calls. Recompute on every render, the dish list can
/// change underneath without notice.
pub fn dishes_for_menu<'a>(dishes: &'a [Dish], menu_id: &str) -> Vec<&'a Dish> {
    dishes.iter().filter(|d| d.is_on_menu(menu_id)).collect()
}

pub fn menu_names(menus: &[Menu]) -> HashMap<&str, &str> {
    menus
        .iter()
        .map(|m| (m.id.as_str(), m.name.as_str()))
        .collect()
}

/// Menu and allergen names are stored lowercase.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use bigdecimal::BigDecimal;
    use boh_models::{Dish, Menu, MenuType};
    use chrono::Utc;

    pub fn menu(id: &str, name: &str) -> Menu {
        Menu {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            menu_type: MenuType::Food,
            sections: vec![],
        }
    }

    pub fn dish(id: &str, menu_ids: &[&str]) -> Dish {
        let now = Utc::now();
        Dish {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            advertised_description: format!("{id}, advertised"),
            price: BigDecimal::from(10),
            image_id: None,
            allergens: vec![],
            menus: menu_ids.iter().map(|m| menu(m, m)).collect(),
            menu_section: None,
            created_at: now,
            last_edited: now,
            last_edited_by_id: "u1".to_string(),
        }
    }
}
