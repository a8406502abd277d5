/// Icon shown next to an allergen, keyed by the allergen's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllergenIcon {
    Garlic,
    MilkCarton,
    RawEgg,
    FriedFish,
    Wheat,
    Peanut,
    Sesame,
    Shell,
    JellyBeans,
    Almond,
}

impl AllergenIcon {
    pub fn for_allergen(name: &str) -> Option<Self> {
        match name {
            "allium" => Some(AllergenIcon::Garlic),
            "dairy" => Some(AllergenIcon::MilkCarton),
            "egg" => Some(AllergenIcon::RawEgg),
            "fish" => Some(AllergenIcon::FriedFish),
            "gluten" => Some(AllergenIcon::Wheat),
            "peanut" => Some(AllergenIcon::Peanut),
            "sesame" => Some(AllergenIcon::Sesame),
            "shellfish" => Some(AllergenIcon::Shell),
            "soy" => Some(AllergenIcon::JellyBeans),
            "treenut" => Some(AllergenIcon::Almond),
            _ => None,
        }
    }

    /// Terminal rendering.
    pub fn glyph(&self) -> &'static str {
        match self {
            AllergenIcon::Garlic => "🧄",
            AllergenIcon::MilkCarton => "🥛",
            AllergenIcon::RawEgg => "🥚",
            AllergenIcon::FriedFish => "🐟",
            AllergenIcon::Wheat => "🌾",
            AllergenIcon::Peanut => "🥜",
            AllergenIcon::Sesame => "⚪",
            AllergenIcon::Shell => "🦐",
            AllergenIcon::JellyBeans => "🫘",
            AllergenIcon::Almond => "🌰",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_allergens() {
        assert_eq!(AllergenIcon::for_allergen("gluten"), Some(AllergenIcon::Wheat));
        assert_eq!(AllergenIcon::for_allergen("treenut"), Some(AllergenIcon::Almond));
        assert_eq!(AllergenIcon::for_allergen("Gluten"), None);
        assert_eq!(AllergenIcon::for_allergen("celery"), None);
    }
}
