use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A multi-select of entity ids that can tell "never touched" apart from
/// "explicitly emptied".
///
/// On the wire `Unset` is an absent field, `Cleared` is `null` and `Ids`
/// is an array. Fields of this type must be annotated with
/// `#[serde(default, skip_serializing_if = "IdSelection::is_unset")]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IdSelection {
    #[default]
    Unset,
    Cleared,
    Ids(Vec<String>),
}

impl IdSelection {
    /// Normalizes a raw checkbox selection. An empty selection becomes the
    /// explicit none-sentinel.
    pub fn from_selected(ids: Vec<String>) -> Self {
        if ids.is_empty() {
            IdSelection::Cleared
        } else {
            IdSelection::Ids(ids)
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, IdSelection::Unset)
    }

    /// Ids to link. Both `Unset` and `Cleared` yield nothing.
    pub fn ids(&self) -> &[String] {
        match self {
            IdSelection::Ids(ids) => ids,
            _ => &[],
        }
    }
}

impl Serialize for IdSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            IdSelection::Unset | IdSelection::Cleared => serializer.serialize_none(),
            IdSelection::Ids(ids) => serializer.collect_seq(ids),
        }
    }
}

impl<'de> Deserialize<'de> for IdSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ids = Option::<Vec<String>>::deserialize(deserializer)?;
        Ok(match ids {
            Some(ids) => IdSelection::from_selected(ids),
            None => IdSelection::Cleared,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize)]
    struct Payload {
        #[serde(default, skip_serializing_if = "IdSelection::is_unset")]
        allergens: IdSelection,
    }

    #[test]
    fn test_untouched_selection_is_omitted() {
        let payload = Payload {
            allergens: IdSelection::Unset,
        };
        assert_eq!(serde_json::to_value(&payload).unwrap(), json!({}));
    }

    #[test]
    fn test_empty_selection_is_sent_as_null() {
        let payload = Payload {
            allergens: IdSelection::from_selected(vec![]),
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "allergens": null })
        );
    }

    #[test]
    fn test_read_absent_null_and_empty() {
        let absent: Payload = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.allergens, IdSelection::Unset);

        let null: Payload = serde_json::from_value(json!({ "allergens": null })).unwrap();
        assert_eq!(null.allergens, IdSelection::Cleared);

        let empty: Payload = serde_json::from_value(json!({ "allergens": [] })).unwrap();
        assert_eq!(empty.allergens, IdSelection::Cleared);

        let ids: Payload = serde_json::from_value(json!({ "allergens": ["a1"] })).unwrap();
        assert_eq!(ids.allergens.ids(), ["a1".to_string()]);
    }
}
