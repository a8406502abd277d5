use boh_models::AuthLevel;

/// The signed-in staff member, passed explicitly to whatever needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub first_name: String,
    pub auth: AuthLevel,
}

impl Session {
    pub fn new(user_id: impl Into<String>, first_name: impl Into<String>, auth: AuthLevel) -> Self {
        Self {
            user_id: user_id.into(),
            first_name: first_name.into(),
            auth,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        !self.user_id.is_empty() && !self.first_name.is_empty()
    }

    /// Only admin and kitchen staff may create or edit dishes.
    pub fn can_author_dishes(&self) -> bool {
        matches!(self.auth, AuthLevel::Admin | AuthLevel::Kitchen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dish_authoring_levels() {
        let allowed: Vec<_> = [
            AuthLevel::Admin,
            AuthLevel::Kitchen,
            AuthLevel::Bar,
            AuthLevel::User,
        ]
        .into_iter()
        .filter(|auth| Session::new("u1", "Ada", *auth).can_author_dishes())
        .collect();
        assert_eq!(allowed, [AuthLevel::Admin, AuthLevel::Kitchen]);
    }

    #[test]
    fn test_session_without_name_is_logged_out() {
        assert!(!Session::new("u1", "", AuthLevel::Admin).is_logged_in());
        assert!(Session::new("u1", "Ada", AuthLevel::User).is_logged_in());
    }
}
