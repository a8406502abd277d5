use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Authorization level attached to every staff account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuthLevel {
    Admin,
    Kitchen,
    Bar,
    #[default]
    User,
}

impl AuthLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthLevel::Admin => "admin",
            AuthLevel::Kitchen => "kitchen",
            AuthLevel::Bar => "bar",
            AuthLevel::User => "user",
        }
    }
}

impl fmt::Display for AuthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown auth level {0:?}")]
pub struct UnknownAuthLevel(pub String);

impl FromStr for AuthLevel {
    type Err = UnknownAuthLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(AuthLevel::Admin),
            "kitchen" => Ok(AuthLevel::Kitchen),
            "bar" => Ok(AuthLevel::Bar),
            "user" => Ok(AuthLevel::User),
            _ => Err(UnknownAuthLevel(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub alias: Option<String>,
    pub auth: AuthLevel,
    pub email: String,
    pub birth_date: Option<NaiveDate>,
    pub phone_number: String,
    pub status: String,
    pub profile_image_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub alias: Option<String>,
    /// Plain text, hashed before it is stored
    pub password: String,
    #[serde(default)]
    pub auth: AuthLevel,
    pub email: String,
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub status: String,
    pub profile_image_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Department {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewDepartment {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub description: String,
    pub department: Department,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewRole {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub department_id: String,
}
