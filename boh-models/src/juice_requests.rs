use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A bar request for the kitchen to press citrus juice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JuiceRequest {
    pub id: String,
    pub request_from_id: String,
    pub lemon_amount: f64,
    pub orange_amount: f64,
    pub grapefruit_amount: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewJuiceRequest {
    pub request_from_id: String,
    #[serde(default)]
    pub lemon_amount: f64,
    #[serde(default)]
    pub orange_amount: f64,
    #[serde(default)]
    pub grapefruit_amount: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JuiceRequestUpdate {
    pub lemon_amount: f64,
    pub orange_amount: f64,
    pub grapefruit_amount: f64,
    pub notes: Option<String>,
}

impl NewJuiceRequest {
    pub fn amounts(&self) -> [f64; 3] {
        [self.lemon_amount, self.orange_amount, self.grapefruit_amount]
    }
}

impl JuiceRequestUpdate {
    pub fn amounts(&self) -> [f64; 3] {
        [self.lemon_amount, self.orange_amount, self.grapefruit_amount]
    }
}
