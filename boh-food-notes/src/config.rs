use std::env;
use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;
use tracing::info;

use crate::cloudinary::{CloudinaryConfig, DEFAULT_UPLOAD_BASE};
use crate::editor::ClosePolicy;
use crate::form::DirtyTracking;

pub const DEFAULT_API_URL: &str = "http://localhost:8100";

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid {key} value: {message}")]
pub struct ConfigError {
    pub key: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    /// `None` when no cloud name or upload preset is set.
    pub cloudinary: Option<CloudinaryConfig>,
    pub close_policy: ClosePolicy,
    pub dirty_tracking: DirtyTracking,
}

impl ClientConfig {
    /// Reads the process environment, after loading `.env` if present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let cloudinary = match (
            lookup("CLOUDINARY_CLOUD"),
            lookup("CLOUDINARY_UPLOAD_PRESET"),
        ) {
            (Some(cloud_name), Some(upload_preset)) => Some(CloudinaryConfig {
                base_url: lookup("CLOUDINARY_UPLOAD_BASE")
                    .unwrap_or_else(|| DEFAULT_UPLOAD_BASE.into()),
                cloud_name,
                upload_preset,
                api_key: lookup("CLOUDINARY_API_KEY"),
            }),
            _ => {
                info!("CLOUDINARY_CLOUD or CLOUDINARY_UPLOAD_PRESET not set, image uploads disabled");
                None
            }
        };

        Ok(Self {
            api_url: lookup("BOH_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()),
            cloudinary,
            close_policy: parse_or_default(&lookup, "BOH_CLOSE_POLICY")?,
            dirty_tracking: parse_or_default(&lookup, "BOH_DIRTY_TRACKING")?,
        })
    }
}

fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<T, ConfigError>
where
    T: FromStr + Default,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError {
            key,
            message: e.to_string(),
        }),
        None => Ok(T::default()),
    }
}
