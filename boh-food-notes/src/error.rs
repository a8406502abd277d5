use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the back-of-house API.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}: {message}")]
    Status {
        url: String,
        status: StatusCode,
        message: String,
    },
    #[error("malformed response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Failure storing an image in image storage.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("image upload request failed")]
    Transport(#[from] reqwest::Error),
    #[error("image storage rejected the upload ({status}): {message}")]
    Rejected { status: StatusCode, message: String },
    #[error("image storage response carried no public id")]
    MissingPublicId,
    #[error("image storage is not configured")]
    NotConfigured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Name,
    AdvertisedDescription,
    Price,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequiredField::Name => "name",
            RequiredField::AdvertisedDescription => "advertised description",
            RequiredField::Price => "price",
        })
    }
}

/// Rejected before anything leaves the form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields")]
    MissingFields(Vec<RequiredField>),
    #[error("Price cannot be negative")]
    NegativePrice,
}

/// Outcome of the upload-then-mutate pipeline behind the dish editor.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("dish was not saved, image upload failed")]
    Upload(#[from] UploadError),
    #[error("dish was not saved")]
    Mutation(#[from] ClientError),
}
