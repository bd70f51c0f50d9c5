use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between the listing API and the local disk.
/// One enum with a discriminant per failure kind, so callers can decide what
/// aborts a run and what is a per-image skip.
#[derive(Error, Debug)]
pub enum EpicError {
    #[error("listing request failed with status {status}")]
    Upstream { status: u16, body: Option<String> },

    #[error("the listing response body was empty")]
    EmptyResponse,

    #[error("transport fault while talking to the listing API")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("could not decode the image listing")]
    Decode(#[source] serde_json::Error),

    #[error("the image is missing its {0}")]
    MissingInformation(&'static str),

    #[error("could not copy image to {path}")]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EpicError {
    /// The missing field name when this is a per-image data-quality problem,
    /// `None` for every fatal kind.
    pub fn missing_information(self: &Self) -> Option<&'static str> {
        match self {
            EpicError::MissingInformation(field) => Some(field),
            _ => None,
        }
    }
}
