//! Error type shared by the adapter, configuration, and delivery shim.
//!
//! Only the news adapter swallows errors (it always degrades to the fallback
//! article); everything else propagates them with `?`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {body}")]
    Upstream {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Upstream reply contained no text")]
    EmptyReply,

    #[error("API key is required")]
    MissingApiKey,

    #[error("No articles generated")]
    NoArticles,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unknown category: {0}")]
    InvalidCategory(String),
}

pub type Result<T> = std::result::Result<T, Error>;
