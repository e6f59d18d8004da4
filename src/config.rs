//! Runtime configuration loaded from an optional YAML file.
//!
//! Every field has a default, so the file may be absent or partial:
//!
//! ```yaml
//! model: gemini-2.5-flash
//! base_url: https://generativelanguage.googleapis.com/v1beta
//! min_loading_ms: 800
//! request_timeout_secs: 60
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Model identifier sent to the generative API.
    pub model: String,
    /// API root; `models/{model}:generateContent` is appended.
    pub base_url: String,
    /// Minimum time the loading indicator stays up per fetch.
    pub min_loading_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            min_loading_ms: 800,
            request_timeout_secs: 60,
        }
    }
}

impl AppConfig {
    pub fn min_loading(&self) -> Duration {
        Duration::from_millis(self.min_loading_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load from `path` if given, otherwise fall back to defaults.
    ///
    /// An explicitly named file that cannot be read or parsed is an error.
    #[instrument(level = "info", skip_all)]
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = tokio::fs::read_to_string(path).await?;
        let config = Self::from_yaml(&text)?;
        info!(path = %path.display(), model = %config.model, "Loaded configuration");
        Ok(config)
    }
}
