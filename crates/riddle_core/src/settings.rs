use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker in the API url template replaced by the configured token.
pub const TOKEN_PLACEHOLDER: &str = "%%TOKEN%%";

const DEFAULT_API_URL: &str = "https://www.riddle.com/apiv3/item/token/%%TOKEN%%?client=d8";
const DEFAULT_EMPTY_TITLE_PREFIX: &str = "Riddle ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("no riddle token configured")]
    MissingCredential,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    pub token: Option<String>,
    pub api_url_template: String,
    pub fetch_unpublished: bool,
    pub empty_title_prefix: String,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            token: None,
            api_url_template: DEFAULT_API_URL.to_string(),
            fetch_unpublished: false,
            empty_title_prefix: DEFAULT_EMPTY_TITLE_PREFIX.to_string(),
        }
    }
}

impl FeedSettings {
    /// The configured token, ignoring blank values.
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Builds the upstream url: token substituted, published filter appended
    /// unless unpublished entries were requested.
    pub fn api_url(&self) -> Result<String, SettingsError> {
        let token = self.token().ok_or(SettingsError::MissingCredential)?;
        let mut url = self.api_url_template.replace(TOKEN_PLACEHOLDER, token);
        if !self.fetch_unpublished {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str("status=published");
        }
        Ok(url)
    }
}

/// Where media thumbnails live locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    pub local_images: PathBuf,
    pub icon_base: PathBuf,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            local_images: PathBuf::from("thumbnails/riddle"),
            icon_base: PathBuf::from("icons"),
        }
    }
}
