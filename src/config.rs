//! Client and service configuration.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::popup::PopupOffset;

/// Environment variable holding the suggestion service base URL.
pub const API_BASE_URL_ENV: &str = "TYPESMART_API_BASE_URL";
/// Environment variable overriding the debounce delay in milliseconds.
pub const DEBOUNCE_MS_ENV: &str = "TYPESMART_DEBOUNCE_MS";

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Configuration for the editor-side autocomplete component.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL the suggestion path is appended to.
    pub api_base_url: Url,
    /// Quiet period before a lookup fires.
    pub debounce: Duration,
    /// Padding between the caret and the popup.
    pub offset: PopupOffset,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default base URL is valid"),
            debounce: DEFAULT_DEBOUNCE,
            offset: PopupOffset::default(),
        }
    }
}

impl ClientConfig {
    /// Build a config from `TYPESMART_API_BASE_URL` and `TYPESMART_DEBOUNCE_MS`,
    /// falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_values(
            env::var(API_BASE_URL_ENV).ok().as_deref(),
            env::var(DEBOUNCE_MS_ENV).ok().as_deref(),
        )
    }

    /// Build a config from optional raw values, as read from the environment or a CLI.
    pub fn from_values(base_url: Option<&str>, debounce_ms: Option<&str>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(base_url) = base_url {
            config.api_base_url = Url::parse(base_url)?;
        }
        if let Some(ms) = debounce_ms {
            let ms: u64 = ms
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid debounce milliseconds: {ms:?}")))?;
            config.debounce = Duration::from_millis(ms);
        }
        Ok(config)
    }
}

/// Configuration for the HTTP suggestion service.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub addr: SocketAddr,
    /// Word list, one word per line.
    pub dictionary: PathBuf,
    pub max_suggestions: usize,
    pub max_edit_distance: usize,
    /// Number of distinct queries memoised by the service.
    pub cache_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            dictionary: PathBuf::from("data/words.txt"),
            max_suggestions: 5,
            max_edit_distance: 2,
            cache_capacity: 1024,
        }
    }
}
