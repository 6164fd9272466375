//! Remote suggestion lookups.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Path of the suggestion endpoint, relative to the API base URL.
pub const SUGGESTIONS_PATH: &str = "suggestion-service/api/suggestions";

/// Body returned by the suggestion endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Anything that can produce suggestions for a word.
#[async_trait]
pub trait SuggestionSource: Send + Sync + 'static {
    async fn suggestions(&self, word: &str) -> Result<Vec<String>>;
}

/// HTTP client for the suggestion service.
#[derive(Clone, Debug)]
pub struct SuggestionClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl SuggestionClient {
    /// Create a client for the service rooted at `base_url`.
    pub fn new(base_url: &Url) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(format!("typesmart/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_http_client(http, base_url)
    }

    pub fn with_http_client(http: reqwest::Client, base_url: &Url) -> Result<Self> {
        Ok(Self {
            http,
            endpoint: suggestions_endpoint(base_url)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SuggestionSource for SuggestionClient {
    async fn suggestions(&self, word: &str) -> Result<Vec<String>> {
        tracing::debug!(word, "fetching suggestions");
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[("word", word)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
            });
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let parsed: SuggestionResponse = serde_json::from_slice(&body)?;
        tracing::debug!(word, suggestions = ?parsed.suggestions, "fetched suggestions");
        Ok(parsed.suggestions)
    }
}

/// Join the suggestion path onto `base_url`, keeping any path prefix the base carries.
fn suggestions_endpoint(base_url: &Url) -> Result<Url> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(SUGGESTIONS_PATH)?)
}
