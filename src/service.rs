//! HTTP suggestion service.
//!
//! `GET /suggestion-service/api/suggestions?word=<w>` answers `200` with a
//! [`SuggestionResponse`] when there is something to suggest and `204` when the
//! word is empty, already correct, or has no near matches.

use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use lru::LruCache;
use parking_lot::Mutex;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServiceConfig;
use crate::error::Result;
use crate::fetch::SuggestionResponse;
use crate::spellcheck::Dictionary;

type SharedState = Arc<AppState>;

pub struct AppState {
    dictionary: Dictionary,
    max_suggestions: usize,
    cache: Option<Mutex<LruCache<String, Vec<String>>>>,
}

impl AppState {
    pub fn new(dictionary: Dictionary, max_suggestions: usize, cache_capacity: usize) -> Self {
        Self {
            dictionary,
            max_suggestions,
            cache: NonZeroUsize::new(cache_capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Suggested spellings for `word`, served from the cache when possible.
    pub fn suggest(&self, word: &str) -> Vec<String> {
        let key = word.trim().to_lowercase();
        if let Some(cache) = &self.cache
            && let Some(hit) = cache.lock().get(&key)
        {
            return hit.clone();
        }

        if key.is_empty() {
            tracing::warn!("received empty word for suggestions");
        } else if self.dictionary.is_empty() {
            tracing::warn!("dictionary is empty, no suggestions available");
        }
        let suggestions: Vec<String> = self
            .dictionary
            .suggest(&key, self.max_suggestions)
            .into_iter()
            .map(|s| s.word)
            .collect();
        tracing::debug!(word = %key, ?suggestions, "calculated suggestions");

        if let Some(cache) = &self.cache {
            cache.lock().put(key, suggestions.clone());
        }
        suggestions
    }
}

#[derive(Debug, Deserialize)]
struct SuggestionQuery {
    word: String,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/suggestion-service/api/suggestions", get(suggestions))
        .route("/suggestion-service/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn suggestions(
    State(state): State<SharedState>,
    Query(query): Query<SuggestionQuery>,
) -> Response {
    tracing::debug!(word = %query.word, "received request for suggestions");
    let word = query.word.clone();
    let ranked = tokio::task::spawn_blocking(move || state.suggest(&word)).await;

    match ranked {
        Ok(suggestions) if suggestions.is_empty() => {
            tracing::debug!(word = %query.word, "no suggestions found");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(suggestions) => {
            tracing::debug!(word = %query.word, count = suggestions.len(), "found suggestions");
            Json(SuggestionResponse {
                word: Some(query.word),
                suggestions,
            })
            .into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "suggestion task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

/// Load the dictionary named by `config`, bind and serve until Ctrl-C.
pub async fn run(config: ServiceConfig) -> Result<()> {
    info!(path = %config.dictionary.display(), "loading dictionary");
    let dictionary = Dictionary::from_word_list_file(&config.dictionary, config.max_edit_distance)?;
    info!(words = dictionary.len(), "dictionary loaded");

    let state = Arc::new(AppState::new(
        dictionary,
        config.max_suggestions,
        config.cache_capacity,
    ));
    let listener = TcpListener::bind(config.addr).await?;
    info!(addr = %listener.local_addr()?, "suggestion service listening");
    serve(listener, state, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: SharedState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    fn state(words: &[&str], cache_capacity: usize) -> SharedState {
        let dictionary = Dictionary::new(words.iter().map(|s| s.to_string()).collect(), 2);
        Arc::new(AppState::new(dictionary, 5, cache_capacity))
    }

    async fn request(state: SharedState, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_suggestions_ok() {
        let state = state(&["apple", "apply", "angle", "ample"], 16);
        let (status, body) = request(state, "/suggestion-service/api/suggestions?word=Appl").await;
        assert_eq!(status, StatusCode::OK);

        let parsed: SuggestionResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.word.as_deref(), Some("Appl"));
        assert_eq!(parsed.suggestions, vec!["apple", "apply", "ample", "angle"]);
    }

    #[tokio::test]
    async fn test_correct_word_is_no_content() {
        let state = state(&["apple"], 16);
        let (status, body) = request(state, "/suggestion-service/api/suggestions?word=apple").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_empty_word_is_no_content() {
        let state = state(&["apple"], 16);
        let (status, _) = request(state, "/suggestion-service/api/suggestions?word=").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_missing_word_is_bad_request() {
        let state = state(&["apple"], 16);
        let (status, _) = request(state, "/suggestion-service/api/suggestions").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = request(state(&[], 0), "/suggestion-service/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[test]
    fn test_cache_serves_repeat_queries() {
        let state = state(&["hello", "help"], 4);
        let first = state.suggest("helo");
        assert_eq!(first[0], "hello");
        assert_eq!(state.suggest("HELO"), first);
        assert_eq!(state.cache.as_ref().unwrap().lock().len(), 1);
    }

    #[test]
    fn test_cache_disabled() {
        let state = state(&["hello"], 0);
        assert!(state.cache.is_none());
        assert_eq!(state.suggest("helo"), vec!["hello"]);
    }
}
