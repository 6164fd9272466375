//! The autocomplete component: tracks the word being typed, looks it up after a
//! quiet period and positions a suggestion popup under the caret.
//!
//! The component owns no editing logic. The host editor reports every document
//! change through [`Autocomplete::on_update`], feeds completed lookups back with
//! [`Autocomplete::apply`], and forwards pointer events to [`Autocomplete::hover`]
//! and [`Autocomplete::select`]. Each lookup carries a generation number; only
//! the result of the most recent lookup is ever applied.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::ClientConfig;
use crate::debounce::Debounced;
use crate::error::Result;
use crate::fetch::SuggestionSource;
use crate::popup::{CaretCoords, PopupOffset, PopupPositioner, PopupState, Rect};
use crate::word;

/// Capabilities the host editing engine exposes to the component.
pub trait EditorHost {
    /// Current document as plain text.
    fn text(&self) -> String;
    /// Caret position in the document.
    fn caret(&self) -> usize;
    /// On-screen position of the glyph at `pos`, if it is rendered.
    fn caret_coords(&self, pos: usize) -> Option<CaretCoords>;
    /// Bounding box of the editor container, if it is rendered.
    fn container_bounds(&self) -> Option<Rect>;
    /// Replace the whole document.
    fn set_content(&mut self, text: &str);
}

/// A finished lookup, waiting to be applied.
#[derive(Debug)]
pub struct FetchEvent {
    generation: u64,
    word: String,
    outcome: Result<Vec<String>>,
}

impl FetchEvent {
    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type LookupFn = Box<dyn Fn((u64, String)) -> BoxFuture + Send + Sync>;

pub struct Autocomplete {
    current_word: String,
    suggestions: Vec<String>,
    popup: PopupState,
    positioner: PopupPositioner,
    generation: u64,
    lookup: Debounced<LookupFn>,
    events: mpsc::UnboundedReceiver<FetchEvent>,
    torn_down: bool,
}

impl Autocomplete {
    pub fn new<S: SuggestionSource>(source: Arc<S>, debounce: Duration, offset: PopupOffset) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let lookup: LookupFn = Box::new(move |(generation, word): (u64, String)| -> BoxFuture {
            let source = Arc::clone(&source);
            let tx = tx.clone();
            Box::pin(async move {
                let outcome = source.suggestions(&word).await;
                let _ = tx.send(FetchEvent {
                    generation,
                    word,
                    outcome,
                });
            })
        });

        Self {
            current_word: String::new(),
            suggestions: Vec::new(),
            popup: PopupState::default(),
            positioner: PopupPositioner::new(offset),
            generation: 0,
            lookup: Debounced::new(debounce, lookup),
            events,
            torn_down: false,
        }
    }

    pub fn from_config<S: SuggestionSource>(source: Arc<S>, config: &ClientConfig) -> Self {
        Self::new(source, config.debounce, config.offset)
    }

    pub fn current_word(&self) -> &str {
        &self.current_word
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn popup(&self) -> &PopupState {
        &self.popup
    }

    /// Suggestions to render: empty unless the popup is visible and has entries.
    pub fn visible_suggestions(&self) -> &[String] {
        if self.popup.is_visible() {
            &self.suggestions
        } else {
            &[]
        }
    }

    /// True while a lookup is waiting out its debounce delay.
    pub fn is_lookup_pending(&self) -> bool {
        self.lookup.is_pending()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// React to a document change.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn on_update<H: EditorHost + ?Sized>(&mut self, host: &H) {
        if self.torn_down {
            return;
        }

        let text = host.text();
        let last = word::last_token(&text);
        self.current_word = last.to_string();
        tracing::debug!(word = %self.current_word, "current word detected");

        if !word::should_suggest(last) {
            self.invalidate();
            self.popup.hide();
            tracing::debug!("suggestion box hidden, word too short");
            return;
        }

        let caret = host.caret_coords(host.caret());
        let Some(coords) = self.positioner.position(caret, host.container_bounds()) else {
            tracing::debug!("caret or container geometry unavailable, skipping lookup");
            self.invalidate();
            return;
        };
        self.popup.set_coords(coords);
        tracing::debug!(top = coords.top, left = coords.left, "suggestion popup position calculated");

        self.generation = self.generation.wrapping_add(1);
        self.lookup.call((self.generation, self.current_word.clone()));
        self.popup.reset_selection();
    }

    /// Wait for the next finished lookup. Returns `None` once torn down.
    pub async fn next_event(&mut self) -> Option<FetchEvent> {
        if self.torn_down {
            return None;
        }
        self.events.recv().await
    }

    /// Take a finished lookup if one is ready.
    pub fn try_next_event(&mut self) -> Option<FetchEvent> {
        if self.torn_down {
            return None;
        }
        self.events.try_recv().ok()
    }

    /// Apply a finished lookup. Returns `false` if it was stale or the
    /// component is torn down.
    pub fn apply(&mut self, event: FetchEvent) -> bool {
        if self.torn_down {
            return false;
        }
        if event.generation != self.generation {
            tracing::debug!(word = %event.word, "discarding stale suggestions");
            return false;
        }

        match event.outcome {
            Ok(suggestions) => {
                tracing::debug!(word = %event.word, ?suggestions, "suggestions received");
                self.suggestions = suggestions;
                self.popup.show();
            }
            Err(err) => {
                tracing::error!(word = %event.word, error = %err, "failed to fetch suggestions");
                self.suggestions.clear();
                self.popup.hide();
            }
        }
        true
    }

    /// Highlight the suggestion under the pointer.
    pub fn hover(&mut self, index: usize) -> bool {
        let hovered = self.popup.hover(index, self.suggestions.len());
        if hovered {
            tracing::debug!(suggestion = %self.suggestions[index], index, "hovered on suggestion");
        }
        hovered
    }

    /// Replace the word being typed with suggestion `index`.
    ///
    /// Rewrites the whole document through the host and hides the popup.
    /// Returns `false` when no visible suggestion has that index.
    pub fn select<H: EditorHost + ?Sized>(&mut self, index: usize, host: &mut H) -> bool {
        let Some(choice) = self.visible_suggestions().get(index).cloned() else {
            return false;
        };
        tracing::debug!(suggestion = %choice, "selected suggestion");

        let text = word::replace_last_token(&host.text(), &choice);
        host.set_content(&text);
        self.invalidate();
        self.popup.hide();
        true
    }

    /// Stop all pending and in-flight lookups. No state changes afterwards.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.lookup.shutdown();
        self.events.close();
        self.torn_down = true;
    }

    /// Make every outstanding lookup stale.
    fn invalidate(&mut self) {
        self.lookup.cancel();
        self.generation = self.generation.wrapping_add(1);
    }
}

impl Drop for Autocomplete {
    fn drop(&mut self) {
        self.teardown();
    }
}
