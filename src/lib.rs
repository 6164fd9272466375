//! As-you-type spelling suggestions for text editors.
//!
//! The editor side is [`Autocomplete`]: it watches the word being typed, asks a
//! [`SuggestionSource`] for alternatives after a quiet period, and positions a
//! popup under the caret. The service side is [`service`], which answers those
//! lookups from a [`Dictionary`].

pub mod autocomplete;
pub mod config;
pub mod debounce;
pub mod error;
pub mod fetch;
pub mod popup;
pub mod service;
pub mod spellcheck;
pub mod word;

pub use autocomplete::{Autocomplete, EditorHost, FetchEvent};
pub use config::{ClientConfig, ServiceConfig};
pub use error::{Error, Result};
pub use fetch::{SuggestionClient, SuggestionResponse, SuggestionSource};
pub use popup::{CaretCoords, PopupCoords, PopupOffset, PopupState, Rect};
pub use spellcheck::{Dictionary, Suggestion};
