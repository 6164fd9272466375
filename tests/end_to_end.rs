use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use url::Url;

use typesmart::service::{self, AppState};
use typesmart::{
    Autocomplete, CaretCoords, Dictionary, EditorHost, PopupOffset, Rect, SuggestionClient,
    SuggestionSource,
};

struct Document {
    text: String,
}

impl EditorHost for Document {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn caret(&self) -> usize {
        self.text.len()
    }

    fn caret_coords(&self, pos: usize) -> Option<CaretCoords> {
        Some(CaretCoords {
            bottom: 20.0,
            left: pos as f64 * 8.0,
        })
    }

    fn container_bounds(&self) -> Option<Rect> {
        Some(Rect {
            top: 0.0,
            left: 0.0,
            width: 800.0,
            height: 600.0,
        })
    }

    fn set_content(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

async fn start_service(words: &str) -> (Url, oneshot::Sender<()>) {
    let dictionary = Dictionary::from_word_list(words, 2);
    let state = Arc::new(AppState::new(dictionary, 5, 64));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    tokio::spawn(service::serve(listener, state, async {
        let _ = stopped.await;
    }));
    (Url::parse(&format!("http://{addr}")).unwrap(), stop)
}

#[tokio::test]
async fn test_client_against_service() {
    let (base, stop) = start_service("hello\nhelp\nworld\n").await;
    let client = SuggestionClient::new(&base).unwrap();

    let suggestions = client.suggestions("helo").await.unwrap();
    assert_eq!(suggestions[0], "hello");
    assert!(suggestions.contains(&"help".to_string()));

    // correctly spelled words come back as 204 and read as empty
    assert!(client.suggestions("world").await.unwrap().is_empty());
    let _ = stop.send(());
}

#[tokio::test]
async fn test_typing_and_selecting_against_service() {
    let (base, stop) = start_service("I\nwant\nto\nsay\nhello\nhelp\n").await;
    let client = Arc::new(SuggestionClient::new(&base).unwrap());
    let mut autocomplete =
        Autocomplete::new(client, Duration::from_millis(20), PopupOffset::default());
    let mut document = Document {
        text: "I want to say helo".to_string(),
    };

    autocomplete.on_update(&document);
    let event = tokio::time::timeout(Duration::from_secs(5), autocomplete.next_event())
        .await
        .unwrap()
        .unwrap();
    assert!(autocomplete.apply(event));
    assert_eq!(autocomplete.visible_suggestions()[0], "hello");
    assert_eq!(autocomplete.popup().selected_index(), 0);

    assert!(autocomplete.select(0, &mut document));
    assert_eq!(document.text, "I want to say hello");
    assert!(!autocomplete.popup().is_visible());

    autocomplete.teardown();
    let _ = stop.send(());
}
