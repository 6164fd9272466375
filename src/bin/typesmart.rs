//! Line-oriented front-end for the autocomplete component.
//!
//! Each input line is appended to the document as if typed. Suggestions for the
//! last word are printed once the lookup settles; `:N` picks suggestion N,
//! `:h N` highlights it, `:clear` empties the document and `:q` quits.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

use typesmart::{Autocomplete, CaretCoords, ClientConfig, EditorHost, Rect, SuggestionClient};

const COLUMNS: usize = 80;
const CELL_WIDTH: f64 = 8.0;
const CELL_HEIGHT: f64 = 16.0;
const RESPONSE_GRACE: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(name = "typesmart")]
#[command(about = "Type text and get spelling suggestions for the last word")]
struct Args {
    /// Suggestion service base URL (overrides TYPESMART_API_BASE_URL)
    #[arg(long, value_name = "URL")]
    api_base_url: Option<Url>,

    /// Debounce delay in milliseconds (overrides TYPESMART_DEBOUNCE_MS)
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Plain-text document laid out on a fixed-width character grid.
#[derive(Default)]
struct TerminalHost {
    text: String,
}

impl TerminalHost {
    fn type_line(&mut self, line: &str) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(line);
    }
}

impl EditorHost for TerminalHost {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn caret(&self) -> usize {
        self.text.chars().count()
    }

    fn caret_coords(&self, pos: usize) -> Option<CaretCoords> {
        let row = pos / COLUMNS;
        let col = pos % COLUMNS;
        Some(CaretCoords {
            bottom: (row + 1) as f64 * CELL_HEIGHT,
            left: col as f64 * CELL_WIDTH,
        })
    }

    fn container_bounds(&self) -> Option<Rect> {
        let rows = self.caret() / COLUMNS + 1;
        Some(Rect {
            top: 0.0,
            left: 0.0,
            width: COLUMNS as f64 * CELL_WIDTH,
            height: rows as f64 * CELL_HEIGHT,
        })
    }

    fn set_content(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_tracing(args.verbose);

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = args.api_base_url {
        config.api_base_url = url;
    }
    if let Some(ms) = args.debounce_ms {
        config.debounce = Duration::from_millis(ms);
    }

    let client = SuggestionClient::new(&config.api_base_url)?;
    println!(
        "typesmart - suggestions from {}\n:N picks, :h N highlights, :clear resets, :q quits",
        client.endpoint()
    );
    let mut autocomplete = Autocomplete::from_config(Arc::new(client), &config);
    let mut host = TerminalHost::default();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            ":q" => break,
            ":clear" => {
                host.set_content("");
                autocomplete.on_update(&host);
                continue;
            }
            _ => {}
        }

        if let Some(rest) = input.strip_prefix(":h ") {
            let index = rest.trim().parse::<usize>().ok().and_then(|n| n.checked_sub(1));
            if index.is_some_and(|i| autocomplete.hover(i)) {
                render(&autocomplete);
            } else {
                println!("  no suggestion {rest}");
            }
            continue;
        }
        if let Some(rest) = input.strip_prefix(':') {
            let index = rest.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
            if index.is_some_and(|i| autocomplete.select(i, &mut host)) {
                println!("  {}", host.text);
            } else {
                println!("  no suggestion {rest}");
            }
            continue;
        }

        host.type_line(input);
        autocomplete.on_update(&host);
        if !autocomplete.is_lookup_pending() {
            continue;
        }

        let wait = config.debounce + RESPONSE_GRACE;
        match tokio::time::timeout(wait, autocomplete.next_event()).await {
            Ok(Some(event)) => {
                if autocomplete.apply(event) {
                    render(&autocomplete);
                }
            }
            Ok(None) => break,
            Err(_) => tracing::warn!("timed out waiting for suggestions"),
        }
    }

    autocomplete.teardown();
    Ok(())
}

fn render(autocomplete: &Autocomplete) {
    let suggestions = autocomplete.visible_suggestions();
    if suggestions.is_empty() {
        return;
    }
    let coords = autocomplete.popup().coords();
    println!(
        "  suggestions for {} (popup at {:.0},{:.0}):",
        autocomplete.current_word(),
        coords.left,
        coords.top
    );
    for (i, suggestion) in suggestions.iter().enumerate() {
        let marker = if i == autocomplete.popup().selected_index() { '>' } else { ' ' };
        println!("  {marker} {}. {suggestion}", i + 1);
    }
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("typesmart=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
