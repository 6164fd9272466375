//! Suggestion service binary.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use typesmart::ServiceConfig;

#[derive(Parser, Debug)]
#[command(name = "suggestion-service")]
#[command(about = "Serves spelling suggestions for the typesmart editor")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "TYPESMART_ADDR", default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Word list, one word per line
    #[arg(short, long, value_name = "PATH", default_value = "data/words.txt")]
    dictionary: PathBuf,

    /// Maximum suggestions per word
    #[arg(long, default_value_t = 5)]
    max_suggestions: usize,

    /// Reach of the fast lookup index
    #[arg(long, default_value_t = 2)]
    max_edit_distance: usize,

    /// Number of queries to memoise (0 disables the cache)
    #[arg(long, default_value_t = 1024)]
    cache_capacity: usize,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_tracing(args.verbose);

    let config = ServiceConfig {
        addr: args.addr,
        dictionary: args.dictionary,
        max_suggestions: args.max_suggestions,
        max_edit_distance: args.max_edit_distance,
        cache_capacity: args.cache_capacity,
    };

    if let Err(err) = typesmart::service::run(config).await {
        tracing::error!(error = %err, "suggestion service failed");
        return Err(err.into());
    }
    Ok(())
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("typesmart=debug,tower_http=debug,info")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
