use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tower_lsp::{LspService, Server};
use tracing::{debug, info};

use sparql_prefix_language_server::logging::init_logger;
use sparql_prefix_language_server::lsp::backend::SparqlBackend;
use sparql_prefix_language_server::lsp::registry::{DEFAULT_REGISTRY_URL, HttpPrefixRegistry};
use sparql_prefix_language_server::lsp::vocabulary::{DEFAULT_SEARCH_URL, HttpVocabularySearch};

#[derive(Parser, Debug)]
#[command(
    name = "sparql-prefix-language-server",
    version,
    about = "Declares missing SPARQL prefixes and completes vocabulary terms"
)]
struct Args {
    /// Log level for stderr (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// Disable ANSI colors in stderr output
    #[arg(long)]
    no_color: bool,

    /// Do not write a session log under the user cache directory
    #[arg(long)]
    no_file_logging: bool,

    /// Base URL of the prefix registry
    #[arg(long, env = "SPARQL_PREFIX_REGISTRY_URL", default_value = DEFAULT_REGISTRY_URL)]
    registry_url: String,

    /// Endpoint of the vocabulary term search service
    #[arg(long, env = "SPARQL_PREFIX_SEARCH_URL", default_value = DEFAULT_SEARCH_URL)]
    search_url: String,

    /// Timeout for each registry or search request, in milliseconds
    #[arg(long, env = "SPARQL_PREFIX_REQUEST_TIMEOUT_MS", default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Accepted for editor compatibility; stdio is the only transport
    #[arg(long)]
    stdio: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let _guard = init_logger(args.no_color, args.log_level.as_deref(), !args.no_file_logging)
        .context("failed to initialize logging")?;

    info!(
        "Starting {} {} (registry: {}, search: {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        args.registry_url,
        args.search_url
    );

    if args.stdio {
        debug!("--stdio given; stdio is the only transport");
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(args.request_timeout_ms))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")?;

    let registry = Arc::new(HttpPrefixRegistry::new(http.clone(), args.registry_url));
    let search = Arc::new(HttpVocabularySearch::new(http, args.search_url));

    let (service, socket) = LspService::new(move |client| {
        SparqlBackend::new(Arc::new(client), registry.clone(), search.clone())
    });

    Server::new(tokio::io::stdin(), tokio::io::stdout(), socket)
        .serve(service)
        .await;

    info!("Server stopped");
    Ok(())
}
