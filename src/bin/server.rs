use std::{env, fs::OpenOptions, net::SocketAddr, process::ExitCode, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use sentinai::{
    AppState, ClassifierConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClassifier, build_router,
    graceful_shutdown, seed_ledger,
};

/// The web server for the SentinAI fraud detection dashboard.
///
/// The API key for the classifier is read from the `API_KEY` environment variable.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The port to serve the dashboard from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical timezone used to display timestamps, e.g. "Pacific/Auckland".
    #[arg(short, long, default_value = "Etc/UTC")]
    timezone: String,

    /// The generative model used to classify and generate transactions.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// The base URL of the Generative Language API.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    api_base_url: String,

    /// How many sample transactions to generate at startup and on request.
    #[arg(long, default_value_t = 10)]
    seed_count: usize,

    /// Give up on a classifier request after this many seconds. No timeout by default.
    #[arg(long)]
    classifier_timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    let api_key = env::var("API_KEY").unwrap_or_default();
    if api_key.trim().is_empty() {
        tracing::warn!(
            "The environment variable 'API_KEY' is not set, every classification request will fail"
        );
    }

    let config = ClassifierConfig {
        api_key,
        model: args.model,
        base_url: args.api_base_url,
        timeout: args.classifier_timeout_secs.map(Duration::from_secs),
    };
    tracing::debug!("Classifier config: {config:?}");

    let classifier = match GeminiClassifier::new(config) {
        Ok(classifier) => classifier,
        Err(error) => {
            tracing::error!("Could not create the classifier client: {error}");
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::new(Arc::new(classifier), &args.timezone, args.seed_count) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not create the app state: {error}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = seed_ledger(&state).await {
        tracing::error!("Could not seed the ledger, starting with an empty ledger: {error}");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("The server stopped unexpectedly: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
