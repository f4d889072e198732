//! SentinAI is a fraud detection dashboard backed by a generative AI classifier.
//!
//! Transactions are classified by an external model, merged into an in-memory
//! ledger and summarised on a dashboard. This library provides the web server
//! that directly serves the HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod analysis;
mod app_state;
mod classifier;
mod dashboard;
mod endpoints;
mod error;
mod html;
mod internal_server_error;
mod navigation;
mod not_found;
mod prediction;
mod routing;
mod settings;
mod timezone;
mod transaction;
mod view;

#[cfg(test)]
mod test_utils;

pub use analysis::{InFlightGuard, InFlightRequests};
pub use app_state::AppState;
pub use classifier::{
    Classifier, ClassifierConfig, ClassifierError, DEFAULT_BASE_URL, DEFAULT_MODEL,
    GeminiClassifier,
};
pub use dashboard::{
    AggregateStats, BUCKET_COUNT, BUCKET_HOURS, StatusDistribution, TimeBucket, bucket_index,
    calculate_aggregate_stats, calculate_status_distribution, calculate_volume_risk_series,
};
pub use error::Error;
pub use prediction::{FLAG_THRESHOLD, Prediction, apply_prediction};
pub use routing::build_router;
pub use transaction::{
    CandidateFields, Ledger, Transaction, TransactionFilter, TransactionId, TransactionStatus,
    seed_ledger,
};
pub use view::{View, ViewData, select_view_data};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
