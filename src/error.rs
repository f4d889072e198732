//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert, classifier::ClassifierError, internal_server_error::InternalServerError,
    not_found::NotFoundError, transaction::TransactionId,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Could not acquire the ledger lock.
    #[error("could not acquire the ledger lock")]
    LedgerLockError,

    /// Could not acquire the lock on the set of outstanding analysis requests.
    #[error("could not acquire the in-flight request lock")]
    InFlightLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Tried to store a transaction that has not been classified.
    #[error("transaction {0} has not been classified")]
    PendingTransaction(TransactionId),

    /// Tried to store a transaction whose ID is already in the ledger.
    #[error("transaction {0} is already in the ledger")]
    DuplicateTransactionId(TransactionId),

    /// A classification request for the same candidate is still outstanding.
    #[error("transaction {0} is already being analyzed")]
    AnalysisInProgress(TransactionId),

    /// The sandbox form was submitted with values that cannot be classified.
    #[error("invalid analysis input: {0}")]
    InvalidAnalysisInput(String),

    /// The request to the external classifier failed.
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::LedgerLockError | Error::InFlightLockError => {
                InternalServerError::default().into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidAnalysisInput(reason) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid transaction".to_owned(),
                    details: format!("The transaction could not be analyzed: {reason}."),
                },
            ),
            Error::AnalysisInProgress(id) => (
                StatusCode::CONFLICT,
                Alert::Error {
                    message: "Analysis already running".to_owned(),
                    details: format!(
                        "Transaction {id} is still being analyzed. \
                        Wait for the result before submitting it again."
                    ),
                },
            ),
            Error::DuplicateTransactionId(id) => (
                StatusCode::CONFLICT,
                Alert::Error {
                    message: "Transaction already analyzed".to_owned(),
                    details: format!(
                        "Transaction {id} is already in the ledger. \
                        Refresh the page to analyze a new transaction."
                    ),
                },
            ),
            Error::Classifier(ClassifierError::MissingCredential) => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "No API key configured".to_owned(),
                    details: "Set the API_KEY environment variable and restart the server."
                        .to_owned(),
                },
            ),
            // The response body is only logged, it can be arbitrarily long.
            Error::Classifier(ClassifierError::ServerError { status, .. }) => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "Classification failed".to_owned(),
                    details: format!(
                        "The classifier responded with status {status}. Try again later."
                    ),
                },
            ),
            Error::Classifier(error) => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "Classification failed".to_owned(),
                    details: format!("{error}. Try again later."),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Not found".to_owned(),
                    details: "The requested transaction could not be found.".to_owned(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
