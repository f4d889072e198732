//! The external classifier that performs fraud inference and generates sample data.
//!
//! All classification happens remotely. This module defines the seam the rest
//! of the application talks to, [Classifier], and its failure taxonomy.

mod gemini;

use async_trait::async_trait;

use crate::{prediction::Prediction, transaction::Transaction};

pub use gemini::{ClassifierConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClassifier};

/// A remote service that classifies transactions.
///
/// Calls have no latency, idempotence or availability guarantees. Every
/// failure is reported as a [ClassifierError] instead of an empty result.
#[async_trait]
pub trait Classifier: Send + Sync + std::fmt::Debug {
    /// Classify a pending candidate transaction.
    async fn classify(&self, candidate: &Transaction) -> Result<Prediction, ClassifierError>;

    /// Generate `count` synthetic transactions that already carry a terminal
    /// status and risk score.
    async fn generate_batch(&self, count: usize) -> Result<Vec<Transaction>, ClassifierError>;

    /// The name of the model doing the classification, for display.
    fn model_name(&self) -> &str;

    /// Whether the classifier has the credentials it needs to make requests.
    fn is_configured(&self) -> bool;
}

/// The ways a request to the classifier can fail.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ClassifierError {
    /// No API key was configured, so no request was sent.
    #[error("no API key is configured for the classifier")]
    MissingCredential,

    /// The request could not be delivered or the response could not be read.
    #[error("the classifier is unavailable: {0}")]
    Unavailable(String),

    /// The classifier replied with a non-success status code.
    #[error("the classifier responded with status {status}: {body}")]
    ServerError { status: u16, body: String },

    /// The classifier replied successfully but without any content.
    #[error("the classifier returned an empty response")]
    EmptyResponse,

    /// The content was not valid JSON or lacked required fields.
    #[error("the classifier returned a malformed response: {0}")]
    MalformedResponse(String),

    /// The prediction parsed but holds out-of-range values.
    #[error("the classifier returned an invalid prediction: {0}")]
    InvalidPrediction(String),

    /// A generated transaction cannot be stored in the ledger.
    #[error("the classifier generated an invalid transaction: {0}")]
    InvalidBatch(String),
}
