use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::{
    classifier::{Classifier, ClassifierError},
    prediction::Prediction,
    transaction::{Transaction, TransactionId, TransactionStatus},
};

/// A classifier that replies with canned results and counts its calls.
#[derive(Debug)]
pub(crate) struct FakeClassifier {
    pub classify_result: Result<Prediction, ClassifierError>,
    pub batch_result: Result<Vec<Transaction>, ClassifierError>,
    pub classify_calls: AtomicUsize,
    pub batch_calls: AtomicUsize,
}

impl Default for FakeClassifier {
    fn default() -> Self {
        Self {
            classify_result: Ok(Prediction {
                is_fraud: false,
                confidence: 0.95,
                risk_score: 12.0,
                reasons: vec!["Amount is typical for the merchant".to_owned()],
                explanation: "Nothing unusual about this transaction.".to_owned(),
            }),
            batch_result: Ok(vec![]),
            classify_calls: AtomicUsize::new(0),
            batch_calls: AtomicUsize::new(0),
        }
    }
}

impl FakeClassifier {
    pub(crate) fn with_prediction(prediction: Prediction) -> Self {
        Self {
            classify_result: Ok(prediction),
            ..Default::default()
        }
    }

    pub(crate) fn with_batch(batch: Vec<Transaction>) -> Self {
        Self {
            batch_result: Ok(batch),
            ..Default::default()
        }
    }

    pub(crate) fn failing(error: ClassifierError) -> Self {
        Self {
            classify_result: Err(error.clone()),
            batch_result: Err(error),
            ..Default::default()
        }
    }

    pub(crate) fn classify_call_count(&self) -> usize {
        self.classify_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn batch_call_count(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for FakeClassifier {
    async fn classify(&self, _candidate: &Transaction) -> Result<Prediction, ClassifierError> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        self.classify_result.clone()
    }

    async fn generate_batch(&self, _count: usize) -> Result<Vec<Transaction>, ClassifierError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        self.batch_result.clone()
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }

    fn is_configured(&self) -> bool {
        self.classify_result != Err(ClassifierError::MissingCredential)
    }
}

/// A classified transaction with a fixed timestamp.
pub(crate) fn classified_transaction(
    id: &str,
    status: TransactionStatus,
    amount: f64,
    risk_score: f64,
) -> Transaction {
    Transaction {
        id: TransactionId::new(id),
        timestamp: 1_700_000_000_000,
        amount,
        merchant: format!("Merchant {id}"),
        location: "Wellington, New Zealand".to_owned(),
        v1: 0.25,
        v2: -0.5,
        v3: 1.0,
        status,
        risk_score,
        analysis: Some(format!("Analysis of {id}")),
    }
}
