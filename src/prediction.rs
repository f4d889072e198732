//! Classification outcomes and the rule that folds them into a transaction.

use serde::{Deserialize, Serialize};

use crate::transaction::{Transaction, TransactionStatus};

/// Risk scores strictly above this value are flagged for review.
pub const FLAG_THRESHOLD: f64 = 40.0;

/// The outcome of classifying one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub is_fraud: bool,
    /// Between 0 and 1 inclusive.
    pub confidence: f64,
    /// Conventionally between 0 and 100.
    pub risk_score: f64,
    pub reasons: Vec<String>,
    pub explanation: String,
}

impl Prediction {
    /// The status a transaction receives from this prediction.
    ///
    /// The fraud flag takes precedence over the risk score.
    pub fn status(&self) -> TransactionStatus {
        if self.is_fraud {
            TransactionStatus::Fraud
        } else if self.risk_score > FLAG_THRESHOLD {
            TransactionStatus::Flagged
        } else {
            TransactionStatus::Approved
        }
    }
}

/// Derive the finalized transaction from a candidate and its prediction.
///
/// Only the status, risk score and analysis change. Neither input is modified.
pub fn apply_prediction(candidate: &Transaction, prediction: &Prediction) -> Transaction {
    Transaction {
        status: prediction.status(),
        risk_score: prediction.risk_score,
        analysis: Some(prediction.explanation.clone()),
        ..candidate.clone()
    }
}

#[cfg(test)]
mod tests {
    use crate::transaction::{CandidateFields, Transaction, TransactionId, TransactionStatus};

    use super::{Prediction, apply_prediction};

    fn candidate() -> Transaction {
        Transaction::candidate(
            TransactionId::new("candidate-1"),
            1_700_000_000_000,
            CandidateFields {
                amount: 250.0,
                merchant: "Global Luxury Store".to_owned(),
                location: "Paris, France".to_owned(),
                v1: 0.5,
                v2: -1.2,
                v3: 0.8,
            },
        )
    }

    fn prediction(is_fraud: bool, risk_score: f64, explanation: &str) -> Prediction {
        Prediction {
            is_fraud,
            confidence: 0.9,
            risk_score,
            reasons: vec![],
            explanation: explanation.to_owned(),
        }
    }

    #[test]
    fn fraud_flag_wins_over_low_risk_score() {
        let prediction = Prediction {
            is_fraud: true,
            confidence: 0.9,
            risk_score: 5.0,
            reasons: vec!["geo mismatch".to_owned()],
            explanation: "x".to_owned(),
        };

        let got = apply_prediction(&candidate(), &prediction);

        assert_eq!(got.status, TransactionStatus::Fraud);
        assert_eq!(got.risk_score, 5.0);
        assert_eq!(got.analysis.as_deref(), Some("x"));
    }

    #[test]
    fn high_risk_without_fraud_is_flagged() {
        let got = apply_prediction(&candidate(), &prediction(false, 55.0, "y"));

        assert_eq!(got.status, TransactionStatus::Flagged);
        assert_eq!(got.risk_score, 55.0);
        assert_eq!(got.analysis.as_deref(), Some("y"));
    }

    #[test]
    fn low_risk_without_fraud_is_approved() {
        let mut prediction = prediction(false, 10.0, "z");
        prediction.confidence = 0.99;

        let got = apply_prediction(&candidate(), &prediction);

        assert_eq!(got.status, TransactionStatus::Approved);
        assert_eq!(got.risk_score, 10.0);
    }

    #[test]
    fn risk_score_of_exactly_forty_is_approved() {
        let got = apply_prediction(&candidate(), &prediction(false, 40.0, ""));

        assert_eq!(got.status, TransactionStatus::Approved);
    }

    #[test]
    fn risk_score_just_above_forty_is_flagged() {
        let got = apply_prediction(&candidate(), &prediction(false, 40.01, ""));

        assert_eq!(got.status, TransactionStatus::Flagged);
    }

    #[test]
    fn fraud_status_depends_only_on_fraud_flag() {
        for risk_score in [0.0, 40.0, 40.5, 100.0] {
            assert_eq!(
                apply_prediction(&candidate(), &prediction(true, risk_score, "")).status,
                TransactionStatus::Fraud,
                "risk score {risk_score}"
            );
            assert_ne!(
                apply_prediction(&candidate(), &prediction(false, risk_score, "")).status,
                TransactionStatus::Fraud,
                "risk score {risk_score}"
            );
        }
    }

    #[test]
    fn other_fields_are_unchanged() {
        let candidate = candidate();

        let got = apply_prediction(&candidate, &prediction(false, 10.0, "fine"));

        assert_eq!(got.id, candidate.id);
        assert_eq!(got.timestamp, candidate.timestamp);
        assert_eq!(got.amount, candidate.amount);
        assert_eq!(got.merchant, candidate.merchant);
        assert_eq!(got.location, candidate.location);
        assert_eq!((got.v1, got.v2, got.v3), (candidate.v1, candidate.v2, candidate.v3));
        // The candidate itself is untouched.
        assert_eq!(candidate.status, TransactionStatus::Pending);
        assert_eq!(candidate.risk_score, 0.0);
    }
}
