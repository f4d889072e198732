//! Defines the core data models for transactions under fraud evaluation.

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

// ============================================================================
// MODELS
// ============================================================================

/// The unique identifier of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Create a fresh, random identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier, e.g. one echoed back by a form.
    pub fn new(id: &str) -> Self {
        Self(id.trim().to_owned())
    }

    /// Whether the identifier is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// The first `length` characters of the identifier, for compact display.
    pub fn short(&self, length: usize) -> &str {
        match self.0.char_indices().nth(length) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl AsRef<str> for TransactionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a transaction is in its lifecycle.
///
/// `Pending` only exists for locally built candidates awaiting classification,
/// the ledger never stores a pending transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Approved,
    Fraud,
    Flagged,
}

impl TransactionStatus {
    /// The statuses a classified transaction can have.
    pub const TERMINAL: [TransactionStatus; 3] = [
        TransactionStatus::Approved,
        TransactionStatus::Fraud,
        TransactionStatus::Flagged,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Approved => "approved",
            TransactionStatus::Fraud => "fraud",
            TransactionStatus::Flagged => "flagged",
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self != TransactionStatus::Pending
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One financial event under evaluation.
///
/// To create a candidate for classification, use [Transaction::candidate].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The unique identifier of the transaction.
    pub id: TransactionId,
    /// When the transaction was created, in milliseconds since the Unix epoch.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: i64,
    /// The amount of money moved, never negative.
    pub amount: f64,
    pub merchant: String,
    /// A free text location, e.g. "Paris, France".
    pub location: String,
    /// Anonymized behavioral feature, e.g. distance from home.
    pub v1: f64,
    /// Anonymized behavioral feature, e.g. transaction frequency.
    pub v2: f64,
    /// Anonymized behavioral feature, e.g. device fingerprint trust.
    pub v3: f64,
    pub status: TransactionStatus,
    /// Conventionally between 0 and 100.
    pub risk_score: f64,
    /// The classifier's explanation, only set once classification completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

/// The user supplied fields of a sandbox transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFields {
    pub amount: f64,
    pub merchant: String,
    pub location: String,
    pub v1: f64,
    pub v2: f64,
    pub v3: f64,
}

impl Transaction {
    /// Create a transaction that is waiting for classification.
    ///
    /// The candidate has the status [TransactionStatus::Pending], a risk score
    /// of zero and no analysis.
    pub fn candidate(id: TransactionId, timestamp: i64, fields: CandidateFields) -> Self {
        Self {
            id,
            timestamp,
            amount: fields.amount,
            merchant: fields.merchant,
            location: fields.location,
            v1: fields.v1,
            v2: fields.v2,
            v3: fields.v3,
            status: TransactionStatus::Pending,
            risk_score: 0.0,
            analysis: None,
        }
    }
}

/// The current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Accepts integer and floating point JSON numbers, rounding the latter.
///
/// Generated data sometimes encodes timestamps as floats, e.g. `1.7e12`.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;

    if !value.is_finite() {
        return Err(serde::de::Error::custom("timestamp must be a finite number"));
    }

    Ok(value.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::{CandidateFields, Transaction, TransactionId, TransactionStatus};

    fn fields() -> CandidateFields {
        CandidateFields {
            amount: 250.0,
            merchant: "Global Luxury Store".to_owned(),
            location: "Paris, France".to_owned(),
            v1: 0.5,
            v2: -1.2,
            v3: 0.8,
        }
    }

    #[test]
    fn candidate_starts_pending_with_zero_risk() {
        let candidate = Transaction::candidate(TransactionId::new("abc"), 42, fields());

        assert_eq!(candidate.status, TransactionStatus::Pending);
        assert_eq!(candidate.risk_score, 0.0);
        assert_eq!(candidate.analysis, None);
        assert_eq!(candidate.timestamp, 42);
        assert_eq!(candidate.merchant, "Global Luxury Store");
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let candidate = Transaction::candidate(TransactionId::new("abc"), 42, fields());

        let json = serde_json::to_value(&candidate).unwrap();

        assert_eq!(json["id"], "abc");
        assert_eq!(json["riskScore"], 0.0);
        assert_eq!(json["status"], "pending");
        assert!(json.get("analysis").is_none());
    }

    #[test]
    fn deserializes_float_timestamp() {
        let json = r#"{
            "id": "t-1", "timestamp": 1700000000000.4, "amount": 12.5,
            "merchant": "Cafe", "location": "Berlin, Germany",
            "v1": 0.1, "v2": 0.2, "v3": 0.3, "status": "approved", "riskScore": 3
        }"#;

        let transaction: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(transaction.timestamp, 1_700_000_000_000);
        assert_eq!(transaction.status, TransactionStatus::Approved);
        assert_eq!(transaction.risk_score, 3.0);
    }

    #[test]
    fn short_id_truncates_on_char_boundary() {
        let id = TransactionId::new("0123456789");

        assert_eq!(id.short(8), "01234567");
        assert_eq!(TransactionId::new("abc").short(8), "abc");
    }

    #[test]
    fn random_ids_are_unique() {
        assert_ne!(TransactionId::new_random(), TransactionId::new_random());
    }
}
