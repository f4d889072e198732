//! A [Classifier] backed by the Google Generative Language API.

use std::{collections::HashSet, fmt, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    classifier::{Classifier, ClassifierError},
    prediction::Prediction,
    timezone::timestamp_to_date_time,
    transaction::{Transaction, TransactionStatus},
};

/// The model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// The API host used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const FRAUD_ANALYST_INSTRUCTION: &str = "You are a world-class Financial Fraud Detection \
Machine Learning Model. Your task is to analyze credit card transaction data and predict \
whether it is fraudulent. Input features include transaction amount, anonymized behavioral \
scores (V1, V2, V3), merchant info, and location.

Evaluate the following:
1. Amount anomalies (unusually high).
2. Behavioral anomalies based on V-features.
3. Merchant risk profiles.

Return a JSON object containing the classification results.";

/// Settings for talking to the Generative Language API.
#[derive(Clone)]
pub struct ClassifierConfig {
    /// May be empty, in which case every request fails with
    /// [ClassifierError::MissingCredential].
    pub api_key: String,
    /// The model to call, e.g. [DEFAULT_MODEL].
    pub model: String,
    /// The scheme and host of the API, e.g. [DEFAULT_BASE_URL].
    pub base_url: String,
    /// No timeout is enforced when `None`.
    pub timeout: Option<Duration>,
}

impl ClassifierConfig {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
        }
    }
}

// Never print the API key.
impl fmt::Debug for ClassifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() {
            "<empty>"
        } else {
            "********"
        };

        f.debug_struct("ClassifierConfig")
            .field("api_key", &api_key)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Classifies transactions by asking a generative model for structured JSON.
#[derive(Debug, Clone)]
pub struct GeminiClassifier {
    config: ClassifierConfig,
    http_client: reqwest::Client,
}

impl GeminiClassifier {
    /// Create a classifier from `config`.
    ///
    /// # Errors
    /// Returns [ClassifierError::Unavailable] if the HTTP client cannot be built.
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http_client = builder
            .build()
            .map_err(|error| ClassifierError::Unavailable(error.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Send `prompt` and return the text of the first response candidate.
    async fn generate_content(
        &self,
        prompt: String,
        system_instruction: Option<&str>,
        response_schema: Value,
    ) -> Result<String, ClassifierError> {
        if self.config.api_key.trim().is_empty() {
            return Err(ClassifierError::MissingCredential);
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let mut body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema,
            },
        });

        if let Some(instruction) = system_instruction {
            body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
        }

        tracing::debug!("Sending generateContent request to {url}");

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|error| ClassifierError::Unavailable(error.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::ServerError {
                status: status.as_u16(),
                body,
            });
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|error| ClassifierError::MalformedResponse(error.to_string()))?;

        reply.into_text().ok_or(ClassifierError::EmptyResponse)
    }
}

#[async_trait]
impl Classifier for GeminiClassifier {
    async fn classify(&self, candidate: &Transaction) -> Result<Prediction, ClassifierError> {
        let transaction_json = serde_json::to_string(candidate)
            .map_err(|error| ClassifierError::MalformedResponse(error.to_string()))?;
        let prompt = format!("Analyze this transaction: {transaction_json}");

        let text = self
            .generate_content(prompt, Some(FRAUD_ANALYST_INSTRUCTION), prediction_schema())
            .await?;

        parse_prediction(&text)
    }

    async fn generate_batch(&self, count: usize) -> Result<Vec<Transaction>, ClassifierError> {
        let prompt = format!(
            "Generate {count} diverse and realistic credit card transactions as an array of objects.
            Include some obvious fraud (high amount, weird location), some subtle fraud, and many legitimate ones.
            Fields: id (uuid), timestamp (last 24h), amount (0.99 to 5000), location (City, Country), merchant (Brand), v1-v3 (-2 to 2)."
        );

        let text = self.generate_content(prompt, None, batch_schema()).await?;
        let batch = parse_batch(&text)?;

        if batch.len() != count {
            tracing::warn!(
                "Asked the classifier for {count} transactions but got {}",
                batch.len()
            );
        }

        Ok(batch)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn is_configured(&self) -> bool {
        !self.config.api_key.trim().is_empty()
    }
}

// ============================================================================
// RESPONSE PARSING
// ============================================================================

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// The concatenated text of the first candidate, `None` if it is blank.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Parse and validate a prediction returned by the model.
fn parse_prediction(text: &str) -> Result<Prediction, ClassifierError> {
    let prediction: Prediction = serde_json::from_str(text)
        .map_err(|error| ClassifierError::MalformedResponse(error.to_string()))?;

    if !(0.0..=1.0).contains(&prediction.confidence) {
        return Err(ClassifierError::InvalidPrediction(format!(
            "confidence {} is not between 0 and 1",
            prediction.confidence
        )));
    }

    if !prediction.risk_score.is_finite() {
        return Err(ClassifierError::InvalidPrediction(format!(
            "risk score {} is not a finite number",
            prediction.risk_score
        )));
    }

    Ok(prediction)
}

/// Parse and validate a batch of generated transactions.
fn parse_batch(text: &str) -> Result<Vec<Transaction>, ClassifierError> {
    let batch: Vec<Transaction> = serde_json::from_str(text)
        .map_err(|error| ClassifierError::MalformedResponse(error.to_string()))?;

    let mut seen = HashSet::with_capacity(batch.len());

    for transaction in &batch {
        let id = &transaction.id;

        if id.is_blank() {
            return Err(ClassifierError::InvalidBatch(
                "transaction has a blank ID".to_owned(),
            ));
        }

        if !seen.insert(id) {
            return Err(ClassifierError::InvalidBatch(format!(
                "transaction ID {id} appears more than once"
            )));
        }

        if transaction.status == TransactionStatus::Pending {
            return Err(ClassifierError::InvalidBatch(format!(
                "transaction {id} has not been classified"
            )));
        }

        if !transaction.amount.is_finite() || transaction.amount < 0.0 {
            return Err(ClassifierError::InvalidBatch(format!(
                "transaction {id} has an invalid amount {}",
                transaction.amount
            )));
        }

        if !transaction.risk_score.is_finite() {
            return Err(ClassifierError::InvalidBatch(format!(
                "transaction {id} has an invalid risk score {}",
                transaction.risk_score
            )));
        }

        if timestamp_to_date_time(transaction.timestamp).is_none() {
            return Err(ClassifierError::InvalidBatch(format!(
                "transaction {id} has an out of range timestamp {}",
                transaction.timestamp
            )));
        }
    }

    Ok(batch)
}

// ============================================================================
// RESPONSE SCHEMAS
// ============================================================================

fn prediction_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "isFraud": { "type": "BOOLEAN" },
            "confidence": { "type": "NUMBER", "description": "0 to 1 confidence level" },
            "riskScore": { "type": "NUMBER", "description": "0 to 100 risk score" },
            "reasons": { "type": "ARRAY", "items": { "type": "STRING" } },
            "explanation": { "type": "STRING" },
        },
        "required": ["isFraud", "confidence", "riskScore", "reasons", "explanation"],
    })
}

fn batch_schema() -> Value {
    let statuses: Vec<&str> = TransactionStatus::TERMINAL
        .iter()
        .map(TransactionStatus::as_str)
        .collect();

    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "timestamp": { "type": "NUMBER" },
                "amount": { "type": "NUMBER" },
                "location": { "type": "STRING" },
                "merchant": { "type": "STRING" },
                "v1": { "type": "NUMBER" },
                "v2": { "type": "NUMBER" },
                "v3": { "type": "NUMBER" },
                "status": { "type": "STRING", "enum": statuses },
                "riskScore": { "type": "NUMBER" },
            },
            "required": [
                "id", "timestamp", "amount", "location", "merchant",
                "v1", "v2", "v3", "status", "riskScore"
            ],
        },
    })
}


#[cfg(test)]
mod client_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        extract::Path,
        http::{HeaderMap, StatusCode},
        routing::post,
    };
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    use crate::{
        classifier::{Classifier, ClassifierError},
        transaction::{CandidateFields, Transaction, TransactionId, TransactionStatus},
    };

    use super::{ClassifierConfig, GeminiClassifier};

    /// A request received by the fake API: the path action, the API key header and the body.
    type SeenRequest = (String, Option<String>, Value);

    /// Serve `reply` with `status` for every generateContent request.
    async fn spawn_fake_api(status: StatusCode, reply: Value) -> (String, Arc<Mutex<Vec<SeenRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_by_handler = seen.clone();

        let app = Router::new().route(
            "/v1beta/models/{action}",
            post(
                move |Path(action): Path<String>, headers: HeaderMap, Json(body): Json<Value>| {
                    let reply = reply.clone();
                    let seen = seen_by_handler.clone();

                    async move {
                        let api_key = headers
                            .get("x-goog-api-key")
                            .and_then(|value| value.to_str().ok())
                            .map(str::to_owned);
                        seen.lock().unwrap().push((action, api_key, body));

                        (status, Json(reply))
                    }
                },
            ),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{address}"), seen)
    }

    fn reply_with_text(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }] })
    }

    fn classifier(base_url: &str, api_key: &str) -> GeminiClassifier {
        GeminiClassifier::new(ClassifierConfig {
            base_url: base_url.to_owned(),
            model: "test-model".to_owned(),
            ..ClassifierConfig::new(api_key)
        })
        .unwrap()
    }

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

    #[tokio::test]
    async fn classify_returns_prediction() {
        let text = r#"{"isFraud": false, "confidence": 0.7, "riskScore": 55,
            "reasons": ["unusual merchant"], "explanation": "y"}"#;
        let (base_url, seen) = spawn_fake_api(StatusCode::OK, reply_with_text(text)).await;

        let prediction = classifier(&base_url, "secret")
            .classify(&candidate())
            .await
            .unwrap();

        assert!(!prediction.is_fraud);
        assert_eq!(prediction.risk_score, 55.0);
        assert_eq!(prediction.explanation, "y");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (action, api_key, body) = &seen[0];
        assert_eq!(action, "test-model:generateContent");
        assert_eq!(api_key.as_deref(), Some("secret"));
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"]
                .as_array()
                .unwrap()
                .len(),
            5
        );
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.starts_with("Analyze this transaction: "));
        assert!(prompt.contains("candidate-1"));
        assert!(body["systemInstruction"]["parts"][0]["text"].is_string());
    }

    #[tokio::test]
    async fn missing_api_key_sends_no_request() {
        let (base_url, seen) = spawn_fake_api(StatusCode::OK, json!({})).await;
        let classifier = classifier(&base_url, "");

        let result = classifier.classify(&candidate()).await;

        assert_eq!(result, Err(ClassifierError::MissingCredential));
        assert!(!classifier.is_configured());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_server_error() {
        let (base_url, _) = spawn_fake_api(
            StatusCode::TOO_MANY_REQUESTS,
            json!({ "error": { "message": "quota exceeded" } }),
        )
        .await;

        let result = classifier(&base_url, "secret").classify(&candidate()).await;

        match result {
            Err(ClassifierError::ServerError { status, body }) => {
                assert_eq!(status, 429);
                assert!(body.contains("quota exceeded"), "got body {body}");
            }
            other => panic!("want server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reply_without_candidates_is_empty_response() {
        let (base_url, _) = spawn_fake_api(StatusCode::OK, json!({ "candidates": [] })).await;

        let result = classifier(&base_url, "secret").classify(&candidate()).await;

        assert_eq!(result, Err(ClassifierError::EmptyResponse));
    }

    #[tokio::test]
    async fn reply_missing_fields_is_malformed() {
        let text = r#"{"isFraud": true}"#;
        let (base_url, _) = spawn_fake_api(StatusCode::OK, reply_with_text(text)).await;

        let result = classifier(&base_url, "secret").classify(&candidate()).await;

        assert!(
            matches!(result, Err(ClassifierError::MalformedResponse(_))),
            "got {result:?}"
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_unavailable() {
        // Bind and immediately drop a listener to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let result = classifier(&format!("http://{address}"), "secret")
            .classify(&candidate())
            .await;

        assert!(
            matches!(result, Err(ClassifierError::Unavailable(_))),
            "got {result:?}"
        );
    }

    #[tokio::test]
    async fn generate_batch_returns_transactions() {
        let text = r#"[
            {"id": "a", "timestamp": 1700000000000, "amount": 12.5, "location": "Oslo, Norway",
             "merchant": "IKEA", "v1": 0.1, "v2": 0.2, "v3": 0.3, "status": "approved", "riskScore": 4},
            {"id": "b", "timestamp": 1700000360000, "amount": 4800, "location": "Unknown, Unknown",
             "merchant": "Crypto Hut", "v1": 1.9, "v2": -1.8, "v3": 2.0, "status": "fraud", "riskScore": 97}
        ]"#;
        let (base_url, seen) = spawn_fake_api(StatusCode::OK, reply_with_text(text)).await;

        let batch = classifier(&base_url, "secret")
            .generate_batch(2)
            .await
            .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1].status, TransactionStatus::Fraud);
        assert_eq!(batch[1].risk_score, 97.0);

        let seen = seen.lock().unwrap();
        let (_, _, body) = &seen[0];
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.starts_with("Generate 2 "));
        assert_eq!(
            body["generationConfig"]["responseSchema"]["items"]["properties"]["status"]["enum"],
            json!(["approved", "fraud", "flagged"])
        );
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = ClassifierConfig::new("super-secret-key");

        let debug = format!("{config:?}");

        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("********"));
    }
}
