//! The endpoint that classifies a sandbox transaction and stores the result.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    analysis::page::candidate_id_input,
    prediction::{Prediction, apply_prediction},
    transaction::{CandidateFields, Transaction, TransactionId, now_millis},
};

/// Risk scores above this are drawn in red in the result panel.
const RESULT_HIGH_RISK_THRESHOLD: f64 = 70.0;

/// The sandbox form data.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisForm {
    /// The ID generated for the candidate when the form was rendered.
    pub candidate_id: String,
    pub amount: f64,
    pub merchant: String,
    pub location: String,
    pub v1: f64,
    pub v2: f64,
    pub v3: f64,
}

impl AnalysisForm {
    /// Check the form can be turned into a candidate transaction.
    ///
    /// # Errors
    /// Returns [Error::InvalidAnalysisInput] naming the first offending field.
    fn into_candidate(self) -> Result<Transaction, Error> {
        let id = TransactionId::new(&self.candidate_id);

        if id.is_blank() {
            return Err(Error::InvalidAnalysisInput(
                "the candidate ID is missing".to_owned(),
            ));
        }

        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::InvalidAnalysisInput(
                "the amount must be a number that is zero or greater".to_owned(),
            ));
        }

        let merchant = self.merchant.trim();
        if merchant.is_empty() {
            return Err(Error::InvalidAnalysisInput(
                "the merchant cannot be empty".to_owned(),
            ));
        }

        let location = self.location.trim();
        if location.is_empty() {
            return Err(Error::InvalidAnalysisInput(
                "the location cannot be empty".to_owned(),
            ));
        }

        for (name, value) in [("V1", self.v1), ("V2", self.v2), ("V3", self.v3)] {
            if !value.is_finite() {
                return Err(Error::InvalidAnalysisInput(format!(
                    "{name} must be a finite number"
                )));
            }
        }

        Ok(Transaction::candidate(
            id,
            now_millis(),
            CandidateFields {
                amount: self.amount,
                merchant: merchant.to_owned(),
                location: location.to_owned(),
                v1: self.v1,
                v2: self.v2,
                v3: self.v3,
            },
        ))
    }
}

/// Classify the submitted transaction and insert the result at the head of the ledger.
///
/// Responds with the prediction panel and a fresh candidate ID for the next
/// submission. On failure, responds with an error alert and leaves the ledger
/// unchanged.
pub async fn analyze_transaction_endpoint(
    State(state): State<AppState>,
    Form(form): Form<AnalysisForm>,
) -> Response {
    match analyze_transaction(&state, form).await {
        Ok((transaction, prediction)) => {
            analysis_result_view(&transaction, &prediction).into_response()
        }
        Err(error) => {
            tracing::error!("Could not analyze transaction: {error}");
            error.into_alert_response()
        }
    }
}

async fn analyze_transaction(
    state: &AppState,
    form: AnalysisForm,
) -> Result<(Transaction, Prediction), Error> {
    let candidate = form.into_candidate()?;
    let _guard = state.in_flight.try_begin(&candidate.id)?;

    let already_stored = state
        .ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)?
        .contains(&candidate.id);

    if already_stored {
        return Err(Error::DuplicateTransactionId(candidate.id));
    }

    tracing::debug!("Classifying transaction {}", candidate.id);
    let prediction = state.classifier.classify(&candidate).await?;
    let transaction = apply_prediction(&candidate, &prediction);

    tracing::info!(
        "Transaction {} classified as {} with risk score {:.0}",
        transaction.id,
        transaction.status,
        transaction.risk_score
    );

    state
        .ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)?
        .insert_at_head(transaction.clone())?;

    Ok((transaction, prediction))
}

fn analysis_result_view(transaction: &Transaction, prediction: &Prediction) -> Markup {
    let (verdict, verdict_style) = if prediction.is_fraud {
        (
            "DETECTED: FRAUD",
            "bg-red-50 dark:bg-red-900/30 border-red-200 dark:border-red-800 text-red-700 dark:text-red-300",
        )
    } else {
        (
            "SYSTEM: APPROVED",
            "bg-green-50 dark:bg-green-900/30 border-green-200 dark:border-green-800 text-green-700 dark:text-green-300",
        )
    };
    let risk_colour = if prediction.risk_score > RESULT_HIGH_RISK_THRESHOLD {
        "bg-red-500"
    } else {
        "bg-green-500"
    };
    let risk_width = prediction.risk_score.clamp(0.0, 100.0);
    let stored_alert = Alert::SuccessSimple {
        message: format!(
            "Transaction {} added to the ledger as {}",
            transaction.id.short(8),
            transaction.status
        ),
    }
    .into_html();

    html! {
        div class="bg-white dark:bg-gray-800 border border-gray-200 dark:border-gray-700 rounded-lg overflow-hidden text-gray-900 dark:text-white"
        {
            div id="verdict" class={ "p-6 border-b text-center " (verdict_style) }
            {
                h3 class="text-2xl font-black" { (verdict) }
                p class="text-sm mt-1"
                {
                    "Confidence: "
                    span id="confidence" class="font-bold" { (format!("{:.1}%", prediction.confidence * 100.0)) }
                }
            }

            div class="p-6 space-y-6"
            {
                div
                {
                    div class="flex justify-between items-end mb-2"
                    {
                        span class="text-sm font-bold text-gray-500 dark:text-gray-400" { "Risk Score Distribution" }
                        span id="risk-score" class="text-2xl font-bold" { (format!("{:.0}/100", prediction.risk_score)) }
                    }

                    div class="h-3 w-full bg-gray-200 dark:bg-gray-700 rounded-full overflow-hidden"
                    {
                        div
                            class={ "h-full " (risk_colour) }
                            style={ "width: " (format!("{risk_width:.0}")) "%" }
                        {}
                    }
                }

                div
                {
                    h4 class="text-sm font-bold mb-3" { "Detection Reasons" }

                    ul id="reasons" class="space-y-2 text-sm"
                    {
                        @for reason in &prediction.reasons {
                            li class="p-3 bg-gray-50 dark:bg-gray-700 rounded-lg" { (reason) }
                        }
                    }
                }

                div class="p-4 bg-blue-50 dark:bg-blue-900/30 border border-blue-200 dark:border-blue-800 rounded-lg"
                {
                    p class="text-xs uppercase font-bold text-blue-700 dark:text-blue-300 mb-1" { "AI Summary" }
                    p id="explanation" class="text-sm italic" { (prediction.explanation) }
                }
            }
        }

        (candidate_id_input(&TransactionId::new_random(), true))
        (stored_alert)
    }
}
