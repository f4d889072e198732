//! The page for inspecting a single transaction in the ledger.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::UtcOffset;

use crate::{
    AppState, Error, endpoints,
    html::{CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, format_currency},
    navigation::NavBar,
    timezone::{format_timestamp, get_local_offset},
    transaction::{Transaction, TransactionId, view::status_badge},
    view::View,
};

/// Risk scores above this are highlighted on the detail page.
const DETAIL_HIGH_RISK_THRESHOLD: f64 = 70.0;

/// Display the transaction with `transaction_id`, or the 404 page if the
/// ledger does not hold it.
pub async fn get_transaction_page(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let ledger = state
        .ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)?;

    let transaction = ledger
        .get(&TransactionId::new(&transaction_id))
        .ok_or(Error::NotFound)?;

    Ok(transaction_detail_view(transaction, local_offset).into_response())
}

fn transaction_detail_view(transaction: &Transaction, local_offset: UtcOffset) -> Markup {
    let nav_bar = NavBar::new(View::Transactions).into_html();
    let risk_style = if transaction.risk_score > DETAIL_HIGH_RISK_THRESHOLD {
        "text-xl font-bold text-red-500"
    } else {
        "text-xl font-bold text-green-500"
    };

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class={ (CARD_STYLE) " w-full max-w-lg" }
            {
                div class="flex justify-between items-start mb-6"
                {
                    div
                    {
                        h2 class="text-xl font-bold" { "Transaction Details" }
                        p class="text-xs text-gray-500 dark:text-gray-400" { "ID: " (transaction.id) }
                    }

                    (status_badge(transaction.status))
                }

                div class="grid grid-cols-2 gap-4 mb-6"
                {
                    div class="p-4 bg-gray-50 dark:bg-gray-700 rounded-lg"
                    {
                        p class="text-xs uppercase font-bold text-gray-500 dark:text-gray-400" { "Amount" }
                        p id="amount" class="text-xl font-bold" { (format_currency(transaction.amount)) }
                    }

                    div class="p-4 bg-gray-50 dark:bg-gray-700 rounded-lg"
                    {
                        p class="text-xs uppercase font-bold text-gray-500 dark:text-gray-400" { "Risk Score" }
                        p id="risk-score" class=(risk_style) { (format!("{:.0}%", transaction.risk_score)) }
                    }
                }

                dl class="space-y-2 text-sm"
                {
                    div { dt class="inline font-semibold" { "Merchant: " } dd class="inline" { (transaction.merchant) } }
                    div { dt class="inline font-semibold" { "Location: " } dd class="inline" { (transaction.location) } }
                    div { dt class="inline font-semibold" { "Time: " } dd class="inline" { (format_timestamp(transaction, local_offset)) } }
                    div
                    {
                        dt class="inline font-semibold" { "Behavioral Markers: " }
                        dd id="behavioral-markers" class="inline"
                        {
                            (format!(
                                "V1:{:.2} | V2:{:.2} | V3:{:.2}",
                                transaction.v1, transaction.v2, transaction.v3
                            ))
                        }
                    }
                }

                @if let Some(analysis) = &transaction.analysis {
                    div class="mt-6 p-4 bg-blue-50 dark:bg-blue-900/30 border border-blue-200 dark:border-blue-800 rounded-lg"
                    {
                        p class="text-xs uppercase font-bold text-blue-700 dark:text-blue-300 mb-1" { "AI Insight" }
                        p id="analysis" class="text-sm italic" { (analysis) }
                    }
                }

                p class="mt-6"
                {
                    a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Back to monitor" }
                }
            }
        }
    );

    base("Transaction Details", &[], &content)
}
