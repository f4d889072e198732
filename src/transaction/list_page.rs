//! The transaction monitor page that lists the ledger, newest first.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::UtcOffset;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    html::{
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
    timezone::format_timestamp,
    transaction::{
        Transaction, TransactionFilter, TransactionStatus,
        view::{risk_bar, status_badge},
    },
    view::{View, render_view},
};

/// Display the ledger, optionally filtered by status and a search query.
pub async fn get_transactions_page(
    State(state): State<AppState>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Response, Error> {
    render_view(View::Transactions, &state, &filter).map(IntoResponse::into_response)
}

/// Render the monitor page for the `transactions` selected by `filter`.
pub(crate) fn transactions_page(
    transactions: &[&Transaction],
    filter: &TransactionFilter,
    local_offset: UtcOffset,
) -> Markup {
    let nav_bar = NavBar::new(View::Transactions).into_html();
    let is_filtered = filter.status.is_some() || !filter.query.trim().is_empty();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full bg-white dark:bg-gray-800 border border-gray-200 dark:border-gray-700 rounded-lg overflow-hidden"
            {
                div class="p-6 border-b border-gray-200 dark:border-gray-700 flex flex-col lg:flex-row lg:items-end justify-between gap-4"
                {
                    h2 class="text-xl font-bold" { "Real-time Transaction Stream" }

                    (filter_form(filter))
                }

                @if transactions.is_empty() {
                    p class="p-6 text-gray-600 dark:text-gray-400"
                    {
                        @if is_filtered {
                            "No transactions match the filter. "
                            a href=(endpoints::TRANSACTIONS_VIEW) class=(LINK_STYLE) { "Clear the filter" }
                            "."
                        } @else {
                            "The ledger is empty. Run an "
                            a href=(endpoints::ANALYSIS_VIEW) class=(LINK_STYLE) { "AI analysis" }
                            " or generate sample transactions from the "
                            a href=(endpoints::SETTINGS_VIEW) class=(LINK_STYLE) { "configuration" }
                            " page."
                        }
                    }
                } @else {
                    div class="overflow-x-auto"
                    {
                        table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Merchant" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Location" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Risk Score" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                    th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Action" } }
                                }
                            }

                            tbody
                            {
                                @for transaction in transactions {
                                    (transaction_row(transaction, local_offset))
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Monitor", &[], &content)
}

fn filter_form(filter: &TransactionFilter) -> Markup {
    let status_options = [
        (None, "All statuses"),
        (Some(TransactionStatus::Approved), "Approved"),
        (Some(TransactionStatus::Fraud), "Fraud"),
        (Some(TransactionStatus::Flagged), "Flagged"),
    ];

    html! {
        form
            method="get"
            action=(endpoints::TRANSACTIONS_VIEW)
            class="flex flex-col sm:flex-row gap-2 sm:items-end"
        {
            div
            {
                label for="status" class=(FORM_LABEL_STYLE) { "Status" }

                select id="status" name="status" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for (status, label) in status_options {
                        option
                            value=(status.map(|status| status.as_str()).unwrap_or_default())
                            selected[filter.status == status]
                        {
                            (label)
                        }
                    }
                }
            }

            div
            {
                label for="q" class=(FORM_LABEL_STYLE) { "Search" }

                input
                    type="search"
                    id="q"
                    name="q"
                    value=(filter.query)
                    placeholder="Search merchant or location..."
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button
                type="submit"
                class="px-4 py-2.5 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600 text-white text-sm rounded"
            {
                "Filter"
            }
        }
    }
}

fn transaction_row(transaction: &Transaction, local_offset: UtcOffset) -> Markup {
    let detail_url = format_endpoint(endpoints::TRANSACTION_VIEW, transaction.id.as_ref());

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE)
            {
                p class="font-medium text-gray-900 dark:text-white" { (transaction.merchant) }
                p class="text-xs" { "ID: " (transaction.id.short(8)) }
            }

            td class=(TABLE_CELL_STYLE)
            {
                p { (transaction.location) }
                p class="text-xs" { (format_timestamp(transaction, local_offset)) }
            }

            td class=(TABLE_CELL_STYLE)
            {
                span class="font-semibold text-gray-900 dark:text-white"
                {
                    (format_currency(transaction.amount))
                }
            }

            td class=(TABLE_CELL_STYLE) { (risk_bar(transaction.risk_score)) }

            td class=(TABLE_CELL_STYLE) { (status_badge(transaction.status)) }

            td class={ (TABLE_CELL_STYLE) " text-right" }
            {
                a href=(detail_url) class=(LINK_STYLE) { "Details" }
            }
        }
    }
}
