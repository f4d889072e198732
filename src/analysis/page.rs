//! The sandbox page where a user builds a transaction and asks the classifier about it.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        dollar_input_styles, loading_spinner,
    },
    navigation::NavBar,
    transaction::{TransactionFilter, TransactionId},
    view::{View, render_view},
};

const DEFAULT_AMOUNT: &str = "250";
const DEFAULT_MERCHANT: &str = "Global Luxury Store";
const DEFAULT_LOCATION: &str = "Paris, France";
const DEFAULT_V1: &str = "0.5";
const DEFAULT_V2: &str = "-1.2";
const DEFAULT_V3: &str = "0.8";

const PAGE_WIDTH_STYLE: &str = "w-full max-w-5xl px-2 lg:px-6 py-8 mx-auto text-gray-900 dark:text-white";

/// The element the analysis result is swapped into.
pub(crate) const RESULT_TARGET_ID: &str = "analysis-result";

/// Display the sandbox form with a fresh candidate ID.
pub async fn get_analysis_page(State(state): State<AppState>) -> Result<Response, Error> {
    render_view(View::Analysis, &state, &TransactionFilter::default())
        .map(IntoResponse::into_response)
}

pub(crate) fn analysis_page(model_name: &str) -> Markup {
    let nav_bar = NavBar::new(View::Analysis).into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_WIDTH_STYLE)
        {
            div class="mb-6"
            {
                h2 class="text-2xl font-bold" { "AI Sandbox" }
                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    "Simulate a transaction and run it through " (model_name) "."
                }
            }

            div class="grid grid-cols-1 lg:grid-cols-2 gap-6"
            {
                div class=(CARD_STYLE) { (analysis_form()) }

                div id=(RESULT_TARGET_ID) { (waiting_for_input()) }
            }
        }
    );

    base(View::Analysis.title(), &[dollar_input_styles()], &content)
}

fn analysis_form() -> Markup {
    let result_target = format!("#{RESULT_TARGET_ID}");

    html! {
        form
            hx-post=(endpoints::ANALYSIS_API)
            hx-target=(result_target)
            hx-target-error="#alert-container"
            hx-disabled-elt="find button[type='submit']"
            class="w-full space-y-4"
        {
            (candidate_id_input(&TransactionId::new_random(), false))

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Transaction Amount ($)" }

                div class="input-wrapper"
                {
                    input
                        id="amount"
                        type="number"
                        name="amount"
                        step="0.01"
                        min="0"
                        value=(DEFAULT_AMOUNT)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div class="grid grid-cols-1 sm:grid-cols-2 gap-4"
            {
                div
                {
                    label for="merchant" class=(FORM_LABEL_STYLE) { "Merchant Entity" }

                    input
                        id="merchant"
                        type="text"
                        name="merchant"
                        value=(DEFAULT_MERCHANT)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="location" class=(FORM_LABEL_STYLE) { "Geographical Context" }

                    input
                        id="location"
                        type="text"
                        name="location"
                        value=(DEFAULT_LOCATION)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            fieldset class="p-4 bg-gray-50 dark:bg-gray-700 rounded-lg"
            {
                legend class="text-xs font-bold uppercase text-gray-500 dark:text-gray-400"
                {
                    "Anonymized Behavioral Markers"
                }

                div class="grid grid-cols-3 gap-3"
                {
                    (marker_input("v1", "V1: Geo-Distance", DEFAULT_V1))
                    (marker_input("v2", "V2: Freq-Score", DEFAULT_V2))
                    (marker_input("v3", "V3: Device-Trust", DEFAULT_V3))
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="htmx-indicator" { (loading_spinner()) "Running AI Inference..." }
                span class="htmx-idle" { "Analyze Risk Profile" }
            }
        }
    }
}

fn marker_input(name: &str, label: &str, value: &str) -> Markup {
    html! {
        div
        {
            label for=(name) class="block mb-1 text-[10px] font-bold text-gray-500 dark:text-gray-400" { (label) }

            input
                id=(name)
                type="number"
                name=(name)
                step="0.1"
                value=(value)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

/// The hidden input that carries the candidate ID.
///
/// Set `out_of_band` to replace the input already on the page through an
/// HTMX out of band swap.
pub(crate) fn candidate_id_input(id: &TransactionId, out_of_band: bool) -> Markup {
    html! {
        input
            type="hidden"
            id="candidate-id"
            name="candidate_id"
            value=(id)
            hx-swap-oob=[out_of_band.then_some("true")];
    }
}

fn waiting_for_input() -> Markup {
    html! {
        div class="h-full min-h-64 flex flex-col items-center justify-center text-center p-12 border-2 border-dashed border-gray-300 dark:border-gray-600 rounded-lg"
        {
            h3 class="text-lg font-bold text-gray-400" { "Waiting for Input" }
            p class="text-sm text-gray-400 max-w-xs mt-2"
            {
                "Adjust the parameters and run the analysis to see the model's risk assessment."
            }
        }
    }
}
