//! The configuration page and the ledger maintenance endpoints it triggers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CARD_STYLE, PAGE_CONTAINER_STYLE, base,
        loading_spinner,
    },
    navigation::NavBar,
    prediction::FLAG_THRESHOLD,
    transaction::{TransactionFilter, seed_ledger},
    view::{View, render_view},
};

/// Display the read-only configuration and the ledger actions.
pub async fn get_settings_page(State(state): State<AppState>) -> Result<Response, Error> {
    render_view(View::Settings, &state, &TransactionFilter::default())
        .map(IntoResponse::into_response)
}

/// Replace the ledger with a freshly generated batch and redirect to the dashboard.
pub async fn seed_ledger_endpoint(State(state): State<AppState>) -> Response {
    match seed_ledger(&state).await {
        Ok(_) => (
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not seed the ledger: {error}");
            error.into_alert_response()
        }
    }
}

/// Remove every transaction from the ledger and redirect to the dashboard.
pub async fn reset_ledger_endpoint(State(state): State<AppState>) -> Response {
    let result = state
        .ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)
        .and_then(|mut ledger| ledger.replace_all(Vec::new()));

    match result {
        Ok(()) => {
            tracing::info!("Cleared the ledger");

            (
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}

pub(crate) fn settings_page(
    ledger_size: usize,
    model_name: &str,
    is_configured: bool,
    seed_count: usize,
) -> Markup {
    let nav_bar = NavBar::new(View::Settings).into_html();
    let settings = [
        ("model", "Model", model_name.to_owned()),
        (
            "api-key",
            "API key",
            if is_configured { "Configured" } else { "Missing" }.to_owned(),
        ),
        (
            "flag-threshold",
            "Flag threshold",
            format!("Risk score above {FLAG_THRESHOLD:.0}"),
        ),
        ("seed-count", "Sample batch size", seed_count.to_string()),
        ("ledger-size", "Transactions in ledger", ledger_size.to_string()),
    ];

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class={ (CARD_STYLE) " w-full max-w-lg space-y-6" }
            {
                h2 class="text-xl font-bold" { "Configuration" }

                dl class="divide-y divide-gray-200 dark:divide-gray-700 text-sm"
                {
                    @for (id, label, value) in &settings {
                        div class="flex justify-between py-2"
                        {
                            dt class="font-semibold" { (label) }
                            dd id=(id) { (value) }
                        }
                    }
                }

                @if !is_configured {
                    p class="text-sm text-amber-700 dark:text-amber-300"
                    {
                        "Set the API_KEY environment variable and restart the server to enable classification."
                    }
                }

                section class="space-y-2"
                {
                    h3 class="text-lg font-semibold" { "Ledger" }

                    button
                        hx-post=(endpoints::SEED_LEDGER_API)
                        hx-confirm="Replace the ledger with newly generated sample transactions?"
                        hx-target-error="#alert-container"
                        hx-disabled-elt="this"
                        class=(BUTTON_PRIMARY_STYLE)
                    {
                        span class="htmx-indicator" { (loading_spinner()) "Generating..." }
                        span class="htmx-idle" { "Generate sample transactions" }
                    }

                    button
                        hx-post=(endpoints::RESET_LEDGER_API)
                        hx-confirm="Remove every transaction from the ledger?"
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Clear ledger"
                    }
                }
            }
        }
    );

    base(View::Settings.title(), &[], &content)
}
