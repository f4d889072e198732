//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::{
    AppState,
    analysis::{analyze_transaction_endpoint, get_analysis_page},
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    settings::{get_settings_page, reset_ledger_endpoint, seed_ledger_endpoint},
    transaction::{get_transaction_page, get_transactions_page},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let view_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(endpoints::TRANSACTION_VIEW, get(get_transaction_page))
        .route(endpoints::ANALYSIS_VIEW, get(get_analysis_page))
        .route(endpoints::SETTINGS_VIEW, get(get_settings_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(endpoints::ANALYSIS_API, post(analyze_transaction_endpoint))
        .route(endpoints::SEED_LEDGER_API, post(seed_ledger_endpoint))
        .route(endpoints::RESET_LEDGER_API, post(reset_ledger_endpoint));

    view_routes
        .merge(api_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
