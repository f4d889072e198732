//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/transactions/{transaction_id}', use [format_endpoint].

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page with the aggregate statistics and charts.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for monitoring the ledger of classified transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for inspecting a single transaction.
pub const TRANSACTION_VIEW: &str = "/transactions/{transaction_id}";
/// The sandbox page for submitting a transaction for classification.
pub const ANALYSIS_VIEW: &str = "/analysis";
/// The page showing the classifier configuration and ledger actions.
pub const SETTINGS_VIEW: &str = "/settings";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route to classify a sandbox transaction.
pub const ANALYSIS_API: &str = "/api/analysis";
/// The route to replace the ledger with freshly generated transactions.
pub const SEED_LEDGER_API: &str = "/api/ledger/seed";
/// The route to empty the ledger.
pub const RESET_LEDGER_API: &str = "/api/ledger/reset";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/transactions/{transaction_id}', '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
