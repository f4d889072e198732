//! Dashboard HTTP handlers and view rendering.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    dashboard::{
        aggregation::{AggregateStats, BUCKET_COUNT, StatusDistribution, TimeBucket},
        cards::stat_cards_view,
        charts::{
            DashboardChart, charts_script, charts_view, risk_chart, status_chart, volume_chart,
        },
    },
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, ECHARTS_URL, HeadElement, base, link, loading_spinner},
    navigation::NavBar,
    transaction::TransactionFilter,
    view::{View, render_view},
};

/// Display a page with an overview of the ledger.
pub async fn get_dashboard_page(State(state): State<AppState>) -> Result<Response, Error> {
    render_view(View::Dashboard, &state, &TransactionFilter::default())
        .map(IntoResponse::into_response)
}

/// Render the dashboard, or a prompt to add data if the ledger is empty.
pub(crate) fn dashboard_page(
    stats: &AggregateStats,
    distribution: &StatusDistribution,
    series: &[TimeBucket; BUCKET_COUNT],
) -> Markup {
    if stats.total_count == 0 {
        return dashboard_no_data_view();
    }

    let charts = build_dashboard_charts(distribution, series);

    dashboard_view(stats, &charts)
}

/// Creates the array of dashboard charts from the derived series.
///
/// The chart options are serialized to JSON for ECharts consumption.
fn build_dashboard_charts(
    distribution: &StatusDistribution,
    series: &[TimeBucket; BUCKET_COUNT],
) -> [DashboardChart; 3] {
    [
        DashboardChart {
            id: "volume-chart",
            options: volume_chart(series).to_string(),
        },
        DashboardChart {
            id: "risk-chart",
            options: risk_chart(series).to_string(),
        },
        DashboardChart {
            id: "status-chart",
            options: status_chart(distribution).to_string(),
        },
    ]
}

/// Renders the dashboard page when the ledger is empty.
fn dashboard_no_data_view() -> Markup {
    let nav_bar = NavBar::new(View::Dashboard).into_html();
    let analysis_link = link(endpoints::ANALYSIS_VIEW, "AI sandbox");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p class="mb-4"
            {
                "Charts will show up here once the ledger has some transactions.
                You can analyze a transaction in the " (analysis_link) " or
                generate a batch of sample transactions."
            }

            button
                hx-post=(endpoints::SEED_LEDGER_API)
                hx-target-error="#alert-container"
                hx-disabled-elt="this"
                class={ (BUTTON_PRIMARY_STYLE) " max-w-xs" }
            {
                span class="htmx-indicator" { (loading_spinner()) "Generating..." }
                span class="htmx-idle" { "Generate sample transactions" }
            }
        }
    );

    base(View::Dashboard.title(), &[], &content)
}

/// Renders the main dashboard page with the stat cards and charts.
fn dashboard_view(stats: &AggregateStats, charts: &[DashboardChart]) -> Markup {
    let nav_bar = NavBar::new(View::Dashboard).into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (stat_cards_view(stats))
            (charts_view(charts))
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        charts_script(charts),
    ];

    base(View::Dashboard.title(), &scripts, &content)
}
