//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations for the ledger:
//! - **Volume Chart**: Transaction volume per two-hour window over the last day
//! - **Risk Chart**: The highest risk score seen in each window
//! - **Status Chart**: How many transactions were approved, flagged or marked as fraud
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, JsFunction, Tooltip, Trigger,
    },
    series::{Bar, Line, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    dashboard::aggregation::{BUCKET_COUNT, StatusDistribution, TimeBucket},
    html::HeadElement,
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-3 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Labels and values for `series`, oldest window first.
fn chronological<T>(
    series: &[TimeBucket; BUCKET_COUNT],
    value: impl Fn(&TimeBucket) -> T,
) -> (Vec<String>, Vec<T>) {
    series
        .iter()
        .rev()
        .map(|bucket| (format!("{}h ago", bucket.hours_ago), value(bucket)))
        .unzip()
}

pub(super) fn volume_chart(series: &[TimeBucket; BUCKET_COUNT]) -> Chart {
    let (labels, values) = chronological(series, |bucket| bucket.volume);

    Chart::new()
        .title(
            Title::new()
                .text("Transaction Volume")
                .subtext("Last 24 hours"),
        )
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Volume").data(values))
}

pub(super) fn risk_chart(series: &[TimeBucket; BUCKET_COUNT]) -> Chart {
    let (labels, values) = chronological(series, |bucket| bucket.max_risk_score);

    Chart::new()
        .title(
            Title::new()
                .text("Risk Trend")
                .subtext("Highest risk score, last 24 hours"),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Line)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Line::new().name("Max Risk Score").data(values))
}

pub(super) fn status_chart(distribution: &StatusDistribution) -> Chart {
    Chart::new()
        .title(
            Title::new()
                .text("Status Distribution")
                .subtext(format!("{} transactions", distribution.total())),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().bottom("1%"))
        .color(vec![
            Color::from("#10b981"),
            Color::from("#ef4444"),
            Color::from("#f59e0b"),
        ])
        .series(
            Pie::new()
                .name("Status")
                .radius(vec!["40%", "70%"])
                .data(vec![
                    (distribution.approved as f64, "Legitimate"),
                    (distribution.fraud as f64, "Fraudulent"),
                    (distribution.flagged as f64, "Flagged"),
                ]),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
