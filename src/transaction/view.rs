//! Markup shared by the pages that display transactions.

use maud::{Markup, html};

use crate::transaction::TransactionStatus;

/// Risk scores above this are shown in red.
const HIGH_RISK_THRESHOLD: f64 = 75.0;

/// Risk scores above this are shown in amber.
const ELEVATED_RISK_THRESHOLD: f64 = 40.0;

/// A coloured pill with the status name.
pub fn status_badge(status: TransactionStatus) -> Markup {
    let style = match status {
        TransactionStatus::Fraud => "bg-red-100 text-red-800 dark:bg-red-900 dark:text-red-300",
        TransactionStatus::Flagged => {
            "bg-amber-100 text-amber-800 dark:bg-amber-900 dark:text-amber-300"
        }
        TransactionStatus::Approved => {
            "bg-green-100 text-green-800 dark:bg-green-900 dark:text-green-300"
        }
        TransactionStatus::Pending => "bg-gray-100 text-gray-800 dark:bg-gray-700 dark:text-gray-300",
    };

    html! {
        span
            class={ "px-2 py-1 rounded-md text-xs font-bold uppercase tracking-wider " (style) }
            data-status=(status.as_str())
        {
            (status)
        }
    }
}

/// The background colour for a bar showing `risk_score`.
pub fn risk_bar_colour(risk_score: f64) -> &'static str {
    if risk_score > HIGH_RISK_THRESHOLD {
        "bg-red-500"
    } else if risk_score > ELEVATED_RISK_THRESHOLD {
        "bg-amber-500"
    } else {
        "bg-green-500"
    }
}

/// A small horizontal bar filled in proportion to `risk_score`, followed by the score.
pub fn risk_bar(risk_score: f64) -> Markup {
    let width = risk_score.clamp(0.0, 100.0);

    html! {
        div class="flex items-center gap-2"
        {
            div class="h-1.5 w-16 bg-gray-200 dark:bg-gray-700 rounded-full overflow-hidden"
            {
                div
                    class={ "h-full rounded-full " (risk_bar_colour(risk_score)) }
                    style={ "width: " (format!("{width:.0}")) "%" }
                {}
            }

            span class="text-xs font-bold" { (format!("{risk_score:.0}")) }
        }
    }
}
