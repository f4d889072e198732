//! Card components for the headline ledger statistics.

use maud::{Markup, html};

use crate::{dashboard::aggregation::AggregateStats, html::format_currency};

/// One headline figure with a short description underneath.
struct StatCard<'a> {
    id: &'a str,
    label: &'a str,
    value: String,
    description: String,
    accent: &'a str,
}

/// Renders the grid of headline statistics cards.
pub(super) fn stat_cards_view(stats: &AggregateStats) -> Markup {
    let cards = [
        StatCard {
            id: "total-volume",
            label: "Total Volume",
            value: format_currency(stats.total_volume),
            description: "Across the whole ledger".to_owned(),
            accent: "border-indigo-500",
        },
        StatCard {
            id: "fraud-rate",
            label: "Fraud Detection Rate",
            value: format!("{:.1}%", stats.fraud_rate()),
            description: format!("{} threats blocked", stats.fraud_count),
            accent: "border-red-500",
        },
        StatCard {
            id: "average-risk",
            label: "Average Risk Score",
            value: format!("{:.1}", stats.average_risk_score),
            description: format!("{} flagged for review", stats.flagged_count),
            accent: "border-amber-500",
        },
        StatCard {
            id: "total-transactions",
            label: "Total Transactions",
            value: stats.total_count.to_string(),
            description: "Processed by the engine".to_owned(),
            accent: "border-gray-500",
        },
    ];

    html! {
        section class="w-full mx-auto mb-8"
        {
            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4"
            {
                @for card in &cards {
                    (stat_card(card))
                }
            }
        }
    }
}

fn stat_card(card: &StatCard) -> Markup {
    html! {
        div
            class={ "bg-white dark:bg-gray-800 border border-gray-200 dark:border-gray-700
                border-l-4 rounded-lg p-4 shadow-md " (card.accent) }
            aria-label=(format!("{}: {}", card.label, card.value))
        {
            p class="text-xs font-medium uppercase tracking-wider text-gray-500 dark:text-gray-400 mb-1"
            {
                (card.label)
            }

            div id=(card.id) class="text-2xl font-bold" { (card.value) }

            p class="text-xs text-gray-600 dark:text-gray-400 mt-2" { (card.description) }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::dashboard::aggregation::AggregateStats;

    use super::stat_cards_view;

    fn text_of(html: &Html, selector: &str) -> String {
        html.select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("no element matches {selector}"))
            .text()
            .collect::<String>()
    }

    #[test]
    fn shows_headline_figures() {
        let stats = AggregateStats {
            total_count: 8,
            fraud_count: 2,
            flagged_count: 1,
            total_volume: 12_345.5,
            average_risk_score: 33.333,
        };

        let html = Html::parse_fragment(&stat_cards_view(&stats).into_string());

        assert_eq!(text_of(&html, "#total-volume"), "$12,345.50");
        assert_eq!(text_of(&html, "#fraud-rate"), "25.0%");
        assert_eq!(text_of(&html, "#average-risk"), "33.3");
        assert_eq!(text_of(&html, "#total-transactions"), "8");
    }

    #[test]
    fn empty_ledger_shows_zeroes() {
        let html = Html::parse_fragment(&stat_cards_view(&AggregateStats::default()).into_string());

        assert_eq!(text_of(&html, "#total-volume"), "$0.00");
        assert_eq!(text_of(&html, "#fraud-rate"), "0.0%");
        assert_eq!(text_of(&html, "#average-risk"), "0.0");
        assert_eq!(text_of(&html, "#total-transactions"), "0");
    }
}
