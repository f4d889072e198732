//! The views a user can navigate between and the data each view derives
//! from the ledger.

use maud::Markup;

use crate::{
    AppState, Error, analysis,
    dashboard::{
        self, AggregateStats, BUCKET_COUNT, StatusDistribution, TimeBucket,
        calculate_aggregate_stats, calculate_status_distribution, calculate_volume_risk_series,
    },
    endpoints, settings,
    timezone::get_local_offset,
    transaction::{self, Transaction, TransactionFilter, now_millis},
};

/// One of the top level pages of the application.
///
/// Any view can be reached from any other view through the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Transactions,
    Analysis,
    Settings,
}

impl View {
    /// Every view in navigation order.
    pub const ALL: [View; 4] = [
        View::Dashboard,
        View::Transactions,
        View::Analysis,
        View::Settings,
    ];

    pub fn endpoint(&self) -> &'static str {
        match self {
            View::Dashboard => endpoints::DASHBOARD_VIEW,
            View::Transactions => endpoints::TRANSACTIONS_VIEW,
            View::Analysis => endpoints::ANALYSIS_VIEW,
            View::Settings => endpoints::SETTINGS_VIEW,
        }
    }

    /// The title shown in the navigation bar.
    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Transactions => "Monitor",
            View::Analysis => "Run AI Analysis",
            View::Settings => "Configuration",
        }
    }
}

/// The data a view needs from a ledger snapshot.
#[derive(Debug, PartialEq)]
pub enum ViewData<'a> {
    Dashboard {
        stats: AggregateStats,
        distribution: StatusDistribution,
        series: [TimeBucket; BUCKET_COUNT],
    },
    /// The transactions that match the filter, newest first.
    Transactions(Vec<&'a Transaction>),
    Analysis,
    Settings { ledger_size: usize },
}

/// Compute the data for `view` from a snapshot of the ledger.
///
/// `filter` only applies to [View::Transactions] and `now` (milliseconds since
/// the Unix epoch) only to [View::Dashboard].
pub fn select_view_data<'a>(
    view: View,
    snapshot: &'a [Transaction],
    filter: &TransactionFilter,
    now: i64,
) -> ViewData<'a> {
    match view {
        View::Dashboard => ViewData::Dashboard {
            stats: calculate_aggregate_stats(snapshot),
            distribution: calculate_status_distribution(snapshot),
            series: calculate_volume_risk_series(snapshot, now),
        },
        View::Transactions => ViewData::Transactions(filter.apply(snapshot)),
        View::Analysis => ViewData::Analysis,
        View::Settings => ViewData::Settings {
            ledger_size: snapshot.len(),
        },
    }
}

/// Render `view` from the current contents of the ledger.
///
/// The ledger lock is only held while the page is rendered, never across an
/// await point.
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if the configured timezone is invalid
/// or [Error::LedgerLockError] if the ledger lock is poisoned.
pub(crate) fn render_view(
    view: View,
    state: &AppState,
    filter: &TransactionFilter,
) -> Result<Markup, Error> {
    let local_offset = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let ledger = state
        .ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)?;

    let markup = match select_view_data(view, ledger.transactions(), filter, now_millis()) {
        ViewData::Dashboard {
            stats,
            distribution,
            series,
        } => dashboard::dashboard_page(&stats, &distribution, &series),
        ViewData::Transactions(transactions) => {
            transaction::transactions_page(&transactions, filter, local_offset)
        }
        ViewData::Analysis => analysis::analysis_page(state.classifier.model_name()),
        ViewData::Settings { ledger_size } => settings::settings_page(
            ledger_size,
            state.classifier.model_name(),
            state.classifier.is_configured(),
            state.seed_count,
        ),
    };

    Ok(markup)
}
