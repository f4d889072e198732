//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use crate::{
    Error, analysis::InFlightRequests, classifier::Classifier, timezone::get_local_offset,
    transaction::Ledger,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The in-memory ledger of classified transactions.
    pub ledger: Arc<Mutex<Ledger>>,

    /// The external service that classifies and generates transactions.
    pub classifier: Arc<dyn Classifier>,

    /// The candidate transactions with a classification request outstanding.
    pub in_flight: InFlightRequests,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// How many transactions to generate when seeding the ledger.
    pub seed_count: usize,
}

impl AppState {
    /// Create a new [AppState] with an empty ledger.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if `local_timezone` is not a known timezone.
    pub fn new(
        classifier: Arc<dyn Classifier>,
        local_timezone: &str,
        seed_count: usize,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        Ok(Self {
            ledger: Arc::new(Mutex::new(Ledger::new())),
            classifier,
            in_flight: InFlightRequests::new(),
            local_timezone: local_timezone.to_owned(),
            seed_count,
        })
    }
}
