//! Tracks which candidate transactions have a classification request outstanding.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{Error, transaction::TransactionId};

/// The set of candidate IDs that are currently being classified.
#[derive(Debug, Clone, Default)]
pub struct InFlightRequests {
    ids: Arc<Mutex<HashSet<TransactionId>>>,
}

impl InFlightRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` as being classified until the returned guard is dropped.
    ///
    /// # Errors
    /// Returns [Error::AnalysisInProgress] if a request for `id` is already
    /// outstanding, or [Error::InFlightLockError] if the lock is poisoned.
    pub fn try_begin(&self, id: &TransactionId) -> Result<InFlightGuard, Error> {
        let mut ids = self
            .ids
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire in-flight lock: {error}"))
            .map_err(|_| Error::InFlightLockError)?;

        if !ids.insert(id.clone()) {
            return Err(Error::AnalysisInProgress(id.clone()));
        }

        Ok(InFlightGuard {
            ids: self.ids.clone(),
            id: id.clone(),
        })
    }

    /// Whether a request for `id` is outstanding.
    pub fn contains(&self, id: &TransactionId) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }
}

/// Releases the candidate ID when the request completes or fails.
#[derive(Debug)]
pub struct InFlightGuard {
    ids: Arc<Mutex<HashSet<TransactionId>>>,
    id: TransactionId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.ids
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}
