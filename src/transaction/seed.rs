//! Seeding the ledger with synthetic transactions from the classifier.

use crate::{AppState, Error};

/// Replace the ledger with [AppState::seed_count] freshly generated transactions.
///
/// The generated batch is ordered newest first before it is stored. Returns
/// how many transactions the ledger now holds.
///
/// # Errors
/// Returns [Error::Classifier] if the batch could not be generated, in which
/// case the ledger is left unchanged.
pub async fn seed_ledger(state: &AppState) -> Result<usize, Error> {
    let mut batch = state.classifier.generate_batch(state.seed_count).await?;
    batch.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    let batch_size = batch.len();

    state
        .ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)?
        .replace_all(batch)?;

    tracing::info!("Seeded the ledger with {batch_size} generated transactions");

    Ok(batch_size)
}
