//! The in-memory ledger of classified transactions.

use std::collections::HashSet;

use serde::Deserialize;

use crate::{
    Error,
    transaction::{Transaction, TransactionId, TransactionStatus},
};

/// The ordered collection of classified transactions, newest first.
///
/// The ledger lives for the lifetime of the process and is never persisted.
/// Every stored transaction has a terminal status and a unique identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a classified transaction.
    ///
    /// # Errors
    /// Returns [Error::PendingTransaction] if `transaction` has not been
    /// classified, or [Error::DuplicateTransactionId] if the ledger already
    /// holds a transaction with the same ID.
    pub fn insert_at_head(&mut self, transaction: Transaction) -> Result<(), Error> {
        check_terminal(&transaction)?;

        if self.get(&transaction.id).is_some() {
            return Err(Error::DuplicateTransactionId(transaction.id));
        }

        self.transactions.insert(0, transaction);

        Ok(())
    }

    /// Replace the entire contents of the ledger with `transactions`.
    ///
    /// The ledger is left unchanged if any transaction is invalid.
    ///
    /// # Errors
    /// Returns [Error::PendingTransaction] or [Error::DuplicateTransactionId]
    /// for the first offending transaction.
    pub fn replace_all(&mut self, transactions: Vec<Transaction>) -> Result<(), Error> {
        let mut seen = HashSet::with_capacity(transactions.len());

        for transaction in &transactions {
            check_terminal(transaction)?;

            if !seen.insert(&transaction.id) {
                return Err(Error::DuplicateTransactionId(transaction.id.clone()));
            }
        }

        self.transactions = transactions;

        Ok(())
    }

    /// Find the transaction with `id`.
    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|transaction| &transaction.id == id)
    }

    pub fn contains(&self, id: &TransactionId) -> bool {
        self.get(id).is_some()
    }

    /// The stored transactions, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

fn check_terminal(transaction: &Transaction) -> Result<(), Error> {
    if transaction.status.is_terminal() {
        Ok(())
    } else {
        Err(Error::PendingTransaction(transaction.id.clone()))
    }
}

/// Narrows a ledger snapshot down to the transactions a user asked to see.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionFilter {
    /// Only keep transactions with this status.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<TransactionStatus>,
    /// Case-insensitive text to look for in the merchant or location.
    #[serde(default, rename = "q")]
    pub query: String,
}

impl TransactionFilter {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        if self.status.is_some_and(|status| transaction.status != status) {
            return false;
        }

        let query = self.query.trim().to_lowercase();

        query.is_empty()
            || transaction.merchant.to_lowercase().contains(&query)
            || transaction.location.to_lowercase().contains(&query)
    }

    /// Keep the transactions that match the filter, preserving their order.
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|transaction| self.matches(transaction))
            .collect()
    }
}

// An unselected <select> submits "status=", which should mean "any status".
fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<TransactionStatus>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;

    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => TransactionStatus::deserialize(serde::de::value::StrDeserializer::<
            D::Error,
        >::new(text))
        .map(Some),
    }
}
