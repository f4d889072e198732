//! Transactions under fraud evaluation.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and its identifier and status types
//! - The in-memory `Ledger` and the filter used by the monitor page
//! - View handlers for listing and inspecting transactions
//! - Seeding the ledger with generated transactions

mod core;
mod detail_page;
mod ledger;
mod list_page;
mod seed;
mod view;

pub use core::{
    CandidateFields, Transaction, TransactionId, TransactionStatus, now_millis,
};
pub use detail_page::get_transaction_page;
pub use ledger::{Ledger, TransactionFilter};
pub use list_page::get_transactions_page;
pub use seed::seed_ledger;

pub(crate) use list_page::transactions_page;
