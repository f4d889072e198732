//! The AI sandbox: a form for building a transaction and the endpoint that
//! classifies it.

mod endpoint;
mod in_flight;
mod page;

pub use endpoint::analyze_transaction_endpoint;
pub use in_flight::{InFlightGuard, InFlightRequests};
pub use page::get_analysis_page;

pub(crate) use page::analysis_page;
