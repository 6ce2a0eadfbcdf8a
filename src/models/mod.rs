mod filter;
mod transaction;

pub use filter::{Period, TransactionFilter};
pub use transaction::{parse_timestamp, Transaction};
pub(crate) use transaction::format_timestamp;
