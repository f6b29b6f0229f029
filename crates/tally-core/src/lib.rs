//! # tally-core
//! Transaction validation and epoch settlement over a UTXO pool.

pub mod constants;
pub mod crypto;
pub mod error;
pub mod handler;
pub mod traits;
pub mod types;
pub mod utxo_pool;
pub mod validation;

pub use handler::{EpochSummary, RejectedTransaction, TxHandler};
pub use utxo_pool::UtxoPool;
pub use validation::{validate_transaction, ValidatedTransaction};
