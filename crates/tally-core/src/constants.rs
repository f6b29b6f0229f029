//! Ledger constants. All amounts are in base units (1 TALLY = 10^8 units).

use crate::types::Amount;

pub const COIN: Amount = 100_000_000;

/// Transaction format version written by the builders in this crate.
pub const TX_VERSION: u64 = 1;

/// Domain separator mixed into every signing hash.
pub const SIGHASH_DOMAIN: &[u8] = b"tally/sighash/v1";
