//! Scenario and property test suite for Tally.
//!
//! Integration tests drive [`tally_core::TxHandler`] through multi-epoch
//! scenarios and randomized batches, checking that admitted sets stay
//! mutually consistent and that value is never created.

pub mod helpers;
