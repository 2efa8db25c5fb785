//! # openauction-clearing
//!
//! **Pure uniform-price clearing for OpenAuction.**
//!
//! This crate is the compute plane — it reads the order book, resolves the
//! single clearing price, and derives every payout. It has:
//!
//! - **Zero side effects**: no ledger access, no event emission, no I/O
//! - **Deterministic output**: same state and book, same outcome
//! - **Checked arithmetic**: overflow or a failed 96-bit narrowing aborts
//!   the operation with state untouched
//!
//! The two-phase solver lives in [`clearing`]; payout derivation for the
//! seller, bidders, and the fee receiver lives in [`settlement`] and
//! [`fees`]. The orchestration crate moves the funds.

pub mod clearing;
pub mod fees;
pub mod settlement;

pub use clearing::{precompute_sum, verify_price, ClearingCase, ClearingOutcome};
pub use fees::{fee_payouts, FeePayouts};
pub use settlement::{claim_order, settle_seller, Payout};
