//! # openauction-book
//!
//! **The per-auction order book container for OpenAuction.**
//!
//! A singly-linked chain of packed order keys kept in ascending price
//! order, with caller-supplied insertion hints keeping placement cheap.
//! The container has:
//!
//! - **Sentinel-framed chain**: `QUEUE_START -> ... -> QUEUE_END`
//! - **Hint-based insertion**: a stale or over-early hint still works at
//!   linear extra cost; a too-late hint fails
//! - **History-preserving removal**: cancelled keys stay usable as hints

pub mod order_set;

pub use order_set::OrderedOrderSet;
