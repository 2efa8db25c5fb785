//! # openauction-types
//!
//! Shared types, errors, and constants for the **OpenAuction** sealed-bid
//! batch auction clearing engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`UserId`], [`AuctionId`], [`Address`], [`Asset`]
//! - **Order-key codec**: [`OrderKey`] with the packed
//!   `(user_id, buy_amount, sell_amount)` layout and the price total order
//! - **Auction state**: [`AuctionState`], [`AuctionPhase`]
//! - **Events**: [`Event`] — the structured records the engine emits
//! - **Errors**: [`AuctionError`] with `OA_ERR_` prefix codes
//! - **Constants**: amount bounds and fee parameters

pub mod auction;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod key;

// Re-export all primary types at crate root for ergonomic imports:
//   use openauction_types::{OrderKey, AuctionState, AuctionError, ...};

pub use auction::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use key::*;

// Constants are accessed via `openauction_types::constants::FOO`
// (not re-exported to avoid name collisions).
