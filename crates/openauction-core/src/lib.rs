//! # openauction-core
//!
//! **Auction lifecycle orchestration for OpenAuction.**
//!
//! The [`AuctionHouse`] owns the global state — auctions and their books,
//! the user directory, fee parameters, the event log — and drives the
//! externally callable operations behind phase guards:
//!
//! `initiate_auction`, `place_orders`, `cancel_orders`, `precompute_sum`,
//! `verify_price`, `claim_participant`, `set_fee`, `register_user`.
//!
//! Asset movement happens through the [`Ledger`] collaborator; the clearing
//! math itself lives in `openauction-clearing` and stays side-effect free.

pub mod directory;
pub mod house;
pub mod ledger;

pub use directory::UserDirectory;
pub use house::{AuctionHouse, AuctionParams, OrderPlacement};
pub use ledger::{InMemoryLedger, Ledger};
