//! Identifiers used throughout OpenAuction.
//!
//! User and auction ids are plain monotonic `u64`s allocated by the engine;
//! external accounts are 20-byte addresses resolved through the user
//! directory.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 20-byte account address, as handed to the engine by the host layer.
pub type Address = primitive_types::H160;

/// Asset identifiers (e.g., "WETH", "USDC"). The engine never inspects
/// these; they are opaque handles passed through to the ledger.
pub type Asset = String;

// ---------------------------------------------------------------------------
// UserId
// ---------------------------------------------------------------------------

/// Engine-internal identifier for a registered account.
///
/// Ids are allocated consecutively from 0 by the user directory and are
/// permanent once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AuctionId
// ---------------------------------------------------------------------------

/// Monotonically increasing identifier for an auction. The first auction
/// gets id 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AuctionId(pub u64);

impl AuctionId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for AuctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "auction:{}", self.0)
    }
}

/// Short hex rendering of an address for log lines.
#[must_use]
pub fn short_address(address: &Address) -> String {
    hex::encode(&address.as_bytes()[..4])
}
