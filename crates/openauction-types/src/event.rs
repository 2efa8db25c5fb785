//! Structured event records emitted by the engine.
//!
//! Events are appended to the engine's event log in operation order; hosts
//! drain them for persistence or broadcast. Fields mirror the decoded
//! arguments of the operation that produced them.

use chrono::{DateTime, Utc};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::{Address, Asset, AuctionId, UserId};

/// Everything the engine announces to the outside world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// An address was assigned a fresh user id.
    NewUser { user_id: UserId, address: Address },

    /// An explicit registration request completed.
    UserRegistration { user_id: UserId, address: Address },

    /// A new auction was initiated.
    NewAuction {
        auction_id: AuctionId,
        offered_asset: Asset,
        bidding_asset: Asset,
        order_cancellation_end: DateTime<Utc>,
        auction_end: DateTime<Utc>,
        seller_user_id: UserId,
        offered_amount: u128,
        min_buy_amount: u128,
        min_bid_sell_amount: u128,
        min_funding_threshold: U256,
        fee_numerator: u64,
    },

    /// A bid entered the book.
    NewSellOrder {
        auction_id: AuctionId,
        user_id: UserId,
        buy_amount: u128,
        sell_amount: u128,
    },

    /// A bid was cancelled and refunded.
    CancellationSellOrder {
        auction_id: AuctionId,
        user_id: UserId,
        buy_amount: u128,
        sell_amount: u128,
    },

    /// A clearing price was verified and recorded.
    AuctionCleared {
        auction_id: AuctionId,
        price_numerator: u128,
        price_denominator: u128,
    },

    /// A participant order was claimed and removed from the book.
    ClaimedFromOrder {
        auction_id: AuctionId,
        user_id: UserId,
        buy_amount: u128,
        sell_amount: u128,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serde_roundtrip() {
        let event = Event::AuctionCleared {
            auction_id: AuctionId(3),
            price_numerator: 500,
            price_denominator: 1000,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }

    #[test]
    fn new_user_serde_roundtrip() {
        let event = Event::NewUser {
            user_id: UserId(0),
            address: Address::repeat_byte(0x11),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
