//! The packed order-key codec and its price total order.
//!
//! An order key is a single 256-bit value carrying three fields:
//!
//! ```text
//! | user_id (64 bits) | buy_amount (96 bits) | sell_amount (96 bits) |
//!   255 ............ 192 191 ............. 96 95 .................. 0
//! ```
//!
//! For a bid, `buy_amount` is the amount of offered asset the bidder wants
//! and `sell_amount` is the amount of bidding asset the bidder pays. The
//! seller's initial order uses the same layout with
//! `(seller, min_buy_amount, offered_amount)`.
//!
//! Two sentinel keys frame the order book chain: [`QUEUE_START`] (all zero)
//! and [`QUEUE_END`] (the value 1).

use std::fmt;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_ORDER_AMOUNT;
use crate::{AuctionError, Result, UserId};

/// Head sentinel of every order book chain. Smaller than every real key.
pub const QUEUE_START: OrderKey = OrderKey(U256([0, 0, 0, 0]));

/// Terminator sentinel of every order book chain. Greater than every real key.
pub const QUEUE_END: OrderKey = OrderKey(U256([1, 0, 0, 0]));

/// A packed `(user_id, buy_amount, sell_amount)` order key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderKey(pub U256);

impl OrderKey {
    /// Pack `(user, buy, sell)` into a key.
    ///
    /// # Errors
    /// Returns `OverflowOrNarrowing` if either amount exceeds 96 bits.
    pub fn encode(user: UserId, buy_amount: u128, sell_amount: u128) -> Result<Self> {
        if buy_amount > MAX_ORDER_AMOUNT || sell_amount > MAX_ORDER_AMOUNT {
            return Err(AuctionError::OverflowOrNarrowing);
        }
        let packed = (U256::from(user.0) << 192)
            | (U256::from(buy_amount) << 96)
            | U256::from(sell_amount);
        Ok(Self(packed))
    }

    /// Unpack the key into `(user, buy_amount, sell_amount)`.
    #[must_use]
    pub fn decode(self) -> (UserId, u128, u128) {
        (self.user_id(), self.buy_amount(), self.sell_amount())
    }

    #[must_use]
    pub fn user_id(self) -> UserId {
        UserId((self.0 >> 192).low_u64())
    }

    #[must_use]
    pub fn buy_amount(self) -> u128 {
        ((self.0 >> 96) & amount_mask()).low_u128()
    }

    #[must_use]
    pub fn sell_amount(self) -> u128 {
        (self.0 & amount_mask()).low_u128()
    }

    #[must_use]
    pub fn is_sentinel(self) -> bool {
        self == QUEUE_START || self == QUEUE_END
    }

    /// The strict total order used by the book: better limit price first.
    ///
    /// A better bid pays more bidding asset per offered atom, i.e. has the
    /// smaller `buy_amount / sell_amount` ratio. Comparison is done by
    /// cross-multiplication — both products of two 96-bit operands fit in
    /// 192 bits, so plain 256-bit multiplication is exact.
    ///
    /// Ties on limit price break to the larger `sell_amount` first, then to
    /// the lower `user_id`. `QUEUE_START` is smaller than every key and
    /// every key is smaller than `QUEUE_END`.
    #[must_use]
    pub fn smaller_than(self, other: OrderKey) -> bool {
        if self == other {
            return false;
        }
        if self == QUEUE_START || other == QUEUE_END {
            return true;
        }
        if self == QUEUE_END || other == QUEUE_START {
            return false;
        }

        let left = U256::from(self.buy_amount()) * U256::from(other.sell_amount());
        let right = U256::from(other.buy_amount()) * U256::from(self.sell_amount());
        if left != right {
            return left < right;
        }
        if self.sell_amount() != other.sell_amount() {
            return self.sell_amount() > other.sell_amount();
        }
        self.user_id() < other.user_id()
    }
}

fn amount_mask() -> U256 {
    (U256::one() << 96) - U256::one()
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == QUEUE_START {
            return write!(f, "QUEUE_START");
        }
        if *self == QUEUE_END {
            return write!(f, "QUEUE_END");
        }
        let (user, buy, sell) = self.decode();
        write!(f, "order({user}, buy={buy}, sell={sell})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(user: u64, buy: u128, sell: u128) -> OrderKey {
        OrderKey::encode(UserId(user), buy, sell).unwrap()
    }

    #[test]
    fn encode_decode_roundtrip() {
        let k = key(7, 123_456, 789_000);
        assert_eq!(k.decode(), (UserId(7), 123_456, 789_000));
    }

    #[test]
    fn encode_roundtrip_at_field_bounds() {
        let k = key(u64::MAX, MAX_ORDER_AMOUNT, MAX_ORDER_AMOUNT);
        assert_eq!(k.decode(), (UserId(u64::MAX), MAX_ORDER_AMOUNT, MAX_ORDER_AMOUNT));
    }

    #[test]
    fn encode_rejects_oversized_amounts() {
        let too_big = MAX_ORDER_AMOUNT + 1;
        assert!(matches!(
            OrderKey::encode(UserId(1), too_big, 1),
            Err(AuctionError::OverflowOrNarrowing)
        ));
        assert!(matches!(
            OrderKey::encode(UserId(1), 1, too_big),
            Err(AuctionError::OverflowOrNarrowing)
        ));
    }

    #[test]
    fn fields_do_not_bleed_into_each_other() {
        let k = key(0, MAX_ORDER_AMOUNT, 0);
        assert_eq!(k.user_id(), UserId(0));
        assert_eq!(k.sell_amount(), 0);

        let k = key(0, 0, MAX_ORDER_AMOUNT);
        assert_eq!(k.buy_amount(), 0);
    }

    #[test]
    fn better_price_is_smaller() {
        // a pays 2 bidding atoms per offered atom, b pays 1 — a is better.
        let a = key(1, 100, 200);
        let b = key(2, 100, 100);
        assert!(a.smaller_than(b));
        assert!(!b.smaller_than(a));
    }

    #[test]
    fn equal_price_breaks_ties_on_sell_amount_then_user() {
        // Same price 1:2, different volume: larger sell first.
        let big = key(9, 100, 200);
        let small = key(1, 50, 100);
        assert!(big.smaller_than(small));
        assert!(!small.smaller_than(big));

        // Same price, same volume: lower user id first.
        let u1 = key(1, 50, 100);
        let u2 = key(2, 50, 100);
        assert!(u1.smaller_than(u2));
        assert!(!u2.smaller_than(u1));
    }

    #[test]
    fn irreflexive() {
        let k = key(1, 10, 10);
        assert!(!k.smaller_than(k));
        assert!(!QUEUE_START.smaller_than(QUEUE_START));
        assert!(!QUEUE_END.smaller_than(QUEUE_END));
    }

    #[test]
    fn sentinels_bound_all_keys() {
        let k = key(1, 10, 10);
        assert!(QUEUE_START.smaller_than(k));
        assert!(k.smaller_than(QUEUE_END));
        assert!(QUEUE_START.smaller_than(QUEUE_END));
        assert!(!QUEUE_END.smaller_than(QUEUE_START));
        assert!(!k.smaller_than(QUEUE_START));
        assert!(!QUEUE_END.smaller_than(k));
    }

    #[test]
    fn total_order_on_sample_set() {
        // Antisymmetry and transitivity over a mixed sample, sentinels included.
        let keys = [
            QUEUE_START,
            key(1, 10, 100),
            key(2, 10, 90),
            key(3, 50, 100),
            key(1, 50, 100),
            key(4, 90, 100),
            key(5, 100, 100),
            QUEUE_END,
        ];
        for &a in &keys {
            for &b in &keys {
                if a != b {
                    assert_ne!(a.smaller_than(b), b.smaller_than(a), "{a} vs {b}");
                }
                for &c in &keys {
                    if a.smaller_than(b) && b.smaller_than(c) {
                        assert!(a.smaller_than(c), "{a} < {b} < {c}");
                    }
                }
            }
        }
    }

    #[test]
    fn cross_multiplication_is_exact_at_96_bits() {
        // Products of two 96-bit operands need 192 bits; make sure nothing
        // saturates or wraps near the top of the range.
        let a = key(1, MAX_ORDER_AMOUNT, MAX_ORDER_AMOUNT - 1);
        let b = key(2, MAX_ORDER_AMOUNT - 1, MAX_ORDER_AMOUNT);
        // a ratio is just above 1, b just below: b is the better bid.
        assert!(b.smaller_than(a));
        assert!(!a.smaller_than(b));
    }

    #[test]
    fn display_formats() {
        assert_eq!(format!("{QUEUE_START}"), "QUEUE_START");
        assert_eq!(format!("{QUEUE_END}"), "QUEUE_END");
        assert_eq!(format!("{}", key(3, 5, 7)), "order(user:3, buy=5, sell=7)");
    }
}
