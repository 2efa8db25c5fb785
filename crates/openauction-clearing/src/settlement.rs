//! Payout derivation for the seller and the bidders.
//!
//! Everything here is pure accounting over a settled [`AuctionState`]; the
//! orchestration crate resolves user ids to addresses and moves the funds.
//!
//! The seller-partial configuration is recognised by the clearing price
//! sitting exactly on the floor: `num * S == den * seller_buy`, the
//! condition [`verify_price`](crate::verify_price) enforced when it
//! committed that configuration.

use primitive_types::U256;

use openauction_types::constants::FEE_DENOMINATOR;
use openauction_types::{AuctionError, AuctionState, OrderKey, Result, UserId, QUEUE_START};

/// Assets owed to a single participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payout {
    pub user_id: UserId,
    /// Offered-asset atoms owed.
    pub offered: U256,
    /// Bidding-asset atoms owed.
    pub bidding: U256,
}

/// Settle the seller's side of a cleared auction.
///
/// Reads `(seller, seller_buy, S)` from the initial order, then zeroes the
/// initial order to lock the record — a second call is an internal error.
///
/// - Funding threshold missed: the whole supply comes back, fee deposit
///   included.
/// - Seller partially filled (price on the floor): the unsold supply comes
///   back and the sold volume is paid out in bidding asset.
/// - Otherwise the seller sold everything and receives `S * den / num`
///   bidding atoms.
pub fn settle_seller(state: &mut AuctionState) -> Result<Payout> {
    if !state.is_settled() {
        return Err(AuctionError::Internal("auction is not cleared".into()));
    }
    if state.initial_order == QUEUE_START {
        return Err(AuctionError::Internal("seller already settled".into()));
    }

    let (seller, seller_buy, supply) = state.initial_order.decode();
    state.initial_order = QUEUE_START;

    let supply_u = U256::from(supply);
    if state.funding_threshold_not_reached {
        let fee_deposit =
            supply_u * U256::from(state.fee_numerator) / U256::from(FEE_DENOMINATOR);
        return Ok(Payout {
            user_id: seller,
            offered: supply_u + fee_deposit,
            bidding: U256::zero(),
        });
    }

    let (num, den) = clearing_price(state);
    if price_on_floor(num, den, seller_buy, supply) {
        let volume = U256::from(state.volume_clearing_price_order);
        Ok(Payout {
            user_id: seller,
            offered: supply_u - volume,
            bidding: volume * U256::from(den) / U256::from(num),
        })
    } else {
        Ok(Payout {
            user_id: seller,
            offered: U256::zero(),
            bidding: supply_u * U256::from(den) / U256::from(num),
        })
    }
}

/// Derive the payout for one participant order of a cleared auction.
///
/// The order's position relative to the clearing order decides its fate:
/// strictly better orders are fully filled at the uniform price, the
/// clearing order itself is filled for the recorded partial volume, and
/// everything else is refunded.
pub fn claim_order(state: &AuctionState, order: OrderKey) -> Result<Payout> {
    if !state.is_settled() {
        return Err(AuctionError::Internal("auction is not cleared".into()));
    }

    let (user, _, sell) = order.decode();
    let sell_u = U256::from(sell);

    if state.funding_threshold_not_reached {
        return Ok(Payout {
            user_id: user,
            offered: U256::zero(),
            bidding: sell_u,
        });
    }

    let (num, den) = clearing_price(state);
    if order == state.clearing_order {
        let volume = U256::from(state.volume_clearing_price_order);
        let bidding = sell_u
            .checked_sub(volume)
            .ok_or(AuctionError::OverflowOrNarrowing)?;
        Ok(Payout {
            user_id: user,
            offered: volume * U256::from(num) / U256::from(den),
            bidding,
        })
    } else if order.smaller_than(state.clearing_order) {
        Ok(Payout {
            user_id: user,
            offered: sell_u * U256::from(num) / U256::from(den),
            bidding: U256::zero(),
        })
    } else {
        Ok(Payout {
            user_id: user,
            offered: U256::zero(),
            bidding: sell_u,
        })
    }
}

/// The committed clearing price `(num, den)`: offered atoms per `den`
/// bidding atoms.
pub(crate) fn clearing_price(state: &AuctionState) -> (u128, u128) {
    (
        state.clearing_order.buy_amount(),
        state.clearing_order.sell_amount(),
    )
}

/// Whether the clearing price sits exactly on the seller's floor.
pub(crate) fn price_on_floor(num: u128, den: u128, seller_buy: u128, supply: u128) -> bool {
    U256::from(num) * U256::from(supply) == U256::from(den) * U256::from(seller_buy)
}
