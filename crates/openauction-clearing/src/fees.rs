//! Fee accounting for cleared auctions.
//!
//! The fee deposit (`S * fee_numerator / 1000` offered atoms) was pulled
//! from the seller at initiation. Once an auction clears with its funding
//! threshold met, the deposit is split in proportion to how much of the
//! supply actually sold; the unsold share flows back to the seller. When
//! the threshold is missed the whole deposit rides back with the seller's
//! refund instead (see [`settle_seller`](crate::settle_seller)).

use primitive_types::U256;

use openauction_types::constants::FEE_DENOMINATOR;
use openauction_types::{AuctionError, AuctionState, Result, QUEUE_START};

use crate::settlement::{clearing_price, price_on_floor};

/// How the fee deposit of one auction is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeePayouts {
    /// Offered atoms owed to the fee receiver.
    pub receiver_offered: U256,
    /// Offered atoms returned to the seller for the unsold share.
    pub seller_offered: U256,
}

/// Split the fee deposit of a cleared auction.
///
/// Must run before the seller is settled (the initial order is still
/// intact) and only when the funding threshold was met and the snapshot
/// fee numerator is positive.
pub fn fee_payouts(state: &AuctionState) -> Result<FeePayouts> {
    if !state.is_settled() || state.initial_order == QUEUE_START {
        return Err(AuctionError::Internal(
            "fees must be computed after clearing, before seller settlement".into(),
        ));
    }

    let (_, seller_buy, supply) = state.initial_order.decode();
    let supply_u = U256::from(supply);
    let fee_base = supply_u * U256::from(state.fee_numerator) / U256::from(FEE_DENOMINATOR);

    let (num, den) = clearing_price(state);
    if price_on_floor(num, den, seller_buy, supply) {
        // Seller partially filled: only the sold share of the deposit is
        // earned; the rest returns to the seller.
        let sold = U256::from(state.volume_clearing_price_order);
        Ok(FeePayouts {
            receiver_offered: fee_base * sold / supply_u,
            seller_offered: fee_base * (supply_u - sold) / supply_u,
        })
    } else {
        Ok(FeePayouts {
            receiver_offered: fee_base,
            seller_offered: U256::zero(),
        })
    }
}
