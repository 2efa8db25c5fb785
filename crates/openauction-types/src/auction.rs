//! Per-auction state and the phase lifecycle.
//!
//! An auction moves through four phases, all derived from the stored
//! timestamps and the clearing order — the phase is never stored:
//!
//! **ORDER_PLACEMENT_AND_CANCELLATION → ORDER_PLACEMENT →
//! SOLUTION_SUBMISSION → FINISHED**
//!
//! During placement, bids flow into the book (and may be cancelled while
//! the cancellation window is open). After `auction_end`, solvers drive
//! the two-phase clearing. Once a clearing order is recorded the auction
//! is finished and only claims mutate it.

use std::fmt;

use chrono::{DateTime, Utc};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::{Asset, AuctionError, OrderKey, Result, QUEUE_START};

/// The phases of an auction, derived from timestamps and clearing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuctionPhase {
    /// Accepting new bids; cancellation window still open.
    OrderPlacementAndCancellation,
    /// Accepting new bids; cancellation window closed.
    OrderPlacement,
    /// Auction ended; accepting precompute steps and a clearing price.
    SolutionSubmission,
    /// Clearing order recorded; accepting claims.
    Finished,
}

impl fmt::Display for AuctionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrderPlacementAndCancellation => write!(f, "ORDER_PLACEMENT_AND_CANCELLATION"),
            Self::OrderPlacement => write!(f, "ORDER_PLACEMENT"),
            Self::SolutionSubmission => write!(f, "SOLUTION_SUBMISSION"),
            Self::Finished => write!(f, "FINISHED"),
        }
    }
}

/// The full per-auction record.
///
/// `initial_order` packs `(seller, min_buy_amount, offered_amount)`; it is
/// zeroed when the seller is settled, locking the record. `clearing_order`
/// is `QUEUE_START` until the auction settles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionState {
    pub offered_asset: Asset,
    pub bidding_asset: Asset,
    pub order_cancellation_end: DateTime<Utc>,
    pub auction_end: DateTime<Utc>,
    pub initial_order: OrderKey,
    /// Bids must sell strictly more than this many bidding atoms.
    pub min_bid_sell_amount: u128,
    /// Cumulative bidding-asset sum of the interim precompute walk.
    pub interim_sum_bid: U256,
    /// Last order visited by the interim precompute walk.
    pub interim_order: OrderKey,
    /// The recorded clearing order; `QUEUE_START` while unsettled.
    pub clearing_order: OrderKey,
    /// Volume of the partially filled order (96-bit). Bidding atoms when a
    /// bid is partial, offered atoms when the seller is partial.
    pub volume_clearing_price_order: u128,
    /// Fee numerator snapshot taken at auction creation.
    pub fee_numerator: u64,
    /// Minimum offered-asset demand for the auction to fund.
    pub min_funding_threshold: U256,
    pub funding_threshold_not_reached: bool,
}

impl AuctionState {
    /// Create a fresh auction record in the placement phase.
    #[must_use]
    pub fn new(
        offered_asset: Asset,
        bidding_asset: Asset,
        order_cancellation_end: DateTime<Utc>,
        auction_end: DateTime<Utc>,
        initial_order: OrderKey,
        min_bid_sell_amount: u128,
        min_funding_threshold: U256,
        fee_numerator: u64,
    ) -> Self {
        Self {
            offered_asset,
            bidding_asset,
            order_cancellation_end,
            auction_end,
            initial_order,
            min_bid_sell_amount,
            interim_sum_bid: U256::zero(),
            interim_order: QUEUE_START,
            clearing_order: QUEUE_START,
            volume_clearing_price_order: 0,
            fee_numerator,
            min_funding_threshold,
            funding_threshold_not_reached: false,
        }
    }

    /// Whether a clearing order has been recorded.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.clearing_order != QUEUE_START
    }

    /// The phase the auction is in at `now`.
    #[must_use]
    pub fn phase(&self, now: DateTime<Utc>) -> AuctionPhase {
        if self.is_settled() {
            AuctionPhase::Finished
        } else if now >= self.auction_end {
            AuctionPhase::SolutionSubmission
        } else if now < self.order_cancellation_end {
            AuctionPhase::OrderPlacementAndCancellation
        } else {
            AuctionPhase::OrderPlacement
        }
    }

    /// Guard: bids may be placed (`now < auction_end`, not settled).
    pub fn ensure_placement(&self, now: DateTime<Utc>) -> Result<()> {
        if !self.is_settled() && now < self.auction_end {
            return Ok(());
        }
        Err(AuctionError::WrongPhase {
            expected: AuctionPhase::OrderPlacement,
            actual: self.phase(now),
        })
    }

    /// Guard: bids may be cancelled (placement open and cancellation
    /// window not yet closed).
    pub fn ensure_cancellation(&self, now: DateTime<Utc>) -> Result<()> {
        if !self.is_settled() && now < self.auction_end && now < self.order_cancellation_end {
            return Ok(());
        }
        Err(AuctionError::WrongPhase {
            expected: AuctionPhase::OrderPlacementAndCancellation,
            actual: self.phase(now),
        })
    }

    /// Guard: solutions may be submitted (`now > auction_end`, not settled).
    pub fn ensure_solution(&self, now: DateTime<Utc>) -> Result<()> {
        if !self.is_settled() && now > self.auction_end {
            return Ok(());
        }
        Err(AuctionError::WrongPhase {
            expected: AuctionPhase::SolutionSubmission,
            actual: self.phase(now),
        })
    }

    /// Guard: claims may be made (clearing order recorded).
    pub fn ensure_finished(&self, now: DateTime<Utc>) -> Result<()> {
        if self.is_settled() {
            return Ok(());
        }
        Err(AuctionError::WrongPhase {
            expected: AuctionPhase::Finished,
            actual: self.phase(now),
        })
    }
}
