//! The two-phase uniform-price solver.
//!
//! **Phase A** ([`precompute_sum`]) amortises the walk down the book across
//! multiple calls: it advances the interim cursor a bounded number of
//! positions, accumulating bidding-asset volume, and refuses to walk past
//! the clearing point.
//!
//! **Phase B** ([`verify_price`]) checks a proposed clearing key against
//! the book. It resumes the interim walk up to the candidate price and
//! lands in exactly one of three configurations:
//!
//! 1. the candidate is a live bid — that bid takes the partial fill;
//! 2. the candidate is synthetic at exactly the seller's floor price —
//!    the seller's own order takes the partial fill;
//! 3. the candidate is synthetic and demand consumes the supply exactly —
//!    nothing is partial.
//!
//! Any other configuration rejects the candidate and leaves the auction
//! open for another attempt.

use primitive_types::U256;

use openauction_book::OrderedOrderSet;
use openauction_types::constants::MAX_ORDER_AMOUNT;
use openauction_types::{
    AuctionError, AuctionPhase, AuctionState, OrderKey, Result, QUEUE_END,
};

/// Which side ended up partially filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearingCase {
    /// The clearing order is a live bid, filled for part of its volume.
    BidPartiallyFilled,
    /// The price sits on the seller's floor; the seller keeps unsold supply.
    SellerPartiallyFilled,
    /// Demand met supply exactly; every matched order fills completely.
    ExactFill,
}

/// The committed result of a successful [`verify_price`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearingOutcome {
    /// The recorded clearing order (live bid or synthetic price key).
    pub clearing_order: OrderKey,
    /// Clearing price numerator: offered atoms per `price_denominator`
    /// bidding atoms.
    pub price_numerator: u128,
    pub price_denominator: u128,
    /// Offered-asset demand satisfied by the clearing, compared against the
    /// auction's funding threshold.
    pub total_buy: U256,
    pub case: ClearingCase,
}

/// Narrow a 256-bit value to a 96-bit amount.
fn to_amount96(value: U256) -> Result<u128> {
    if value > U256::from(MAX_ORDER_AMOUNT) {
        return Err(AuctionError::OverflowOrNarrowing);
    }
    Ok(value.low_u128())
}

/// Phase A: advance the interim walk `steps` positions down the book,
/// accumulating each visited order's `sell_amount` into the interim sum.
///
/// # Errors
/// - `PrecomputeTooFar` if the walk reaches `QUEUE_END`, or if after the
///   walk the accumulated demand at the final order's price already covers
///   the supply — the clearing point must stay ahead of the cursor.
/// - `OverflowOrNarrowing` on checked-arithmetic failure.
///
/// State is only persisted on success; successive calls compose: walking
/// `n` then `m` steps equals walking `n + m`.
pub fn precompute_sum(
    state: &mut AuctionState,
    book: &OrderedOrderSet,
    steps: u64,
) -> Result<()> {
    if steps == 0 {
        return Err(AuctionError::InvalidOrder {
            reason: "zero iteration steps".into(),
        });
    }

    let (_, _, supply) = state.initial_order.decode();
    let mut cursor = state.interim_order;
    let mut sum_bid = state.interim_sum_bid;

    for _ in 0..steps {
        let nxt = book.next(cursor);
        if nxt == QUEUE_END {
            return Err(AuctionError::PrecomputeTooFar);
        }
        cursor = nxt;
        sum_bid = sum_bid
            .checked_add(U256::from(cursor.sell_amount()))
            .ok_or(AuctionError::OverflowOrNarrowing)?;
    }

    // The demand accumulated so far, valued at the final visited order's
    // price, must still be below the supply: sum_bid * buy_i < S * sell_i.
    let (_, buy_i, sell_i) = cursor.decode();
    let demand = sum_bid
        .checked_mul(U256::from(buy_i))
        .ok_or(AuctionError::OverflowOrNarrowing)?;
    if demand >= U256::from(supply) * U256::from(sell_i) {
        return Err(AuctionError::PrecomputeTooFar);
    }

    state.interim_order = cursor;
    state.interim_sum_bid = sum_bid;
    Ok(())
}

/// Phase B: verify the proposed clearing key and commit the outcome.
///
/// On success the auction's `clearing_order`, `volume_clearing_price_order`
/// and `funding_threshold_not_reached` fields are written; any error leaves
/// the state untouched. A settled auction rejects every further attempt.
pub fn verify_price(
    state: &mut AuctionState,
    book: &OrderedOrderSet,
    candidate: OrderKey,
) -> Result<ClearingOutcome> {
    if state.is_settled() {
        return Err(AuctionError::WrongPhase {
            expected: AuctionPhase::SolutionSubmission,
            actual: AuctionPhase::Finished,
        });
    }

    let num = candidate.buy_amount();
    let den = candidate.sell_amount();
    if num == 0 || den == 0 {
        return Err(AuctionError::PriceRejected {
            reason: "price has a zero component".into(),
        });
    }

    let (seller, seller_buy, supply) = state.initial_order.decode();
    let supply_u = U256::from(supply);

    // Resume the interim walk: sum every bid strictly better than the
    // candidate price.
    let mut sum_bid = state.interim_sum_bid;
    let mut cursor = state.interim_order;
    let mut nxt = book.next(cursor);
    while nxt != QUEUE_END && nxt.smaller_than(candidate) {
        sum_bid = sum_bid
            .checked_add(U256::from(nxt.sell_amount()))
            .ok_or(AuctionError::OverflowOrNarrowing)?;
        cursor = nxt;
        nxt = book.next(cursor);
    }

    let sum_buy = sum_bid
        .checked_mul(U256::from(num))
        .ok_or(AuctionError::OverflowOrNarrowing)?
        / U256::from(den);

    let outcome = if nxt == candidate {
        // The candidate is a live bid: it absorbs whatever supply the
        // better bids left over.
        if sum_buy > supply_u {
            return Err(AuctionError::PriceRejected {
                reason: "demand above the candidate price exceeds supply".into(),
            });
        }
        let remainder = supply_u - sum_buy;
        let volume = remainder * U256::from(den) / U256::from(num);
        let volume96 = to_amount96(volume)?;
        if volume96 > candidate.sell_amount() {
            return Err(AuctionError::PriceRejected {
                reason: "partial fill exceeds the clearing order's volume".into(),
            });
        }
        state.volume_clearing_price_order = volume96;
        state.clearing_order = candidate;
        ClearingOutcome {
            clearing_order: candidate,
            price_numerator: num,
            price_denominator: den,
            total_buy: sum_buy + volume,
            case: ClearingCase::BidPartiallyFilled,
        }
    } else if U256::from(num) * supply_u == U256::from(den) * U256::from(seller_buy) {
        // Synthetic candidate at exactly the seller's floor price: the
        // seller's own order takes the partial fill.
        if sum_buy > supply_u {
            return Err(AuctionError::PriceRejected {
                reason: "demand at the floor price exceeds supply".into(),
            });
        }
        let volume96 = to_amount96(sum_buy)?;
        let clearing_order = OrderKey::encode(seller, num, den)?;
        state.volume_clearing_price_order = volume96;
        state.clearing_order = clearing_order;
        ClearingOutcome {
            clearing_order,
            price_numerator: num,
            price_denominator: den,
            total_buy: sum_buy,
            case: ClearingCase::SellerPartiallyFilled,
        }
    } else if sum_buy == supply_u {
        // Synthetic candidate between bids: demand consumes the supply
        // exactly, and the seller's proceeds must still meet the floor.
        if U256::from(num) * U256::from(seller_buy) > supply_u * U256::from(den) {
            return Err(AuctionError::PriceRejected {
                reason: "seller proceeds below the floor".into(),
            });
        }
        state.clearing_order = candidate;
        ClearingOutcome {
            clearing_order: candidate,
            price_numerator: num,
            price_denominator: den,
            total_buy: supply_u,
            case: ClearingCase::ExactFill,
        }
    } else {
        return Err(AuctionError::PriceRejected {
            reason: "demand does not meet supply at the candidate price".into(),
        });
    };

    state.funding_threshold_not_reached = outcome.total_buy < state.min_funding_threshold;
    Ok(outcome)
}
